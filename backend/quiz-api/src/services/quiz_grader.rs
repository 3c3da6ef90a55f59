use crate::models::{AnswerSubmission, GradeResult, Question, WrongAnswer};

/// Placeholder provenance for questions generated without a chapter tag.
const UNKNOWN_CHAPTER: &str = "Unknown";

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Grades submitted answers against the current question set.
///
/// Pure function of its inputs. Submissions are matched to questions by
/// exact question text; a submission that matches no stored question still
/// counts toward `total` but scores nothing and produces no wrong-answer
/// entry. Answer comparison is case-insensitive and whitespace-trimmed.
pub fn grade(questions: &[Question], submissions: &[AnswerSubmission]) -> GradeResult {
    let mut score = 0u32;
    let mut wrong_answers = Vec::new();

    for submission in submissions {
        let Some(question) = questions.iter().find(|q| q.text == submission.question) else {
            continue;
        };

        if normalize(&submission.selected) == normalize(&question.correct_answer) {
            score += 1;
        } else {
            wrong_answers.push(WrongAnswer {
                question: question.text.clone(),
                selected: submission.selected.clone(),
                correct_answer: question.correct_answer.clone(),
                source_chapter: question
                    .source_chapter
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CHAPTER.to_string()),
            });
        }
    }

    GradeResult {
        score,
        total: submissions.len() as u32,
        wrong_answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str, chapter: Option<&str>) -> Question {
        Question {
            text: text.to_string(),
            options: vec!["3".to_string(), "4".to_string(), "5".to_string()],
            correct_answer: correct.to_string(),
            source_chapter: chapter.map(|c| c.to_string()),
        }
    }

    fn submission(question: &str, selected: &str) -> AnswerSubmission {
        AnswerSubmission {
            question: question.to_string(),
            selected: selected.to_string(),
        }
    }

    #[test]
    fn correct_answer_scores() {
        let set = vec![question("2+2=?", "4", None)];
        let result = grade(&set, &[submission("2+2=?", "4")]);

        assert_eq!(result.score, 1);
        assert_eq!(result.total, 1);
        assert!(result.wrong_answers.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let set = vec![question("2+2=?", "4", None)];
        let result = grade(&set, &[submission("2+2=?", " 4 ")]);
        assert_eq!(result.score, 1);

        let set = vec![question("capital of France?", "Paris", None)];
        let result = grade(&set, &[submission("capital of France?", "  pArIs ")]);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn wrong_answer_is_reported_with_detail() {
        let set = vec![question("2+2=?", "4", Some("Arithmetic"))];
        let result = grade(&set, &[submission("2+2=?", "5")]);

        assert_eq!(result.score, 0);
        assert_eq!(result.total, 1);
        assert_eq!(
            result.wrong_answers,
            vec![WrongAnswer {
                question: "2+2=?".to_string(),
                selected: "5".to_string(),
                correct_answer: "4".to_string(),
                source_chapter: "Arithmetic".to_string(),
            }]
        );
    }

    #[test]
    fn missing_chapter_uses_placeholder() {
        let set = vec![question("2+2=?", "4", None)];
        let result = grade(&set, &[submission("2+2=?", "3")]);
        assert_eq!(result.wrong_answers[0].source_chapter, "Unknown");
    }

    #[test]
    fn unmatched_question_counts_toward_total_only() {
        let set = vec![question("2+2=?", "4", None)];
        let result = grade(&set, &[submission("3+3=?", "6"), submission("2+2=?", "4")]);

        assert_eq!(result.score, 1);
        assert_eq!(result.total, 2);
        assert!(result.wrong_answers.is_empty());
    }

    #[test]
    fn wrong_answers_follow_submission_order() {
        let set = vec![
            question("q1?", "4", None),
            question("q2?", "4", None),
            question("q3?", "4", None),
        ];
        let result = grade(
            &set,
            &[
                submission("q3?", "3"),
                submission("q1?", "5"),
                submission("q2?", "4"),
            ],
        );

        assert_eq!(result.score, 1);
        let order: Vec<&str> = result
            .wrong_answers
            .iter()
            .map(|w| w.question.as_str())
            .collect();
        assert_eq!(order, vec!["q3?", "q1?"]);
    }

    #[test]
    fn grading_is_deterministic() {
        let set = vec![
            question("q1?", "4", Some("Ch1")),
            question("q2?", "3", None),
        ];
        let submissions = vec![
            submission("q1?", "4"),
            submission("q2?", "5"),
            submission("missing?", "4"),
        ];

        let first = grade(&set, &submissions);
        let second = grade(&set, &submissions);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_submissions_grade_to_zero_of_zero() {
        let set = vec![question("q?", "4", None)];
        let result = grade(&set, &[]);
        assert_eq!(result.score, 0);
        assert_eq!(result.total, 0);
        assert!(result.wrong_answers.is_empty());
    }
}
