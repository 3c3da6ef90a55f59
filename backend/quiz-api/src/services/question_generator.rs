use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeneratorSettings;
use crate::models::Question;

pub const MIN_OPTIONS: usize = 3;
pub const MAX_OPTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Extracted text is empty. Upload a document with readable text first")]
    EmptySource,
    #[error("Completion service rejected the API credential (HTTP {0})")]
    Unauthorized(u16),
    #[error("Failed to reach the completion service: {0}")]
    Transport(String),
    #[error("Completion service returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("Completion service did not return a valid question set: {0}")]
    InvalidFormat(String),
    #[error("Completion service did not respond within {0}s")]
    Timeout(u64),
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Turns extracted document text into a validated question set by calling
/// an external chat-completion service.
///
/// The upstream is not a structured-output API: the response body is free
/// text that usually, but not always, contains a JSON array, so everything
/// after the HTTP exchange is treated as untrusted input. A response is
/// accepted or rejected as a whole; no partially valid batch is kept.
pub struct QuestionGenerator {
    client: Client,
    settings: GeneratorSettings,
}

impl QuestionGenerator {
    pub fn new(client: Client, settings: GeneratorSettings) -> Self {
        Self { client, settings }
    }

    pub async fn generate(&self, source_text: &str) -> Result<Vec<Question>, GenerationError> {
        let trimmed = source_text.trim();
        if trimmed.is_empty() {
            return Err(GenerationError::EmptySource);
        }

        // Silent prefix cut to respect the upstream token budget.
        let truncated = truncate_chars(trimmed, self.settings.max_source_chars);
        tracing::info!(
            "Requesting {} questions from completion service ({} source chars)",
            self.settings.question_count,
            truncated.chars().count()
        );

        let prompt = build_prompt(truncated, self.settings.question_count);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a quiz generator that outputs only JSON.",
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 4000,
        };

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.settings.timeout_secs)
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GenerationError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response.json().await.map_err(|e| {
            GenerationError::InvalidFormat(format!("bad response envelope: {}", e))
        })?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationError::InvalidFormat("response contained no choices".to_string())
            })?;

        let questions = parse_questions(&content)?;
        validate_questions(&questions)?;
        Ok(questions)
    }
}

fn build_prompt(text: &str, count: u32) -> String {
    format!(
        "Create exactly {count} multiple-choice questions from the given text.\n\
         - Each question must have between {MIN_OPTIONS} and {MAX_OPTIONS} options, and only ONE correctAnswer.\n\
         - The correctAnswer must be copied verbatim from the options.\n\
         - Add a \"sourceChapter\" field naming the chapter or section the question came from, when the text makes it clear.\n\
         - Output ONLY a valid JSON array, no code blocks, no extra text.\n\
         - Do NOT include explanations, keys must match exactly: \"question\", \"options\", \"correctAnswer\", \"sourceChapter\".\n\
         Text: {text}"
    )
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strips the conventional ```json fence wrapping that chat models add
/// despite being told not to.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
    {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn parse_questions(content: &str) -> Result<Vec<Question>, GenerationError> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(cleaned).map_err(|e| {
        GenerationError::InvalidFormat(format!("expected a JSON array of questions: {}", e))
    })
}

fn validate_questions(questions: &[Question]) -> Result<(), GenerationError> {
    if questions.is_empty() {
        return Err(GenerationError::InvalidFormat(
            "question array is empty".to_string(),
        ));
    }

    for (index, question) in questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(invalid_question(index, "question text is empty"));
        }
        if question.options.len() < MIN_OPTIONS || question.options.len() > MAX_OPTIONS {
            return Err(invalid_question(
                index,
                &format!(
                    "expected {} to {} options, got {}",
                    MIN_OPTIONS,
                    MAX_OPTIONS,
                    question.options.len()
                ),
            ));
        }
        if question.options.iter().any(|option| option.trim().is_empty()) {
            return Err(invalid_question(index, "option text is empty"));
        }
        let distinct: HashSet<&str> = question.options.iter().map(String::as_str).collect();
        if distinct.len() != question.options.len() {
            return Err(invalid_question(index, "options contain duplicates"));
        }
        if !question
            .options
            .iter()
            .any(|option| option == &question.correct_answer)
        {
            return Err(invalid_question(
                index,
                "correctAnswer is not one of the options",
            ));
        }
    }

    Ok(())
}

fn invalid_question(index: usize, reason: &str) -> GenerationError {
    GenerationError::InvalidFormat(format!("question {}: {}", index, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], correct: &str) -> Question {
        Question {
            text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
            source_chapter: None,
        }
    }

    #[test]
    fn strips_json_tagged_fences() {
        let raw = "```json\n[{\"question\": \"q\"}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"question\": \"q\"}]");
    }

    #[test]
    fn strips_bare_fences_and_whitespace() {
        let raw = "  ```\n[1, 2]\n```  ";
        assert_eq!(strip_code_fences(raw), "[1, 2]");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn non_json_content_is_invalid_format() {
        let err = parse_questions("not json").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidFormat(_)));
    }

    #[test]
    fn json_object_instead_of_array_is_invalid_format() {
        let err = parse_questions("{\"questions\": []}").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidFormat(_)));
    }

    #[test]
    fn parses_fenced_question_array() {
        let raw = r#"```json
[
  {
    "question": "2+2=?",
    "options": ["3", "4", "5"],
    "correctAnswer": "4",
    "sourceChapter": "Arithmetic"
  }
]
```"#;
        let questions = parse_questions(raw).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "2+2=?");
        assert_eq!(questions[0].correct_answer, "4");
        assert_eq!(questions[0].source_chapter.as_deref(), Some("Arithmetic"));
    }

    #[test]
    fn missing_source_chapter_parses_as_none() {
        let raw = r#"[{"question": "q?", "options": ["a", "b", "c"], "correctAnswer": "a"}]"#;
        let questions = parse_questions(raw).unwrap();
        assert_eq!(questions[0].source_chapter, None);
    }

    #[test]
    fn valid_set_passes_validation() {
        let questions = vec![
            question("q1?", &["a", "b", "c"], "a"),
            question("q2?", &["a", "b", "c", "d", "e"], "e"),
        ];
        assert!(validate_questions(&questions).is_ok());
    }

    #[test]
    fn empty_array_is_rejected() {
        assert!(matches!(
            validate_questions(&[]),
            Err(GenerationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn empty_question_text_rejects_whole_batch() {
        let questions = vec![
            question("fine?", &["a", "b", "c"], "a"),
            question("   ", &["a", "b", "c"], "a"),
        ];
        assert!(validate_questions(&questions).is_err());
    }

    #[test]
    fn option_count_out_of_bounds_is_rejected() {
        let too_few = vec![question("q?", &["a", "b"], "a")];
        assert!(validate_questions(&too_few).is_err());

        let too_many = vec![question("q?", &["a", "b", "c", "d", "e", "f"], "a")];
        assert!(validate_questions(&too_many).is_err());
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let questions = vec![question("q?", &["a", "a", "b"], "a")];
        assert!(validate_questions(&questions).is_err());
    }

    #[test]
    fn correct_answer_must_be_a_member_of_options() {
        let questions = vec![question("q?", &["a", "b", "c"], "d")];
        assert!(validate_questions(&questions).is_err());
    }

    #[test]
    fn truncation_is_a_prefix_cut_on_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // multi-byte chars must not be split
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn prompt_names_the_wire_keys_and_count() {
        let prompt = build_prompt("some text", 15);
        assert!(prompt.contains("exactly 15 multiple-choice questions"));
        assert!(prompt.contains("\"correctAnswer\""));
        assert!(prompt.contains("\"sourceChapter\""));
        assert!(prompt.contains("ONLY a valid JSON array"));
        assert!(prompt.ends_with("Text: some text"));
    }
}
