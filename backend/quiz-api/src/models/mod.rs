use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
///
/// Wire keys are fixed by the external generator contract: the model is
/// instructed to emit exactly "question", "options", "correctAnswer" and
/// (optionally) "sourceChapter", so the serde renames below are load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(
        rename = "sourceChapter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_chapter: Option<String>,
}

/// One answer picked by a quiz-taker. Ephemeral, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub question: String,
    pub selected: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrongAnswer {
    pub question: String,
    pub selected: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(rename = "sourceChapter")]
    pub source_chapter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResult {
    pub score: u32,
    pub total: u32,
    #[serde(rename = "wrongAnswers")]
    pub wrong_answers: Vec<WrongAnswer>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub ok: bool,
    pub total: usize,
    pub file: String,
}
