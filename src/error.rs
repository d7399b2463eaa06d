use thiserror::Error;

/// Form input a validation failure is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Statement,
    Option(u8),
    Answer,
    Title,
    Category,
    QuestionList,
}

/// Field-level input errors. Always recovered locally by re-prompting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter Question Statement")]
    EmptyStatement,
    #[error("Enter Option {0}")]
    EmptyOption(u8),
    #[error("Write Answer")]
    EmptyAnswer,
    #[error("Answer Not Match with options")]
    AnswerMismatch,
    #[error("Enter Quiz Title")]
    EmptyTitle,
    #[error("Select A Category First")]
    NoCategorySelected,
    #[error("Please add at least {minimum} question(s)")]
    InsufficientQuestions { minimum: usize },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::EmptyStatement => FormField::Statement,
            ValidationError::EmptyOption(n) => FormField::Option(*n),
            ValidationError::EmptyAnswer | ValidationError::AnswerMismatch => FormField::Answer,
            ValidationError::EmptyTitle => FormField::Title,
            ValidationError::NoCategorySelected => FormField::Category,
            ValidationError::InsufficientQuestions { .. } => FormField::QuestionList,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("position {position} is out of range for a list of {len} item(s)")]
pub struct OutOfRangeError {
    pub position: usize,
    pub len: usize,
}

/// Opaque failure reported by a backend collaborator, shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RemoteFailure(pub String);

impl From<rusqlite::Error> for RemoteFailure {
    fn from(e: rusqlite::Error) -> Self {
        RemoteFailure(format!("Storage error: {}", e))
    }
}

impl From<serde_json::Error> for RemoteFailure {
    fn from(e: serde_json::Error) -> Self {
        RemoteFailure(format!("Malformed stored data: {}", e))
    }
}
