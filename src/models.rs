use serde::{Deserialize, Serialize};

/// One multiple-choice question of a quiz being composed.
///
/// `index` is assigned once at admission and serves as the row identity for
/// diffing; it is never renumbered after removals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "questionIndex")]
    pub index: usize,
    #[serde(rename = "questionStatement")]
    pub statement: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub answer: String,
}

impl QuestionRecord {
    pub fn options(&self) -> [&str; 4] {
        [
            self.option1.as_str(),
            self.option2.as_str(),
            self.option3.as_str(),
            self.option4.as_str(),
        ]
    }

    /// Position (0-3) of the option that equals the answer, if any.
    pub fn answer_position(&self) -> Option<usize> {
        self.options().iter().position(|o| *o == self.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "categoryName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub username: String,
    pub user_id: String,
}

/// Submission body handed to the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPayload {
    #[serde(rename = "quiz_title")]
    pub title: String,
    #[serde(rename = "question_list")]
    pub questions: Vec<QuestionRecord>,
    pub category_id: String,
    pub category_name: String,
    #[serde(rename = "create_id")]
    pub creator_id: String,
    #[serde(rename = "create_name")]
    pub creator_name: String,
    #[serde(rename = "total_question")]
    pub total_questions: usize,
}

impl QuizPayload {
    pub fn new(
        title: String,
        category: &Category,
        creator: &UserProfile,
        questions: Vec<QuestionRecord>,
    ) -> Self {
        let total_questions = questions.len();
        Self {
            title,
            questions,
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            creator_id: creator.user_id.clone(),
            creator_name: creator.username.clone(),
            total_questions,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_questions == self.questions.len()
    }
}

/// Listing entry for the quiz browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub category_name: String,
    pub creator_name: String,
    pub total_questions: usize,
    pub created_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    CreateQuiz,
    Play,
    Summary,
}
