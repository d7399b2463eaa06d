use crate::db;
use crate::error::RemoteFailure;
use crate::logger;
use crate::models::{Category, QuizPayload, QuizSummary, UserProfile};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteFailure>;
}

#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn current_user(&self) -> Result<UserProfile, RemoteFailure>;
}

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn submit(&self, payload: &QuizPayload) -> Result<(), RemoteFailure>;
}

#[async_trait]
pub trait QuizCatalog: Send + Sync {
    async fn quizzes_in(&self, category_id: &str) -> Result<Vec<QuizSummary>, RemoteFailure>;
    async fn load_quiz(&self, quiz_id: i64) -> Result<QuizPayload, RemoteFailure>;
}

/// Everything the backend worker needs from a backend.
pub trait Backend: CategorySource + IdentitySource + UploadService + QuizCatalog {}

impl<T> Backend for T where T: CategorySource + IdentitySource + UploadService + QuizCatalog {}

/// SQLite-backed backend. Each call opens its own connection so the backend
/// can be shared freely.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    db_path: PathBuf,
    identity: UserProfile,
}

impl LocalBackend {
    /// Opens (and migrates) the database once up front so configuration
    /// problems surface at startup.
    pub fn open(db_path: PathBuf, identity: UserProfile) -> rusqlite::Result<Self> {
        db::init_db(&db_path)?;
        Ok(Self { db_path, identity })
    }

    fn connect(&self) -> Result<rusqlite::Connection, RemoteFailure> {
        Ok(db::init_db(&self.db_path)?)
    }
}

#[async_trait]
impl CategorySource for LocalBackend {
    async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteFailure> {
        let conn = self.connect()?;
        Ok(db::category::list_categories(&conn)?)
    }
}

#[async_trait]
impl IdentitySource for LocalBackend {
    async fn current_user(&self) -> Result<UserProfile, RemoteFailure> {
        Ok(self.identity.clone())
    }
}

#[async_trait]
impl UploadService for LocalBackend {
    async fn submit(&self, payload: &QuizPayload) -> Result<(), RemoteFailure> {
        if !payload.is_consistent() {
            return Err(RemoteFailure(format!(
                "total_question is {} but {} question(s) were sent",
                payload.total_questions,
                payload.questions.len()
            )));
        }
        let mut conn = self.connect()?;
        if !db::category::category_exists(&conn, &payload.category_id)? {
            return Err(RemoteFailure(format!(
                "Unknown category: {}",
                payload.category_name
            )));
        }
        let quiz_id = db::quiz::insert_quiz(&mut conn, payload)?;
        logger::log(&format!(
            "Stored quiz {} ({:?}, {} questions)",
            quiz_id, payload.title, payload.total_questions
        ));
        Ok(())
    }
}

#[async_trait]
impl QuizCatalog for LocalBackend {
    async fn quizzes_in(&self, category_id: &str) -> Result<Vec<QuizSummary>, RemoteFailure> {
        let conn = self.connect()?;
        Ok(db::quiz::list_quizzes(&conn, category_id)?)
    }

    async fn load_quiz(&self, quiz_id: i64) -> Result<QuizPayload, RemoteFailure> {
        let conn = self.connect()?;
        db::quiz::load_quiz(&conn, quiz_id)?
            .ok_or_else(|| RemoteFailure(format!("Quiz {} no longer exists", quiz_id)))
    }
}
