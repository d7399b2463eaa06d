pub mod app;
pub mod composer;
pub mod config;
pub mod db;
pub mod error;
pub mod home;
pub mod logger;
pub mod models;
pub mod navigation;
pub mod play;
pub mod presenter;
pub mod services;
pub mod store;
pub mod subscription;
pub mod text_field;
pub mod ui;
pub mod utils;
pub mod worker;

// Re-exports for convenience
pub use app::App;
pub use composer::{QuestionDraft, QuizComposer, SubmitOutcome, UploadPhase, validate_question};
pub use config::Config;
pub use error::{OutOfRangeError, RemoteFailure, ValidationError};
pub use models::{AppState, Category, QuestionRecord, QuizPayload, QuizSummary, UserProfile};
pub use presenter::{ListOp, QuestionListPresenter};
pub use services::{Backend, LocalBackend};
pub use store::QuestionListStore;
pub use worker::{BackendClient, BackendHandle};
