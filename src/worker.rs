use crate::error::RemoteFailure;
use crate::logger;
use crate::models::{Category, QuizPayload, QuizSummary, UserProfile};
use crate::services::Backend;
use crate::subscription::{self, NetworkResponse, Responder, Subscription};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

#[derive(Debug)]
pub enum BackendRequest {
    FetchCategories {
        reply: Responder<Vec<Category>>,
    },
    CurrentUser {
        reply: Responder<UserProfile>,
    },
    Upload {
        payload: QuizPayload,
        reply: Responder<()>,
    },
    FetchQuizzes {
        category_id: String,
        reply: Responder<Vec<QuizSummary>>,
    },
    LoadQuiz {
        quiz_id: i64,
        reply: Responder<QuizPayload>,
    },
}

/// Runs one request: Loading first, then the outcome. A consumer that went
/// away before the call started is not called for at all.
async fn serve<T, F>(reply: &Responder<T>, call: F)
where
    F: Future<Output = Result<T, RemoteFailure>>,
{
    if !reply.send(NetworkResponse::Loading) {
        logger::log("Worker skipping request, subscription cancelled");
        return;
    }
    match call.await {
        Ok(value) => {
            if !reply.send(NetworkResponse::Success(value)) {
                logger::log("Worker result dropped, subscription cancelled");
            }
        }
        Err(RemoteFailure(message)) => {
            logger::log(&format!("Worker request failed: {}", message));
            reply.send(NetworkResponse::Failure(message));
        }
    }
}

async fn handle_request(backend: &dyn Backend, request: BackendRequest) {
    match request {
        BackendRequest::FetchCategories { reply } => {
            logger::log("Worker received category request");
            serve(&reply, backend.fetch_categories()).await;
        }
        BackendRequest::CurrentUser { reply } => {
            serve(&reply, backend.current_user()).await;
        }
        BackendRequest::Upload { payload, reply } => {
            logger::log(&format!(
                "Worker received upload request for {:?} ({} questions)",
                payload.title, payload.total_questions
            ));
            serve(&reply, backend.submit(&payload)).await;
        }
        BackendRequest::FetchQuizzes { category_id, reply } => {
            serve(&reply, backend.quizzes_in(&category_id)).await;
        }
        BackendRequest::LoadQuiz { quiz_id, reply } => {
            logger::log(&format!("Worker received load request for quiz {}", quiz_id));
            serve(&reply, backend.load_quiz(quiz_id)).await;
        }
    }
}

pub fn spawn_backend_worker(
    backend: Arc<dyn Backend>,
    requests: Receiver<BackendRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("quiz-composer::backend_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    logger::log(&format!("Worker failed to start runtime: {}", e));
                    return;
                }
            };

            loop {
                match requests.recv() {
                    Ok(request) => rt.block_on(handle_request(backend.as_ref(), request)),
                    Err(_) => {
                        // Channel disconnected, exit worker
                        logger::log("Worker channel disconnected, exiting");
                        break;
                    }
                }
            }
        })
}

/// Request side used by the UI. Every call returns a subscription that
/// yields Loading followed by Success or Failure.
pub trait BackendHandle {
    fn fetch_categories(&self) -> Subscription<Vec<Category>>;
    fn current_user(&self) -> Subscription<UserProfile>;
    fn upload(&self, payload: QuizPayload) -> Subscription<()>;
    fn fetch_quizzes(&self, category_id: &str) -> Subscription<Vec<QuizSummary>>;
    fn load_quiz(&self, quiz_id: i64) -> Subscription<QuizPayload>;
}

/// Channel-backed handle to a running backend worker.
#[derive(Debug, Clone)]
pub struct BackendClient {
    tx: Sender<BackendRequest>,
}

impl BackendClient {
    pub fn new(tx: Sender<BackendRequest>) -> Self {
        Self { tx }
    }

    fn dispatch<T>(&self, make: impl FnOnce(Responder<T>) -> BackendRequest) -> Subscription<T> {
        let (reply, subscription) = subscription::channel();
        match self.tx.send(make(reply)) {
            Ok(()) => subscription,
            Err(_) => {
                logger::log("Backend worker is not running");
                subscription::failed("Backend worker is not running")
            }
        }
    }
}

impl BackendHandle for BackendClient {
    fn fetch_categories(&self) -> Subscription<Vec<Category>> {
        self.dispatch(|reply| BackendRequest::FetchCategories { reply })
    }

    fn current_user(&self) -> Subscription<UserProfile> {
        self.dispatch(|reply| BackendRequest::CurrentUser { reply })
    }

    fn upload(&self, payload: QuizPayload) -> Subscription<()> {
        self.dispatch(|reply| BackendRequest::Upload { payload, reply })
    }

    fn fetch_quizzes(&self, category_id: &str) -> Subscription<Vec<QuizSummary>> {
        let category_id = category_id.to_string();
        self.dispatch(|reply| BackendRequest::FetchQuizzes { category_id, reply })
    }

    fn load_quiz(&self, quiz_id: i64) -> Subscription<QuizPayload> {
        self.dispatch(|reply| BackendRequest::LoadQuiz { quiz_id, reply })
    }
}

/// Starts a worker for `backend` and returns a client connected to it.
pub fn start(backend: Arc<dyn Backend>) -> io::Result<(BackendClient, thread::JoinHandle<()>)> {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = spawn_backend_worker(backend, rx)?;
    Ok((BackendClient::new(tx), handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{CategorySource, IdentitySource, QuizCatalog, UploadService};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct FakeBackend {
        uploads: Mutex<Vec<QuizPayload>>,
        fail_uploads: bool,
    }

    #[async_trait]
    impl CategorySource for FakeBackend {
        async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteFailure> {
            Ok(vec![Category {
                id: "c1".to_string(),
                name: "Science".to_string(),
            }])
        }
    }

    #[async_trait]
    impl IdentitySource for FakeBackend {
        async fn current_user(&self) -> Result<UserProfile, RemoteFailure> {
            Ok(UserProfile {
                username: "ana".to_string(),
                user_id: "u-1".to_string(),
            })
        }
    }

    #[async_trait]
    impl UploadService for FakeBackend {
        async fn submit(&self, payload: &QuizPayload) -> Result<(), RemoteFailure> {
            if self.fail_uploads {
                return Err(RemoteFailure("server unreachable".to_string()));
            }
            self.uploads.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl QuizCatalog for FakeBackend {
        async fn quizzes_in(&self, _category_id: &str) -> Result<Vec<QuizSummary>, RemoteFailure> {
            Ok(vec![])
        }

        async fn load_quiz(&self, quiz_id: i64) -> Result<QuizPayload, RemoteFailure> {
            Err(RemoteFailure(format!("Quiz {} no longer exists", quiz_id)))
        }
    }

    /// Polls until the subscription delivered a final state.
    fn wait_for<T>(subscription: &Subscription<T>) -> Vec<NetworkResponse<T>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            while let Some(response) = subscription.try_next() {
                let done = !matches!(response, NetworkResponse::Loading);
                seen.push(response);
                if done {
                    return seen;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        seen
    }

    fn sample_payload() -> QuizPayload {
        QuizPayload {
            title: "Quiz".to_string(),
            questions: vec![],
            category_id: "c1".to_string(),
            category_name: "Science".to_string(),
            creator_id: "u-1".to_string(),
            creator_name: "ana".to_string(),
            total_questions: 0,
        }
    }

    #[test]
    fn test_categories_loading_then_success() {
        let (client, _handle) = start(Arc::new(FakeBackend::default())).unwrap();
        let responses = wait_for(&client.fetch_categories());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0], NetworkResponse::Loading);
        match &responses[1] {
            NetworkResponse::Success(categories) => assert_eq!(categories[0].name, "Science"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_upload_reaches_backend() {
        let backend = Arc::new(FakeBackend::default());
        let (client, _handle) = start(backend.clone()).unwrap();

        let responses = wait_for(&client.upload(sample_payload()));
        assert_eq!(
            responses,
            vec![NetworkResponse::Loading, NetworkResponse::Success(())]
        );
        assert_eq!(backend.uploads.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_upload_failure_message_is_verbatim() {
        let backend = Arc::new(FakeBackend {
            fail_uploads: true,
            ..Default::default()
        });
        let (client, _handle) = start(backend).unwrap();

        let responses = wait_for(&client.upload(sample_payload()));
        assert_eq!(
            responses.last(),
            Some(&NetworkResponse::Failure("server unreachable".to_string()))
        );
    }

    #[test]
    fn test_cancelled_request_never_reaches_backend() {
        let backend = Arc::new(FakeBackend::default());
        let (tx, rx) = std::sync::mpsc::channel();

        let (reply, subscription) = subscription::channel();
        subscription.cancel();
        tx.send(BackendRequest::Upload {
            payload: sample_payload(),
            reply,
        })
        .unwrap();
        drop(tx);

        // Worker drains the request then exits on disconnect.
        let handle = spawn_backend_worker(backend.clone(), rx).unwrap();
        handle.join().unwrap();

        assert!(backend.uploads.lock().unwrap().is_empty());
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn test_dispatch_after_worker_exit_fails() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let client = BackendClient::new(tx);

        assert_eq!(
            client.current_user().try_next(),
            Some(NetworkResponse::Failure(
                "Backend worker is not running".to_string()
            ))
        );
    }
}
