use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MIN_QUESTIONS: usize = 1;
pub const DEFAULT_SUCCESS_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub user_name: String,
    pub user_id: String,
    pub min_questions: usize,
    pub success_delay: Duration,
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = home.unwrap_or_else(|| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\quiz-composer")
    } else {
        let home = home.unwrap_or_else(|| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/quiz-composer")
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("QUIZ_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = if cfg!(target_os = "windows") {
                    non_empty("USERPROFILE")
                } else {
                    non_empty("HOME")
                };
                default_data_dir(home)
            });

        let user_name = non_empty("QUIZ_USER_NAME")
            .or_else(|| non_empty("USER"))
            .or_else(|| non_empty("USERNAME"))
            .unwrap_or_else(|| "guest".to_string());

        let user_id = non_empty("QUIZ_USER_ID")
            .unwrap_or_else(|| format!("local-{}", user_name.to_lowercase()));

        let min_questions = non_empty("QUIZ_MIN_QUESTIONS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_MIN_QUESTIONS);

        let success_delay = non_empty("QUIZ_SUCCESS_DELAY_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_SUCCESS_DELAY_MS));

        Self {
            data_dir,
            user_name,
            user_id,
            min_questions,
            success_delay,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("quizzes.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("quiz_composer.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("HOME", "/home/ana"), ("USERPROFILE", "C:\\Users\\ana")]);
        assert!(config.data_dir.ends_with("quiz-composer"));
        assert_eq!(config.user_name, "guest");
        assert_eq!(config.user_id, "local-guest");
        assert_eq!(config.min_questions, 1);
        assert_eq!(config.success_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("QUIZ_DATA_DIR", "/tmp/quizzes"),
            ("QUIZ_USER_NAME", "Ana"),
            ("QUIZ_USER_ID", "u-42"),
            ("QUIZ_MIN_QUESTIONS", "5"),
            ("QUIZ_SUCCESS_DELAY_MS", "10"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/quizzes"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/quizzes/quizzes.db"));
        assert_eq!(config.user_name, "Ana");
        assert_eq!(config.user_id, "u-42");
        assert_eq!(config.min_questions, 5);
        assert_eq!(config.success_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_user_id_derived_from_name() {
        let config = config_from(&[("USER", "Bob")]);
        assert_eq!(config.user_name, "Bob");
        assert_eq!(config.user_id, "local-bob");
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let config = config_from(&[
            ("QUIZ_MIN_QUESTIONS", "many"),
            ("QUIZ_SUCCESS_DELAY_MS", "-3"),
        ]);
        assert_eq!(config.min_questions, DEFAULT_MIN_QUESTIONS);
        assert_eq!(
            config.success_delay,
            Duration::from_millis(DEFAULT_SUCCESS_DELAY_MS)
        );

        let zero = config_from(&[("QUIZ_MIN_QUESTIONS", "0")]);
        assert_eq!(zero.min_questions, DEFAULT_MIN_QUESTIONS);
    }
}
