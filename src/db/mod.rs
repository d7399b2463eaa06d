use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod category;
pub mod quiz;

const DEFAULT_CATEGORIES: [(&str, &str); 6] = [
    ("general", "General Knowledge"),
    ("science", "Science"),
    ("history", "History"),
    ("geography", "Geography"),
    ("programming", "Programming"),
    ("sports", "Sports"),
];

pub(crate) fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    run_migrations(&conn)?;
    seed_categories(&conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            display_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS quizzes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category_id TEXT NOT NULL,
            category_name TEXT NOT NULL,
            creator_id TEXT NOT NULL,
            creator_name TEXT NOT NULL,
            total_questions INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_quizzes_category ON quizzes(category_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quiz_id INTEGER NOT NULL,
            question_index INTEGER NOT NULL,
            statement TEXT NOT NULL,
            options TEXT NOT NULL,
            answer TEXT NOT NULL,
            display_order INTEGER NOT NULL,
            FOREIGN KEY (quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_questions_quiz ON questions(quiz_id)",
        [],
    )?;

    Ok(())
}

fn seed_categories(conn: &Connection) -> Result<()> {
    let count: usize = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    for (order, (id, name)) in DEFAULT_CATEGORIES.iter().enumerate() {
        category::insert_category(conn, id, name, order)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_tables_and_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("quizzes.db");
        let conn = init_db(&db_path).unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"categories".to_string()));
        assert!(tables.contains(&"quizzes".to_string()));
        assert!(tables.contains(&"questions".to_string()));
    }

    #[test]
    fn test_seeding_runs_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("quizzes.db");
        drop(init_db(&db_path).unwrap());
        let conn = init_db(&db_path).unwrap();

        let categories = category::list_categories(&conn).unwrap();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(categories[0].id, "general");
    }
}
