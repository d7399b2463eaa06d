use crate::db::now;
use crate::models::{QuestionRecord, QuizPayload, QuizSummary};
use rusqlite::types::Type;
use rusqlite::{Connection, Result};

fn encode_options(record: &QuestionRecord) -> Result<String> {
    serde_json::to_string(&record.options())
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn decode_options(column: usize, json: &str) -> Result<[String; 4]> {
    serde_json::from_str::<[String; 4]>(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Stores a quiz and its questions atomically. Returns the new quiz id.
pub fn insert_quiz(conn: &mut Connection, payload: &QuizPayload) -> Result<i64> {
    let created_at = now();
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO quizzes (title, category_id, category_name, creator_id, creator_name, total_questions, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            payload.title,
            payload.category_id,
            payload.category_name,
            payload.creator_id,
            payload.creator_name,
            payload.total_questions,
            created_at
        ],
    )?;
    let quiz_id = tx.last_insert_rowid();

    for (order, record) in payload.questions.iter().enumerate() {
        let options = encode_options(record)?;
        tx.execute(
            "INSERT INTO questions (quiz_id, question_index, statement, options, answer, display_order)
             VALUES (?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                quiz_id,
                record.index,
                record.statement,
                options,
                record.answer,
                order
            ],
        )?;
    }

    tx.commit()?;
    Ok(quiz_id)
}

pub fn list_quizzes(conn: &Connection, category_id: &str) -> Result<Vec<QuizSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, category_name, creator_name, total_questions, created_at
         FROM quizzes WHERE category_id = ? ORDER BY created_at DESC, id DESC",
    )?;

    let quizzes = stmt
        .query_map([category_id], |row| {
            Ok(QuizSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                category_name: row.get(2)?,
                creator_name: row.get(3)?,
                total_questions: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(quizzes)
}

pub fn load_quiz(conn: &Connection, quiz_id: i64) -> Result<Option<QuizPayload>> {
    let header = conn.query_row(
        "SELECT title, category_id, category_name, creator_id, creator_name, total_questions
         FROM quizzes WHERE id = ?",
        [quiz_id],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, usize>(5)?,
            ))
        },
    );

    let (title, category_id, category_name, creator_id, creator_name, total_questions) =
        match header {
            Ok(header) => header,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e),
        };

    let mut stmt = conn.prepare(
        "SELECT question_index, statement, options, answer
         FROM questions WHERE quiz_id = ? ORDER BY display_order",
    )?;
    let questions = stmt
        .query_map([quiz_id], |row| {
            let options: String = row.get(2)?;
            let [option1, option2, option3, option4] = decode_options(2, &options)?;
            Ok(QuestionRecord {
                index: row.get(0)?,
                statement: row.get(1)?,
                option1,
                option2,
                option3,
                option4,
                answer: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(QuizPayload {
        title,
        questions,
        category_id,
        category_name,
        creator_id,
        creator_name,
        total_questions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn record(index: usize, statement: &str) -> QuestionRecord {
        QuestionRecord {
            index,
            statement: statement.to_string(),
            option1: "one".to_string(),
            option2: "two".to_string(),
            option3: "three".to_string(),
            option4: "four".to_string(),
            answer: "two".to_string(),
        }
    }

    fn payload(title: &str, category_id: &str, questions: Vec<QuestionRecord>) -> QuizPayload {
        QuizPayload {
            title: title.to_string(),
            total_questions: questions.len(),
            questions,
            category_id: category_id.to_string(),
            category_name: "Numbers".to_string(),
            creator_id: "u-1".to_string(),
            creator_name: "ana".to_string(),
        }
    }

    #[test]
    fn test_insert_and_load_quiz() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_db_path = temp_dir.path().join("test.db");
        let mut conn = Connection::open(&test_db_path).unwrap();
        run_migrations(&conn).unwrap();

        // Indices with a gap, as left behind by a removal while composing.
        let quiz = payload("Counting", "numbers", vec![record(0, "1+1?"), record(2, "4/2?")]);
        let id = insert_quiz(&mut conn, &quiz).unwrap();

        let loaded = load_quiz(&conn, id).unwrap().unwrap();
        assert_eq!(loaded, quiz);
        assert_eq!(loaded.questions[1].index, 2);
    }

    #[test]
    fn test_load_missing_quiz() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert!(load_quiz(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_list_quizzes_by_category() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        insert_quiz(&mut conn, &payload("First", "numbers", vec![record(0, "q")])).unwrap();
        insert_quiz(&mut conn, &payload("Second", "numbers", vec![record(0, "q")])).unwrap();
        insert_quiz(&mut conn, &payload("Other", "letters", vec![record(0, "q")])).unwrap();

        let numbers = list_quizzes(&conn, "numbers").unwrap();
        assert_eq!(numbers.len(), 2);
        // Newest first.
        assert_eq!(numbers[0].title, "Second");
        assert_eq!(numbers[0].total_questions, 1);
        assert_eq!(numbers[0].creator_name, "ana");

        assert_eq!(list_quizzes(&conn, "letters").unwrap().len(), 1);
        assert!(list_quizzes(&conn, "empty").unwrap().is_empty());
    }
}
