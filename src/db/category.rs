use crate::models::Category;
use rusqlite::{Connection, OptionalExtension, Result};

pub fn insert_category(conn: &Connection, id: &str, name: &str, display_order: usize) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO categories (id, name, display_order) VALUES (?, ?, ?)",
        rusqlite::params![id, name, display_order],
    )?;
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name FROM categories ORDER BY display_order, name")?;

    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(categories)
}

pub fn category_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM categories WHERE id = ?", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}
