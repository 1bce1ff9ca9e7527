// Shared sqlx error rendering
// SQLite result codes: https://www.sqlite.org/rescode.html

/// Describe a sqlx error with its SQLite result code spelled out.
///
/// Callers wrap the text in the error class of their boundary (store or
/// queue); the description itself is boundary-neutral.
pub(crate) fn describe(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            match code.as_deref() {
                // UNIQUE constraint failed
                Some("2067") | Some("1555") => {
                    format!("Unique constraint violation: {}", db_err.message())
                }
                // FOREIGN KEY constraint failed
                Some("787") | Some("3850") => {
                    format!("Foreign key constraint violation: {}", db_err.message())
                }
                // SQLITE_BUSY - database is locked
                Some("5") => format!("Database locked (SQLITE_BUSY): {}", db_err.message()),
                // SQLITE_FULL - database or disk is full
                Some("13") => format!("Database full: {}", db_err.message()),
                Some(code) => format!("Database error [{}]: {}", code, db_err.message()),
                None => format!("Database error: {}", db_err.message()),
            }
        }
        sqlx::Error::RowNotFound => "Row not found".to_string(),
        sqlx::Error::ColumnNotFound(col) => format!("Column not found: {}", col),
        other => other.to_string(),
    }
}
