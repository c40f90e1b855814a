use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Running SQLite migrations");

    create_users_table(conn)?;
    create_glucose_records_table(conn)?;
    create_glucose_records_user_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the users table
fn create_users_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating users table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            diabetes_type TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Create the glucose records table.
///
/// `symptoms` and `family_history` hold serialized JSON text.
fn create_glucose_records_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating glucose_records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS glucose_records (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            glucose_level REAL NOT NULL,
            date TEXT NOT NULL,
            meal_type TEXT,
            pre_or_post_meal TEXT,
            carbs INTEGER,
            insulin_dose INTEGER,
            medications TEXT,
            exercise_details TEXT,
            symptoms TEXT,
            notes TEXT,
            hbA1c_levels REAL,
            family_history TEXT,
            diet_info TEXT,
            patient_outcomes TEXT
        )",
        [],
    )?;

    Ok(())
}

/// Index backing the user -> records lookup
fn create_glucose_records_user_index(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating index on glucose_records.user_id");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_glucose_records_user_id
        ON glucose_records (user_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(tables, vec!["glucose_records".to_string(), "users".to_string()]);
    }
}
