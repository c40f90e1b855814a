use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::glucose_record::{GlucoseRecordRow, NewGlucoseRecordRow};

const GLUCOSE_RECORD_COLUMNS: &str = "id, user_id, glucose_level, date, meal_type, pre_or_post_meal, \
     carbs, insulin_dose, medications, exercise_details, symptoms, notes, hbA1c_levels, \
     family_history, diet_info, patient_outcomes";

/// SQL statements for glucose records.
///
/// Every function takes the connection of an already open transaction.
pub struct GlucoseRecordStorage;

impl GlucoseRecordStorage {
    /// Insert a record and return the id assigned by SQLite
    pub fn insert(conn: &Connection, record: &NewGlucoseRecordRow, date: &str) -> rusqlite::Result<i64> {
        debug!("Inserting glucose record for user {}", record.user_id);

        conn.execute(
            "INSERT INTO glucose_records
             (user_id, glucose_level, date, meal_type, pre_or_post_meal, carbs, insulin_dose,
              medications, exercise_details, symptoms, notes, hbA1c_levels, family_history,
              diet_info, patient_outcomes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                record.user_id,
                record.glucose_level,
                date,
                record.meal_type,
                record.pre_or_post_meal,
                record.carbs,
                record.insulin_dose,
                record.medications,
                record.exercise_details,
                record.symptoms,
                record.notes,
                record.hba1c_levels,
                record.family_history,
                record.diet_info,
                record.patient_outcomes,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Fetch up to `limit` records in id order; a negative limit returns every row
    pub fn list(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<GlucoseRecordRow>> {
        debug!("Listing glucose records with limit {}", limit);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM glucose_records ORDER BY id LIMIT ?1",
            GLUCOSE_RECORD_COLUMNS
        ))?;

        let rows = stmt.query_map([limit], Self::map_row)?;
        rows.collect()
    }

    /// Fetch the records owned by one user, oldest first
    pub fn list_for_user(conn: &Connection, user_id: i64, limit: i64) -> rusqlite::Result<Vec<GlucoseRecordRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM glucose_records WHERE user_id = ?1 ORDER BY id LIMIT ?2",
            GLUCOSE_RECORD_COLUMNS
        ))?;

        let rows = stmt.query_map([user_id, limit], Self::map_row)?;
        rows.collect()
    }

    /// Fetch a record by id
    pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<GlucoseRecordRow>> {
        conn.query_row(
            &format!("SELECT {} FROM glucose_records WHERE id = ?1", GLUCOSE_RECORD_COLUMNS),
            [id],
            Self::map_row,
        )
        .optional()
    }

    /// Overwrite every mutable column of a record; returns the number of rows changed.
    ///
    /// The stored date is kept when the replacement carries none.
    pub fn update(conn: &Connection, id: i64, record: &NewGlucoseRecordRow) -> rusqlite::Result<usize> {
        debug!("Updating glucose record {}", id);

        conn.execute(
            "UPDATE glucose_records SET
                user_id = ?1,
                glucose_level = ?2,
                date = COALESCE(?3, date),
                meal_type = ?4,
                pre_or_post_meal = ?5,
                carbs = ?6,
                insulin_dose = ?7,
                medications = ?8,
                exercise_details = ?9,
                symptoms = ?10,
                notes = ?11,
                hbA1c_levels = ?12,
                family_history = ?13,
                diet_info = ?14,
                patient_outcomes = ?15
             WHERE id = ?16",
            params![
                record.user_id,
                record.glucose_level,
                record.date,
                record.meal_type,
                record.pre_or_post_meal,
                record.carbs,
                record.insulin_dose,
                record.medications,
                record.exercise_details,
                record.symptoms,
                record.notes,
                record.hba1c_levels,
                record.family_history,
                record.diet_info,
                record.patient_outcomes,
                id,
            ],
        )
    }

    /// Delete a record; returns the number of rows removed
    pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
        debug!("Deleting glucose record {}", id);
        conn.execute("DELETE FROM glucose_records WHERE id = ?1", [id])
    }

    /// Number of stored records
    pub fn count(conn: &Connection) -> rusqlite::Result<usize> {
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM glucose_records", [], |row| row.get(0))?;
        Ok(total as usize)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<GlucoseRecordRow> {
        Ok(GlucoseRecordRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            glucose_level: row.get(2)?,
            date: row.get(3)?,
            meal_type: row.get(4)?,
            pre_or_post_meal: row.get(5)?,
            carbs: row.get(6)?,
            insulin_dose: row.get(7)?,
            medications: row.get(8)?,
            exercise_details: row.get(9)?,
            symptoms: row.get(10)?,
            notes: row.get(11)?,
            hba1c_levels: row.get(12)?,
            family_history: row.get(13)?,
            diet_info: row.get(14)?,
            patient_outcomes: row.get(15)?,
        })
    }
}
