// Storage models, one row type per table
pub mod glucose_record;
pub mod user;

pub use glucose_record::{GlucoseRecordRow, NewGlucoseRecordRow, STORAGE_DATE_FORMAT};
pub use user::{DiabetesType, NewUser, UserRow};
