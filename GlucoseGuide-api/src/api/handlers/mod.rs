pub mod glucose;
pub mod health;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use glucose::{
    add_glucose_record, delete_glucose_record, get_glucose_records, update_glucose_record,
};
pub use health::health_check;
