pub mod conversions;
pub mod glucose_record;
pub mod observation;

// Re-export common types for easier imports
pub use glucose_record::{
    EmptyFieldEncoding, GlucoseRecord, NewGlucoseRecord, StructuredField,
    EMPTY_STRUCTURED_FIELD_ENCODING, PLACEHOLDER_USER_ID,
};
pub use observation::{ObservationDocument, TranslateError};
