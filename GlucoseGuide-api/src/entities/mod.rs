// Public entities for the GlucoseGuide API
// This module contains the response bodies shared by the handlers

// Common entities for confirmations and errors
pub mod common;

pub use common::{CreatedResponse, ErrorResponse, MessageResponse};
