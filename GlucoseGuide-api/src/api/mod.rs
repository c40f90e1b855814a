pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::ApiError;
pub use routes::{create_app, create_router};
pub use state::AppState;
