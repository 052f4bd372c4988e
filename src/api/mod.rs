pub mod models;
pub mod server;

pub use models::{ErrorBody, QueryRequest, QueryResponse};
pub use server::{router, AppState};
