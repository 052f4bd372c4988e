pub mod client;
pub mod ingest;

pub use client::{GraphClient, GraphClientError};
pub use ingest::GraphIngestor;
