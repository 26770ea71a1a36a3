pub mod config;
pub mod errors;
pub mod generation;
pub mod ingest;
pub mod llm_client;
pub mod rate_limit;
pub mod routes;
pub mod state;
