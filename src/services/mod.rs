// src/services/mod.rs
pub mod fetch;
pub mod http_client;
pub mod matrix;
pub mod postprocess;
pub mod store;
pub mod summary;
pub mod totals;
pub mod trending;
