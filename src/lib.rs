pub mod api;
pub mod board;
pub mod casing;
pub mod config;
pub mod errors;
pub mod model;
pub mod notify;
pub mod query;
