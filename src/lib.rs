pub mod config;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod router;
pub mod state;
