pub mod api;
pub mod config;
pub mod cookie_store;
pub mod count;
pub mod data_collector;
pub mod links;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod summary;
