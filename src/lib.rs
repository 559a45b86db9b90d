pub mod api;
pub mod data;
pub mod models;
pub mod query;
pub mod scoring;
pub mod ui;
pub mod utils;
