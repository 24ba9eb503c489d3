pub mod aggregate;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod plan;
pub mod relevance;
pub mod status;
pub mod tmdb;
pub mod video;
