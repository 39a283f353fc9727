pub mod adapters;
pub mod api;
pub mod config;
pub mod data_models;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod render;
pub mod safety;
pub mod scrapper;
