//! Movie and TV browsing API with content-based recommendations.
//!
//! Titles come from TMDB through a [`services::providers::MetadataProvider`];
//! recommendations are ranked by the [`services::scorer::Scorer`].

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
