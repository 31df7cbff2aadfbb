//! UA Media Scanner - discovery and cataloguing of Ukrainian media sources.
//!
//! A free-text query is run against a web search engine and a news
//! aggregator; the hits are reduced to registrable domains, judged or
//! classified as media outlets and stored as new sources awaiting
//! verification before promotion into the known-source catalogue.

pub mod browser;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod llm;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
