//! Secufeed - A personal research-feed aggregator
//!
//! This crate tracks user interests (topics or authors), pulls matching
//! papers from the arXiv API and articles from a set of security news
//! feeds, and lets the user bookmark papers for later.

pub mod arxiv;
pub mod config;
pub mod db;
pub mod news;
pub mod pipeline;
pub mod routes;
