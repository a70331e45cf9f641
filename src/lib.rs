//! spantag - span annotation engine for NER-style text labeling.
//!
//! Core library for an annotation front end: converts raw text selections
//! into validated character-offset spans, enforces the non-overlap invariant
//! on each document's annotation set, tracks unsaved edits across multiple
//! open documents, and persists annotation sets to a REST backend.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod selection;
pub mod services;
pub mod utils;
