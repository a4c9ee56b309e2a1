//! HTTP client for the external search engine.
//!
//! The engine owns query execution, scoring, faceting, and identity
//! assignment; this layer only speaks its REST API:
//!
//! - **[`client`]**: the reqwest client for `_search` and `_doc` calls.
//! - **[`types`]**: response envelopes and their conversion into hits.

pub mod client;
pub mod types;
