//! Query construction for the external engine.
//!
//! This module owns everything this client puts into a `_search` body:
//!
//! - **[`builder`]**: rewrite of the raw search-box text into a match or
//!   multi-match query document.
//! - **[`facets`]**: aggregation definitions and the filter clauses applied
//!   when a facet bucket is selected.

pub mod builder;
pub mod facets;
