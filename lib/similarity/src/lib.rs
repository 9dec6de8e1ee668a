//! # cinesim Similarity
//!
//! The query engine behind every browse mode.
//!
//! - **Similar items**: cosine similarity of one catalog item against all others
//! - **Text search**: vectorize a description, rank by cosine similarity
//! - **Genre filter**: case-insensitive containment, corpus row order
//! - **Popular**: descending popularity, or row order without a popularity column
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query     │────>│   Engine    │────>│   Titles    │
//! │ (4 modes)   │     │ (score pass)│     │  (top-N)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                        │       │
//!                 ┌──────┘       └──────┐
//!          ┌─────────────┐       ┌─────────────┐
//!          │   Corpus    │       │ Vectorizer  │
//!          └─────────────┘       └─────────────┘
//! ```

pub mod engine;
pub mod query;
pub mod rank;

pub use engine::{EngineConfig, SimilarityEngine};
pub use query::Query;
pub use rank::{clamp_top_n, top_n, Ranked};
