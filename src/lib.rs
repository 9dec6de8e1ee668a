//! # cinesim
//!
//! Content-based movie recommendation lookup.
//!
//! Every catalog item is a sparse term-count vector. cinesim answers four
//! queries over that catalog: items similar to a given title, items matching
//! a free-text description, items in a genre, and the most popular items.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! cinesim --artifacts-dir ./artifacts similar "The Dark Knight"
//! cinesim search "space adventure with robots"
//! cinesim search --by genre comedy
//! cinesim popular --top-n 10
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use cinesim::prelude::*;
//!
//! let engine = ArtifactStore::new("./artifacts")
//!     .load_engine(EngineConfig::default())
//!     .unwrap();
//!
//! let similar = engine.recommend_similar("The Dark Knight", 8).unwrap();
//! let matches = engine.search_by_text("heist in space", 8);
//! ```
//!
//! ## Crate Structure
//!
//! - `cinesim-core` - sparse vectors, catalog, vectorizer
//! - `cinesim-similarity` - the similarity engine and ranking
//! - `cinesim-storage` - artifact loading

// Re-export core types
pub use cinesim_core::{
    Corpus, CountVectorizer, CsrMatrix, Error, Item, ItemId, ItemRecord, Result, SparseVector,
    StopWords, Vectorizer, VectorizerParams,
};

// Re-export the engine
pub use cinesim_similarity::{clamp_top_n, EngineConfig, Query, Ranked, SimilarityEngine};

// Re-export storage
pub use cinesim_storage::{ArtifactPaths, ArtifactStore, Artifacts};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, Corpus, CountVectorizer, EngineConfig, Error, ItemRecord, Query, Result,
        SimilarityEngine, Vectorizer,
    };
}
