use cinesim_core::Result;
use serde::{Deserialize, Serialize};

use crate::engine::SimilarityEngine;

/// The four catalog queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Query {
    /// Items similar to a catalog title
    Similar { title: String, top_n: usize },
    /// Free-text description search
    Text { query: String, top_n: usize },
    /// Genre containment filter
    Genre { genre: String, top_n: usize },
    Popular { top_n: usize },
}

impl Query {
    #[inline]
    pub fn top_n(&self) -> usize {
        match self {
            Query::Similar { top_n, .. }
            | Query::Text { top_n, .. }
            | Query::Genre { top_n, .. }
            | Query::Popular { top_n } => *top_n,
        }
    }

    /// Run against an engine. Only `Similar` can fail.
    pub fn execute(&self, engine: &SimilarityEngine) -> Result<Vec<String>> {
        match self {
            Query::Similar { title, top_n } => engine.recommend_similar(title, *top_n),
            Query::Text { query, top_n } => Ok(engine.search_by_text(query, *top_n)),
            Query::Genre { genre, top_n } => Ok(engine.search_by_genre(genre, *top_n)),
            Query::Popular { top_n } => Ok(engine.popular(*top_n)),
        }
    }
}
