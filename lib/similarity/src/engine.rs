use cinesim_core::{
    cosine_from_parts, Corpus, Error, Filter, GenreFilter, ItemId, Result, SparseRow, Vectorizer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::rank::{self, Ranked};

/// Tuning for the similarity engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Corpora with at least this many items are scored on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
        }
    }
}

/// Answers the catalog queries over a shared, read-only corpus.
///
/// Similarity scores are computed on demand with a full pass over the
/// count matrix. No item-by-item similarity matrix is ever materialized,
/// trading per-query time for memory.
pub struct SimilarityEngine {
    corpus: Arc<Corpus>,
    vectorizer: Arc<dyn Vectorizer>,
    config: EngineConfig,
}

impl SimilarityEngine {
    /// Fails with `ConfigurationMismatch` when the vectorizer does not produce
    /// vectors in the corpus feature space.
    pub fn new(
        corpus: Arc<Corpus>,
        vectorizer: Arc<dyn Vectorizer>,
        config: EngineConfig,
    ) -> Result<Self> {
        if vectorizer.n_features() != corpus.n_features() {
            return Err(Error::ConfigurationMismatch {
                vectorizer: vectorizer.n_features(),
                matrix: corpus.n_features(),
            });
        }
        Ok(Self {
            corpus,
            vectorizer,
            config,
        })
    }

    #[inline]
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Titles of the items most similar to `title`, excluding the item itself
    pub fn recommend_similar(&self, title: &str, top_n: usize) -> Result<Vec<String>> {
        let ranked = self.rank_similar(title, top_n)?;
        Ok(self.titles(ranked.iter().map(|r| r.id)))
    }

    /// Titles best matching a free-text description
    pub fn search_by_text(&self, query: &str, top_n: usize) -> Vec<String> {
        let ranked = self.rank_text(query, top_n);
        self.titles(ranked.iter().map(|r| r.id))
    }

    /// First `top_n` items, in row order, whose genres contain `genre`
    pub fn search_by_genre(&self, genre: &str, top_n: usize) -> Vec<String> {
        let filter = GenreFilter::new(genre);
        self.corpus
            .items()
            .iter()
            .filter(|item| filter.matches(item))
            .take(top_n)
            .map(|item| item.title.clone())
            .collect()
    }

    /// Most popular titles, or the first rows when the catalog has no
    /// popularity column. Items lacking a value sort last.
    pub fn popular(&self, top_n: usize) -> Vec<String> {
        let items = self.corpus.items();
        if !self.corpus.has_popularity() {
            return items.iter().take(top_n).map(|i| i.title.clone()).collect();
        }

        let mut order: Vec<ItemId> = (0..items.len()).collect();
        order.sort_by_key(|&id| Reverse(items[id].popularity.map(OrderedFloat)));
        self.titles(order.into_iter().take(top_n))
    }

    /// Deterministic sample of `n` distinct titles for a given seed
    pub fn sample(&self, n: usize, seed: u64) -> Vec<String> {
        let len = self.corpus.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = rand::seq::index::sample(&mut rng, len, n.min(len));
        self.titles(picked.into_iter())
    }

    /// Ranked neighbours of a catalog item, with scores
    pub fn rank_similar(&self, title: &str, top_n: usize) -> Result<Vec<Ranked>> {
        let item = self
            .corpus
            .find_by_title(title)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;

        let started = Instant::now();
        let norm = self.corpus.row_norms()[item.id];
        let scores = self.score_all(self.corpus.row(item.id), norm);
        let ranked = rank::top_n(&scores, top_n, Some(item.id));
        debug!(
            title = %item.title,
            id = item.id,
            results = ranked.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "similar-item query"
        );
        Ok(ranked)
    }

    /// Ranked matches for a free-text query, with scores
    pub fn rank_text(&self, query: &str, top_n: usize) -> Vec<Ranked> {
        let started = Instant::now();
        let vector = self.vectorizer.transform(query);
        if vector.is_zero() {
            debug!(query, "query has no in-vocabulary terms; all scores are zero");
        }
        let scores = self.score_all(vector.as_row(), vector.norm());
        let ranked = rank::top_n(&scores, top_n, None);
        debug!(
            query,
            results = ranked.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "text query"
        );
        ranked
    }

    /// Cosine similarity of `query` against every row, indexed by item id
    pub fn score_all(&self, query: SparseRow<'_>, query_norm: f32) -> Vec<f32> {
        let matrix = self.corpus.matrix();
        let norms = self.corpus.row_norms();
        let score = |r: usize| cosine_from_parts(query.dot(&matrix.row(r)), query_norm, norms[r]);

        if self.corpus.len() >= self.config.parallel_threshold {
            (0..self.corpus.len()).into_par_iter().map(score).collect()
        } else {
            (0..self.corpus.len()).map(score).collect()
        }
    }

    fn titles(&self, ids: impl Iterator<Item = ItemId>) -> Vec<String> {
        ids.filter_map(|id| self.corpus.title(id).map(str::to_string))
            .collect()
    }
}
