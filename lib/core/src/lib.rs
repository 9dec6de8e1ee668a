//! # cinesim Core
//!
//! Core data model for the cinesim recommendation lookup.
//!
//! - [`SparseVector`] / [`CsrMatrix`] - sparse term-count vectors and matrices
//! - [`Item`] / [`ItemRecord`] - catalog entries
//! - [`Corpus`] - the immutable catalog with its count matrix
//! - [`Vectorizer`] / [`CountVectorizer`] - text to vector transform
//!
//! ## Example
//!
//! ```rust
//! use cinesim_core::{Corpus, CountVectorizer, CsrMatrix, ItemRecord, Vectorizer};
//!
//! let vectorizer = CountVectorizer::from_terms(&["action", "comedy"]).unwrap();
//! let records = vec![
//!     ItemRecord::new("Alpha").with_genres("Action"),
//!     ItemRecord::new("Beta").with_genres("Comedy"),
//! ];
//! let rows: Vec<_> = records
//!     .iter()
//!     .map(|r| vectorizer.transform(r.genres.as_deref().unwrap_or("")))
//!     .collect();
//! let matrix = CsrMatrix::from_rows(vectorizer.n_features(), &rows).unwrap();
//! let corpus = Corpus::new(records, matrix).unwrap();
//!
//! assert_eq!(corpus.find_by_title("alpha").map(|i| i.id), Some(0));
//! ```

pub mod corpus;
pub mod error;
pub mod filter;
pub mod item;
pub mod sparse;
pub mod vectorizer;

pub use corpus::Corpus;
pub use error::{Error, Result};
pub use filter::{Filter, GenreFilter};
pub use item::{normalize_title, Item, ItemId, ItemRecord};
pub use sparse::{cosine_from_parts, CsrMatrix, SparseRow, SparseVector};
pub use vectorizer::{CountVectorizer, StopWords, Vectorizer, VectorizerParams, ENGLISH_STOP_WORDS};
