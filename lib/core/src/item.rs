use serde::{Deserialize, Serialize};
use crate::filter::{Filter, GenreFilter};

/// Row index of an item in the corpus, assigned at load time
pub type ItemId = usize;

/// One record of the item table as it is stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

impl ItemRecord {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genres: None,
            popularity: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Lower-cased, trimmed title used for exact lookup
    pub title_key: String,
    pub genres: Option<String>,
    pub popularity: Option<f64>,
}

impl Item {
    /// Build from a record at row `id`. Non-finite popularity counts as absent.
    #[must_use]
    pub fn from_record(id: ItemId, record: ItemRecord) -> Self {
        let title_key = normalize_title(&record.title);
        Self {
            id,
            title: record.title,
            title_key,
            genres: record.genres.filter(|g| !g.is_empty()),
            popularity: record.popularity.filter(|p| p.is_finite()),
        }
    }

    /// Case-insensitive substring match on the genres field.
    /// Items without genres never match.
    pub fn has_genre(&self, genre: &str) -> bool {
        GenreFilter::new(genre).matches(self)
    }
}

/// Normalization applied to titles before lookup
#[inline]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
