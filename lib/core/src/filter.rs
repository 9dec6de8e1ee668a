// Item filters used by the catalog browse operations
use crate::Item;

pub trait Filter {
    fn matches(&self, item: &Item) -> bool;
}

/// Case-insensitive substring match on an item's genres
#[derive(Debug, Clone)]
pub struct GenreFilter {
    needle: String,
}

impl GenreFilter {
    pub fn new(genre: &str) -> Self {
        Self {
            needle: genre.to_lowercase(),
        }
    }
}

impl Filter for GenreFilter {
    fn matches(&self, item: &Item) -> bool {
        item.genres
            .as_deref()
            .map(|g| g.to_lowercase().contains(&self.needle))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemRecord;

    #[test]
    fn test_genre_filter() {
        let f = GenreFilter::new("Action");
        let hit = Item::from_record(0, ItemRecord::new("A").with_genres("action|thriller"));
        let miss = Item::from_record(1, ItemRecord::new("B").with_genres("Comedy"));
        let none = Item::from_record(2, ItemRecord::new("C"));
        assert!(f.matches(&hit));
        assert!(!f.matches(&miss));
        assert!(!f.matches(&none));
    }
}
