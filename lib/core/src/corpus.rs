use crate::{CsrMatrix, Error, Item, ItemId, ItemRecord, Result, SparseRow};
use crate::item::normalize_title;

/// The immutable catalog: items in load order plus their count vectors.
///
/// Row `i` of the matrix belongs to `items[i]`.
#[derive(Debug, Clone)]
pub struct Corpus {
    items: Vec<Item>,
    matrix: CsrMatrix,
    row_norms: Vec<f32>,
    has_popularity: bool,
}

impl Corpus {
    /// Assign ids in record order and pair the records with matrix rows
    pub fn new(records: Vec<ItemRecord>, matrix: CsrMatrix) -> Result<Self> {
        if matrix.n_rows() != records.len() {
            return Err(Error::RowCountMismatch {
                rows: matrix.n_rows(),
                items: records.len(),
            });
        }

        let items: Vec<Item> = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| Item::from_record(id, record))
            .collect();
        let has_popularity = items.iter().any(|item| item.popularity.is_some());
        let row_norms = matrix.row_norms();

        tracing::debug!(
            items = items.len(),
            features = matrix.n_cols(),
            nnz = matrix.nnz(),
            has_popularity,
            "corpus assembled"
        );

        Ok(Self {
            items,
            matrix,
            row_norms,
            has_popularity,
        })
    }

    /// A corpus with no items over the given feature space
    #[must_use]
    pub fn empty(n_features: usize) -> Self {
        Self {
            items: Vec::new(),
            matrix: CsrMatrix::empty(n_features),
            row_norms: Vec::new(),
            has_popularity: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Width of the feature space
    #[inline]
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.matrix.n_cols()
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Count vector of an item. Panics if `id` is out of range.
    #[inline]
    pub fn row(&self, id: ItemId) -> SparseRow<'_> {
        self.matrix.row(id)
    }

    #[inline]
    #[must_use]
    pub fn row_norms(&self) -> &[f32] {
        &self.row_norms
    }

    /// True when the item table carries a popularity column
    #[inline]
    #[must_use]
    pub fn has_popularity(&self) -> bool {
        self.has_popularity
    }

    /// First item whose normalized title equals the normalized input
    pub fn find_by_title(&self, title: &str) -> Option<&Item> {
        let key = normalize_title(title);
        self.items.iter().find(|item| item.title_key == key)
    }

    #[inline]
    pub fn title(&self, id: ItemId) -> Option<&str> {
        self.items.get(id).map(|item| item.title.as_str())
    }
}
