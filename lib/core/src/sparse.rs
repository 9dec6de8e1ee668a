use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// A sparse vector of term weights.
///
/// Only non-zero entries are stored. `indices` is strictly increasing and
/// every index is below `dim`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "SparseVectorParts")]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

/// Unchecked serialized form of [`SparseVector`]
#[derive(Deserialize)]
struct SparseVectorParts {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl TryFrom<SparseVectorParts> for SparseVector {
    type Error = Error;

    fn try_from(parts: SparseVectorParts) -> Result<Self> {
        if parts.indices.len() != parts.values.len() {
            return Err(Error::InvalidMatrix(format!(
                "{} indices but {} values",
                parts.indices.len(),
                parts.values.len()
            )));
        }
        if let Some(&i) = parts.indices.iter().find(|&&i| i as usize >= parts.dim) {
            return Err(Error::InvalidMatrix(format!(
                "index {} out of range for dimension {}",
                i, parts.dim
            )));
        }
        if parts.indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidMatrix(
                "indices are not strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            dim: parts.dim,
            indices: parts.indices,
            values: parts.values,
        })
    }
}

impl SparseVector {
    /// The all-zero vector of the given dimension
    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from unordered `(index, value)` pairs.
    ///
    /// Duplicate indices are summed and zero entries are dropped.
    /// Indices outside `dim` are rejected.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f32)>) -> Result<Self> {
        pairs.sort_by_key(|&(i, _)| i);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if index as usize >= dim {
                return Err(Error::InvalidMatrix(format!(
                    "index {} out of range for dimension {}",
                    index, dim
                )));
            }
            match indices.last().copied() {
                Some(last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let mut v = Self { dim, indices, values };
        v.prune_zeros();
        Ok(v)
    }

    /// Build from a dense slice, keeping non-zero entries
    #[must_use]
    pub fn from_dense(dense: &[f32]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i as u32, v))
            .unzip();
        Self {
            dim: dense.len(),
            indices,
            values,
        }
    }

    fn prune_zeros(&mut self) {
        if self.values.iter().all(|&v| v != 0.0) {
            return;
        }
        let (indices, values) = self
            .indices
            .iter()
            .zip(self.values.iter())
            .filter(|&(_, &v)| v != 0.0)
            .map(|(&i, &v)| (i, v))
            .unzip();
        self.indices = indices;
        self.values = values;
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Borrow as a row view
    #[inline]
    #[must_use]
    pub fn as_row(&self) -> SparseRow<'_> {
        SparseRow {
            indices: &self.indices,
            values: &self.values,
        }
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.as_row().norm()
    }

    #[inline]
    pub fn dot(&self, other: &SparseVector) -> f32 {
        self.as_row().dot(&other.as_row())
    }

    /// Cosine similarity with another vector.
    /// Zero vectors and dimension mismatches score 0.0.
    #[inline]
    pub fn cosine_similarity(&self, other: &SparseVector) -> f32 {
        if self.dim != other.dim {
            return 0.0;
        }
        let norm_a = self.norm();
        let norm_b = other.norm();
        cosine_from_parts(self.as_row().dot(&other.as_row()), norm_a, norm_b)
    }
}

/// Cosine from a precomputed dot product and the two norms
#[inline]
pub fn cosine_from_parts(dot: f32, norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Borrowed view over one sparse row
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    indices: &'a [u32],
    values: &'a [f32],
}

impl<'a> SparseRow<'a> {
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &'a [f32] {
        self.values
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Dot product by merging the two sorted index lists
    pub fn dot(&self, other: &SparseRow<'_>) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[must_use]
    pub fn to_vector(&self, dim: usize) -> SparseVector {
        SparseVector {
            dim,
            indices: self.indices.to_vec(),
            values: self.values.to_vec(),
        }
    }
}

/// Compressed sparse row matrix.
///
/// Row `r` occupies `indices[indptr[r]..indptr[r + 1]]` and the matching
/// range of `data`. Column indices within a row are strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
}

impl CsrMatrix {
    /// A matrix with no rows
    #[must_use]
    pub fn empty(n_cols: usize) -> Self {
        Self {
            n_rows: 0,
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Stack sparse vectors as rows. Every row must have dimension `n_cols`.
    pub fn from_rows(n_cols: usize, rows: &[SparseVector]) -> Result<Self> {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for (r, row) in rows.iter().enumerate() {
            if row.dim() != n_cols {
                return Err(Error::InvalidMatrix(format!(
                    "row {} has dimension {}, expected {}",
                    r,
                    row.dim(),
                    n_cols
                )));
            }
            indices.extend_from_slice(row.indices());
            data.extend_from_slice(row.values());
            indptr.push(indices.len());
        }

        Ok(Self {
            n_rows: rows.len(),
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Assemble from raw CSR arrays, checking structure
    pub fn from_parts(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<u32>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let m = Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        };
        m.validate()?;
        Ok(m)
    }

    /// Check the CSR invariants and that every stored value is finite.
    /// Deserialized matrices must pass this before rows are read.
    pub fn validate(&self) -> Result<()> {
        if self.indptr.len().checked_sub(1) != Some(self.n_rows) {
            return Err(Error::InvalidMatrix(format!(
                "indptr has length {} for {} rows",
                self.indptr.len(),
                self.n_rows
            )));
        }
        if self.indices.len() != self.data.len() {
            return Err(Error::InvalidMatrix(format!(
                "{} column indices but {} values",
                self.indices.len(),
                self.data.len()
            )));
        }
        if let Some(pos) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidMatrix(format!(
                "value {} at position {} is not finite",
                self.data[pos], pos
            )));
        }
        if self.indptr.first() != Some(&0) || self.indptr.last() != Some(&self.indices.len()) {
            return Err(Error::InvalidMatrix(
                "indptr must start at 0 and end at the number of stored values".to_string(),
            ));
        }
        for r in 0..self.n_rows {
            let (start, end) = (self.indptr[r], self.indptr[r + 1]);
            if start > end {
                return Err(Error::InvalidMatrix(format!("indptr decreases at row {}", r)));
            }
            if end > self.indices.len() {
                return Err(Error::InvalidMatrix(format!(
                    "row {} ends at {} past the {} stored values",
                    r,
                    end,
                    self.indices.len()
                )));
            }
            let cols = &self.indices[start..end];
            if let Some(&c) = cols.iter().find(|&&c| c as usize >= self.n_cols) {
                return Err(Error::InvalidMatrix(format!(
                    "row {} has column {} but the matrix has {} columns",
                    r, c, self.n_cols
                )));
            }
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::InvalidMatrix(format!(
                    "row {} column indices are not strictly increasing",
                    r
                )));
            }
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Total stored entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Borrow row `r`. Panics if `r >= n_rows`.
    #[inline]
    pub fn row(&self, r: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[r], self.indptr[r + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_>> + '_ {
        (0..self.n_rows).map(move |r| self.row(r))
    }

    /// L2 norm of every row
    pub fn row_norms(&self) -> Vec<f32> {
        self.rows().map(|row| row.norm()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sums_duplicates_and_drops_zeros() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (1, 2.0), (3, 2.0), (4, 0.0)]).unwrap();
        assert_eq!(v.indices(), &[1, 3]);
        assert_eq!(v.values(), &[2.0, 3.0]);
        assert_eq!(v.dim(), 5);
    }

    #[test]
    fn test_from_pairs_rejects_out_of_range() {
        assert!(SparseVector::from_pairs(2, vec![(2, 1.0)]).is_err());
    }

    #[test]
    fn test_cosine_similarity() {
        let v1 = SparseVector::from_dense(&[1.0, 0.0, 1.0]);
        let v2 = SparseVector::from_dense(&[1.0, 0.0, 1.0]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = SparseVector::from_dense(&[1.0, 0.0, 0.0]);
        let v4 = SparseVector::from_dense(&[0.0, 1.0, 0.0]);
        assert!(v3.cosine_similarity(&v4).abs() < 1e-6);

        let v5 = SparseVector::from_dense(&[1.0, 1.0, 0.0]);
        assert!((v3.cosine_similarity(&v5) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = SparseVector::zeros(3);
        let v = SparseVector::from_dense(&[1.0, 2.0, 3.0]);
        assert!(zero.is_zero());
        assert_eq!(zero.cosine_similarity(&v), 0.0);
        assert_eq!(v.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        let a = SparseVector::from_dense(&[1.0, 1.0]);
        let b = SparseVector::from_dense(&[1.0, 1.0, 0.0]);
        assert_eq!(a.cosine_similarity(&b), 0.0);
    }

    #[test]
    fn test_csr_rows() {
        let rows = vec![
            SparseVector::from_dense(&[1.0, 0.0, 2.0]),
            SparseVector::zeros(3),
            SparseVector::from_dense(&[0.0, 3.0, 0.0]),
        ];
        let m = CsrMatrix::from_rows(3, &rows).unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 3);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices(), &[0, 2]);
        assert_eq!(m.row(1).nnz(), 0);
        assert_eq!(m.row(2).values(), &[3.0]);
        assert!(m.validate().is_ok());

        let norms = m.row_norms();
        assert!((norms[0] - 5.0f32.sqrt()).abs() < 1e-6);
        assert_eq!(norms[1], 0.0);
    }

    #[test]
    fn test_csr_from_rows_rejects_wrong_dimension() {
        let rows = vec![SparseVector::from_dense(&[1.0, 0.0])];
        assert!(CsrMatrix::from_rows(3, &rows).is_err());
    }

    #[test]
    fn test_csr_from_parts_validation() {
        assert!(CsrMatrix::from_parts(2, 3, vec![0, 1, 2], vec![0, 2], vec![1.0, 1.0]).is_ok());
        // indptr too short
        assert!(CsrMatrix::from_parts(2, 3, vec![0, 2], vec![0, 2], vec![1.0, 1.0]).is_err());
        // column out of range
        assert!(CsrMatrix::from_parts(1, 2, vec![0, 1], vec![5], vec![1.0]).is_err());
        // unsorted columns
        assert!(CsrMatrix::from_parts(1, 3, vec![0, 2], vec![2, 1], vec![1.0, 1.0]).is_err());
        // decreasing indptr
        assert!(CsrMatrix::from_parts(2, 3, vec![0, 2, 1], vec![0, 1], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_csr_rejects_non_finite_values() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = CsrMatrix::from_parts(1, 2, vec![0, 2], vec![0, 1], vec![bad, 1.0]);
            assert!(matches!(err, Err(Error::InvalidMatrix(_))));
        }

        // from_rows does not validate, so a bad row is caught on validate
        let rows = vec![
            SparseVector::from_dense(&[1.0, 0.0]),
            SparseVector::from_dense(&[f32::NAN, 1.0]),
        ];
        let m = CsrMatrix::from_rows(2, &rows).unwrap();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_csr_rejects_huge_row_count() {
        let err = CsrMatrix::from_parts(usize::MAX, 1, vec![0], vec![], vec![]);
        assert!(matches!(err, Err(Error::InvalidMatrix(_))));

        let json = format!(
            r#"{{"n_rows":{},"n_cols":1,"indptr":[0],"indices":[],"data":[]}}"#,
            usize::MAX
        );
        let m: CsrMatrix = serde_json::from_str(&json).unwrap();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_sparse_vector_deserialize_checks_indices() {
        let v = SparseVector::from_dense(&[0.0, 2.0, 0.0, 1.0]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(serde_json::from_str::<SparseVector>(&json).unwrap(), v);

        // unsorted
        assert!(serde_json::from_str::<SparseVector>(
            r#"{"dim":4,"indices":[3,1],"values":[1.0,2.0]}"#
        )
        .is_err());
        // out of range
        assert!(serde_json::from_str::<SparseVector>(
            r#"{"dim":2,"indices":[0,5],"values":[1.0,2.0]}"#
        )
        .is_err());
        // length mismatch
        assert!(serde_json::from_str::<SparseVector>(
            r#"{"dim":4,"indices":[0],"values":[1.0,2.0]}"#
        )
        .is_err());
    }

    #[test]
    fn test_row_dot_matches_vector_dot() {
        let a = SparseVector::from_dense(&[1.0, 2.0, 0.0, 4.0]);
        let b = SparseVector::from_dense(&[0.0, 3.0, 5.0, 1.0]);
        let m = CsrMatrix::from_rows(4, &[b.clone()]).unwrap();
        assert!((a.as_row().dot(&m.row(0)) - a.dot(&b)).abs() < 1e-6);
        assert!((a.dot(&b) - 10.0).abs() < 1e-6);
    }
}
