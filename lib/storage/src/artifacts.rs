use anyhow::{anyhow, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use cinesim_core::{Corpus, CountVectorizer, CsrMatrix, ItemRecord, Vectorizer};
use cinesim_similarity::{EngineConfig, SimilarityEngine};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const ITEMS_FILE: &str = "movies.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const MATRIX_FILE: &str = "count_matrix.bin";

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub items: PathBuf,
    pub vectorizer: PathBuf,
    /// bincode unless the extension is `.json`
    pub matrix: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside one directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            items: dir.join(ITEMS_FILE),
            vectorizer: dir.join(VECTORIZER_FILE),
            matrix: dir.join(MATRIX_FILE),
        }
    }
}

/// The loaded, not yet assembled, artifacts
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub items: Vec<ItemRecord>,
    pub vectorizer: CountVectorizer,
    pub matrix: CsrMatrix,
}

impl Artifacts {
    /// Pair items with matrix rows and check the vectorizer against the
    /// matrix width. This is the one initialization step; the engine is
    /// read-only afterwards.
    pub fn into_engine(self, config: EngineConfig) -> Result<SimilarityEngine> {
        let vectorizer_dim = self.vectorizer.n_features();
        let corpus = Corpus::new(self.items, self.matrix)?;
        let engine = SimilarityEngine::new(Arc::new(corpus), Arc::new(self.vectorizer), config)?;
        info!(
            items = engine.corpus().len(),
            features = vectorizer_dim,
            has_popularity = engine.corpus().has_popularity(),
            "engine ready"
        );
        Ok(engine)
    }
}

/// Reads and writes the item table, vectorizer and count matrix
pub struct ArtifactStore {
    paths: ArtifactPaths,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_paths(ArtifactPaths::in_dir(dir))
    }

    pub fn with_paths(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Load all three artifacts, checking matrix structure
    pub fn load(&self) -> Result<Artifacts> {
        let items: Vec<ItemRecord> = read_json(&self.paths.items)
            .with_context(|| format!("loading item table from {:?}", self.paths.items))?;
        let vectorizer: CountVectorizer = read_json(&self.paths.vectorizer)
            .with_context(|| format!("loading vectorizer from {:?}", self.paths.vectorizer))?;
        let matrix = self
            .load_matrix()
            .with_context(|| format!("loading count matrix from {:?}", self.paths.matrix))?;

        info!(
            items = items.len(),
            vocabulary = vectorizer.n_features(),
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            nnz = matrix.nnz(),
            "artifacts loaded"
        );

        Ok(Artifacts {
            items,
            vectorizer,
            matrix,
        })
    }

    /// Load and assemble the engine in one step
    pub fn load_engine(&self, config: EngineConfig) -> Result<SimilarityEngine> {
        self.load()?.into_engine(config)
    }

    fn load_matrix(&self) -> Result<CsrMatrix> {
        let matrix: CsrMatrix = if is_json(&self.paths.matrix) {
            read_json(&self.paths.matrix)?
        } else {
            let data = std::fs::read(&self.paths.matrix)?;
            bincode::deserialize(&data)
                .map_err(|e| anyhow!("Deserialization error: {}", e))?
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Write all three artifacts, each replaced atomically
    pub fn save(&self, artifacts: &Artifacts) -> Result<()> {
        let items = serde_json::to_vec_pretty(&artifacts.items)?;
        let vectorizer = serde_json::to_vec_pretty(&artifacts.vectorizer)?;
        let matrix = if is_json(&self.paths.matrix) {
            serde_json::to_vec(&artifacts.matrix)?
        } else {
            bincode::serialize(&artifacts.matrix)
                .map_err(|e| anyhow!("Serialization error: {}", e))?
        };

        write_atomic(&self.paths.items, &items)?;
        write_atomic(&self.paths.vectorizer, &vectorizer)?;
        write_atomic(&self.paths.matrix, &matrix)?;
        info!(items = artifacts.items.len(), "artifacts saved");
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> cinesim_core::Result<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(data))
        .map_err(|e| anyhow!("writing {:?}: {}", path, e))
}
