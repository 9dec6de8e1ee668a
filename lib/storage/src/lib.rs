pub mod artifacts;

pub use artifacts::{
    ArtifactPaths, ArtifactStore, Artifacts, ITEMS_FILE, MATRIX_FILE, VECTORIZER_FILE,
};
