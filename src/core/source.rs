//! Where the reference dataset comes from.

use crate::core::reference::{Dataset, ReferenceData};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// The snapshot shipped with the binary.
pub const BUILTIN_DATASET: &str = include_str!("../../data/reference.yaml");

#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> Result<Dataset>;
}

/// Serves the embedded snapshot.
pub struct BuiltinSource;

#[async_trait]
impl DatasetSource for BuiltinSource {
    async fn load(&self) -> Result<Dataset> {
        debug!("Loading built-in dataset");
        Dataset::from_yaml(BUILTIN_DATASET).context("Built-in dataset is malformed")
    }
}

/// Reads an alternate dataset from a YAML file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn load(&self) -> Result<Dataset> {
        debug!("Loading dataset from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dataset file: {}", self.path.display()))?;
        Dataset::from_yaml(&content)
            .with_context(|| format!("Failed to parse dataset file: {}", self.path.display()))
    }
}

/// Loads and validates a dataset into a reference store.
pub async fn load_reference_data(source: &dyn DatasetSource) -> Result<ReferenceData> {
    let dataset = source.load().await?;
    ReferenceData::new(dataset).context("Dataset failed validation")
}
