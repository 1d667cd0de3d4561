//! Seed data.
//!
//! Fixture files are YAML lists of `{model, rows}` blocks. Only blocks whose
//! model is `Fruit` are read. Extra row keys such as `_id` labels are ignored.
//!
//! ```yaml
//! - model: Fruit
//!   rows:
//!     - name: Mango
//!       season: Spring
//!       emoji: U+1F96D
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::FruitRepository;
use crate::error::StorageResult;
use crate::types::{Fruit, NewFruit};

/// File read from a data directory.
pub const FIXTURE_FILE: &str = "data.yaml";

/// Marker written once fixtures have been loaded.
pub const MARKER_FILE: &str = ".loaded";

const BUILTIN: &str = include_str!("../fixtures/data.yaml");

#[derive(Debug, Deserialize)]
struct FixtureBlock {
    model: String,
    #[serde(default)]
    rows: Vec<FixtureRow>,
}

#[derive(Debug, Deserialize)]
struct FixtureRow {
    name: String,
    season: String,
    #[serde(default)]
    emoji: Option<String>,
}

/// A parsed set of fruits to seed.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    fruits: Vec<NewFruit>,
}

impl FixtureSet {
    /// The nine fruits shipped with the crate.
    pub fn builtin() -> StorageResult<Self> {
        Self::parse(BUILTIN)
    }

    /// Parses fixture YAML.
    pub fn parse(yaml: &str) -> StorageResult<Self> {
        let blocks: Vec<FixtureBlock> = serde_yaml::from_str(yaml)?;
        let fruits = blocks
            .into_iter()
            .filter(|block| block.model.eq_ignore_ascii_case("fruit"))
            .flat_map(|block| block.rows)
            .map(|row| NewFruit {
                id: None,
                name: row.name,
                season: row.season,
                emoji: row.emoji,
            })
            .collect();
        Ok(Self { fruits })
    }

    /// Reads and parses a fixture file.
    pub async fn from_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::parse(&contents)
    }

    /// Reads `data.yaml` from a data directory.
    pub async fn from_dir(dir: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_path(dir.as_ref().join(FIXTURE_FILE)).await
    }

    pub fn fruits(&self) -> &[NewFruit] {
        &self.fruits
    }

    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    /// Truncates the store, then inserts every fixture in file order.
    pub async fn load_into<R>(&self, repo: &R) -> StorageResult<Vec<Fruit>>
    where
        R: FruitRepository + ?Sized,
    {
        let removed = repo.delete_all().await?;
        if removed > 0 {
            info!(removed, "Truncated fruits before loading fixtures");
        }

        let mut inserted = Vec::with_capacity(self.fruits.len());
        for fruit in &self.fruits {
            inserted.push(repo.insert(fruit.clone()).await?);
        }
        Ok(inserted)
    }
}

/// What [`preload`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// The marker file was present.
    Skipped,
    /// This many fruits were loaded.
    Loaded(usize),
}

/// Loads `<data_dir>/data.yaml` once per store.
///
/// The marker defaults to `<data_dir>/.loaded`. When it exists nothing is
/// loaded; otherwise the fixtures are loaded and the marker is written.
pub async fn preload<R>(
    repo: &R,
    data_dir: &Path,
    marker: Option<&Path>,
) -> StorageResult<PreloadOutcome>
where
    R: FruitRepository + ?Sized,
{
    let marker: PathBuf = marker
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(MARKER_FILE));

    if tokio::fs::try_exists(&marker).await? {
        info!(marker = %marker.display(), "Fixtures already loaded, skipping");
        return Ok(PreloadOutcome::Skipped);
    }

    let fixtures = FixtureSet::from_dir(data_dir).await?;
    if fixtures.is_empty() {
        warn!(data_dir = %data_dir.display(), "Fixture file contains no fruits");
    }
    let loaded = fixtures.load_into(repo).await?;

    tokio::fs::write(&marker, b"").await?;
    info!(
        count = loaded.len(),
        marker = %marker.display(),
        "Loaded fixtures"
    );
    Ok(PreloadOutcome::Loaded(loaded.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fixtures() {
        let fixtures = FixtureSet::builtin().unwrap();
        assert_eq!(fixtures.len(), 9);
        let first = &fixtures.fruits()[0];
        assert_eq!(first.name, "Mango");
        assert_eq!(first.season, "Spring");
        assert_eq!(first.emoji.as_deref(), Some("U+1F96D"));
        assert!(first.id.is_none());
    }

    #[test]
    fn test_other_models_are_ignored() {
        let yaml = r#"
- model: Vegetable
  rows:
    - name: Carrot
      season: Fall
- model: Fruit
  rows:
    - name: Kiwi
      season: Winter
"#;
        let fixtures = FixtureSet::parse(yaml).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures.fruits()[0].name, "Kiwi");
        assert_eq!(fixtures.fruits()[0].emoji, None);
    }

    #[test]
    fn test_malformed_yaml_is_a_validation_error() {
        let err = FixtureSet::parse("- model: Fruit\n  rows: 12").unwrap_err();
        assert!(matches!(err, crate::error::StorageError::Validation(_)));
    }
}
