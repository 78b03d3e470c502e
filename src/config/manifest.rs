//! Index of available pattern resources per version family.

use super::source::ResourceSource;
use crate::model::manifest_path;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Entries = Arc<BTreeSet<String>>;

/// Lists which pattern resources exist, so absent ones are never fetched.
///
/// Each family's manifest is loaded once. A manifest that cannot be loaded
/// is remembered as empty: every pattern of that family is then reported
/// absent.
pub struct PatternManifest<S> {
    source: Arc<S>,
    families: Mutex<HashMap<String, Arc<OnceCell<Entries>>>>,
}

impl<S: ResourceSource> PatternManifest<S> {
    /// Create a manifest index over a resource source.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            families: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether a pattern resource exists in a family.
    pub async fn exists(&self, family: &str, pattern_id: &str) -> bool {
        self.entries(family).await.contains(pattern_id)
    }

    /// List every pattern id available in a family, sorted.
    pub async fn list_available(&self, family: &str) -> Vec<String> {
        self.entries(family).await.iter().cloned().collect()
    }

    /// Forget every loaded manifest.
    pub fn clear(&self) {
        self.families
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    async fn entries(&self, family: &str) -> Entries {
        let slot = self
            .families
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(family.to_string())
            .or_default()
            .clone();
        slot.get_or_init(|| self.load(family)).await.clone()
    }

    async fn load(&self, family: &str) -> Entries {
        let entries = match self.source.load(&manifest_path(family)).await {
            Ok(text) => parse_manifest(&text),
            Err(e) => {
                log::warn!(
                    "pattern manifest for {} unavailable ({}); all its sections fall back to plain text",
                    family,
                    e
                );
                BTreeSet::new()
            }
        };
        Arc::new(entries)
    }
}

/// Parse a newline-delimited manifest.
///
/// Blank lines and `#` comments are ignored; a `.json` suffix is stripped.
pub fn parse_manifest(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_suffix(".json").unwrap_or(line).to_string())
        .collect()
}
