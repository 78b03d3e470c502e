//! Version-specific configuration resolution.
//!
//! Turns an [`EngineVersion`] into a [`ResolvedEngineConfig`]: the ordered
//! list of sections to look for in a report, each with the table patterns
//! that decompose it.
//!
//! # Example
//!
//! ```no_run
//! use memreport::config::{ConfigResolver, DirSource};
//! use memreport::EngineVersion;
//!
//! # async fn run() -> memreport::Result<()> {
//! let resolver = ConfigResolver::new(DirSource::new("resources"));
//! let config = resolver.resolve(EngineVersion::Ue5_1).await?;
//! println!("{} sections", config.sections.len());
//! # Ok(())
//! # }
//! ```

mod cache;
mod legacy;
mod manifest;
mod reader;
mod source;

pub use cache::{CachedPatterns, PatternCache};
pub use legacy::parse_legacy_document;
pub use manifest::{parse_manifest, PatternManifest};
pub use reader::{command_section, derive_pattern_id, Dialect, EngineConfigReader};
pub use source::{DirSource, MemorySource, ResourceSource};

use crate::error::{Error, Result};
use crate::model::{
    EngineVersion, Pipeline, ResolvedEngineConfig, ResolvedSectionConfig, TableParsePattern,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Resolves engine versions into complete rule sets.
///
/// Owns the pattern cache and manifest index; cloning the resolver shares
/// both.
pub struct ConfigResolver<S> {
    source: Arc<S>,
    manifest: Arc<PatternManifest<S>>,
    cache: Arc<PatternCache>,
}

impl<S> Clone for ConfigResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            manifest: self.manifest.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<S: ResourceSource> ConfigResolver<S> {
    /// Create a resolver with a fresh cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(Arc::new(source), Arc::new(PatternCache::new()))
    }

    /// Create a resolver over a shared source and cache.
    pub fn with_cache(source: Arc<S>, cache: Arc<PatternCache>) -> Self {
        Self {
            manifest: Arc::new(PatternManifest::new(source.clone())),
            source,
            cache,
        }
    }

    /// Get the resource source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the pattern cache.
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Get the pattern manifest index.
    pub fn manifest(&self) -> &PatternManifest<S> {
        &self.manifest
    }

    /// Forget every cached pattern and manifest.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.manifest.clear();
    }

    /// Resolve the complete configuration for a version.
    ///
    /// # Errors
    /// * `Error::ConfigUnavailable` if the version's base settings cannot be loaded
    /// * `Error::Config` if a legacy section document is malformed
    ///
    /// Missing or malformed pattern resources are not errors: the affected
    /// sections resolve without tables.
    pub async fn resolve(&self, version: EngineVersion) -> Result<ResolvedEngineConfig> {
        let config = match version.pipeline() {
            Pipeline::Legacy => self.resolve_legacy(version).await?,
            Pipeline::Modern => self.resolve_modern(version).await?,
        };
        log::info!(
            "resolved {} sections ({} with tables) for engine {}",
            config.sections.len(),
            config.tabular_section_count(),
            version
        );
        Ok(config)
    }

    /// Resolve a version and report structural problems.
    ///
    /// Never fails: a resolution error becomes the only reported problem.
    pub async fn validate(&self, version: EngineVersion) -> Vec<String> {
        let config = match self.resolve(version).await {
            Ok(config) => config,
            Err(e) => return vec![e.to_string()],
        };

        let mut problems = EngineConfigReader::validate(&config.to_engine_config());
        for section in &config.sections {
            if let Err(e) = crate::parser::compile_section(section) {
                problems.push(e.to_string());
            }
        }
        problems
    }

    /// List the pattern ids available for a version.
    pub async fn available_patterns(&self, version: EngineVersion) -> Vec<String> {
        self.manifest.list_available(version.family()).await
    }

    async fn load_base(&self, version: EngineVersion, path: &str) -> Result<String> {
        self.source
            .load(path)
            .await
            .map_err(|source| Error::ConfigUnavailable {
                version: version.tag().to_string(),
                source,
            })
    }

    async fn resolve_legacy(&self, version: EngineVersion) -> Result<ResolvedEngineConfig> {
        let text = self.load_base(version, &version.sections_path()).await?;
        parse_legacy_document(&text, version)
    }

    async fn resolve_modern(&self, version: EngineVersion) -> Result<ResolvedEngineConfig> {
        let text = self.load_base(version, &version.settings_path()).await?;
        let base = EngineConfigReader::parse(&text, version.tag());

        let mut tasks = JoinSet::new();
        for (index, section) in base.sections.iter().enumerate() {
            let Some(id) = section.parse_pattern_id.clone() else {
                continue;
            };
            let source = self.source.clone();
            let manifest = self.manifest.clone();
            let cache = self.cache.clone();
            tasks.spawn(async move {
                let patterns =
                    resolve_patterns(&*source, &*manifest, &*cache, version, &id).await;
                (index, patterns)
            });
        }

        let mut tables: Vec<Vec<TableParsePattern>> = vec![Vec::new(); base.sections.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, patterns)) => tables[index] = patterns,
                Err(e) => log::warn!("pattern resolution task for {} failed: {}", version, e),
            }
        }

        let sections = base
            .sections
            .into_iter()
            .zip(tables)
            .map(|(definition, tables)| ResolvedSectionConfig::from_definition(definition, tables))
            .collect();

        Ok(ResolvedEngineConfig {
            version: base.version,
            description: base.description,
            sections,
        })
    }
}

async fn resolve_patterns<S: ResourceSource>(
    source: &S,
    manifest: &PatternManifest<S>,
    cache: &PatternCache,
    version: EngineVersion,
    pattern_id: &str,
) -> Vec<TableParsePattern> {
    cache
        .get_or_resolve(version, pattern_id, || {
            fetch_patterns(source, manifest, version, pattern_id)
        })
        .await
        .patterns()
}

async fn fetch_patterns<S: ResourceSource>(
    source: &S,
    manifest: &PatternManifest<S>,
    version: EngineVersion,
    pattern_id: &str,
) -> CachedPatterns {
    if !manifest.exists(version.family(), pattern_id).await {
        log::debug!("no pattern resource '{}' for {}", pattern_id, version);
        return CachedPatterns::Absent;
    }

    let path = version.pattern_path(pattern_id);
    match source.load(&path).await {
        Ok(text) => match parse_pattern_resource(&text) {
            Ok(patterns) => CachedPatterns::Resolved(patterns),
            Err(e) => {
                log::warn!("ignoring malformed pattern resource {}: {}", path, e);
                CachedPatterns::Absent
            }
        },
        Err(e) => {
            log::warn!("failed to load pattern resource {}: {}", path, e);
            CachedPatterns::Absent
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternResource {
    One(TableParsePattern),
    Many(Vec<TableParsePattern>),
}

/// Parse a pattern resource holding one pattern or an array of them.
pub fn parse_pattern_resource(text: &str) -> serde_json::Result<Vec<TableParsePattern>> {
    Ok(match serde_json::from_str(text)? {
        PatternResource::One(pattern) => vec![pattern],
        PatternResource::Many(patterns) => patterns,
    })
}
