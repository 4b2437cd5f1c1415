use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use canonical::TextNormalizer;
use ingest::AddressRegistry;
use similarity::SimilarityScorer;
use spatial::SpatialIndex;
use tracing::info;

use crate::config::{LinkageConfig, ResolverConfig};
use crate::types::{MatchError, MatchResult};

/// Observer for resolver calls. Installed per context with
/// [`LinkageContext::with_metrics`].
pub trait ResolveMetrics: Send + Sync {
    fn record_resolve(&self, latency: Duration, outcome: Result<&MatchResult, &MatchError>);
}

/// Everything `resolve` reads: the registry snapshot, the index built from
/// it, and the validated configuration.
///
/// Immutable once built and `Sync`, so one context serves every batch
/// worker. Build a new context when the registry changes; several contexts
/// (registry versions, test fixtures) can coexist.
pub struct LinkageContext {
    registry: AddressRegistry,
    index: SpatialIndex<String>,
    /// Normalized registry text, aligned with registry slots.
    normalized: Vec<String>,
    normalizer: TextNormalizer,
    scorer: SimilarityScorer,
    config: LinkageConfig,
    metrics: Option<Arc<dyn ResolveMetrics>>,
}

impl LinkageContext {
    /// Validate `config`, normalize every registry text once and bulk-load
    /// the spatial index.
    pub fn new(registry: AddressRegistry, config: LinkageConfig) -> Result<Self, MatchError> {
        config.validate()?;
        let normalizer = TextNormalizer::new(config.normalizer.clone())?;
        let scorer = SimilarityScorer::new(config.similarity.clone())?;

        let index = SpatialIndex::build(registry.records(), |record| {
            (record.id.clone(), record.coordinate)
        })?;
        let normalized = registry
            .iter()
            .map(|record| normalizer.normalize(&record.canonical_text))
            .collect();

        info!(records = registry.len(), "linkage_context_ready");
        Ok(Self {
            registry,
            index,
            normalized,
            normalizer,
            scorer,
            config,
            metrics: None,
        })
    }

    /// Install a metrics observer for every `resolve` on this context.
    pub fn with_metrics(mut self, metrics: Arc<dyn ResolveMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &AddressRegistry {
        &self.registry
    }

    pub fn index(&self) -> &SpatialIndex<String> {
        &self.index
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn config(&self) -> &LinkageConfig {
        &self.config
    }

    pub(crate) fn resolver_config(&self) -> &ResolverConfig {
        &self.config.resolver
    }

    pub(crate) fn metrics(&self) -> Option<&Arc<dyn ResolveMetrics>> {
        self.metrics.as_ref()
    }

    /// Normalized text of the record in registry slot `slot`.
    pub(crate) fn normalized_text(&self, slot: usize) -> &str {
        self.normalized.get(slot).map(String::as_str).unwrap_or("")
    }
}

impl fmt::Debug for LinkageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkageContext")
            .field("records", &self.registry.len())
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
