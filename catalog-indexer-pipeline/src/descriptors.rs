//! Statically declared stage descriptors.
//!
//! One descriptor per entity kind, passed into the orchestrator at
//! construction. Configuration mistakes are rejected here, at startup,
//! never mid-cycle.

use crate::errors::PipelineError;
use catalog_indexer_shared::EntityKind;

/// Declarative record tying an entity kind to its merge batch size.
///
/// Table, topic and join-path identity live on [`EntityKind`] itself; the
/// batch size is the only runtime-configured field.
#[derive(Debug, Clone, Copy)]
pub struct KindDescriptor {
    pub kind: EntityKind,
    /// Upper bound on rows per merge batch. Must be positive.
    pub batch_size: usize,
}

impl KindDescriptor {
    /// Create a descriptor, rejecting a zero batch size.
    pub fn new(kind: EntityKind, batch_size: usize) -> Result<Self, PipelineError> {
        if batch_size == 0 {
            return Err(PipelineError::config(format!(
                "batch size for kind '{kind}' must be positive"
            )));
        }
        Ok(Self { kind, batch_size })
    }
}

/// Build the full stage list: one descriptor per kind, root first.
pub fn descriptor_set(batch_size: usize) -> Result<Vec<KindDescriptor>, PipelineError> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| KindDescriptor::new(kind, batch_size))
        .collect()
}
