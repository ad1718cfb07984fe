//! Upsert contract required of any backing graph store
//!
//! The graph builder only depends on this trait, so the concrete store
//! (the bundled embedded one, or a remote property-graph database) is
//! swappable. All three operations must be idempotent under repeated
//! identical calls; a failure is fatal for the current batch and safe to
//! retry wholesale.

use super::store_models::{NodeKey, RelKind};
use anyhow::Result;

pub trait GraphWrite: Send + Sync {
    /// Create the node for `key` if it does not exist. Returns `true` when
    /// a node was created, `false` when it already existed.
    fn merge_node(&self, key: &NodeKey) -> Result<bool>;

    /// Create the `(from, kind, to)` relationship if it does not exist.
    /// Both endpoints are addressed by key; a missing endpoint is a no-op
    /// (returns `false`), mirroring a MATCH that binds nothing.
    fn merge_relationship(&self, from: &NodeKey, kind: RelKind, to: &NodeKey) -> Result<bool>;

    /// Set extra (non-key) properties on an existing node. A missing node
    /// is a no-op returning `false`.
    fn set_properties(&self, key: &NodeKey, props: &[(&str, serde_json::Value)]) -> Result<bool>;
}
