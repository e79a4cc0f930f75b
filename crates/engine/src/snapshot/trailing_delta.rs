//! Trailing-delta synthesis policy
//!
//! When a snapshot is taken at an explicit version whose covering rowset
//! is cumulative, the snapshot's latest version is not a singleton
//! delta, which downstream clone/restore consumers otherwise assume.
//! The manager detects that case and consults a policy for a
//! placeholder singleton descriptor `[version+1, version+1]` to append
//! to the snapshot's persisted header.
//!
//! The shipped default is inert: synthesis stays disabled until
//! restore-side handling of placeholder deltas lands, but the detection
//! and append path stay wired so enabling it is a policy swap rather
//! than a rewrite.

use lamina_core::{Result, TabletIdent};
use lamina_storage::RowsetMeta;

/// Decides whether a placeholder trailing delta is synthesized for a
/// snapshot whose tail rowset is cumulative
pub trait TrailingDeltaPolicy: Send + Sync {
    /// Return the placeholder descriptor to append for a snapshot of
    /// `tablet` at `version`, or `None` to leave the header as-is
    fn synthesize(&self, tablet: TabletIdent, version: i64) -> Result<Option<RowsetMeta>>;
}

/// Default policy: detect, but synthesize nothing
pub struct InertTrailingDelta;

impl TrailingDeltaPolicy for InertTrailingDelta {
    fn synthesize(&self, _tablet: TabletIdent, _version: i64) -> Result<Option<RowsetMeta>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_policy_synthesizes_nothing() {
        let policy = InertTrailingDelta;
        let out = policy.synthesize(TabletIdent::new(1, 10), 15).unwrap();
        assert!(out.is_none());
    }
}
