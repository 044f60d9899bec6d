//! # Component instance identity.
//!
//! [`InstanceId`] identifies one running component instance together with the
//! set of pipelines it serves. A receiver feeding three pipelines is one
//! instance with three pipeline ids.
//!
//! ## Canonical encoding
//! ```text
//! pipelines {traces, logs/b, logs/a, traces}
//!        └─► dedup + sort ─► ["logs/a", "logs/b", "traces"]
//!        └─► join, each id followed by ' ' ─► "logs/a logs/b traces "
//! ```
//! The pipeline set is kept as that single string, so equality and hashing are
//! plain scalar comparisons and an `InstanceId` can be used as a map key
//! without per-call set comparison.
//!
//! ## Rules
//! - Immutable after construction; [`InstanceId::with_pipelines`] returns a new value.
//! - Pipeline names can never contain the delimiter (validated in [`PipelineId`]).
//! - Iteration order is canonical (sorted).
//!
//! ## Example
//! ```rust
//! use statusvisor::{ComponentId, InstanceId, Kind, PipelineId};
//!
//! let a: PipelineId = "traces".parse().unwrap();
//! let b: PipelineId = "logs/audit".parse().unwrap();
//!
//! let x = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [a.clone(), b.clone()]).unwrap();
//! let y = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [b, a]).unwrap();
//! assert_eq!(x, y);
//! assert_eq!(x.pipelines().map(|p| p.to_string()).collect::<Vec<_>>(), ["logs/audit", "traces"]);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::component::{validate_name, ComponentId, Kind};
use super::pipeline::PipelineId;
use crate::error::IdentityError;

/// Delimiter terminating each pipeline id in the canonical encoding.
const PIPELINE_DELIM: char = ' ';

/// Uniquely identifies a component instance and the pipelines it serves.
///
/// Cheap to clone; all fields are `Arc`-backed or `Copy`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId {
    component: ComponentId,
    kind: Kind,
    /// Pipeline ids encoded as a string so the identity is a comparable scalar.
    pipelines: Arc<str>,
}

impl InstanceId {
    /// Creates an identity with a canonicalized pipeline set.
    ///
    /// Fails with [`IdentityError::EmptyComponent`] if the component type is empty,
    /// or [`IdentityError::InvalidName`] if the type/name would not round-trip
    /// through its textual form.
    pub fn new(
        component: ComponentId,
        kind: Kind,
        pipelines: impl IntoIterator<Item = PipelineId>,
    ) -> Result<Self, IdentityError> {
        if component.is_empty() {
            return Err(IdentityError::EmptyComponent);
        }
        validate_name("component type", component.ty())?;
        if let Some(name) = component.name() {
            validate_name("component name", name)?;
        }
        Ok(Self {
            component,
            kind,
            pipelines: encode(pipelines.into_iter().collect()),
        })
    }

    /// Component this instance runs.
    pub fn component(&self) -> &ComponentId {
        &self.component
    }

    /// Component category.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns a new identity whose pipeline set is the union of this one and `extra`.
    ///
    /// The receiver is untouched and stays valid as a key for whatever was
    /// already recorded under it.
    #[must_use]
    pub fn with_pipelines(&self, extra: impl IntoIterator<Item = PipelineId>) -> Self {
        let mut set: BTreeSet<PipelineId> = self.pipelines().collect();
        set.extend(extra);
        Self {
            component: self.component.clone(),
            kind: self.kind,
            pipelines: encode(set),
        }
    }

    /// Iterates member pipelines in canonical order.
    ///
    /// The iterator is lazy and borrows the encoding; call again to restart.
    pub fn pipelines(&self) -> Pipelines<'_> {
        Pipelines {
            inner: self.pipelines.split(PIPELINE_DELIM),
        }
    }

    /// Calls `visit` for each member pipeline in canonical order until it returns `false`.
    pub fn for_each_pipeline(&self, mut visit: impl FnMut(PipelineId) -> bool) {
        for pipeline in self.pipelines() {
            if !visit(pipeline) {
                break;
            }
        }
    }

    /// Returns `true` if `pipeline` is a member.
    pub fn contains_pipeline(&self, pipeline: &PipelineId) -> bool {
        self.pipelines().any(|p| &p == pipeline)
    }

    /// Number of member pipelines.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.matches(PIPELINE_DELIM).count()
    }

    /// Returns `true` if the instance serves at least one pipeline.
    ///
    /// Instances outside every pipeline (typically extensions) contribute
    /// directly to the process status.
    pub fn is_pipeline_member(&self) -> bool {
        !self.pipelines.is_empty()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.component)?;
        if self.is_pipeline_member() {
            write!(f, " [{}]", self.pipelines.trim_end())?;
        }
        Ok(())
    }
}

fn encode(set: BTreeSet<PipelineId>) -> Arc<str> {
    let mut out = String::new();
    for id in set {
        out.push_str(&id.to_string());
        out.push(PIPELINE_DELIM);
    }
    out.into()
}

/// Lazy iterator over the pipelines of an [`InstanceId`].
#[derive(Clone, Debug)]
pub struct Pipelines<'a> {
    inner: std::str::Split<'a, char>,
}

impl Iterator for Pipelines<'_> {
    type Item = PipelineId;

    fn next(&mut self) -> Option<Self::Item> {
        // Segments were validated on the way in; anything unparsable is skipped.
        self.inner
            .by_ref()
            .filter(|s| !s.is_empty())
            .find_map(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Signal;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn pid(s: &str) -> PipelineId {
        s.parse().unwrap()
    }

    fn hash_of(id: &InstanceId) -> u64 {
        let mut h = DefaultHasher::new();
        id.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_order_independent_equality_and_hash() {
        let x = InstanceId::new(
            ComponentId::new("otlp"),
            Kind::Receiver,
            [pid("traces"), pid("logs")],
        )
        .unwrap();
        let y = InstanceId::new(
            ComponentId::new("otlp"),
            Kind::Receiver,
            [pid("logs"), pid("traces"), pid("logs")],
        )
        .unwrap();
        assert_eq!(x, y);
        assert_eq!(hash_of(&x), hash_of(&y));
        assert_eq!(x.pipeline_count(), 2);
    }

    #[test]
    fn test_kind_and_component_distinguish() {
        let r = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [pid("traces")]).unwrap();
        let e = InstanceId::new(ComponentId::new("otlp"), Kind::Exporter, [pid("traces")]).unwrap();
        let n = InstanceId::new(
            ComponentId::with_name("otlp", "b"),
            Kind::Receiver,
            [pid("traces")],
        )
        .unwrap();
        assert_ne!(r, e);
        assert_ne!(r, n);
    }

    #[test]
    fn test_empty_component_rejected() {
        let err = InstanceId::new(ComponentId::new(""), Kind::Receiver, [pid("traces")]);
        assert_eq!(err.unwrap_err(), IdentityError::EmptyComponent);

        let err = InstanceId::new(ComponentId::new("ot lp"), Kind::Receiver, []);
        assert!(matches!(err, Err(IdentityError::InvalidName { .. })));
    }

    #[test]
    fn test_with_pipelines_returns_new_value() {
        let base = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [pid("traces")]).unwrap();
        let extended = base.with_pipelines([pid("metrics"), pid("traces")]);

        assert_eq!(base.pipeline_count(), 1);
        assert_eq!(extended.pipeline_count(), 2);
        assert_ne!(base, extended);
        assert!(extended.contains_pipeline(&pid("metrics")));
        assert!(!base.contains_pipeline(&pid("metrics")));
        assert_eq!(base.component(), extended.component());
    }

    #[test]
    fn test_iteration_is_sorted_restartable_and_stoppable() {
        let id = InstanceId::new(
            ComponentId::new("debug"),
            Kind::Exporter,
            [pid("traces/b"), pid("metrics"), pid("traces/a")],
        )
        .unwrap();

        let first: Vec<String> = id.pipelines().map(|p| p.to_string()).collect();
        let second: Vec<String> = id.pipelines().map(|p| p.to_string()).collect();
        assert_eq!(first, ["metrics", "traces/a", "traces/b"]);
        assert_eq!(first, second);

        let mut seen = Vec::new();
        id.for_each_pipeline(|p| {
            seen.push(p);
            seen.len() < 2
        });
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_no_pipelines() {
        let ext = InstanceId::new(ComponentId::new("health_check"), Kind::Extension, []).unwrap();
        assert!(!ext.is_pipeline_member());
        assert_eq!(ext.pipelines().count(), 0);
        assert_eq!(ext.to_string(), "extension:health_check");
    }

    #[test]
    fn test_display() {
        let id = InstanceId::new(
            ComponentId::with_name("otlp", "in"),
            Kind::Receiver,
            [PipelineId::new(Signal::Traces), PipelineId::new(Signal::Logs)],
        )
        .unwrap();
        assert_eq!(id.to_string(), "receiver:otlp/in [logs traces]");
    }

    fn arb_pipeline() -> impl Strategy<Value = PipelineId> {
        (
            prop::sample::select(vec![Signal::Logs, Signal::Metrics, Signal::Traces]),
            prop::option::of("[a-z]{1,4}"),
        )
            .prop_map(|(signal, name)| match name {
                Some(n) => PipelineId::with_name(signal, n).unwrap(),
                None => PipelineId::new(signal),
            })
    }

    proptest! {
        #[test]
        fn prop_permutation_does_not_change_identity(
            pipelines in prop::collection::vec(arb_pipeline(), 0..8),
        ) {
            let mut reversed = pipelines.clone();
            reversed.reverse();

            let a = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, pipelines.clone()).unwrap();
            let b = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, reversed).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(hash_of(&a), hash_of(&b));

            let unique: BTreeSet<PipelineId> = pipelines.into_iter().collect();
            prop_assert_eq!(a.pipelines().collect::<Vec<_>>(), unique.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn prop_extension_is_union(
            base in prop::collection::vec(arb_pipeline(), 0..5),
            extra in prop::collection::vec(arb_pipeline(), 0..5),
        ) {
            let id = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, base.clone()).unwrap();
            let extended = id.with_pipelines(extra.clone());
            let direct = InstanceId::new(
                ComponentId::new("otlp"),
                Kind::Receiver,
                base.into_iter().chain(extra),
            ).unwrap();
            prop_assert_eq!(extended, direct);
        }
    }
}
