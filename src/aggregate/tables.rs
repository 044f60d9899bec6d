//! # Last-known status table and worst-wins recomputation.
//!
//! Not synchronized; the [`Aggregator`](super::Aggregator) wraps it in a lock so
//! that validate → update → recompute happens atomically per event.
//!
//! Status is tracked per component slot (`Kind` + `ComponentId`). Every identity a
//! component reports under (the original one and any `with_pipelines` extension)
//! folds into the same slot, so a report under an extended identity replaces the
//! component's status in all of its pipelines instead of adding a second member.
//!
//! ## Layout
//! ```text
//! slots:      HashMap<Slot, SlotRecord>                 (last known, per component)
//! identities: HashMap<InstanceId, Slot>                 (every identity ever reported)
//! members:    HashMap<PipelineId, BTreeSet<Slot>>       (who serves which pipeline)
//! standalone: BTreeSet<Slot>                            (no pipeline, e.g. extensions)
//! pipelines:  BTreeMap<PipelineId, AggregateStatus>
//! process:    Option<AggregateStatus>
//! ```
//!
//! ## Rules
//! - Events ordered at or before the slot's last applied one (`(at, seq)`) are rejected (stale)
//! - Transitions are validated with [`transition::check`] against the slot's status
//! - Membership only grows: a slot serves every pipeline any of its identities named
//! - Recomputation reads only the live table: O(pipeline size), never event history
//! - A recomputed aggregate is reported as changed only if its `status` differs

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::SystemTime;

use super::scope::{AggregateStatus, Scope};
use crate::error::ReportError;
use crate::identity::{ComponentId, InstanceId, Kind, PipelineId};
use crate::status::{transition, Precedence, Status, StatusEvent, Transition};

/// One component, whatever pipeline set it reports under.
type Slot = (Kind, ComponentId);

fn slot_of(id: &InstanceId) -> Slot {
    (id.kind(), id.component().clone())
}

/// Last applied state of one component.
#[derive(Clone, Debug)]
struct SlotRecord {
    status: Status,
    error: Option<Arc<str>>,
    last_at: SystemTime,
    last_seq: u64,
    changed_at: SystemTime,
    /// Identity of the latest accepted report; names the slot in `contributors`.
    latest: InstanceId,
    pipelines: BTreeSet<PipelineId>,
}

/// Result of folding one event into the tables.
#[derive(Debug)]
pub(crate) enum Applied {
    /// Status changed or the component joined a pipeline; carries every
    /// aggregate whose status value changed.
    Changed(Vec<AggregateStatus>),
    /// Same status, same pipelines; timestamps and error detail refreshed.
    Unchanged,
}

#[derive(Default)]
pub(crate) struct Tables {
    slots: HashMap<Slot, SlotRecord>,
    identities: HashMap<InstanceId, Slot>,
    members: HashMap<PipelineId, BTreeSet<Slot>>,
    standalone: BTreeSet<Slot>,
    pipelines: BTreeMap<PipelineId, AggregateStatus>,
    process: Option<AggregateStatus>,
}

impl Tables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Validates `ev` against the component's last known state and folds it in.
    pub(crate) fn apply(
        &mut self,
        ev: &StatusEvent,
        precedence: &Precedence,
    ) -> Result<Applied, ReportError> {
        let slot = slot_of(&ev.instance);
        let current = self.slots.get(&slot);

        if let Some(rec) = current {
            if ev.order_key() <= (rec.last_at, rec.last_seq) {
                return Err(ReportError::Stale {
                    at: ev.at,
                    seq: ev.seq,
                    last_at: rec.last_at,
                    last_seq: rec.last_seq,
                });
            }
        }

        let transition = transition::check(current.map(|r| r.status), ev.status)?;
        let joined = self.record(&slot, ev, transition);
        let changed = self.recompute(&slot, ev.at, precedence);

        if transition == Transition::Changed || joined {
            Ok(Applied::Changed(changed))
        } else {
            Ok(Applied::Unchanged)
        }
    }

    /// Stores the event in its slot; returns whether the slot joined a new pipeline.
    fn record(&mut self, slot: &Slot, ev: &StatusEvent, transition: Transition) -> bool {
        let rec = match self.slots.entry(slot.clone()) {
            Entry::Occupied(entry) => {
                let rec = entry.into_mut();
                match transition {
                    Transition::Changed => {
                        rec.status = ev.status;
                        rec.error = ev.error.clone();
                        rec.changed_at = ev.at;
                    }
                    Transition::Unchanged if ev.error.is_some() => rec.error = ev.error.clone(),
                    Transition::Unchanged => {}
                }
                rec.last_at = ev.at;
                rec.last_seq = ev.seq;
                rec.latest = ev.instance.clone();
                rec
            }
            Entry::Vacant(entry) => entry.insert(SlotRecord {
                status: ev.status,
                error: ev.error.clone(),
                last_at: ev.at,
                last_seq: ev.seq,
                changed_at: ev.at,
                latest: ev.instance.clone(),
                pipelines: BTreeSet::new(),
            }),
        };

        let joined: Vec<PipelineId> = ev
            .instance
            .pipelines()
            .filter(|p| rec.pipelines.insert(p.clone()))
            .collect();
        let is_standalone = rec.pipelines.is_empty();

        self.identities.insert(ev.instance.clone(), slot.clone());
        for pipeline in &joined {
            self.members
                .entry(pipeline.clone())
                .or_default()
                .insert(slot.clone());
        }
        if is_standalone {
            self.standalone.insert(slot.clone());
        } else {
            self.standalone.remove(slot);
        }
        !joined.is_empty()
    }

    /// Recomputes every pipeline the slot serves, then the process.
    fn recompute(
        &mut self,
        slot: &Slot,
        at: SystemTime,
        precedence: &Precedence,
    ) -> Vec<AggregateStatus> {
        let pipelines: Vec<PipelineId> = self
            .slots
            .get(slot)
            .map(|rec| rec.pipelines.iter().cloned().collect())
            .unwrap_or_default();

        let mut changed = Vec::new();
        for pipeline in pipelines {
            if let Some(agg) = self.recompute_pipeline(pipeline, at, precedence) {
                changed.push(agg);
            }
        }
        if let Some(agg) = self.recompute_process(at, precedence) {
            changed.push(agg);
        }
        changed
    }

    fn recompute_pipeline(
        &mut self,
        pipeline: PipelineId,
        at: SystemTime,
        precedence: &Precedence,
    ) -> Option<AggregateStatus> {
        let members = self.members.get(&pipeline)?;

        let mut contributors = BTreeMap::new();
        let mut worst: Option<&SlotRecord> = None;
        for slot in members {
            let Some(rec) = self.slots.get(slot) else {
                continue;
            };
            contributors.insert(Scope::Instance(rec.latest.clone()), rec.status);
            if worst.map_or(true, |w| !precedence.is_worse(w.status, rec.status)) {
                worst = Some(rec);
            }
        }
        let worst = worst?;
        let (status, error) = (worst.status, worst.error.clone());

        let (agg, changed) = update_aggregate(
            self.pipelines.get(&pipeline),
            Scope::Pipeline(pipeline.clone()),
            status,
            error,
            contributors,
            at,
        );
        self.pipelines.insert(pipeline, agg.clone());
        changed.then_some(agg)
    }

    fn recompute_process(
        &mut self,
        at: SystemTime,
        precedence: &Precedence,
    ) -> Option<AggregateStatus> {
        let mut contributors = BTreeMap::new();
        let mut worst: Option<(Status, Option<Arc<str>>)> = None;

        let pipelines = self
            .pipelines
            .values()
            .map(|agg| (agg.scope.clone(), agg.status, &agg.error));
        let standalone = self.standalone.iter().filter_map(|slot| {
            self.slots
                .get(slot)
                .map(|rec| (Scope::Instance(rec.latest.clone()), rec.status, &rec.error))
        });

        for (scope, status, error) in pipelines.chain(standalone) {
            contributors.insert(scope, status);
            if worst
                .as_ref()
                .map_or(true, |(w, _)| !precedence.is_worse(*w, status))
            {
                worst = Some((status, error.clone()));
            }
        }
        let (status, error) = worst?;

        let (agg, changed) = update_aggregate(
            self.process.as_ref(),
            Scope::Process,
            status,
            error,
            contributors,
            at,
        );
        self.process = Some(agg.clone());
        changed.then_some(agg)
    }

    /// Last computed value for `scope`.
    ///
    /// Any identity a component ever reported under resolves to the
    /// component's current status.
    pub(crate) fn get(&self, scope: &Scope) -> Option<AggregateStatus> {
        match scope {
            Scope::Process => self.process.clone(),
            Scope::Pipeline(p) => self.pipelines.get(p).cloned(),
            Scope::Instance(id) => {
                let rec = self.slots.get(self.identities.get(id)?)?;
                Some(AggregateStatus {
                    scope: scope.clone(),
                    status: rec.status,
                    error: rec.error.clone(),
                    contributors: BTreeMap::new(),
                    changed_at: rec.changed_at,
                    updated_at: rec.last_at,
                })
            }
        }
    }

    /// Every pipeline aggregate (canonical order) followed by the process aggregate.
    pub(crate) fn aggregates(&self) -> Vec<AggregateStatus> {
        self.pipelines
            .values()
            .cloned()
            .chain(self.process.clone())
            .collect()
    }
}

/// Builds the next value of an aggregate and whether its status changed.
///
/// `changed_at` is carried over from `prev` unless the status changed.
fn update_aggregate(
    prev: Option<&AggregateStatus>,
    scope: Scope,
    status: Status,
    error: Option<Arc<str>>,
    contributors: BTreeMap<Scope, Status>,
    at: SystemTime,
) -> (AggregateStatus, bool) {
    let changed = prev.map_or(true, |p| p.status != status);
    let changed_at = match prev {
        Some(p) if !changed => p.changed_at,
        _ => at,
    };
    let agg = AggregateStatus {
        scope,
        status,
        error,
        contributors,
        changed_at,
        updated_at: at,
    };
    (agg, changed)
}
