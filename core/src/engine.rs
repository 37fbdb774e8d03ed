//! The roll-call engine: one redistribution pass over one roster snapshot.
//!
//! STAGE ORDER (fixed, never reordered):
//!   1. Field resolution:   headers → logical fields (fatal on gaps)
//!   2. Normalization:      raw cells → RosterRecords + warnings
//!   3. Queue building:     records → tier-ordered CaseUnits
//!   4. Capacity tracking:  fresh tracker for this run only
//!   5. Redistribution:     greedy assignment, emits events
//!   6. Report building:    fold events, check invariants
//!
//! RULES:
//!   - Each run owns its records, queue and tracker. Nothing survives the
//!     call, so concurrent callers only need their own engine or rows.
//!   - Only a SchemaError or an invariant violation returns `Err`.
//!     Everything else lands in the report as warnings or unassigned cases.

use crate::{
    capacity::CapacityTracker,
    cell::{column_labels, RawRow},
    config::RedistributionConfig,
    error::RosterResult,
    event::RedistributionEvent,
    field_resolver,
    normalizer,
    queue,
    redistribution::Redistributor,
    report::{self, RedistributionReport, RunOutput},
};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default)]
pub struct RollCallEngine {
    config: RedistributionConfig,
    roll_call_date: Option<NaiveDate>,
}

impl RollCallEngine {
    pub fn new(config: RedistributionConfig) -> Self {
        Self {
            config,
            roll_call_date: None,
        }
    }

    /// Stamp reports with the roll-call date. Purely informational.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.roll_call_date = Some(date);
        self
    }

    pub fn config(&self) -> &RedistributionConfig {
        &self.config
    }

    pub fn run(&self, rows: &[RawRow]) -> RosterResult<RedistributionReport> {
        self.run_traced(rows).map(|(report, _)| report)
    }

    /// Parse a JSON array of row objects and run it.
    pub fn run_json(&self, json: &str) -> RosterResult<RedistributionReport> {
        let rows: Vec<RawRow> = serde_json::from_str(json)?;
        self.run(&rows)
    }

    /// Run and also return the engine's event stream, in processing order.
    pub fn run_traced(
        &self,
        rows: &[RawRow],
    ) -> RosterResult<(RedistributionReport, Vec<RedistributionEvent>)> {
        self.config.validate()?;
        log::info!(
            "run: {} rows, cap={}, secondary_pool={}, ward_affinity={}",
            rows.len(),
            self.config.cap,
            self.config.secondary_pool_enabled,
            self.config.ward_affinity_enabled
        );

        let labels = column_labels(rows);
        let fields = field_resolver::resolve(&labels).map_err(|e| {
            log::error!("run: {e}");
            e
        })?;

        let normalized = normalizer::normalize(rows, &fields, &self.config);
        let records = normalized.records;

        let queue = queue::build_queue(&records);
        let mut donors = vec![false; records.len()];
        for unit in &queue {
            donors[unit.owner_index] = true;
        }

        let mut tracker = CapacityTracker::new(&records, &donors, self.config.cap);
        let events = Redistributor::new(&records, &self.config).run(&queue, &mut tracker);

        let report = report::build(RunOutput {
            roll_call_date: self.roll_call_date,
            columns: fields.entries().to_vec(),
            records: &records,
            queue: &queue,
            events: events.clone(),
            tracker: &tracker,
            warnings: normalized.warnings,
        })?;
        Ok((report, events))
    }
}

/// One-shot convenience over `RollCallEngine`.
pub fn redistribute(
    rows: &[RawRow],
    config: &RedistributionConfig,
) -> RosterResult<RedistributionReport> {
    RollCallEngine::new(config.clone()).run(rows)
}
