//! Synthetic variants.
//!
//! A synthetic variant is a relabeled copy of an existing condition subset.
//! The latency analyses use one as a reference curve: the `Classic` runs at
//! zero latency are copied as `Ideal`, so every latency chart can show how
//! far the scheduler is from the no-latency optimum.

use crate::error::Result;
use crate::filter::Condition;
use crate::observation::ObservationTable;
use serde::{Deserialize, Serialize};

/// Relabeled copy of every row matching `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticVariant {
    /// Scheduler label given to the copies
    pub label: String,

    /// Rows to copy
    pub source: Condition,
}

impl SyntheticVariant {
    pub fn new(label: impl Into<String>, source: Condition) -> Self {
        Self {
            label: label.into(),
            source,
        }
    }

    /// `Classic` at zero latency, relabeled `Ideal`.
    pub fn ideal_from_zero_latency(scheduler: &str) -> Self {
        Self::new(
            "Ideal",
            Condition::scheduler_is(scheduler).and(Condition::param_eq("Latency ms", 0.0)),
        )
    }

    /// New table: every row of `table`, then a relabeled copy of each match.
    ///
    /// Rows of `table` are cloned, never modified.
    pub fn augment(&self, table: &ObservationTable) -> Result<ObservationTable> {
        let mut copies = Vec::new();
        for row in table {
            if self.source.matches(row)? {
                copies.push(row.relabeled(&self.label));
            }
        }

        log::debug!(
            "Synthetic variant '{}': {} rows copied where {}",
            self.label,
            copies.len(),
            self.source
        );

        let mut augmented = table.clone();
        augmented.extend(copies);
        Ok(augmented)
    }
}

/// Apply `variants` in order, each to the previous one's output.
pub fn augment_all(table: &ObservationTable, variants: &[SyntheticVariant]) -> Result<ObservationTable> {
    let mut current = table.clone();
    for variant in variants {
        current = variant.augment(&current)?;
    }
    Ok(current)
}
