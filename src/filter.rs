//! Row predicates and the observation filter.
//!
//! A [`Condition`] is a small serializable predicate tree over an
//! observation's parameters and scheduler label. It is shared by the filter,
//! the synthetic-variant augmenter, and configuration files:
//!
//! ```toml
//! [[filters]]
//! action = "exclude"
//! when = { kind = "param", name = "Cores", op = "gt", value = 35.0 }
//! ```
//!
//! Filters run before baseline resolution. Removing a would-be baseline row is
//! allowed and surfaces later as `BaselineNotFound`.

use crate::error::Result;
use crate::observation::{Observation, ObservationTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator for parameter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Apply the operator to `lhs op rhs`.
    #[inline]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Predicate over a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// `parameters[name] op value`
    Param {
        name: String,
        op: CompareOp,
        value: f64,
    },

    /// `scheduler == name`
    SchedulerIs { name: String },

    /// Every nested condition holds (true when empty).
    All { conditions: Vec<Condition> },

    /// At least one nested condition holds (false when empty).
    Any { conditions: Vec<Condition> },

    /// The nested condition does not hold.
    Not { condition: Box<Condition> },
}

impl Condition {
    /// `parameters[name] op value`
    pub fn param(name: impl Into<String>, op: CompareOp, value: f64) -> Self {
        Condition::Param {
            name: name.into(),
            op,
            value,
        }
    }

    /// `parameters[name] == value`
    pub fn param_eq(name: impl Into<String>, value: f64) -> Self {
        Self::param(name, CompareOp::Eq, value)
    }

    /// `parameters[name] != value`
    pub fn param_ne(name: impl Into<String>, value: f64) -> Self {
        Self::param(name, CompareOp::Ne, value)
    }

    /// `parameters[name] > value`
    pub fn param_gt(name: impl Into<String>, value: f64) -> Self {
        Self::param(name, CompareOp::Gt, value)
    }

    /// `scheduler == name`
    pub fn scheduler_is(name: impl Into<String>) -> Self {
        Condition::SchedulerIs { name: name.into() }
    }

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::All { mut conditions } => {
                conditions.push(other);
                Condition::All { conditions }
            }
            first => Condition::All {
                conditions: vec![first, other],
            },
        }
    }

    /// Disjunction of `self` and `other`.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Any { mut conditions } => {
                conditions.push(other);
                Condition::Any { conditions }
            }
            first => Condition::Any {
                conditions: vec![first, other],
            },
        }
    }

    /// Negation of `self`.
    pub fn negate(self) -> Self {
        Condition::Not {
            condition: Box::new(self),
        }
    }

    /// Evaluate against one observation.
    ///
    /// Naming a parameter the observation lacks is a schema mismatch.
    pub fn matches(&self, observation: &Observation) -> Result<bool> {
        match self {
            Condition::Param { name, op, value } => Ok(op.apply(observation.param(name)?, *value)),
            Condition::SchedulerIs { name } => Ok(observation.scheduler == *name),
            Condition::All { conditions } => {
                for condition in conditions {
                    if !condition.matches(observation)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any { conditions } => {
                for condition in conditions {
                    if condition.matches(observation)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Not { condition } => Ok(!condition.matches(observation)?),
        }
    }

    /// Parameter names referenced anywhere in the tree.
    pub fn referenced_params(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_params(&mut names);
        names
    }

    fn collect_params<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Condition::Param { name, .. } => names.push(name),
            Condition::SchedulerIs { .. } => {}
            Condition::All { conditions } | Condition::Any { conditions } => {
                for condition in conditions {
                    condition.collect_params(names);
                }
            }
            Condition::Not { condition } => condition.collect_params(names),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Param { name, op, value } => write!(f, "{name} {} {value}", op.symbol()),
            Condition::SchedulerIs { name } => write!(f, "scheduler == {name}"),
            Condition::All { conditions } | Condition::Any { conditions } => {
                let joiner = if matches!(self, Condition::All { .. }) {
                    " AND "
                } else {
                    " OR "
                };
                let parts: Vec<String> = conditions.iter().map(|c| format!("({c})")).collect();
                write!(f, "{}", parts.join(joiner))
            }
            Condition::Not { condition } => write!(f, "NOT ({condition})"),
        }
    }
}

/// One filter rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FilterRule {
    /// Drop rows where the condition holds.
    Exclude { when: Condition },

    /// Drop rows where the condition does not hold.
    Require { when: Condition },
}

impl FilterRule {
    /// Whether `observation` survives this rule.
    pub fn keeps(&self, observation: &Observation) -> Result<bool> {
        match self {
            FilterRule::Exclude { when } => Ok(!when.matches(observation)?),
            FilterRule::Require { when } => when.matches(observation),
        }
    }

    /// The rule's condition.
    pub fn condition(&self) -> &Condition {
        match self {
            FilterRule::Exclude { when } | FilterRule::Require { when } => when,
        }
    }
}

/// Conjunction of filter rules.
///
/// # Example
///
/// ```ignore
/// let filter = ObservationFilter::new()
///     .exclude(Condition::param_gt("Cores", 35.0))
///     .exclude(Condition::param_eq("Fib N", 35.0));
///
/// let filtered = filter.apply(&table)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationFilter {
    rules: Vec<FilterRule>,
}

impl ObservationFilter {
    /// Create a filter that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from rules.
    pub fn from_rules(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    /// Add an exclusion rule.
    pub fn exclude(mut self, when: Condition) -> Self {
        self.rules.push(FilterRule::Exclude { when });
        self
    }

    /// Add an inclusion requirement.
    pub fn require(mut self, when: Condition) -> Self {
        self.rules.push(FilterRule::Require { when });
        self
    }

    /// Configured rules.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Whether `observation` satisfies every rule.
    pub fn keeps(&self, observation: &Observation) -> Result<bool> {
        for rule in &self.rules {
            if !rule.keeps(observation)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Build a new table holding the rows that satisfy every rule.
    pub fn apply(&self, table: &ObservationTable) -> Result<ObservationTable> {
        let mut kept = ObservationTable::new();
        for observation in table {
            if self.keeps(observation)? {
                kept.push(observation.clone());
            }
        }

        log::debug!(
            "Filter kept {}/{} observations ({} rules)",
            kept.len(),
            table.len(),
            self.rules.len()
        );
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn obs(scheduler: &str, cores: f64, latency: f64, fib_n: f64) -> Observation {
        let parameters = [
            ("Cores".to_string(), cores),
            ("Latency ms".to_string(), latency),
            ("Fib N".to_string(), fib_n),
        ]
        .into_iter()
        .collect();
        Observation::new(scheduler, parameters, 1.0)
    }

    fn sample_table() -> ObservationTable {
        ObservationTable::from_rows(vec![
            obs("Serial", 1.0, 0.0, 30.0),
            obs("Serial", 1.0, 0.0, 35.0),
            obs("Classic", 20.0, 0.0, 30.0),
            obs("Classic", 40.0, 0.0, 30.0),
            obs("Classic", 140.0, 50.0, 30.0),
            obs("Latency Hiding", 20.0, 50.0, 30.0),
        ])
    }

    #[test]
    fn test_exclude_rules_conjunction() {
        let filter = ObservationFilter::new()
            .exclude(Condition::param_gt("Cores", 35.0))
            .exclude(Condition::param_eq("Fib N", 35.0));

        let filtered = filter.apply(&sample_table()).unwrap();
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|o| o.parameters["Cores"] <= 35.0));
        assert!(filtered.iter().all(|o| o.parameters["Fib N"] != 35.0));
    }

    #[test]
    fn test_require_rule() {
        let filter = ObservationFilter::new().require(Condition::param_eq("Latency ms", 0.0));
        let filtered = filter.apply(&sample_table()).unwrap();
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_filter_can_remove_baseline() {
        let filter = ObservationFilter::new().exclude(Condition::scheduler_is("Serial"));
        let filtered = filter.apply(&sample_table()).unwrap();
        assert_eq!(filtered.with_scheduler("Serial").count(), 0);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = ObservationFilter::new()
            .exclude(Condition::param_eq("Cores", 140.0))
            .exclude(Condition::param_ne("Latency ms", 0.0));
        let once = filter.apply(&sample_table()).unwrap();
        let twice = filter.apply(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_source_table_untouched() {
        let table = sample_table();
        let filter = ObservationFilter::new().exclude(Condition::param_gt("Cores", 1.0));
        let _ = filter.apply(&table).unwrap();
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_unknown_parameter_is_schema_mismatch() {
        let filter = ObservationFilter::new().exclude(Condition::param_eq("Work ms", 1.0));
        let err = filter.apply(&sample_table()).unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_condition_combinators() {
        let ideal_source =
            Condition::scheduler_is("Classic").and(Condition::param_eq("Latency ms", 0.0));
        assert!(ideal_source.matches(&obs("Classic", 2.0, 0.0, 30.0)).unwrap());
        assert!(!ideal_source.matches(&obs("Classic", 2.0, 50.0, 30.0)).unwrap());

        let either = Condition::scheduler_is("Serial").or(Condition::scheduler_is("Ideal"));
        assert!(either.matches(&obs("Serial", 1.0, 0.0, 30.0)).unwrap());
        assert!(!either.clone().matches(&obs("Classic", 1.0, 0.0, 30.0)).unwrap());
        assert!(either.negate().matches(&obs("Classic", 1.0, 0.0, 30.0)).unwrap());

        let empty_all = Condition::All { conditions: vec![] };
        let empty_any = Condition::Any { conditions: vec![] };
        assert!(empty_all.matches(&obs("Serial", 1.0, 0.0, 30.0)).unwrap());
        assert!(!empty_any.matches(&obs("Serial", 1.0, 0.0, 30.0)).unwrap());
    }

    #[test]
    fn test_referenced_params_and_display() {
        let c = Condition::scheduler_is("Classic")
            .and(Condition::param_eq("Latency ms", 0.0))
            .and(Condition::param_gt("Cores", 2.0).negate());
        assert_eq!(c.referenced_params(), vec!["Latency ms", "Cores"]);
        assert_eq!(
            c.to_string(),
            "(scheduler == Classic) AND (Latency ms == 0) AND (NOT (Cores > 2))"
        );
    }

    #[test]
    fn test_rule_serde_roundtrip() {
        let filter = ObservationFilter::new()
            .exclude(Condition::param_gt("Cores", 35.0))
            .require(Condition::scheduler_is("Classic").or(Condition::scheduler_is("Serial")));

        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"action\":\"exclude\""));
        let back: ObservationFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);
    }
}
