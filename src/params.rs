//! Parameter descriptor decoding.
//!
//! Criterion stores the parameter part of a `BenchmarkId` as a single string in
//! `benchmark.json` (`value_str`). The harness encodes every swept parameter in
//! it as `"Name: Value | Name: Value | ..."`, so the descriptor is the only
//! place a run's parameter vector survives.
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::params::DescriptorFormat;
//!
//! let format = DescriptorFormat::default();
//! let params = format.decode("Length: 10 | Latency ms: 0 | Cores: 4")?;
//! assert_eq!(params["Cores"], 4.0);
//! ```

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded parameters of one run, keyed by trimmed parameter name.
pub type Parameters = BTreeMap<String, f64>;

/// Largest integer magnitude an `f64` holds exactly (2^53).
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// How parameter values must parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Every value must be an integer literal.
    #[default]
    Integer,

    /// Every value must be a finite floating-point literal.
    Float,
}

/// Delimiters and numeric policy of one benchmark group's descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorFormat {
    /// Delimiter between `Name: Value` pairs
    pub pair_delimiter: char,

    /// Delimiter between a name and its value (the first occurrence splits)
    pub separator: char,

    /// Required numeric type of the values
    pub numeric: NumericPolicy,
}

impl Default for DescriptorFormat {
    fn default() -> Self {
        Self {
            pair_delimiter: '|',
            separator: ':',
            numeric: NumericPolicy::Integer,
        }
    }
}

impl DescriptorFormat {
    /// Integer-valued descriptors with the default delimiters.
    pub fn integer() -> Self {
        Self::default()
    }

    /// Float-valued descriptors with the default delimiters.
    pub fn float() -> Self {
        Self {
            numeric: NumericPolicy::Float,
            ..Self::default()
        }
    }

    /// Use a different name/value separator (e.g. `-`).
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Check that the delimiters can be told apart.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.pair_delimiter == self.separator {
            return Err(format!(
                "pair delimiter and separator must differ (both '{}')",
                self.separator
            ));
        }
        if self.pair_delimiter.is_whitespace() || self.separator.is_whitespace() {
            return Err("descriptor delimiters must not be whitespace".to_string());
        }
        Ok(())
    }

    /// Decode a descriptor into named numeric parameters.
    ///
    /// Every pair must contain the separator; names and values are trimmed;
    /// names must be non-empty and unique; values must parse under the
    /// configured [`NumericPolicy`]. Any violation is a
    /// [`AnalysisError::MalformedParameter`].
    pub fn decode(&self, descriptor: &str) -> Result<Parameters> {
        if descriptor.trim().is_empty() {
            return Err(AnalysisError::malformed_parameter(
                descriptor,
                "descriptor is empty",
            ));
        }

        let mut params = Parameters::new();
        for pair in descriptor.split(self.pair_delimiter) {
            let Some((name, value)) = pair.split_once(self.separator) else {
                return Err(AnalysisError::malformed_parameter(
                    descriptor,
                    format!("pair \"{}\" has no '{}' separator", pair.trim(), self.separator),
                ));
            };

            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return Err(AnalysisError::malformed_parameter(
                    descriptor,
                    format!("pair \"{}\" has an empty name", pair.trim()),
                ));
            }

            let decoded = self.decode_value(descriptor, name, value)?;
            if params.insert(name.to_string(), decoded).is_some() {
                return Err(AnalysisError::malformed_parameter(
                    descriptor,
                    format!("parameter '{name}' appears more than once"),
                ));
            }
        }

        Ok(params)
    }

    /// Encode parameters as `"Name: Value | Name: Value"`.
    ///
    /// Integral values are written without a fractional part. Values are never
    /// rounded, so a fractional value under the integer policy encodes to a
    /// descriptor that does not decode.
    pub fn encode(&self, params: &Parameters) -> String {
        params
            .iter()
            .map(|(name, value)| format!("{name}{} {value}", self.separator))
            .collect::<Vec<_>>()
            .join(&format!(" {} ", self.pair_delimiter))
    }

    fn decode_value(&self, descriptor: &str, name: &str, value: &str) -> Result<f64> {
        match self.numeric {
            NumericPolicy::Integer => {
                let parsed = value.parse::<i64>().map_err(|e| {
                    AnalysisError::malformed_parameter(
                        descriptor,
                        format!("value \"{value}\" of '{name}' is not an integer: {e}"),
                    )
                })?;
                if parsed.unsigned_abs() > MAX_EXACT_INTEGER {
                    return Err(AnalysisError::malformed_parameter(
                        descriptor,
                        format!("value \"{value}\" of '{name}' is not exactly representable"),
                    ));
                }
                Ok(parsed as f64)
            }
            NumericPolicy::Float => {
                let parsed = value.parse::<f64>().map_err(|e| {
                    AnalysisError::malformed_parameter(
                        descriptor,
                        format!("value \"{value}\" of '{name}' is not a number: {e}"),
                    )
                })?;
                if !parsed.is_finite() {
                    return Err(AnalysisError::malformed_parameter(
                        descriptor,
                        format!("value \"{value}\" of '{name}' is not finite"),
                    ));
                }
                Ok(parsed)
            }
        }
    }
}
