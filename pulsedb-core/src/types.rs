//! Core types for PulseDB

use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since Unix epoch
pub type Timestamp = i64;

/// A single label: a (name, value) string pair.
///
/// A time series is identified by its label set; label order carries no
/// meaning. Serialized field names are capitalized to match the WAL wire
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    /// Label name
    pub name: String,
    /// Label value
    pub value: String,
}

impl Label {
    /// Create a new label
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single observation in a time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sample {
    /// Observed value; the engine does not interpret it
    pub value: f64,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
}

impl Sample {
    /// Create a new sample
    pub fn new(value: f64, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }
}

/// A set of labels paired with a chronologically ascending sample sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeSeries {
    /// Identifying label set
    pub labels: Vec<Label>,
    /// Samples, ascending by timestamp
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    /// Create a new time series
    pub fn new(labels: Vec<Label>, samples: Vec<Sample>) -> Self {
        Self { labels, samples }
    }
}

/// Label matcher kind used during a read.
///
/// Only equality and inequality are recognised. Any other wire code
/// (e.g. the Prometheus regex matchers) degrades to [`MatcherType::Neq`]
/// and is evaluated as equality-negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherType {
    /// Label must equal the value
    Eq,
    /// Label must not equal the value
    Neq,
}

impl MatcherType {
    /// Map a wire-protocol matcher code to an engine matcher kind.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => MatcherType::Eq,
            _ => MatcherType::Neq,
        }
    }
}

/// A constraint on a label, applied during a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    /// Matcher kind
    pub matcher_type: MatcherType,
    /// Label name to match
    pub name: String,
    /// Label value to compare against
    pub value: String,
}

impl LabelMatcher {
    /// Create an equality matcher
    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            matcher_type: MatcherType::Eq,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an inequality matcher
    pub fn neq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            matcher_type: MatcherType::Neq,
            name: name.into(),
            value: value.into(),
        }
    }
}
