//! Prometheus remote read/write wire protocol
//!
//! A hand-derived subset of the `prompb` protobuf messages, with field
//! tags matching the upstream definitions, plus conversions between wire
//! messages and engine types. Series with empty labels or samples are
//! dropped at this boundary.

use pulsedb_core::{Label, LabelMatcher, MatcherType, Sample, TimeSeries};

/// Remote-write payload
#[derive(Clone, PartialEq, prost::Message)]
pub struct WriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<PromTimeSeries>,
}

/// Remote-read payload
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadRequest {
    #[prost(message, repeated, tag = "1")]
    pub queries: Vec<Query>,
}

/// Remote-read response
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadResponse {
    /// One result per request query, in order
    #[prost(message, repeated, tag = "1")]
    pub results: Vec<QueryResult>,
}

/// A single remote-read query
#[derive(Clone, PartialEq, prost::Message)]
pub struct Query {
    #[prost(int64, tag = "1")]
    pub start_timestamp_ms: i64,
    #[prost(int64, tag = "2")]
    pub end_timestamp_ms: i64,
    #[prost(message, repeated, tag = "3")]
    pub matchers: Vec<PromLabelMatcher>,
    #[prost(message, optional, tag = "4")]
    pub hints: Option<ReadHints>,
}

/// Matching series for one query
#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryResult {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<PromTimeSeries>,
}

/// Query hints; logged and ignored by this server
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadHints {
    #[prost(int64, tag = "1")]
    pub step_ms: i64,
    #[prost(string, tag = "2")]
    pub func: String,
    #[prost(int64, tag = "3")]
    pub start_ms: i64,
    #[prost(int64, tag = "4")]
    pub end_ms: i64,
}

/// Wire form of a label matcher; `r#type` carries the prompb matcher code
#[derive(Clone, PartialEq, prost::Message)]
pub struct PromLabelMatcher {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub value: String,
}

/// Wire form of a time series
#[derive(Clone, PartialEq, prost::Message)]
pub struct PromTimeSeries {
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<PromLabel>,
    #[prost(message, repeated, tag = "2")]
    pub samples: Vec<PromSample>,
}

/// Wire form of a label
#[derive(Clone, PartialEq, prost::Message)]
pub struct PromLabel {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Wire form of a sample
#[derive(Clone, PartialEq, prost::Message)]
pub struct PromSample {
    #[prost(double, tag = "1")]
    pub value: f64,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
}

/// Convert an incoming batch to engine series, skipping series with empty
/// labels or samples.
pub fn series_from_proto(timeseries: Vec<PromTimeSeries>) -> Vec<TimeSeries> {
    timeseries
        .into_iter()
        .filter(|ts| !ts.labels.is_empty() && !ts.samples.is_empty())
        .map(|ts| {
            let labels = ts
                .labels
                .into_iter()
                .map(|l| Label::new(l.name, l.value))
                .collect();
            let samples = ts
                .samples
                .into_iter()
                .map(|s| Sample::new(s.value, s.timestamp))
                .collect();
            TimeSeries::new(labels, samples)
        })
        .collect()
}

/// Convert an engine series to its wire form
pub fn series_to_proto(ts: TimeSeries) -> PromTimeSeries {
    PromTimeSeries {
        labels: ts
            .labels
            .into_iter()
            .map(|l| PromLabel {
                name: l.name,
                value: l.value,
            })
            .collect(),
        samples: ts
            .samples
            .into_iter()
            .map(|s| PromSample {
                value: s.value,
                timestamp: s.timestamp,
            })
            .collect(),
    }
}

/// Convert wire matchers to engine matchers
pub fn matchers_from_proto(matchers: &[PromLabelMatcher]) -> Vec<LabelMatcher> {
    matchers
        .iter()
        .map(|m| LabelMatcher {
            matcher_type: MatcherType::from_code(m.r#type),
            name: m.name.clone(),
            value: m.value.clone(),
        })
        .collect()
}
