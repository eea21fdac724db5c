//! HTTP API endpoints

use crate::protocol::{self, QueryResult, ReadRequest, ReadResponse, WriteRequest};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use prost::Message;
use pulsedb_core::storage::Storage;
use pulsedb_core::wal::{WalAppend, WalEntry};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared handler state; trait-generic so tests substitute fakes
pub struct AppState<S, W> {
    pub storage: Arc<S>,
    pub wal: Arc<W>,
}

/// Create the API router
pub fn router<S, W>(state: Arc<AppState<S, W>>) -> Router
where
    S: Storage + 'static,
    W: WalAppend + 'static,
{
    Router::new()
        .route("/api/v1/write", post(remote_write::<S, W>))
        .route("/api/v1/read", post(remote_read::<S, W>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn remote_write<S, W>(State(state): State<Arc<AppState<S, W>>>, body: Bytes) -> Response
where
    S: Storage + 'static,
    W: WalAppend + 'static,
{
    info!(bytes = body.len(), "received write request");

    let decoded = match snap::raw::Decoder::new().decompress_vec(&body) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(error = %err, "failed to decode snappy");
            return (StatusCode::BAD_REQUEST, "cannot decode snappy").into_response();
        }
    };

    let request = match WriteRequest::decode(decoded.as_slice()) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "failed to unmarshal protobuf");
            return (StatusCode::BAD_REQUEST, "cannot unmarshal protobuf").into_response();
        }
    };

    let series = protocol::series_from_proto(request.timeseries);

    // WAL first; the batch only reaches storage once it is durable
    let entry = WalEntry::new(unix_now(), series);
    if let Err(err) = state.wal.append(&entry) {
        error!(error = %err, "failed to append data to wal");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    state.storage.write_many(entry.time_series);

    StatusCode::OK.into_response()
}

async fn remote_read<S, W>(State(state): State<Arc<AppState<S, W>>>, body: Bytes) -> Response
where
    S: Storage + 'static,
    W: WalAppend + 'static,
{
    info!(bytes = body.len(), "received read request");

    let decoded = match snap::raw::Decoder::new().decompress_vec(&body) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(error = %err, "failed to decode snappy");
            return (StatusCode::BAD_REQUEST, "cannot decode snappy").into_response();
        }
    };

    let request = match ReadRequest::decode(decoded.as_slice()) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "failed to unmarshal protobuf");
            return (StatusCode::BAD_REQUEST, "cannot unmarshal protobuf").into_response();
        }
    };

    let mut response = ReadResponse {
        results: Vec::with_capacity(request.queries.len()),
    };
    for query in &request.queries {
        if let Some(hints) = &query.hints {
            warn!(?hints, "got read hints in the read request, ignoring");
        }

        let matchers = protocol::matchers_from_proto(&query.matchers);
        let series = state
            .storage
            .read(query.start_timestamp_ms, query.end_timestamp_ms, &matchers);

        response.results.push(QueryResult {
            timeseries: series.into_iter().map(protocol::series_to_proto).collect(),
        });
    }

    let encoded = response.encode_to_vec();
    let compressed = match snap::raw::Encoder::new().compress_vec(&encoded) {
        Ok(compressed) => compressed,
        Err(err) => {
            error!(error = %err, "failed to compress read response");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to marshal response")
                .into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/x-protobuf"),
            (header::CONTENT_ENCODING, "snappy"),
        ],
        compressed,
    )
        .into_response()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
