//! Cursor traversal over paginated proxy collections.

use std::sync::Arc;

use metarp_core::{TelemetryLevel, TelemetrySink};
use metarp_domain::{ErrorCode, ResourceCollection, ResponseError, Result};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::proxy::dispatcher::{DispatchOutcome, DispatchRequest, ProxyDispatcher};
use crate::translate::{self, FailureContext};

/// Decode one raw page body into a typed collection page.
pub type DecodePage<T> = fn(&[u8]) -> Result<ResourceCollection<T>>;

enum TraversalState {
    Fetching(String),
    Done,
}

/// A finite, lazy walk over a paginated collection.
///
/// One dispatch per page; the `nextLink` cursor of each page becomes the next
/// endpoint, passed back verbatim. The walk is not restartable - start a
/// fresh traversal for a second pass.
///
/// Termination:
/// - a page without `nextLink` ends the walk after that page,
/// - a 404 at any point ends it immediately with no further pages (absence
///   is not an error for collections),
/// - cancellation observed between pages ends it cleanly; pages already
///   returned stay valid,
/// - any other dispatch or envelope-decode failure ends it with that error.
pub struct PageTraversal<'a, T> {
    dispatcher: &'a ProxyDispatcher,
    telemetry: Arc<dyn TelemetrySink>,
    decode: DecodePage<T>,
    headers: Vec<(&'static str, String)>,
    error_code: ErrorCode,
    cancel: CancellationToken,
    state: TraversalState,
    pages_emitted: usize,
}

impl<'a, T> PageTraversal<'a, T> {
    pub(crate) fn new(
        dispatcher: &'a ProxyDispatcher,
        telemetry: Arc<dyn TelemetrySink>,
        start_endpoint: String,
        headers: Vec<(&'static str, String)>,
        error_code: ErrorCode,
        cancel: CancellationToken,
        decode: DecodePage<T>,
    ) -> Self {
        Self {
            dispatcher,
            telemetry,
            decode,
            headers,
            error_code,
            cancel,
            state: TraversalState::Fetching(start_endpoint),
            pages_emitted: 0,
        }
    }

    /// Fetch the next page, or `None` once the traversal has finished.
    pub async fn next_page(&mut self) -> Result<Option<ResourceCollection<T>>> {
        let endpoint = match &self.state {
            TraversalState::Done => return Ok(None),
            TraversalState::Fetching(endpoint) => endpoint.clone(),
        };

        if self.cancel.is_cancelled() {
            self.telemetry.record(
                TelemetryLevel::Info,
                "pagination cancelled before next fetch",
                &[("pagesEmitted", self.pages_emitted.to_string())],
            );
            self.state = TraversalState::Done;
            return Ok(None);
        }

        let context = FailureContext::new(
            self.error_code,
            &endpoint,
            "could not retrieve a collection page from the proxy",
        );
        let request = DispatchRequest::get(&endpoint, context.clone())
            .not_found_is_empty(true)
            .headers(self.headers.clone());

        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                self.state = TraversalState::Done;
                return Ok(None);
            }
            outcome = self.dispatcher.dispatch(request) => outcome,
        };

        let response = match outcome {
            Ok(DispatchOutcome::Response(response)) => response,
            Ok(DispatchOutcome::Absent) => {
                self.state = TraversalState::Done;
                return Ok(None);
            }
            Err(error) => {
                self.state = TraversalState::Done;
                return Err(error);
            }
        };

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                self.state = TraversalState::Done;
                return Err(translate::transport_failure(e, &context));
            }
        };

        let page = match (self.decode)(&body) {
            Ok(page) => page,
            Err(error) => {
                self.state = TraversalState::Done;
                return Err(error.with_target(endpoint));
            }
        };

        self.pages_emitted += 1;
        self.telemetry.record(
            TelemetryLevel::Debug,
            "collection page fetched",
            &[("items", page.value.len().to_string()), ("isLast", page.is_last().to_string())],
        );

        self.state = match &page.next_link {
            Some(next) => TraversalState::Fetching(next.clone()),
            None => TraversalState::Done,
        };

        Ok(Some(page))
    }

    /// Drain the remaining pages, concatenating their items.
    pub async fn collect_items(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.value);
        }
        Ok(items)
    }
}

/// Decode a collection page, skipping individual items that fail to decode.
///
/// A malformed record must not block access to the rest of the collection,
/// so item-level failures are logged and dropped. A body that is not a
/// collection envelope at all is a [`ErrorCode::SerializationError`].
pub fn decode_collection_tolerant<T: DeserializeOwned>(
    bytes: &[u8],
) -> Result<ResourceCollection<T>> {
    let raw: ResourceCollection<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                "collection page envelope could not be decoded",
            )
            .with_cause(e)
        })?;

    let mut value = Vec::with_capacity(raw.value.len());
    for item in raw.value {
        match serde_json::from_value::<T>(item) {
            Ok(decoded) => value.push(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "skipping collection item that failed to decode");
            }
        }
    }

    Ok(ResourceCollection { value, next_link: raw.next_link })
}
