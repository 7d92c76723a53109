//! Http client for the meta RP proxy admin and update endpoints.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metarp_core::{EdgeDeviceStore, TelemetryLevel, TelemetrySink};
use metarp_domain::{
    AdminDeleteResource, Cluster, ClusterPage, EdgeDevice, ErrorCode, ProxyConfig, ResponseError,
    Result, Update, UpdateRun, UpdateSummary,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::proxy::dispatcher::{
    DispatchOutcome, DispatchRequest, ProxyAuthenticator, ProxyDispatcher,
};
use crate::proxy::pagination::{decode_collection_tolerant, PageTraversal};
use crate::translate::FailureContext;

/// Header scoping a read to one tenant's view of the API.
pub const TENANT_HEADER: &str = "x-ms-cluster-client-tenant-id";

const DELETE_ENDPOINT: &str = "rpaas/deleteResources";

/// Client for the meta RP proxy management endpoints.
///
/// Stateless aside from configuration: concurrent callers each own their own
/// request/response lifecycle. Every operation costs at most one network
/// attempt per page; retry policy belongs to the caller.
pub struct MetaRpProxyClient {
    dispatcher: ProxyDispatcher,
    config: ProxyConfig,
    telemetry: Arc<dyn TelemetrySink>,
}

impl MetaRpProxyClient {
    pub fn new(
        config: ProxyConfig,
        authenticator: Arc<dyn ProxyAuthenticator>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        config.validate()?;
        let dispatcher = ProxyDispatcher::new(&config, authenticator, Arc::clone(&telemetry))?;
        Ok(Self { dispatcher, config, telemetry })
    }

    /// Trigger the admin delete call for the given resource.
    ///
    /// Unlike the read operations, a 404 here is a hard
    /// [`ErrorCode::NotFound`] failure: asking to delete something that does
    /// not exist is a caller bug worth surfacing.
    pub async fn trigger_admin_delete(&self, resource: &AdminDeleteResource) -> Result<()> {
        self.telemetry.record(
            TelemetryLevel::Info,
            "triggering admin delete",
            &[("resource", resource.to_string())],
        );

        let body = serde_json::to_value(resource).map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                format!("delete descriptor for resource {resource} could not be serialized"),
            )
            .with_target(DELETE_ENDPOINT)
            .with_cause(e)
        })?;

        let context = FailureContext::new(
            ErrorCode::UpstreamError,
            DELETE_ENDPOINT,
            format!("failed to trigger delete call using the admin api for resource {resource}"),
        );
        let request = DispatchRequest::new(Method::POST, DELETE_ENDPOINT, context).json_body(body);

        self.dispatcher.dispatch(request).await?;

        self.telemetry.record(
            TelemetryLevel::Info,
            "admin delete accepted",
            &[("resource", resource.to_string())],
        );
        Ok(())
    }

    /// Fetch one page of cluster resources for a region.
    ///
    /// The caller passes the cursor in (`skip_token`) and gets the next one
    /// back. A 404 yields an explicit empty page, never an error: no
    /// clusters existing yet is a normal state for a fresh region.
    pub async fn get_cluster_page(
        &self,
        region: &str,
        skip_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> Result<ClusterPage> {
        let endpoint = cluster_filter_endpoint(region, skip_token);
        let mut traversal =
            self.cluster_traversal(endpoint, tenant_id, CancellationToken::new());

        match traversal.next_page().await? {
            Some(page) => {
                self.telemetry.record(
                    TelemetryLevel::Info,
                    "cluster page fetched",
                    &[("region", region.to_string()), ("count", page.value.len().to_string())],
                );
                Ok(ClusterPage { clusters: page.value, next_link: page.next_link })
            }
            None => {
                self.telemetry.record(
                    TelemetryLevel::Info,
                    "no cluster resources found for region",
                    &[("region", region.to_string())],
                );
                Ok(ClusterPage::empty())
            }
        }
    }

    /// Lazily traverse every page of cluster resources for a region.
    ///
    /// `cancel` is checked before each page fetch and interrupts the
    /// in-flight one; pages already produced stay valid.
    pub fn cluster_resources(
        &self,
        region: &str,
        tenant_id: Option<&str>,
        cancel: CancellationToken,
    ) -> PageTraversal<'_, Cluster> {
        self.cluster_traversal(cluster_filter_endpoint(region, None), tenant_id, cancel)
    }

    /// Drain [`Self::cluster_resources`] into a single list.
    pub async fn list_clusters(
        &self,
        region: &str,
        tenant_id: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<Vec<Cluster>> {
        self.cluster_resources(region, tenant_id, cancel).collect_items().await
    }

    /// Fetch the update summary for a cluster resource.
    ///
    /// A 404 means no summary exists yet and yields `Ok(None)`.
    pub async fn get_update_summary(
        &self,
        tenant_id: &str,
        resource_id: &str,
        api_version: &str,
    ) -> Result<Option<UpdateSummary>> {
        let endpoint =
            format!("rpaas/getupdatesummary?resourceId={resource_id}&api-version={api_version}");
        self.fetch_optional_json(&endpoint, tenant_id, "failed to retrieve the update summary")
            .await
    }

    /// Fetch the updates list for a cluster resource. 404 yields `Ok(None)`.
    pub async fn get_updates(
        &self,
        tenant_id: &str,
        resource_id: &str,
        api_version: &str,
    ) -> Result<Option<Vec<Update>>> {
        let endpoint =
            format!("rpaas/getupdates?resourceId={resource_id}&api-version={api_version}");
        self.fetch_optional_json(&endpoint, tenant_id, "failed to retrieve the updates list").await
    }

    /// Fetch the update runs list for a cluster resource. 404 yields `Ok(None)`.
    pub async fn get_update_runs(
        &self,
        tenant_id: &str,
        resource_id: &str,
        api_version: &str,
    ) -> Result<Option<Vec<UpdateRun>>> {
        let endpoint =
            format!("rpaas/getupdateruns?resourceId={resource_id}&api-version={api_version}");
        self.fetch_optional_json(&endpoint, tenant_id, "failed to retrieve the update runs list")
            .await
    }

    fn cluster_traversal(
        &self,
        endpoint: String,
        tenant_id: Option<&str>,
        cancel: CancellationToken,
    ) -> PageTraversal<'_, Cluster> {
        PageTraversal::new(
            &self.dispatcher,
            Arc::clone(&self.telemetry),
            endpoint,
            tenant_headers(tenant_id),
            ErrorCode::UpstreamError,
            cancel,
            decode_collection_tolerant::<Cluster>,
        )
    }

    /// GET a single JSON value where 404 means "nothing exists yet".
    async fn fetch_optional_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        tenant_id: &str,
        failure_message: &str,
    ) -> Result<Option<T>> {
        let context = FailureContext::new(ErrorCode::UpstreamError, endpoint, failure_message);
        let request = DispatchRequest::get(endpoint, context)
            .not_found_is_empty(true)
            .header(TENANT_HEADER, tenant_id.to_string());

        let response = match self.dispatcher.dispatch(request).await? {
            DispatchOutcome::Response(response) => response,
            DispatchOutcome::Absent => return Ok(None),
        };

        let decoded = response.json::<T>().await.map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                format!("response body for {endpoint} could not be decoded"),
            )
            .with_target(endpoint)
            .with_cause(e)
        })?;

        Ok(Some(decoded))
    }

    /// Resource-id addressed endpoint, e.g.
    /// `subscriptions/.../edgeDevices/d1?api-version=2023-08-01`.
    fn resource_endpoint(&self, resource_id: &str) -> String {
        format!(
            "{}?api-version={}",
            resource_id.trim_start_matches('/'),
            self.config.api_version
        )
    }
}

/// Network-backed implementation of the per-resource capability.
///
/// The cache-backed test store implements the same trait; callers swap
/// backends at their composition root.
#[async_trait]
impl EdgeDeviceStore for MetaRpProxyClient {
    async fn get_edge_device(
        &self,
        tenant_id: Option<&str>,
        resource_id: &str,
    ) -> Result<Option<EdgeDevice>> {
        let endpoint = self.resource_endpoint(resource_id);
        let context = FailureContext::new(
            ErrorCode::UpstreamError,
            &endpoint,
            format!("failed to retrieve edge device {resource_id}"),
        );
        let request = DispatchRequest::get(&endpoint, context)
            .not_found_is_empty(true)
            .headers(tenant_headers(tenant_id));

        let response = match self.dispatcher.dispatch(request).await? {
            DispatchOutcome::Response(response) => response,
            DispatchOutcome::Absent => return Ok(None),
        };

        let device = response.json::<EdgeDevice>().await.map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                format!("edge device {resource_id} could not be decoded"),
            )
            .with_target(endpoint.clone())
            .with_cause(e)
        })?;
        Ok(Some(device))
    }

    async fn get_edge_devices_batch(
        &self,
        tenant_id: Option<&str>,
        resource_ids: &HashSet<String>,
    ) -> Result<Option<Vec<EdgeDevice>>> {
        // Deterministic request order; absent ids are skipped rather than
        // failing the whole batch.
        let mut ordered: Vec<&String> = resource_ids.iter().collect();
        ordered.sort();

        let mut devices = Vec::with_capacity(ordered.len());
        for resource_id in ordered {
            if let Some(device) = self.get_edge_device(tenant_id, resource_id).await? {
                devices.push(device);
            }
        }

        self.telemetry.record(
            TelemetryLevel::Info,
            "edge device batch fetched",
            &[
                ("requested", resource_ids.len().to_string()),
                ("found", devices.len().to_string()),
            ],
        );
        Ok(Some(devices))
    }

    async fn put_edge_device(&self, tenant_id: Option<&str>, device: &EdgeDevice) -> Result<()> {
        let endpoint = self.resource_endpoint(&device.id);
        let body = serde_json::to_value(device).map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                format!("edge device {} could not be serialized", device.id),
            )
            .with_target(endpoint.clone())
            .with_cause(e)
        })?;

        let context = FailureContext::new(
            ErrorCode::UpstreamError,
            &endpoint,
            format!("failed to store edge device {}", device.id),
        );
        let request = DispatchRequest::new(Method::PUT, &endpoint, context)
            .json_body(body)
            .headers(tenant_headers(tenant_id));

        self.dispatcher.dispatch(request).await?;
        Ok(())
    }
}

fn cluster_filter_endpoint(region: &str, skip_token: Option<&str>) -> String {
    match skip_token {
        Some(token) => format!(
            "rpaas/gethciresourcesbyfilter?filter=Location eq '{region}'&skipToken={token}"
        ),
        None => format!("rpaas/gethciresourcesbyfilter?filter=Location eq '{region}'"),
    }
}

fn tenant_headers(tenant_id: Option<&str>) -> Vec<(&'static str, String)> {
    tenant_id.map(|tenant| vec![(TENANT_HEADER, tenant.to_string())]).unwrap_or_default()
}
