//! Data-access services
//!
//! One service per collection. All of them share the same call contract:
//! input is validated up front, then the operation runs through the
//! [`RequestPolicy`] (timeout around retry) after the configured simulated
//! latency, and failures are logged before they reach the caller.

use crate::error::{Action, ServiceError};
use crate::latency::LatencyProfile;
use crate::policy::RequestPolicy;
use bizplan_model::{Identity, RecordKind};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub mod analytics;
pub mod crud;
pub mod financial;
pub mod project;
pub mod template;
pub mod validation;

pub use analytics::AnalyticsService;
pub use crud::CrudService;
pub use financial::FinancialService;
pub use project::ProjectService;
pub use template::TemplateService;
pub use validation::ValidationService;

/// Policy and latency shared by the services of one composition root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceContext {
    /// Timeout and retry
    pub policy: RequestPolicy,
    /// Simulated latency
    pub latency: LatencyProfile,
}

impl ServiceContext {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(policy: RequestPolicy, latency: LatencyProfile) -> Self {
        Self { policy, latency }
    }

    /// Run one service operation under the request policy, logging failures
    pub(crate) async fn call<T, F, Fut>(
        &self,
        service: &'static str,
        operation: &'static str,
        kind: RecordKind,
        action: Action,
        op: F,
    ) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ServiceError>> + Send + 'static,
    {
        tracing::debug!(service, operation, "service call");
        let result = self.policy.execute(kind, action, op).await;
        if let Err(err) = &result {
            log_failure(service, operation, err);
        }
        result
    }
}

/// Log a failed call at the service boundary
pub(crate) fn log_failure(service: &'static str, operation: &'static str, err: &ServiceError) {
    tracing::error!(service, operation, error = %err, "{}.{} failed", service, operation);
}

/// Reject identities that can never exist
///
/// # Errors
/// Returns `ServiceError::Validation` for id 0.
pub(crate) fn check_identity<I: Identity>(
    service: &'static str,
    operation: &'static str,
    kind: RecordKind,
    id: I,
) -> Result<(), ServiceError> {
    if id.is_valid() {
        return Ok(());
    }
    let err = ServiceError::Validation(format!("Invalid {} ID provided", kind.noun(false)));
    log_failure(service, operation, &err);
    Err(err)
}

/// Parse an identity received as text (route parameter, CLI argument)
///
/// # Errors
/// Returns `ServiceError::Validation` for empty, whitespace-only,
/// non-numeric or zero input.
pub fn parse_id<I: Identity>(raw: &str) -> Result<I, ServiceError> {
    I::parse(raw).map_err(ServiceError::from)
}

/// Acknowledgment of a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted<R> {
    /// Confirmation text
    pub message: String,
    /// The removed record
    pub deleted: R,
}
