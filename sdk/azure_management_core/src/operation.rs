//! Asynchronous operation polling.
//!
//! Mutating Service Management calls return `202 Accepted` with an
//! `x-ms-request-id` header. That ID names an operation whose status is read
//! from `operations/<id>` until it leaves `InProgress`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_management_core::client::ManagementClient;
//! use azure_management_core::operation;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: &ManagementClient) -> azure_management_core::error::ManagementResult<()> {
//! let request_id = client.post("services/storageservices", "<CreateStorageServiceInput/>").await?;
//!
//! let cancellation = CancellationToken::new();
//! let op = operation::poll_until_complete(
//!     client,
//!     &request_id,
//!     std::time::Duration::from_secs(2),
//!     &cancellation,
//! ).await?;
//! println!("operation {} finished: {}", op.id, op.status);
//! # Ok(())
//! # }
//! ```

use crate::client::ManagementClient;
use crate::error::{ManagementError, ManagementResult};
use crate::models::{Operation, OperationStatus};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fetch the current status of an asynchronous operation.
///
/// # Tracing
///
/// Emits a span named `management::operations::get_status` with field `operation_id`.
#[tracing::instrument(
    name = "management::operations::get_status",
    skip(client),
    fields(operation_id = %operation_id)
)]
pub async fn get_status(client: &ManagementClient, operation_id: &str) -> ManagementResult<Operation> {
    let path = format!("operations/{operation_id}");
    let operation: Operation = client.get_xml(&path).await?;

    tracing::debug!(status = %operation.status, "operation status fetched");
    Ok(operation)
}

/// Poll an operation until it reaches a terminal status.
///
/// The status is fetched immediately, then again after every `poll_interval`
/// while it is `InProgress`.
///
/// # Errors
///
/// - Any error from fetching the status, returned as-is without retrying.
/// - [`ManagementError::OperationFailed`] when the operation ends `Failed`,
///   carrying the service-reported code and message.
/// - [`ManagementError::UnknownOperationStatus`] for a status outside
///   `InProgress`/`Succeeded`/`Failed`.
/// - [`ManagementError::Cancelled`] once `cancellation` is triggered, whether
///   the loop is fetching or sleeping.
///
/// # Tracing
///
/// Emits a span named `management::operations::poll_until_complete`.
#[tracing::instrument(
    name = "management::operations::poll_until_complete",
    skip(client, cancellation),
    fields(operation_id = %operation_id)
)]
pub async fn poll_until_complete(
    client: &ManagementClient,
    operation_id: &str,
    poll_interval: Duration,
    cancellation: &CancellationToken,
) -> ManagementResult<Operation> {
    let cancelled = || ManagementError::Cancelled {
        operation_id: operation_id.to_string(),
    };

    let mut polls = 0u32;

    loop {
        if cancellation.is_cancelled() {
            return Err(cancelled());
        }

        let operation = tokio::select! {
            biased;
            () = cancellation.cancelled() => return Err(cancelled()),
            result = get_status(client, operation_id) => result?,
        };
        polls += 1;

        match operation.status {
            OperationStatus::InProgress => {
                tracing::trace!(poll = polls, "operation still in progress, waiting");
            }
            OperationStatus::Succeeded => {
                tracing::debug!(polls, "operation succeeded");
                return Ok(operation);
            }
            OperationStatus::Failed => {
                tracing::debug!(polls, "operation failed");
                let (code, message) = operation
                    .error
                    .map(|e| (e.code, e.message))
                    .unwrap_or_default();
                return Err(ManagementError::OperationFailed {
                    operation_id: operation_id.to_string(),
                    code,
                    message,
                });
            }
            OperationStatus::Unknown(status) => {
                return Err(ManagementError::UnknownOperationStatus {
                    operation_id: operation_id.to_string(),
                    status,
                });
            }
        }

        tokio::select! {
            biased;
            () = cancellation.cancelled() => return Err(cancelled()),
            () = tokio::time::sleep(poll_interval) => {}
        }
    }
}

/// Wait for an operation using the client's configured poll interval.
///
/// This is the entry point resource clients use after a mutating call. It
/// cannot be cancelled from outside; use [`poll_until_complete`] for that.
pub async fn wait_for_completion(
    client: &ManagementClient,
    operation_id: &str,
) -> ManagementResult<Operation> {
    poll_until_complete(
        client,
        operation_id,
        client.poll_interval(),
        &CancellationToken::new(),
    )
    .await
}
