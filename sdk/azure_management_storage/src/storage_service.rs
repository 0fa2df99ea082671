//! Storage service (storage account) management.
//!
//! Lookups are plain GETs. Creation is asynchronous: the POST returns a
//! request ID, the operation is polled to completion, and the new account is
//! then fetched by name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_management_core::client::ManagementClient;
//! use azure_management_storage::storage_service::{self, CreateStorageServiceRequest};
//!
//! # async fn example(client: &ManagementClient) -> azure_management_core::ManagementResult<()> {
//! let availability = storage_service::check_name_availability(client, "mystorage").await?;
//! if availability.result {
//!     let request = CreateStorageServiceRequest::builder()
//!         .name("mystorage")
//!         .location("West US")
//!         .build()?;
//!     let service = storage_service::create(client, &request).await?;
//!     println!("blob endpoint: {}", storage_service::blob_endpoint(&service)?);
//! }
//! # Ok(())
//! # }
//! ```

use azure_management_core::client::ManagementClient;
use azure_management_core::error::{ManagementError, ManagementResult};
use azure_management_core::operation;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::models::{
    AccountType, AvailabilityResponse, CreateStorageServiceInput, StorageService,
    StorageServiceList, STORAGE_SERVICES_PATH,
};

/// Marker identifying the blob endpoint among a service's endpoints.
const BLOB_ENDPOINT_MARKER: &str = ".blob.core";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A request to create a storage account.
///
/// ```rust
/// use azure_management_storage::storage_service::CreateStorageServiceRequest;
///
/// let request = CreateStorageServiceRequest::builder()
///     .name("mystorage")
///     .location("West US")
///     .build()
///     .expect("valid request");
/// assert_eq!(request.name, "mystorage");
/// ```
#[derive(Debug, Clone)]
pub struct CreateStorageServiceRequest {
    /// Account name; also the DNS prefix of its endpoints.
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub account_type: Option<AccountType>,
}

/// Builder for [`CreateStorageServiceRequest`].
#[derive(Debug, Default)]
pub struct CreateStorageServiceRequestBuilder {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    account_type: Option<AccountType>,
}

impl CreateStorageServiceRequest {
    pub fn builder() -> CreateStorageServiceRequestBuilder {
        CreateStorageServiceRequestBuilder::default()
    }

    /// The XML body sent to the API. The label is the base64-encoded name.
    pub(crate) fn to_input(&self) -> CreateStorageServiceInput {
        let mut input = CreateStorageServiceInput::new(
            self.name.clone(),
            BASE64.encode(self.name.as_bytes()),
            self.location.clone(),
        );
        input.description = self.description.clone();
        input.account_type = self.account_type.map(|t| t.as_str());
        input
    }
}

impl CreateStorageServiceRequestBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InvalidParameter`] if `name` or `location`
    /// is missing or empty.
    pub fn build(self) -> ManagementResult<CreateStorageServiceRequest> {
        let name = required(self.name, "name")?;
        let location = required(self.location, "location")?;

        Ok(CreateStorageServiceRequest {
            name,
            location,
            description: self.description,
            account_type: self.account_type,
        })
    }
}

fn required(value: Option<String>, parameter: &str) -> ManagementResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ManagementError::invalid_parameter(parameter))
}

fn require_non_empty(value: &str, parameter: &str) -> ManagementResult<()> {
    if value.is_empty() {
        return Err(ManagementError::invalid_parameter(parameter));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// List the storage accounts in the subscription.
///
/// # Tracing
///
/// Emits a span named `management::storage_services::list`.
#[tracing::instrument(name = "management::storage_services::list", skip(client))]
pub async fn list(client: &ManagementClient) -> ManagementResult<StorageServiceList> {
    tracing::debug!("listing storage services");

    let list: StorageServiceList = client.get_xml(STORAGE_SERVICES_PATH).await?;

    tracing::debug!(count = list.storage_services.len(), "storage services listed");
    Ok(list)
}

/// Get a storage account by name.
///
/// # Tracing
///
/// Emits a span named `management::storage_services::get` with field `service_name`.
#[tracing::instrument(
    name = "management::storage_services::get",
    skip(client),
    fields(service_name = %service_name)
)]
pub async fn get(client: &ManagementClient, service_name: &str) -> ManagementResult<StorageService> {
    require_non_empty(service_name, "serviceName")?;

    let path = format!("{STORAGE_SERVICES_PATH}/{service_name}");
    client.get_xml(&path).await
}

/// Find the first storage account in `location`.
///
/// Returns `Ok(None)` when no account is in that location.
#[tracing::instrument(
    name = "management::storage_services::find_by_location",
    skip(client),
    fields(location = %location)
)]
pub async fn find_by_location(
    client: &ManagementClient,
    location: &str,
) -> ManagementResult<Option<StorageService>> {
    require_non_empty(location, "location")?;

    let list = list(client).await?;
    Ok(list
        .storage_services
        .into_iter()
        .find(|service| service.properties.location == location))
}

/// Create a storage account and wait until it exists.
///
/// Submits the creation request, polls the resulting asynchronous operation
/// at the client's poll interval, then fetches the new account.
///
/// # Errors
///
/// Besides request errors, returns [`ManagementError::OperationFailed`] if
/// the service reports that creation failed.
///
/// # Tracing
///
/// Emits a span named `management::storage_services::create` with fields
/// `service_name` and `location`.
#[tracing::instrument(
    name = "management::storage_services::create",
    skip(client, request),
    fields(service_name = %request.name, location = %request.location)
)]
pub async fn create(
    client: &ManagementClient,
    request: &CreateStorageServiceRequest,
) -> ManagementResult<StorageService> {
    require_non_empty(&request.name, "name")?;
    require_non_empty(&request.location, "location")?;

    tracing::debug!("submitting storage service creation");
    let request_id = client
        .post_xml(STORAGE_SERVICES_PATH, &request.to_input())
        .await?;

    operation::wait_for_completion(client, &request_id).await?;
    tracing::debug!(request_id = %request_id, "storage service created");

    get(client, &request.name).await
}

/// Return the blob endpoint of a storage account.
pub fn blob_endpoint(service: &StorageService) -> ManagementResult<&str> {
    service
        .properties
        .endpoints
        .iter()
        .find(|endpoint| endpoint.contains(BLOB_ENDPOINT_MARKER))
        .map(String::as_str)
        .ok_or_else(|| ManagementError::BlobEndpointNotFound(service.service_name.clone()))
}

/// Check whether a storage account name is available.
///
/// # Tracing
///
/// Emits a span named `management::storage_services::check_name_availability`.
#[tracing::instrument(
    name = "management::storage_services::check_name_availability",
    skip(client),
    fields(service_name = %name)
)]
pub async fn check_name_availability(
    client: &ManagementClient,
    name: &str,
) -> ManagementResult<AvailabilityResponse> {
    require_non_empty(name, "name")?;

    let path = format!("{STORAGE_SERVICES_PATH}/operations/isavailable/{name}");
    let response: AvailabilityResponse = client.get_xml(&path).await?;

    tracing::debug!(available = response.result, "name availability checked");
    Ok(response)
}
