//! XML payloads for the storage service operations.

use azure_management_core::models::AZURE_XMLNS;
use serde::{Deserialize, Deserializer, Serialize};

/// Relative path of the storage service collection.
pub(crate) const STORAGE_SERVICES_PATH: &str = "services/storageservices";

/// Response of `GET services/storageservices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageServiceList {
    #[serde(rename = "StorageService", default)]
    pub storage_services: Vec<StorageService>,
}

/// A storage account as described by the Service Management API.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageService {
    #[serde(rename = "Url", default)]
    pub url: String,
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    #[serde(rename = "StorageServiceProperties", default)]
    pub properties: StorageServiceProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageServiceProperties {
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "AffinityGroup", default)]
    pub affinity_group: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: String,
    /// Base64-encoded label.
    #[serde(rename = "Label", default)]
    pub label: String,
    /// `Creating`, `Created`, `Deleting` or `ResolvingDns`.
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Endpoints", default, deserialize_with = "endpoint_list")]
    pub endpoints: Vec<String>,
    #[serde(rename = "GeoReplicationEnabled", default)]
    pub geo_replication_enabled: Option<bool>,
    #[serde(rename = "GeoPrimaryRegion", default)]
    pub geo_primary_region: Option<String>,
    #[serde(rename = "StatusOfPrimary", default)]
    pub status_of_primary: Option<String>,
    #[serde(rename = "GeoSecondaryRegion", default)]
    pub geo_secondary_region: Option<String>,
    #[serde(rename = "StatusOfSecondary", default)]
    pub status_of_secondary: Option<String>,
    #[serde(rename = "CreationTime", default)]
    pub creation_time: Option<String>,
    #[serde(rename = "AccountType", default)]
    pub account_type: Option<String>,
}

fn endpoint_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    struct Endpoints {
        #[serde(rename = "Endpoint", default)]
        endpoint: Vec<String>,
    }

    Ok(Endpoints::deserialize(deserializer)?.endpoint)
}

/// Replication type of a new storage account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    StandardLrs,
    StandardZrs,
    StandardGrs,
    StandardRagrs,
}

impl AccountType {
    /// Returns the API string representation of this account type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardLrs => "Standard_LRS",
            Self::StandardZrs => "Standard_ZRS",
            Self::StandardGrs => "Standard_GRS",
            Self::StandardRagrs => "Standard_RAGRS",
        }
    }
}

/// Body of `POST services/storageservices`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "CreateStorageServiceInput")]
pub(crate) struct CreateStorageServiceInput {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "AccountType", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<&'static str>,
}

impl CreateStorageServiceInput {
    pub(crate) fn new(service_name: String, label: String, location: String) -> Self {
        Self {
            xmlns: AZURE_XMLNS,
            service_name,
            description: None,
            label,
            location,
            account_type: None,
        }
    }
}

/// Response of the storage account name availability check.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    /// `true` when the name can be used.
    #[serde(rename = "Result")]
    pub result: bool,
    /// Why the name is unavailable.
    #[serde(rename = "Reason", default)]
    pub reason: Option<String>,
}
