//! Vendor domain entity: a seller's business profile, one per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Address;

string_enum! {
    /// Review state of a vendor application
    VendorStatus("vendor status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Suspended => "suspended",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Acme Electronics")]
    pub business_name: String,
    pub business_type: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub status: VendorStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Only approved vendors may publish or change products
    pub fn can_sell(&self) -> bool {
        self.status == VendorStatus::Approved
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Editable vendor profile fields
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct VendorProfile {
    #[validate(length(min = 1, max = 255, message = "Business name is required"))]
    #[schema(example = "Acme Electronics")]
    pub business_name: String,
    #[schema(example = "retail")]
    pub business_type: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
}
