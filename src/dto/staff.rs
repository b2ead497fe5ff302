use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::StaffApplication;

/// Every field is required; they are optional here so a missing one is reported
/// as a validation failure instead of a JSON rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StaffApplyRequest {
    pub ign: Option<String>,
    pub age: Option<i32>,
    pub discord: Option<String>,
    pub rank: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffApplicationCreated {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffApplicationUpdate {
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffApplicationList {
    pub applications: Vec<StaffApplication>,
}
