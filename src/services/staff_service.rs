use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::staff::{
        StaffApplicationCreated, StaffApplicationList, StaffApplicationUpdate, StaffApplyRequest,
    },
    entity::staff_applications::{
        ActiveModel as ApplicationActive, Column as AppCol, Entity as StaffApplications,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::StaffApplication,
    response::{Ack, ApiResponse, Meta},
    services::settings_service,
    state::AppState,
};

const VALID_STATUSES: [&str; 3] = ["pending", "accepted", "denied"];

fn required(value: Option<String>) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::ValidationFailed("All fields are required".into()))
}

pub fn application_message(application: &StaffApplication) -> String {
    format!(
        "**New Staff Application**\n\n**IGN:** {}\n**Age:** {}\n**Discord:** {}\n**Applying For:** {}\n**Why should we pick you?**\n{}",
        application.ign, application.age, application.discord, application.rank, application.reason
    )
}

pub async fn submit(
    state: &AppState,
    payload: StaffApplyRequest,
) -> AppResult<ApiResponse<StaffApplicationCreated>> {
    let ign = required(payload.ign)?;
    let age = payload
        .age
        .filter(|age| *age > 0)
        .ok_or_else(|| AppError::ValidationFailed("All fields are required".into()))?;
    let discord = required(payload.discord)?;
    let rank = required(payload.rank)?;
    let reason = required(payload.reason)?;

    let application = ApplicationActive {
        id: Set(Uuid::new_v4()),
        ign: Set(ign),
        age: Set(age),
        discord: Set(discord),
        rank: Set(rank),
        reason: Set(reason),
        status: Set("pending".to_string()),
        admin_notes: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    let id = application.id;
    let webhook = settings_service::get_value(&state.orm, settings_service::STAFF_WEBHOOK).await?;
    state
        .notifier
        .dispatch(webhook, application_message(&application.into()));

    Ok(ApiResponse::success(
        "Application submitted",
        StaffApplicationCreated { id },
        Some(Meta::empty()),
    ))
}

pub async fn list(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StaffApplicationList>> {
    ensure_admin(user)?;
    let applications: Vec<StaffApplication> = StaffApplications::find()
        .order_by_desc(AppCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::count(applications.len());
    Ok(ApiResponse::success(
        "OK",
        StaffApplicationList { applications },
        Some(meta),
    ))
}

pub async fn review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StaffApplicationUpdate,
) -> AppResult<ApiResponse<StaffApplication>> {
    ensure_admin(user)?;
    if !VALID_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::ValidationFailed("Invalid application status".into()));
    }

    let existing = StaffApplications::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ApplicationActive = existing.into();
    active.status = Set(payload.status);
    active.admin_notes = Set(Some(payload.admin_notes.unwrap_or_default()));
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        None,
        "staff_application_review",
        "staff_applications",
        serde_json::json!({ "application_id": updated.id, "status": updated.status }),
    )
    .await;

    Ok(ApiResponse::success("Application updated", updated.into(), Some(Meta::empty())))
}

pub async fn delete(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let result = StaffApplications::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success("Application deleted", Ack::ok(), Some(Meta::empty())))
}
