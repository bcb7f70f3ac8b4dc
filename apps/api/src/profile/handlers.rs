//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::errors::{AppError, AppJson};
use crate::profile::service::{
    AddPhoneResponse, MessageResponse, ProfileResponse, SmsSettingsResponse, SmsUsageResponse,
    VerifyPhoneResponse,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PhoneNumberRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificationCodeRequest {
    pub verification_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SmsSettingsRequest {
    pub sms_enabled: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(state.profile.get_profile(&caller).await?))
}

/// POST /api/v1/profile/phone/add
pub async fn handle_add_phone(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(req): AppJson<PhoneNumberRequest>,
) -> Result<Json<AddPhoneResponse>, AppError> {
    let response = state
        .profile
        .add_phone_number(&caller, &req.phone_number)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/profile/phone/verify
pub async fn handle_verify_phone(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(req): AppJson<VerificationCodeRequest>,
) -> Result<Json<VerifyPhoneResponse>, AppError> {
    let response = state
        .profile
        .verify_phone_number(&caller, &req.verification_code)
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/profile/phone
pub async fn handle_remove_phone(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(state.profile.remove_phone_number(&caller).await?))
}

/// PUT /api/v1/profile/sms/settings
pub async fn handle_update_sms_settings(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(req): AppJson<SmsSettingsRequest>,
) -> Result<Json<SmsSettingsResponse>, AppError> {
    let response = state
        .profile
        .update_sms_settings(&caller, req.sms_enabled)
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/profile/sms/usage
pub async fn handle_sms_usage(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<SmsUsageResponse>, AppError> {
    Ok(Json(state.profile.get_sms_usage(&caller).await?))
}
