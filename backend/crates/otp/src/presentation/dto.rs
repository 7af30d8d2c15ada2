//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request for POST /api/otp/issue and /api/otp/resend
///
/// For a register issue the request may carry the registration data;
/// it is stored as the pending registration before the code goes out.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Request for POST /api/otp/verify
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub code: String,
}

/// Response for issue/resend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub status: &'static str,
    pub resend_available_at_ms: i64,
}

/// Response for verify
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub status: &'static str,
    /// "registered" or "password-reset"
    pub outcome: &'static str,
    /// Session token, present only for a register verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
