//! Auth endpoints. None of these attach a bearer token.

use super::gateway::{ApiError, Gateway, RequestOptions, expect_body};
use super::types::{AuthResponse, LoginRequest, RegisterEmailRequest, RegisterPhoneNumberRequest};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_EMAIL_PATH: &str = "/auth/register/email";
const REGISTER_PHONE_PATH: &str = "/auth/register/phone-number";

/// `POST /auth/login`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` when no token body came back.
pub async fn login(gateway: &Gateway, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let options = RequestOptions::post().json(&LoginRequest { username, password })?;
    let body = gateway.request_as(LOGIN_PATH, options, false).await?;
    expect_body(LOGIN_PATH, body)
}

/// `POST /auth/register/email`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` when no token body came back.
pub async fn register_email(
    gateway: &Gateway,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let options = RequestOptions::post().json(&RegisterEmailRequest { username, email, password })?;
    let body = gateway.request_as(REGISTER_EMAIL_PATH, options, false).await?;
    expect_body(REGISTER_EMAIL_PATH, body)
}

/// `POST /auth/register/phone-number`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` when no token body came back.
pub async fn register_phone_number(
    gateway: &Gateway,
    username: &str,
    phone_number: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let options = RequestOptions::post().json(&RegisterPhoneNumberRequest { username, phone_number, password })?;
    let body = gateway.request_as(REGISTER_PHONE_PATH, options, false).await?;
    expect_body(REGISTER_PHONE_PATH, body)
}
