//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The application root builds one [`SessionStore`] and passes it (or the
//! [`Gateway`] it owns) to whatever issues requests. The gateway reads the
//! bearer token through the same [`SessionHandle`] the store mutates, so
//! there is no ambient global session.
//!
//! STATE MACHINE
//! =============
//! `Unauthenticated --login/register ok--> Authenticated(Session)`,
//! `Authenticated --login/register ok--> Authenticated(new Session)`,
//! `Authenticated --logout--> Unauthenticated`. Failed login/register never
//! transition: the persisted record is written before the in-memory state,
//! so a failed write leaves both untouched. Logout always transitions in
//! memory; if the storage wipe fails the error is returned and the old
//! record may be restored by the next `initialize`.
//!
//! TRADE-OFFS
//! ==========
//! Token signatures are not verified here; the API verifies them on every
//! authenticated call. Expiry is not checked either: an expired token keeps
//! the session active until a request fails with an authorization error.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use super::storage::{KeyValueStore, SESSION_KEY, StorageError};
use crate::config::LogoutScope;
use crate::net::auth as auth_api;
use crate::net::gateway::{ApiError, Gateway};
use crate::net::types::AuthResponse;
use crate::util::guard::Redirect;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    ClientBasic,
    ClientPlus,
    AdminBasic,
    AdminManager,
    AdminGod,
}

impl Role {
    pub const ALL: [Role; 5] = [Self::ClientBasic, Self::ClientPlus, Self::AdminBasic, Self::AdminManager, Self::AdminGod];

    /// Map a wire role name to a role. Unknown names are `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CLIENT_BASIC" => Some(Self::ClientBasic),
            "CLIENT_PLUS" => Some(Self::ClientPlus),
            "ADMIN_BASIC" => Some(Self::AdminBasic),
            "ADMIN_MANAGER" => Some(Self::AdminManager),
            "ADMIN_GOD" => Some(Self::AdminGod),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientBasic => "CLIENT_BASIC",
            Self::ClientPlus => "CLIENT_PLUS",
            Self::AdminBasic => "ADMIN_BASIC",
            Self::AdminManager => "ADMIN_MANAGER",
            Self::AdminGod => "ADMIN_GOD",
        }
    }

    /// Admin roles are recognized by name prefix.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self.as_str().starts_with("ADMIN")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Decoded identity of the signed-in user. Serialized as-is under
/// [`SESSION_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "id")]
    pub subject_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(rename = "authorities")]
    pub roles: BTreeSet<Role>,
    pub token: String,
}

impl Session {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.is_admin())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated(session) => Some(session),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Shared handle to the current [`AuthState`].
///
/// The store writes through it; the gateway only reads the token. The lock is
/// never held across an await point.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<AuthState>>,
}

impl SessionHandle {
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.session().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    pub(crate) fn replace(&self, state: AuthState) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

// =============================================================================
// TOKEN DECODING
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Format,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token claims invalid: {0}")]
    Claims(#[from] serde_json::Error),
    #[error("token carries unknown role `{0}`")]
    UnknownRole(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: i64,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    authorities: Vec<String>,
}

/// Decode a signed token's payload into a [`Session`] without verifying the signature.
///
/// # Errors
///
/// Fails when the token is not `header.payload.signature`, the payload is
/// not base64url JSON with the required claims, or a role name is unknown.
pub fn decode_token(token: &str) -> Result<Session, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Format);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    let roles = claims
        .authorities
        .iter()
        .map(|name| Role::from_name(name).ok_or_else(|| TokenError::UnknownRole(name.clone())))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Session {
        subject_id: claims.id,
        username: claims.username,
        email: claims.email.filter(|s| !s.is_empty()),
        phone_number: claims.phone_number.filter(|s| !s.is_empty()),
        roles,
        token: token.to_owned(),
    })
}

// =============================================================================
// SESSION STORE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("token decode failed: {0}")]
    DecodeFailed(#[from] TokenError),
    #[error("auth response carried no token")]
    MissingToken,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Which registration endpoint an identifier targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    PhoneNumber,
}

impl IdentifierKind {
    /// Anything containing `@` is an email; everything else a phone number.
    #[must_use]
    pub fn classify(identifier: &str) -> Self {
        if identifier.contains('@') { Self::Email } else { Self::PhoneNumber }
    }
}

/// Source of truth for who the current user is.
pub struct SessionStore {
    gateway: Gateway,
    storage: Arc<dyn KeyValueStore>,
    logout_scope: LogoutScope,
}

impl SessionStore {
    /// Build the store and load the persisted session before returning.
    ///
    /// A missing, unreadable or malformed record yields `Unauthenticated`;
    /// this never fails.
    pub fn initialize(gateway: Gateway, storage: Arc<dyn KeyValueStore>, logout_scope: LogoutScope) -> Self {
        let state = match load_persisted(storage.as_ref()) {
            Some(session) => {
                tracing::debug!(username = %session.username, "restored persisted session");
                AuthState::Authenticated(session)
            }
            None => AuthState::Unauthenticated,
        };
        gateway.session().replace(state);
        Self { gateway, storage, logout_scope }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.gateway.session().snapshot()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        match self.state() {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Unauthenticated => None,
        }
    }

    /// True iff a session is held. Says nothing about token validity or expiry.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gateway.session().is_active()
    }

    /// Log in and commit the decoded session.
    ///
    /// # Errors
    ///
    /// Any API, decode or storage failure. The prior session is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let result = auth_api::login(&self.gateway, username, password).await;
        self.finish("login", result).inspect_err(|e| tracing::warn!(error = %e, "login failed"))
    }

    /// Register with an email (identifier contains `@`) or phone number, then
    /// commit the decoded session.
    ///
    /// # Errors
    ///
    /// Any API, decode or storage failure. The prior session is left untouched.
    pub async fn register(&self, username: &str, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let result = match IdentifierKind::classify(identifier) {
            IdentifierKind::Email => auth_api::register_email(&self.gateway, username, identifier, password).await,
            IdentifierKind::PhoneNumber => {
                auth_api::register_phone_number(&self.gateway, username, identifier, password).await
            }
        };
        self.finish("register", result).inspect_err(|e| tracing::warn!(error = %e, "registration failed"))
    }

    /// Drop the session from storage and memory. The caller navigates to the
    /// returned redirect, abandoning whatever was in flight.
    ///
    /// Memory is cleared even when the storage wipe fails.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the store could not be wiped.
    pub fn logout(&self) -> Result<Redirect, AuthError> {
        let wiped = match self.logout_scope {
            LogoutScope::All => self.storage.clear(),
            LogoutScope::SessionOnly => self.storage.remove(SESSION_KEY),
        };
        self.gateway.session().replace(AuthState::Unauthenticated);
        tracing::info!(scope = ?self.logout_scope, "logged out");
        wiped?;
        Ok(Redirect::Login)
    }

    fn finish(&self, op: &str, response: Result<AuthResponse, ApiError>) -> Result<Session, AuthError> {
        let response = response?;
        if response.token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let session = decode_token(&response.token)?;
        self.commit(&session)?;
        tracing::info!(op, username = %session.username, "session committed");
        Ok(session)
    }

    fn commit(&self, session: &Session) -> Result<(), AuthError> {
        let raw = serde_json::to_string(session).map_err(StorageError::from)?;
        self.storage.set(SESSION_KEY, &raw)?;
        self.gateway.session().replace(AuthState::Authenticated(session.clone()));
        Ok(())
    }
}

fn load_persisted(storage: &dyn KeyValueStore) -> Option<Session> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "session storage unreadable; starting logged out");
            return None;
        }
    };
    serde_json::from_str(&raw)
        .inspect_err(|e| tracing::warn!(error = %e, "persisted session malformed; starting logged out"))
        .ok()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
