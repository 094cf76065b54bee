//! Authentication extractors for the console.
//!
//! Authentication itself lives in the fronting identity-aware gateway; by
//! the time a request reaches this service the gateway has verified the
//! session and attached the acting user as trusted headers. This module
//! only reads that identity and exposes the role as a capability predicate.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use estancia_core::UserId;

use crate::error::AppError;

/// Header carrying the acting user's ID, set by the gateway.
pub const USER_ID_HEADER: &str = "x-estancia-user-id";
/// Header carrying the acting user's role, set by the gateway.
pub const USER_ROLE_HEADER: &str = "x-estancia-user-role";

/// Role of a console user, computed by the external auth system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleRole {
    /// Full access, including configuration.
    Admin,
    /// Day-to-day operations: partes diarios, reclassification.
    Operator,
    /// Read-only access.
    Viewer,
}

impl ConsoleRole {
    /// Whether this role may submit or undo reclassification batches.
    #[must_use]
    pub const fn can_reclassify(self) -> bool {
        matches!(self, Self::Admin | Self::Operator)
    }
}

impl std::str::FromStr for ConsoleRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            "viewer" => Ok(Self::Viewer),
            _ => Err(()),
        }
    }
}

/// The authenticated user attached to the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// User ID.
    pub id: UserId,
    /// Role as computed by the auth system.
    pub role: ConsoleRole,
}

impl CurrentUser {
    /// Gate for mutating reclassification endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when the role lacks the capability.
    pub fn require_reclassify(&self) -> Result<(), AppError> {
        if self.role.can_reclassify() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "role does not permit reclassification".to_string(),
            ))
        }
    }
}

/// Extractor that requires an authenticated console user.
///
/// Rejects with 401 when the gateway headers are absent or malformed.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("acting user: {}", user.id)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Rejection returned when the gateway identity headers are missing.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, USER_ID_HEADER)
            .and_then(|v| v.parse::<i32>().ok())
            .map(UserId::new)
            .ok_or(AuthRejection)?;

        let role = header_value(parts, USER_ROLE_HEADER)
            .and_then(|v| v.parse::<ConsoleRole>().ok())
            .ok_or(AuthRejection)?;

        Ok(Self(CurrentUser { id, role }))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
