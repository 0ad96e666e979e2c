use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const SCOPE_READ_FLAGS: &str = "read:flags";
pub const SCOPE_WRITE_FLAGS: &str = "write:flags";

/// Identity record as stored.
///
/// The role stays a raw string here so an unmappable value is detected at
/// scope-derivation time instead of silently defaulting.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Editor,
    Viewer,
}

impl UserRole {
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "editor" => Some(Self::Editor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// Fixed role→scope mapping.
    pub fn scopes(self) -> &'static [&'static str] {
        match self {
            Self::Editor => &[SCOPE_READ_FLAGS, SCOPE_WRITE_FLAGS],
            Self::Viewer => &[SCOPE_READ_FLAGS],
        }
    }
}

// JWT claims. `scopes` stays generic JSON on the validation side; the
// authorization middleware owns the string-typing decision
// (middleware::auth::normalize_scopes).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(UserRole::parse("editor"), Some(UserRole::Editor));
        assert_eq!(UserRole::parse("viewer"), Some(UserRole::Viewer));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse(""), None);
        assert_eq!(UserRole::parse("Editor"), None);
    }

    #[test]
    fn test_role_scopes() {
        assert_eq!(
            UserRole::Editor.scopes(),
            &[SCOPE_READ_FLAGS, SCOPE_WRITE_FLAGS]
        );
        assert_eq!(UserRole::Viewer.scopes(), &[SCOPE_READ_FLAGS]);
    }
}
