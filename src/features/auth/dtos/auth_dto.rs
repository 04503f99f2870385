use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::User;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(rename = "displayName")]
    #[validate(length(max = 120, message = "Display name must be at most 120 characters"))]
    pub display_name: Option<String>,
}

/// Request DTO for user login. Same shape validation as registration.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Public view of a user, as returned from register/login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Signed bearer token
    pub token: String,
    pub user: AuthUserDto,
}

impl AuthResponseDto {
    pub fn new(token: String, user: User) -> Self {
        Self {
            token,
            user: AuthUserDto {
                id: user.id,
                email: user.email,
                role: user.role,
                display_name: user.display_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(email: &str, password: &str, display_name: Option<&str>) -> RegisterRequestDto {
        RegisterRequestDto {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.map(String::from),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register("ops@example.com", "longenough", Some("Site Ops"))
            .validate()
            .is_ok());
    }

    #[test]
    fn malformed_email_fails() {
        assert!(register("not-an-email", "longenough", None)
            .validate()
            .is_err());
    }

    #[test]
    fn short_password_fails() {
        assert!(register("ops@example.com", "short", None).validate().is_err());
    }

    #[test]
    fn oversized_display_name_fails() {
        let long = "x".repeat(121);
        assert!(register("ops@example.com", "longenough", Some(long.as_str()))
            .validate()
            .is_err());
    }

    #[test]
    fn user_view_serializes_display_name_camel_case() {
        let dto = AuthUserDto {
            id: Uuid::nil(),
            email: "ops@example.com".to_string(),
            role: "reporter".to_string(),
            display_name: Some("Site Ops".to_string()),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["displayName"], "Site Ops");
        assert!(json.get("display_name").is_none());
    }
}
