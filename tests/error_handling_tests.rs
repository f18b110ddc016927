//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors map to the right HTTP status codes and error codes
//! - Error responses carry the expected JSON body
//! - `validator` failures convert into field-level details

use axum::http::StatusCode;
use axum::response::IntoResponse;
use blogflow::core::error::{AuthError, ConfigError, EntityError, StorageError, ValidationError};
use blogflow::prelude::*;
use validator::Validate;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_errors() {
        assert_eq!(BlogError::not_found("post", "1").status_code(), StatusCode::NOT_FOUND);

        let err = BlogError::Entity(EntityError::AlreadyExists {
            entity_type: "post".into(),
            id: "1".into(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_auth_errors() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AuthError::Forbidden {
                    required: "admin".into(),
                },
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (AuthError::Duplicate, StatusCode::CONFLICT, "ALREADY_REGISTERED"),
        ];
        for (err, status, code) in cases {
            let err = BlogError::from(err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn test_server_side_errors_are_500() {
        let errors = [
            BlogError::from(StorageError::Backend("disk full".into())),
            BlogError::from(ConfigError::InvalidValue {
                field: "port".into(),
                message: "bad".into(),
            }),
            BlogError::Internal("boom".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_into_response_body() {
        let response = BlogError::not_found("user", "42").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
        assert_eq!(body["message"], "user not found: 42");
        assert_eq!(body["details"]["id"], "42");
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let response = BlogError::from(AuthError::Unauthenticated).to_response();
        assert!(response.details.is_none());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn test_validator_errors_become_field_errors() {
        let signup = Signup {
            email: "nope".into(),
            name: "x".into(),
        };
        let err: BlogError = signup.validate().unwrap_err().into();

        match &err {
            BlogError::Validation(ValidationError::FieldErrors(fields)) => {
                assert_eq!(fields["email"], vec!["must be a valid email".to_string()]);
                assert_eq!(fields["name"], vec!["length".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_yaml_error_becomes_config_error() {
        let err = AppConfig::from_yaml_str("server: [").unwrap_err();
        assert!(matches!(err, BlogError::Config(ConfigError::Parse(_))));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_error_matching() {
        let err = BlogError::not_found("post", "7");
        match err {
            BlogError::Entity(EntityError::NotFound { entity_type, id }) => {
                assert_eq!(entity_type, "post");
                assert_eq!(id, "7");
            }
            _ => panic!("expected NotFound"),
        }
    }
}
