//! Tests for exit statuses and operator hints.

use super::*;
use payments_client::webhook::WebhookError;
use std::path::PathBuf;

mod outcome {
    use super::*;

    #[test]
    fn statuses_are_zero_one_two() {
        assert_eq!(Outcome::Success.status(), 0);
        assert_eq!(Outcome::Usage.status(), 1);
        assert_eq!(Outcome::Rejected.status(), 2);
    }

    #[test]
    fn config_failures_are_usage_errors() {
        let err = RunError::from(ConfigError::InvalidMethod("BREW".to_string()));
        assert_eq!(Outcome::of(&err), Outcome::Usage);
    }

    #[test]
    fn webhook_and_api_failures_are_rejections() {
        let webhook = RunError::from(WebhookError::InvalidSignature);
        let api = RunError::from(payments_client::ApiError::configuration("nope"));

        assert_eq!(Outcome::of(&webhook), Outcome::Rejected);
        assert_eq!(Outcome::of(&api), Outcome::Rejected);
    }
}

mod hints {
    use super::*;

    #[test]
    fn missing_credentials_point_at_init() {
        for name in [field::BASE_URL, field::API_KEY, field::WEBHOOK_SECRET] {
            let err = ConfigError::missing(name, "");
            assert_eq!(config_hint(&err), Some(INIT_HINT), "{name}");
        }
    }

    #[test]
    fn unreadable_toml_points_at_init_but_payload_does_not() {
        let toml = ConfigError::FileRead {
            path: PathBuf::from("payments.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let payload = ConfigError::FileRead {
            path: PathBuf::from("event.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert_eq!(config_hint(&toml), Some(INIT_HINT));
        assert_eq!(config_hint(&payload), None);
    }

    #[test]
    fn bad_key_explains_prefixes() {
        let err = ConfigError::InvalidApiKey {
            reason: "unrecognised prefix",
        };
        assert!(config_hint(&err).unwrap().contains("sk_"));
    }

    #[test]
    fn api_hints_cover_actionable_types() {
        assert!(api_hint(ErrorType::AuthenticationError).is_some());
        assert!(api_hint(ErrorType::NetworkError).is_some());
        assert!(api_hint(ErrorType::CardError).is_none());
    }
}
