//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_request_command() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "request",
            "POST",
            "/customers",
            "--data",
            r#"{"email":"a@b.com"}"#,
            "--idempotency-key",
            "order-1",
        ]);

        match cli.command {
            Command::Request {
                method,
                path,
                data,
                idempotency_key,
                expand,
                no_retry,
            } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/customers");
                assert_eq!(data.as_deref(), Some(r#"{"email":"a@b.com"}"#));
                assert_eq!(idempotency_key.as_deref(), Some("order-1"));
                assert!(expand.is_empty());
                assert!(!no_retry);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_repeated_expand_and_no_retry() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "request",
            "GET",
            "/charges/ch_1",
            "--expand",
            "customer",
            "--expand",
            "invoice",
            "--no-retry",
        ]);

        let Command::Request {
            expand, no_retry, ..
        } = cli.command
        else {
            panic!("expected request command");
        };
        assert_eq!(expand, vec!["customer", "invoice"]);
        assert!(no_retry);
    }

    #[test]
    fn parse_client_options() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "--base-url",
            "https://api.example.com",
            "--api-version",
            "v2",
            "--timeout",
            "5000",
            "--max-retries",
            "5",
            "--retry-delay",
            "250",
            "--debug",
            "request",
            "GET",
            "/customers",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(cli.api_version.as_deref(), Some("v2"));
        assert_eq!(cli.timeout_ms, Some(5000));
        assert_eq!(cli.max_retries, Some(5));
        assert_eq!(cli.retry_delay_ms, Some(250));
        assert!(cli.debug);
    }

    #[test]
    fn global_options_accepted_after_subcommand() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "request",
            "GET",
            "/customers",
            "--base-url",
            "https://api.example.com",
            "-v",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("https://api.example.com"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_verify_webhook_command() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "verify-webhook",
            "--payload",
            "event.json",
            "--signature",
            "v1=abc",
            "--timestamp",
            "1700000000",
            "--tolerance",
            "60",
            "--algorithm",
            "sha512",
        ]);

        assert_eq!(cli.tolerance, Some(60));
        assert_eq!(cli.algorithm.as_deref(), Some("sha512"));
        match cli.command {
            Command::VerifyWebhook {
                payload,
                signature,
                timestamp,
            } => {
                assert_eq!(payload, PathBuf::from("event.json"));
                assert_eq!(signature, "v1=abc");
                assert_eq!(timestamp.as_deref(), Some("1700000000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_sign_command() {
        let cli = Cli::parse_from_iter(["payments-client", "sign", "--payload", "event.json"]);

        assert!(matches!(cli.command, Command::Sign { ref payload } if payload.as_os_str() == "event.json"));
        assert!(!cli.needs_client());
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from_iter([
            "payments-client",
            "-c",
            "/etc/payments.toml",
            "sign",
            "--payload",
            "p.json",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/etc/payments.toml")));
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        let result = <Cli as clap::Parser>::try_parse_from(["payments-client"]);
        assert!(result.is_err());
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let result = <Cli as clap::Parser>::try_parse_from([
            "payments-client",
            "--timeout",
            "soon",
            "request",
            "GET",
            "/x",
        ]);
        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["payments-client", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Command::Init { output } => {
                assert_eq!(output, PathBuf::from("payments-client.toml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn init_with_custom_output() {
        let cli = Cli::parse_from_iter(["payments-client", "init", "-o", "custom.toml"]);

        let Command::Init { output } = cli.command else {
            panic!("expected init command");
        };
        assert_eq!(output, PathBuf::from("custom.toml"));
    }

    #[test]
    fn request_is_not_init() {
        let cli = Cli::parse_from_iter(["payments-client", "request", "GET", "/customers"]);

        assert!(!cli.is_init());
        assert!(cli.needs_client());
    }
}
