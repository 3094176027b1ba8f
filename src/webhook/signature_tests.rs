//! Tests for webhook signatures.

use super::*;

const SECRET: &str = "whsec_test_secret";
const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"charge.succeeded"}"#;

fn config() -> SignatureConfig {
    SignatureConfig::default()
}

mod round_trip {
    use super::*;

    #[test]
    fn generated_signature_verifies() {
        let signature = generate_test_signature(PAYLOAD, SECRET);

        assert!(signature.starts_with("v1="));
        assert!(verify_signature(PAYLOAD, &signature, SECRET, &config()));
    }

    #[test]
    fn any_single_payload_byte_mutation_fails() {
        let signature = generate_test_signature(PAYLOAD, SECRET);

        for i in 0..PAYLOAD.len() {
            let mut mutated = PAYLOAD.to_vec();
            mutated[i] ^= 0x01;
            assert!(
                !verify_signature(&mutated, &signature, SECRET, &config()),
                "byte {i}"
            );
        }
    }

    #[test]
    fn any_single_secret_byte_mutation_fails() {
        let signature = generate_test_signature(PAYLOAD, SECRET);

        for i in 0..SECRET.len() {
            let mut mutated = SECRET.as_bytes().to_vec();
            mutated[i] = if mutated[i] == b'x' { b'y' } else { b'x' };
            let mutated = String::from_utf8(mutated).unwrap();
            assert!(!verify_signature(PAYLOAD, &signature, &mutated, &config()));
        }
    }

    #[test]
    fn signature_is_deterministic() {
        let first = generate_test_signature(PAYLOAD, SECRET);
        let second = generate_test_signature(PAYLOAD, SECRET);

        assert_eq!(first, second);
    }

    #[test]
    fn known_sha256_vector() {
        // RFC 4231 test case 2.
        let signature = generate_test_signature_with(
            "what do ya want for nothing?",
            "Jefe",
            SignatureAlgorithm::Sha256,
            "",
        );

        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn string_and_byte_payloads_agree() {
        let text = std::str::from_utf8(PAYLOAD).unwrap();

        assert_eq!(
            generate_test_signature(text, SECRET),
            generate_test_signature(PAYLOAD, SECRET)
        );
    }
}

mod format {
    use super::*;

    #[test]
    fn missing_prefix_is_rejected() {
        let signature = generate_test_signature(PAYLOAD, SECRET);
        let bare = signature.trim_start_matches("v1=");

        assert!(!verify_signature(PAYLOAD, bare, SECRET, &config()));
    }

    #[test]
    fn custom_prefix_round_trips() {
        let config = config().with_prefix("sha256=");
        let signature =
            generate_test_signature_with(PAYLOAD, SECRET, SignatureAlgorithm::Sha256, "sha256=");

        assert!(verify_signature(PAYLOAD, &signature, SECRET, &config));
        assert!(!verify_signature(
            PAYLOAD,
            &signature,
            SECRET,
            &SignatureConfig::default()
        ));
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let signature = generate_test_signature(PAYLOAD, SECRET);

        assert!(!verify_signature(
            PAYLOAD,
            &signature[..signature.len() - 2],
            SECRET,
            &config()
        ));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        assert!(!verify_signature(PAYLOAD, "v1=not-hex", SECRET, &config()));
        assert!(!verify_signature(PAYLOAD, "", SECRET, &config()));
    }

    #[test]
    fn empty_secret_round_trips() {
        let signature = generate_test_signature(PAYLOAD, "");

        assert!(verify_signature(PAYLOAD, &signature, "", &config()));
        assert!(!verify_signature(PAYLOAD, &signature, SECRET, &config()));
        assert!(!verify_signature(PAYLOAD, "v1=", "", &config()));
    }

    #[test]
    fn empty_secret_and_payload_match_known_digest() {
        assert_eq!(
            generate_test_signature("", ""),
            "v1=b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }
}

mod algorithms {
    use super::*;

    #[test]
    fn digest_lengths_match_algorithm() {
        for (algorithm, hex_len) in [
            (SignatureAlgorithm::Sha256, 64),
            (SignatureAlgorithm::Sha384, 96),
            (SignatureAlgorithm::Sha512, 128),
        ] {
            let signature = generate_test_signature_with(PAYLOAD, SECRET, algorithm, "");
            assert_eq!(signature.len(), hex_len, "{algorithm}");
        }
    }

    #[test]
    fn configured_algorithm_is_used() {
        let config = config().with_algorithm(SignatureAlgorithm::Sha512);
        let signature =
            generate_test_signature_with(PAYLOAD, SECRET, SignatureAlgorithm::Sha512, "v1=");

        assert!(verify_signature(PAYLOAD, &signature, SECRET, &config));
        assert!(!verify_signature(
            PAYLOAD,
            &signature,
            SECRET,
            &SignatureConfig::default()
        ));
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(
            "sha256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha256
        );
        assert_eq!(
            "SHA-512".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha512
        );
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }

    #[test]
    fn default_config_values() {
        let config = SignatureConfig::default();

        assert_eq!(config.algorithm, SignatureAlgorithm::Sha256);
        assert_eq!(config.signature_header, "x-webhook-signature");
        assert_eq!(config.timestamp_header, "x-webhook-timestamp");
        assert_eq!(config.tolerance, 300);
        assert_eq!(config.prefix, "v1=");
    }
}
