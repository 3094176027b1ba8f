//! Tests for `RequestEngine`.

use super::*;
use crate::config::ClientConfig;
use crate::error::ErrorType;
use crate::time::Sleeper;
use crate::transport::{ConnectionCode, HttpClient, HttpRequest, HttpResponse, TransportError};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        })
    }

    fn ok(body: &str) -> Arc<Self> {
        Self::new(vec![respond(200, body)])
    }

    fn repeat(status: u16, times: usize) -> Arc<Self> {
        Self::new((0..times).map(|_| respond(status, "")).collect())
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last_request(&self) -> HttpRequest {
        self.captured_requests().pop().unwrap()
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(TransportError::InvalidUrl("mock exhausted".to_string()));
        }
        responses.remove(0)
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Debug, Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for Arc<RecordingSleeper> {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

type TestEngine = RequestEngine<Arc<MockClient>, Arc<RecordingSleeper>>;

fn respond(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(
        StatusCode::from_u16(status).unwrap(),
        HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

fn refused() -> Result<HttpResponse, TransportError> {
    Err(TransportError::connection(
        ConnectionCode::ConnectionRefused,
        std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
    ))
}

fn test_config() -> ClientConfig {
    ClientConfig::new(Url::parse("https://api.example.com").unwrap())
        .with_api_version("v2")
        .with_retry_delay(Duration::from_millis(100))
}

fn engine(client: &Arc<MockClient>) -> (TestEngine, Arc<RecordingSleeper>) {
    engine_with(client, test_config())
}

fn engine_with(client: &Arc<MockClient>, config: ClientConfig) -> (TestEngine, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let engine = RequestEngine::with_client(Arc::clone(client), config, "sk_test_123")
        .unwrap()
        .with_sleeper(Arc::clone(&sleeper));
    (engine, sleeper)
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request.header(name)
}

mod construction {
    use super::*;

    #[test]
    fn new_validates_config_eagerly() {
        let config = test_config().with_timeout(Duration::ZERO);
        let err = RequestEngine::new(config, "sk_test_123").unwrap_err();

        assert_eq!(err.error_type(), ErrorType::ConfigurationError);
    }

    #[test]
    fn new_rejects_unprefixed_key() {
        let err = RequestEngine::new(test_config(), "secret").unwrap_err();

        assert_eq!(err.error_type(), ErrorType::ConfigurationError);
        assert!(err.message().contains("sk_"));
    }

    #[test]
    fn retry_policy_follows_config() {
        let client = MockClient::new(vec![]);
        let (engine, _) = engine_with(&client, test_config().with_max_retries(5));

        assert_eq!(engine.retry_policy().max_retries, 5);
        assert_eq!(engine.retry_policy().base_delay, Duration::from_millis(100));
    }

    #[test]
    fn debug_starts_from_config() {
        let client = MockClient::new(vec![]);
        let (engine, _) = engine_with(&client, test_config().with_debug(true));

        assert!(engine.is_debug());
        engine.set_debug(false);
        assert!(!engine.is_debug());
    }

    #[test]
    fn engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequestEngine>();
        assert_send_sync::<TestEngine>();
    }
}

mod request_shape {
    use super::*;

    #[tokio::test]
    async fn post_customer_end_to_end() {
        let client = MockClient::ok(r#"{"id":"cus_1","email":"a@b.com"}"#);
        let (engine, _) = engine(&client);

        let response = engine
            .post::<Value>(
                "/customers",
                Some(json!({"email": "a@b.com"})),
                RequestOptions::new(),
            )
            .await
            .unwrap();

        let request = client.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "https://api.example.com/v2/customers");
        // base64("sk_test_123:")
        assert_eq!(
            header(&request, "authorization"),
            Some("Basic c2tfdGVzdF8xMjM6")
        );
        assert_eq!(header(&request, "content-type"), Some("application/json"));
        assert_eq!(request.body_text(), Some(r#"{"email":"a@b.com"}"#));
        assert_eq!(response.data["id"], "cus_1");
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn standard_headers_are_sent() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap();

        let request = client.last_request();
        assert_eq!(header(&request, "accept"), Some("application/json"));
        assert_eq!(header(&request, CLIENT_VERSION_HEADER), Some(CLIENT_VERSION));
        assert!(CLIENT_VERSION.starts_with("payments-client/"));
        assert!(request.headers.get("content-type").is_none());
        assert!(request.body.is_none());
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn path_is_normalised() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .get::<Value>("customers/cus_1", None, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(
            client.last_request().url.as_str(),
            "https://api.example.com/v2/customers/cus_1"
        );
    }

    #[tokio::test]
    async fn get_body_becomes_query() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .get::<Value>(
                "/customers",
                Some(json!({"limit": 3, "starting_after": null, "email": "a@b.com"})),
                RequestOptions::new(),
            )
            .await
            .unwrap();

        let request = client.last_request();
        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("limit".to_string(), "3".to_string())));
        assert!(pairs.contains(&("email".to_string(), "a@b.com".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "starting_after"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn delete_params_become_query() {
        let client = MockClient::ok(r#"{"id":"cus_1","deleted":true}"#);
        let (engine, _) = engine(&client);

        engine
            .delete::<Value>(
                "/customers/cus_1",
                Some(json!({"reason": "dup"})),
                RequestOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(client.last_request().url.query(), Some("reason=dup"));
    }

    #[tokio::test]
    async fn expand_adds_repeated_parameters() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .post::<Value>(
                "/charges",
                Some(json!({"amount": 100})),
                RequestOptions::new()
                    .with_expand("customer")
                    .with_expand("invoice"),
            )
            .await
            .unwrap();

        let request = client.last_request();
        let expanded: Vec<String> = request
            .url
            .query_pairs()
            .filter(|(k, _)| k == "expand[]")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(expanded, vec!["customer", "invoice"]);
        assert_eq!(request.body_text(), Some(r#"{"amount":100}"#));
    }

    #[tokio::test]
    async fn base_url_override_replaces_root() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .get::<Value>(
                "/files/f_1",
                None,
                RequestOptions::new().with_base_url(Url::parse("https://files.example.com/").unwrap()),
            )
            .await
            .unwrap();

        assert_eq!(
            client.last_request().url.as_str(),
            "https://files.example.com/files/f_1"
        );
    }

    #[tokio::test]
    async fn override_headers_and_timeout_apply() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        engine
            .get::<Value>(
                "/charges",
                None,
                RequestOptions::new()
                    .with_header(
                        http::header::ACCEPT,
                        HeaderValue::from_static("application/vnd.example+json"),
                    )
                    .with_timeout(Duration::from_secs(5)),
            )
            .await
            .unwrap();

        let request = client.last_request();
        assert_eq!(
            header(&request, "accept"),
            Some("application/vnd.example+json")
        );
        assert_eq!(request.headers.get_all("accept").iter().count(), 1);
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn invalid_idempotency_key_is_configuration_error() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);

        let err = engine
            .post::<Value>(
                "/charges",
                None,
                RequestOptions::new().with_idempotency_key("bad\nkey"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), ErrorType::ConfigurationError);
        assert_eq!(client.calls(), 0);
    }
}

mod retries {
    use super::*;

    #[tokio::test]
    async fn retry_ceiling_on_repeated_503() {
        let client = MockClient::repeat(503, 4);
        let (engine, sleeper) = engine(&client);

        let err = engine
            .get::<Value>("/customers", None, RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 4);
        assert_eq!(sleeper.delays().len(), 3);
        assert_eq!(err.error_type(), ErrorType::ApiError);
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn post_without_idempotency_key_is_not_retried() {
        let client = MockClient::repeat(503, 4);
        let (engine, sleeper) = engine(&client);

        let err = engine
            .post::<Value>("/charges", Some(json!({"amount": 1})), RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
        assert_eq!(err.error_type(), ErrorType::ApiError);
    }

    #[tokio::test]
    async fn post_with_idempotency_key_reuses_key_on_every_attempt() {
        let client = MockClient::repeat(503, 4);
        let (engine, _) = engine(&client);

        let result = engine
            .post::<Value>(
                "/charges",
                Some(json!({"amount": 1})),
                RequestOptions::new().with_idempotency_key("key-123"),
            )
            .await;

        assert!(result.is_err());
        let requests = client.captured_requests();
        assert_eq!(requests.len(), 4);
        for request in &requests {
            assert_eq!(header(request, IDEMPOTENCY_KEY_HEADER), Some("key-123"));
        }
    }

    #[tokio::test]
    async fn patch_without_idempotency_key_is_not_retried() {
        let client = MockClient::repeat(503, 4);
        let (engine, _) = engine(&client);

        let _ = engine
            .patch::<Value>("/customers/cus_1", Some(json!({})), RequestOptions::new())
            .await;

        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn validation_error_is_not_retried() {
        let client = MockClient::new(vec![respond(
            422,
            r#"{"error":{"message":"email is invalid","param":"email"}}"#,
        )]);
        let (engine, sleeper) = engine(&client);

        let err = engine
            .put::<Value>("/customers/cus_1", Some(json!({"email": "x"})), RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
        assert_eq!(err.error_type(), ErrorType::ValidationError);
        assert_eq!(err.param(), Some("email"));
        assert!(err.is_validation_error());
    }

    #[tokio::test]
    async fn rate_limit_then_success() {
        let client = MockClient::new(vec![respond(429, ""), respond(200, r#"{"ok":true}"#)]);
        let (engine, sleeper) = engine(&client);

        let response = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(client.calls(), 2);
        assert_eq!(sleeper.delays().len(), 1);
        assert_eq!(response.data["ok"], true);
    }

    #[tokio::test]
    async fn transient_transport_failures_are_retried() {
        let client = MockClient::new(vec![
            refused(),
            Err(TransportError::Timeout),
            respond(200, "{}"),
        ]);
        let (engine, _) = engine(&client);

        let result = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await;

        assert!(result.is_ok());
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn broken_pipe_is_not_retried() {
        let client = MockClient::new(vec![Err(TransportError::connection(
            ConnectionCode::BrokenPipe,
            std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        ))]);
        let (engine, _) = engine(&client);

        let err = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 1);
        assert_eq!(err.error_type(), ErrorType::NetworkError);
        assert_eq!(err.code(), Some("EPIPE"));
    }

    #[tokio::test]
    async fn exhausted_timeouts_surface_timeout_error() {
        let client = MockClient::new((0..4).map(|_| Err(TransportError::Timeout)).collect());
        let (engine, _) = engine(&client);

        let err = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 4);
        assert_eq!(err.error_type(), ErrorType::TimeoutError);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn last_failure_is_surfaced() {
        let client = MockClient::new(vec![refused(), respond(500, r#"{"message":"boom"}"#)]);
        let (engine, _) = engine_with(&client, test_config().with_max_retries(1));

        let err = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.message(), "boom");
    }

    #[tokio::test]
    async fn explicit_non_retryable_call_is_not_retried() {
        let client = MockClient::repeat(503, 4);
        let (engine, _) = engine(&client);

        let _ = engine
            .get::<Value>("/charges", None, RequestOptions::new().with_retryable(false))
            .await;

        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn zero_max_retries_makes_one_attempt() {
        let client = MockClient::repeat(503, 2);
        let (engine, _) = engine_with(&client, test_config().with_max_retries(0));

        let _ = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await;

        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn backoff_delays_grow_exponentially_with_bounded_jitter() {
        let client = MockClient::repeat(503, 4);
        let (engine, sleeper) = engine(&client);

        let _ = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await;

        let delays = sleeper.delays();
        let expected = [100u64, 200, 400];
        assert_eq!(delays.len(), expected.len());
        for (delay, base) in delays.iter().zip(expected) {
            let base = Duration::from_millis(base);
            assert!(*delay >= base, "{delay:?} < {base:?}");
            assert!(*delay <= base.mul_f64(1.1), "{delay:?} too large");
        }
    }
}

mod responses {
    use super::*;

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let client = MockClient::new(vec![respond(204, "")]);
        let (engine, _) = engine(&client);

        let response = engine
            .delete::<Value>("/customers/cus_1", None, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.data, Value::Null);
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn request_id_is_surfaced() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req_42"));
        let client = MockClient::new(vec![Ok(HttpResponse::new(
            StatusCode::OK,
            headers,
            b"{}".to_vec(),
        ))]);
        let (engine, _) = engine(&client);

        let response = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.request_id.as_deref(), Some("req_42"));
        assert_eq!(response.headers.get("x-request-id").unwrap(), "req_42");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_api_error() {
        let client = MockClient::ok("not json");
        let (engine, _) = engine(&client);

        let err = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), ErrorType::ApiError);
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn typed_decoding() {
        #[derive(Debug, serde::Deserialize)]
        struct Customer {
            id: String,
        }

        let client = MockClient::ok(r#"{"id":"cus_9","object":"customer"}"#);
        let (engine, _) = engine(&client);

        let customer = engine
            .get::<Customer>("/customers/cus_9", None, RequestOptions::new())
            .await
            .unwrap()
            .into_data();

        assert_eq!(customer.id, "cus_9");
    }

    #[tokio::test]
    async fn card_error_details_are_preserved() {
        let client = MockClient::new(vec![respond(
            402,
            r#"{"error":{"type":"card_error","message":"Your card was declined.","code":"card_declined","decline_code":"insufficient_funds","charge_id":"ch_1"}}"#,
        )]);
        let (engine, _) = engine(&client);

        let err = engine
            .post::<Value>("/charges", Some(json!({"amount": 1})), RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), ErrorType::CardError);
        assert_eq!(err.code(), Some("card_declined"));
        assert_eq!(err.decline_code(), Some("insufficient_funds"));
        assert_eq!(err.charge_id(), Some("ch_1"));
        assert!(!err.is_retryable());
    }
}

mod credentials {
    use super::*;

    #[tokio::test]
    async fn set_api_key_affects_later_requests() {
        let client = MockClient::new(vec![respond(200, "{}"), respond(200, "{}")]);
        let (engine, _) = engine(&client);

        engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap();
        engine.set_api_key("pk_live_999").unwrap();
        engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await
            .unwrap();

        let requests = client.captured_requests();
        assert_ne!(
            requests[0].headers.get("authorization"),
            requests[1].headers.get("authorization")
        );
        assert_eq!(engine.key_kind(), KeyKind::Public);
        assert_eq!(engine.api_key().expose(), "pk_live_999");
    }

    #[test]
    fn invalid_key_is_rejected_and_previous_kept() {
        let client = MockClient::new(vec![]);
        let (engine, _) = engine(&client);

        let err = engine.set_api_key("").unwrap_err();

        assert_eq!(err.error_type(), ErrorType::ConfigurationError);
        assert_eq!(engine.api_key().expose(), "sk_test_123");
        assert_eq!(engine.key_kind(), KeyKind::Secret);
    }

    #[test]
    fn engines_do_not_share_credentials() {
        let client = MockClient::new(vec![]);
        let (first, _) = engine(&client);
        let (second, _) = engine(&client);

        first.set_api_key("sk_live_other").unwrap();

        assert_eq!(second.api_key().expose(), "sk_test_123");
    }
}

mod redaction {
    use super::*;

    #[test]
    fn credentials_and_cookies_are_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        headers.insert("cookie", HeaderValue::from_static("session=1"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let shown = redact_headers(&headers);

        assert!(shown.contains(&("authorization".to_string(), REDACTED.to_string())));
        assert!(shown.contains(&("cookie".to_string(), REDACTED.to_string())));
        assert!(shown.contains(&("accept".to_string(), "application/json".to_string())));
    }

    #[test]
    fn sensitive_values_are_redacted() {
        let mut value = HeaderValue::from_static("secret");
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-custom", value);

        assert_eq!(
            redact_headers(&headers),
            vec![("x-custom".to_string(), REDACTED.to_string())]
        );
    }

    #[tokio::test]
    async fn debug_mode_still_sends_requests() {
        let client = MockClient::ok("{}");
        let (engine, _) = engine(&client);
        engine.set_debug(true);

        let result = engine
            .get::<Value>("/charges", None, RequestOptions::new())
            .await;

        assert!(result.is_ok());
    }
}
