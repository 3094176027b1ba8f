//! Payment requests: an amount owed, payable through a hosted page.

use serde::{Deserialize, Serialize};

use super::{Extra, List, ListParams, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/payment_requests";

/// A payment request object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Unique identifier
    pub id: String,
    /// Amount in the smallest currency unit
    #[serde(default)]
    pub amount: Option<i64>,
    /// Three-letter ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// `open`, `paid`, `canceled` or `expired`
    #[serde(default)]
    pub status: Option<String>,
    /// Shown to the payer
    #[serde(default)]
    pub description: Option<String>,
    /// Customer being asked to pay, if any
    #[serde(default)]
    pub customer: Option<String>,
    /// Hosted payment page
    #[serde(default)]
    pub url: Option<String>,
    /// Expiry time in Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Creation time in Unix seconds
    #[serde(default)]
    pub created: Option<i64>,
    /// Whether the object exists in live mode
    #[serde(default)]
    pub livemode: bool,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parameters for creating a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePaymentRequest {
    /// Amount in the smallest currency unit
    pub amount: i64,
    /// Three-letter ISO currency code
    pub currency: String,
    /// Shown to the payer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Customer being asked to pay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Expiry time in Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreatePaymentRequest {
    /// A request for `amount` in `currency`.
    #[must_use]
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            description: None,
            customer: None,
            expires_at: None,
            metadata: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Addresses the request to a customer.
    #[must_use]
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }
}

/// Payment request operations bound to an engine.
#[derive(Debug)]
pub struct PaymentRequests<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> PaymentRequests<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> PaymentRequests<'_, H, S> {
    /// Creates a payment request.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreatePaymentRequest,
        options: RequestOptions,
    ) -> Result<PaymentRequest, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a payment request by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine, or an
    /// `invalid_request_error` for an unusable id.
    pub async fn retrieve(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<PaymentRequest, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Cancels an open payment request.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn cancel(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<PaymentRequest, ApiError> {
        let path = format!("{}/cancel", object_path(PATH, id)?);
        self.engine
            .post(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists payment requests, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn list(
        &self,
        params: &ListParams,
        options: RequestOptions,
    ) -> Result<List<PaymentRequest>, ApiError> {
        let query = to_body(params)?;
        self.engine
            .get(PATH, Some(query), options)
            .await
            .map(ApiResponse::into_data)
    }
}
