//! Charges.

use serde::{Deserialize, Serialize};

use super::{Extra, List, ListParams, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/charges";

/// Lifecycle state of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// The charge completed
    Succeeded,
    /// The charge is being processed
    Pending,
    /// The charge was declined or errored
    Failed,
    /// A status this client does not know
    #[serde(other)]
    Unknown,
}

/// A charge object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Unique identifier
    pub id: String,
    /// Amount in the smallest currency unit
    pub amount: i64,
    /// Three-letter ISO currency code, lowercase
    pub currency: String,
    /// Current state
    pub status: ChargeStatus,
    /// Whether the funds have been captured
    #[serde(default)]
    pub captured: bool,
    /// Whether the charge succeeded
    #[serde(default)]
    pub paid: bool,
    /// Whether the charge has been fully refunded
    #[serde(default)]
    pub refunded: bool,
    /// Customer id, if any
    #[serde(default)]
    pub customer: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Creation time in Unix seconds
    #[serde(default)]
    pub created: Option<i64>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parameters for creating a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCharge {
    /// Amount in the smallest currency unit
    pub amount: i64,
    /// Three-letter ISO currency code
    pub currency: String,
    /// Customer to charge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Payment source token or id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `false` authorizes only; capture later with [`Charges::capture`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreateCharge {
    /// Charge for `amount` in `currency`.
    #[must_use]
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            customer: None,
            source: None,
            description: None,
            capture: None,
            metadata: None,
        }
    }

    /// Charges the given customer.
    #[must_use]
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// Authorizes without capturing.
    #[must_use]
    pub const fn authorize_only(mut self) -> Self {
        self.capture = Some(false);
        self
    }
}

/// Parameters for updating a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateCharge {
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Associates the charge with a customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Parameters for capturing an authorized charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureCharge {
    /// Amount to capture; the full authorization when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

/// Charge operations bound to an engine.
#[derive(Debug)]
pub struct Charges<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> Charges<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> Charges<'_, H, S> {
    /// Creates a charge.
    ///
    /// Pass an idempotency key in `options` to make the call retryable.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreateCharge,
        options: RequestOptions,
    ) -> Result<Charge, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a charge by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn retrieve(&self, id: &str, options: RequestOptions) -> Result<Charge, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Updates a charge.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateCharge,
        options: RequestOptions,
    ) -> Result<Charge, ApiError> {
        let path = object_path(PATH, id)?;
        let body = to_body(params)?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Captures an authorized charge.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn capture(
        &self,
        id: &str,
        params: &CaptureCharge,
        options: RequestOptions,
    ) -> Result<Charge, ApiError> {
        let path = format!("{}/capture", object_path(PATH, id)?);
        let body = to_body(params)?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists charges, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn list(
        &self,
        params: &ListParams,
        options: RequestOptions,
    ) -> Result<List<Charge>, ApiError> {
        let query = to_body(params)?;
        self.engine
            .get(PATH, Some(query), options)
            .await
            .map(ApiResponse::into_data)
    }
}
