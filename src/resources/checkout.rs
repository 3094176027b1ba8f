//! Checkout sessions.

use serde::{Deserialize, Serialize};

use super::{Extra, List, ListParams, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/checkout/sessions";

/// One purchasable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Price id
    pub price: String,
    /// Units to buy
    pub quantity: u32,
}

impl LineItem {
    /// `quantity` units of `price`.
    #[must_use]
    pub fn new(price: impl Into<String>, quantity: u32) -> Self {
        Self {
            price: price.into(),
            quantity,
        }
    }
}

/// A hosted checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Unique identifier
    pub id: String,
    /// Hosted page to redirect the buyer to
    #[serde(default)]
    pub url: Option<String>,
    /// `open`, `complete` or `expired`
    #[serde(default)]
    pub status: Option<String>,
    /// `payment`, `setup` or `subscription`
    #[serde(default)]
    pub mode: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Customer id, if any
    #[serde(default)]
    pub customer: Option<String>,
    /// Total in the smallest currency unit
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Three-letter ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Where the buyer lands after paying
    #[serde(default)]
    pub success_url: Option<String>,
    /// Where the buyer lands after cancelling
    #[serde(default)]
    pub cancel_url: Option<String>,
    /// Expiry time in Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parameters for creating a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCheckoutSession {
    /// `payment`, `setup` or `subscription`
    pub mode: String,
    /// Where the buyer lands after paying
    pub success_url: String,
    /// Where the buyer lands after cancelling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    /// Items to buy
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
    /// Existing customer to attach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Prefills the email field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreateCheckoutSession {
    /// A one-off payment session.
    #[must_use]
    pub fn payment(success_url: impl Into<String>) -> Self {
        Self {
            mode: "payment".to_string(),
            success_url: success_url.into(),
            cancel_url: None,
            line_items: Vec::new(),
            customer: None,
            customer_email: None,
            metadata: None,
        }
    }

    /// Adds a line item.
    #[must_use]
    pub fn with_line_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }
}

/// Checkout session operations bound to an engine.
#[derive(Debug)]
pub struct CheckoutSessions<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> CheckoutSessions<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> CheckoutSessions<'_, H, S> {
    /// Creates a checkout session.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreateCheckoutSession,
        options: RequestOptions,
    ) -> Result<CheckoutSession, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a session by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn retrieve(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<CheckoutSession, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Expires an open session so it can no longer be paid.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn expire(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<CheckoutSession, ApiError> {
        let path = format!("{}/expire", object_path(PATH, id)?);
        self.engine
            .post(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists sessions, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn list(
        &self,
        params: &ListParams,
        options: RequestOptions,
    ) -> Result<List<CheckoutSession>, ApiError> {
        let query = to_body(params)?;
        self.engine
            .get(PATH, Some(query), options)
            .await
            .map(ApiResponse::into_data)
    }
}
