//! Payment links.

use serde::{Deserialize, Serialize};

use super::{Extra, LineItem, List, ListParams, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/payment_links";

/// A shareable payment link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Unique identifier
    pub id: String,
    /// Public URL of the link
    pub url: String,
    /// Whether the link accepts payments
    #[serde(default)]
    pub active: bool,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parameters for creating a payment link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatePaymentLink {
    /// Items sold through the link
    pub line_items: Vec<LineItem>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreatePaymentLink {
    /// A link selling the given items.
    #[must_use]
    pub const fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            line_items,
            metadata: None,
        }
    }
}

/// Parameters for updating a payment link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePaymentLink {
    /// Enables or disables the link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Payment link operations bound to an engine.
#[derive(Debug)]
pub struct PaymentLinks<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> PaymentLinks<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> PaymentLinks<'_, H, S> {
    /// Creates a payment link.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreatePaymentLink,
        options: RequestOptions,
    ) -> Result<PaymentLink, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a payment link by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn retrieve(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<PaymentLink, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Updates a payment link.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn update(
        &self,
        id: &str,
        params: &UpdatePaymentLink,
        options: RequestOptions,
    ) -> Result<PaymentLink, ApiError> {
        let path = object_path(PATH, id)?;
        let body = to_body(params)?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists payment links, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn list(
        &self,
        params: &ListParams,
        options: RequestOptions,
    ) -> Result<List<PaymentLink>, ApiError> {
        let query = to_body(params)?;
        self.engine
            .get(PATH, Some(query), options)
            .await
            .map(ApiResponse::into_data)
    }
}
