//! Payment sources.
//!
//! Sources can be created with a publishable key, so this is the one
//! resource a `pk_` engine is expected to call.

use serde::{Deserialize, Serialize};

use super::{Extra, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/sources";
const CUSTOMERS: &str = "/customers";

/// A payment source object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier
    pub id: String,
    /// Kind of source, e.g. `card` or `sepa_debit`
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    /// `pending`, `chargeable`, `consumed`, `canceled` or `failed`
    #[serde(default)]
    pub status: Option<String>,
    /// `reusable` or `single_use`
    #[serde(default)]
    pub usage: Option<String>,
    /// Amount in the smallest currency unit, for single-use sources
    #[serde(default)]
    pub amount: Option<i64>,
    /// Three-letter ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Customer the source is attached to, if any
    #[serde(default)]
    pub customer: Option<String>,
    /// Secret handed to the browser to complete the flow
    #[serde(default)]
    pub client_secret: Option<String>,
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

/// Parameters for creating a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSource {
    /// Kind of source
    #[serde(rename = "type")]
    pub source_type: String,
    /// Token produced by the hosted card form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Amount for single-use sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Three-letter ISO currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// `reusable` or `single_use`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreateSource {
    /// A source of the given type.
    #[must_use]
    pub fn new(source_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            token: None,
            amount: None,
            currency: None,
            usage: None,
            metadata: None,
        }
    }

    /// Builds the source from a card-form token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fixes the amount and currency.
    #[must_use]
    pub fn with_amount(mut self, amount: i64, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }
}

/// Parameters for updating a source. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSource {
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Serialize)]
struct AttachSource<'a> {
    source: &'a str,
}

/// Source operations bound to an engine.
#[derive(Debug)]
pub struct Sources<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> Sources<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> Sources<'_, H, S> {
    /// Creates a source.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreateSource,
        options: RequestOptions,
    ) -> Result<Source, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a source by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine, or an
    /// `invalid_request_error` for an unusable id.
    pub async fn retrieve(&self, id: &str, options: RequestOptions) -> Result<Source, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Updates a source's metadata.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateSource,
        options: RequestOptions,
    ) -> Result<Source, ApiError> {
        let path = object_path(PATH, id)?;
        let body = to_body(params)?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Attaches a source to a customer.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn attach(
        &self,
        customer: &str,
        id: &str,
        options: RequestOptions,
    ) -> Result<Source, ApiError> {
        object_path(PATH, id)?;
        let path = format!("{}/sources", object_path(CUSTOMERS, customer)?);
        let body = to_body(&AttachSource { source: id })?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Detaches a source from a customer.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn detach(
        &self,
        customer: &str,
        id: &str,
        options: RequestOptions,
    ) -> Result<Source, ApiError> {
        let sources = format!("{}/sources", object_path(CUSTOMERS, customer)?);
        let path = object_path(&sources, id)?;
        self.engine
            .delete(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }
}
