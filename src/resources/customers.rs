//! Customers.

use serde::{Deserialize, Serialize};

use super::{Deleted, Extra, List, ListParams, Metadata, object_path, to_body};
use crate::engine::{ApiResponse, RequestEngine, RequestOptions};
use crate::error::ApiError;
use crate::time::Sleeper;
use crate::transport::HttpClient;

const PATH: &str = "/customers";

/// A customer object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: String,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Full name
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
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

/// Parameters for creating a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateCustomer {
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller-defined metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreateCustomer {
    /// Parameters with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Parameters for updating a customer. Unset fields are left unchanged.
pub type UpdateCustomer = CreateCustomer;

/// Customer operations bound to an engine.
#[derive(Debug)]
pub struct Customers<'a, H, S> {
    engine: &'a RequestEngine<H, S>,
}

impl<'a, H, S> Customers<'a, H, S> {
    pub(crate) const fn new(engine: &'a RequestEngine<H, S>) -> Self {
        Self { engine }
    }
}

impl<H: HttpClient, S: Sleeper> Customers<'_, H, S> {
    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn create(
        &self,
        params: &CreateCustomer,
        options: RequestOptions,
    ) -> Result<Customer, ApiError> {
        let body = to_body(params)?;
        self.engine
            .post(PATH, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Retrieves a customer by id.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine, or an
    /// `invalid_request_error` for an unusable id.
    pub async fn retrieve(&self, id: &str, options: RequestOptions) -> Result<Customer, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .get(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateCustomer,
        options: RequestOptions,
    ) -> Result<Customer, ApiError> {
        let path = object_path(PATH, id)?;
        let body = to_body(params)?;
        self.engine
            .post(&path, Some(body), options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Deletes a customer.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn delete(&self, id: &str, options: RequestOptions) -> Result<Deleted, ApiError> {
        let path = object_path(PATH, id)?;
        self.engine
            .delete(&path, None, options)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists customers, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] reported by the engine.
    pub async fn list(
        &self,
        params: &ListParams,
        options: RequestOptions,
    ) -> Result<List<Customer>, ApiError> {
        let query = to_body(params)?;
        self.engine
            .get(PATH, Some(query), options)
            .await
            .map(ApiResponse::into_data)
    }
}
