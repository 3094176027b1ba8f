//! Typed wrappers over the request engine.
//!
//! Each resource borrows an engine and maps its operations to paths:
//! - [`Customers`]: `/customers`
//! - [`Charges`]: `/charges`
//! - [`CheckoutSessions`]: `/checkout/sessions`
//! - [`PaymentLinks`]: `/payment_links`
//! - [`PaymentRequests`]: `/payment_requests`
//! - [`Sources`]: `/sources`, attached under `/customers/{id}/sources`
//!
//! Objects keep fields they do not model in an `extra` map, so nothing the
//! API returns is lost.

mod charges;
mod checkout;
mod customers;
mod payment_links;
mod payment_requests;
mod sources;


pub use charges::{CaptureCharge, Charge, ChargeStatus, Charges, CreateCharge, UpdateCharge};
pub use checkout::{CheckoutSession, CheckoutSessions, CreateCheckoutSession, LineItem};
pub use customers::{CreateCustomer, Customer, Customers, UpdateCustomer};
pub use payment_links::{CreatePaymentLink, PaymentLink, PaymentLinks, UpdatePaymentLink};
pub use payment_requests::{CreatePaymentRequest, PaymentRequest, PaymentRequests};
pub use sources::{CreateSource, Source, Sources, UpdateSource};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::RequestEngine;
use crate::error::{ApiError, ErrorType};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Whether more items follow
    #[serde(default)]
    pub has_more: bool,
    /// Path of the list endpoint
    #[serde(default)]
    pub url: String,
}

impl<T> List<T> {
    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Paging parameters passed through to list endpoints.
///
/// The cursors are opaque object ids; no traversal is done client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Return items after this id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    /// Return items before this id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
}

impl ListParams {
    /// Parameters with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Starts the page after the given id.
    #[must_use]
    pub fn starting_after(mut self, id: impl Into<String>) -> Self {
        self.starting_after = Some(id.into());
        self
    }

    /// Ends the page before the given id.
    #[must_use]
    pub fn ending_before(mut self, id: impl Into<String>) -> Self {
        self.ending_before = Some(id.into());
        self
    }
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Id of the deleted object
    pub id: String,
    /// Always true on success
    #[serde(default)]
    pub deleted: bool,
}

/// Free-form key/value metadata attached to objects.
pub type Metadata = std::collections::BTreeMap<String, String>;

/// Serializes request parameters into a JSON body.
pub(crate) fn to_body<P: Serialize>(params: &P) -> Result<Value, ApiError> {
    serde_json::to_value(params)
        .map_err(|e| ApiError::configuration(format!("Failed to encode parameters: {e}")))
}

/// Builds `{collection}/{id}` after checking the id is usable in a path.
pub(crate) fn object_path(collection: &str, id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::new(
            ErrorType::InvalidRequestError,
            format!("Object id for {collection} must not be empty"),
        ));
    }
    if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(ApiError::new(
            ErrorType::InvalidRequestError,
            format!("Invalid object id '{id}' for {collection}"),
        ));
    }
    Ok(format!("{collection}/{id}"))
}

/// Unmodelled fields of an object.
pub type Extra = Map<String, Value>;

impl<H, S> RequestEngine<H, S> {
    /// Customer operations.
    #[must_use]
    pub const fn customers(&self) -> Customers<'_, H, S> {
        Customers::new(self)
    }

    /// Charge operations.
    #[must_use]
    pub const fn charges(&self) -> Charges<'_, H, S> {
        Charges::new(self)
    }

    /// Checkout session operations.
    #[must_use]
    pub const fn checkout_sessions(&self) -> CheckoutSessions<'_, H, S> {
        CheckoutSessions::new(self)
    }

    /// Payment link operations.
    #[must_use]
    pub const fn payment_links(&self) -> PaymentLinks<'_, H, S> {
        PaymentLinks::new(self)
    }

    /// Payment request operations.
    #[must_use]
    pub const fn payment_requests(&self) -> PaymentRequests<'_, H, S> {
        PaymentRequests::new(self)
    }

    /// Payment source operations.
    #[must_use]
    pub const fn sources(&self) -> Sources<'_, H, S> {
        Sources::new(self)
    }
}
