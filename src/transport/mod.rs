//! HTTP plumbing underneath the request engine.
//!
//! [`HttpClient`] is the seam: the engine hands it a fully built
//! [`HttpRequest`] per attempt and gets back a buffered [`HttpResponse`]
//! for any status, or a [`TransportError`] carrying a [`ConnectionCode`]
//! when no response arrived. [`ReqwestClient`] is the production
//! implementation.

mod client;
mod error;
mod http;


pub use client::ReqwestClient;
pub use error::{ConnectionCode, TransportError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
