//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod reqwest_rest_transport;

pub use reqwest_rest_transport::{ReqwestRestTransport, RestCredentials};
