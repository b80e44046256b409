//! License server client.

pub mod http;
