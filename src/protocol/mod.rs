//! License server wire format.

pub mod models;
