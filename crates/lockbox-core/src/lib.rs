//! Core library for the Lockbox browser-based OIDC login flow, shared by the
//! CLI front-end.

pub mod auth;
pub mod client;
