//! Microsoft Graph adapter for the mail and calendar port

pub mod auth;
pub mod client;
mod types;

pub use auth::{
    ClientCredentialsTokenProvider, StaticTokenProvider, TokenProvider, GRAPH_DEFAULT_SCOPE,
};
pub use client::GraphMailClient;
