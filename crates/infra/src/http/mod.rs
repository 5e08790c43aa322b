//! HTTP transport shared by the Graph adapter

mod client;

pub use client::{HttpClient, HttpClientBuilder};
