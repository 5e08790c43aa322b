//! Shared test helpers for `mailcal-core` integration tests.

#![allow(dead_code)]

pub mod client;
