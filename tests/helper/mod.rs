//! Shared test utilities

#![allow(dead_code, unused_imports)]

mod fetcher;
mod server;

pub use fetcher::{GatedFetcher, descriptor};
pub use server::{create_http_updater, descriptor_path};
