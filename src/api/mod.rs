//! Client for the news aggregation service.
//!
//! The service is consumed as an opaque, read-only HTTP API:
//!
//! - `GET {base}/api/news` - article collection plus last-updated timestamp
//! - `GET {base}/api/categories` - server-reported counts per category
//! - `GET {base}/` - health probe
//!
//! # Architecture
//!
//! - [`client`] - `NewsClient`, request execution and size-limited body reads
//! - [`types`] - wire envelopes and the `ApiError` taxonomy

mod client;
mod types;

pub use client::NewsClient;
pub use types::{ApiError, FailureKind, HealthStatus, NewsPayload};
