//! Session lifecycle and result caching for a remote face-liveness service.
//!
//! This crate provides:
//!
//! - A file-addressed [`SessionStore`] holding completed results and reference images
//! - The [`VerificationClient`] boundary to the remote service, with an HTTP implementation
//! - The [`SessionOrchestrator`], which serves completed sessions from the store and
//!   captures a `SUCCEEDED` result exactly once
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use liveness_core::{
//!     HttpVerificationClient, RemoteConfig, Resolution, SessionOrchestrator, SessionStore,
//! };
//!
//! # async fn example() -> liveness_core::LivenessResult<()> {
//! let client = Arc::new(HttpVerificationClient::new(RemoteConfig::from_env())?);
//! let store = SessionStore::with_dir("files");
//! let orchestrator = SessionOrchestrator::new(client, store);
//!
//! match orchestrator.resolve("3f1c2a9e-0000-4000-8000-000000000000").await? {
//!     Resolution::Pending(status) => println!("still {status}, poll again"),
//!     resolved => println!("confidence {:?}", resolved.record().map(|r| r.confidence)),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `LIVENESS_REGION` | Provider region (default: `eu-west-1`) |
//! | `LIVENESS_ENDPOINT` | Endpoint override (default: regional provider endpoint) |
//! | `LIVENESS_TOKEN` | Optional bearer token sent to the endpoint |
//! | `LIVENESS_TIMEOUT` | Request timeout in seconds (default: 30) |

pub mod client;
pub mod error;
mod locks;
pub mod orchestrator;
pub mod store;
pub mod types;

pub use client::{HttpVerificationClient, VerificationClient};
pub use error::{LivenessError, LivenessResult};
pub use orchestrator::{Resolution, SessionOrchestrator};
pub use store::{SessionListing, SessionStore};
pub use types::{
    validate_session_id, RemoteConfig, RemoteResult, SessionRecord, SessionStatus,
    MAX_SESSION_ID_LEN,
};
