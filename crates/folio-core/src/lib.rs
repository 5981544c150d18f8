//! folio-core: data-access and session layer for a single-admin portfolio.
//!
//! - **service**: profile and project operations against the hosted backend.
//! - **images**: upload validation and storage key generation.
//! - **session**: login and logout flow.
//! - **state**: caller-owned in-flight / last-error tracking.
//! - **memory**: an in-process backend used by tests and dry runs.

pub mod clock;
pub mod error;
pub mod images;
pub mod memory;
pub mod models;
pub mod service;
pub mod session;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{FolioError, Result, ValidationError};
pub use images::{ImageFile, ImagePolicy};
pub use memory::MemoryBackend;
pub use models::{DashboardStats, Profile, Project, ProjectDraft, ProjectId};
pub use service::ContentService;
pub use session::{LoginOutcome, Route, SessionFlow};
pub use state::RequestState;

pub use folio_http::{AuthProvider, BlobStore, RowStore, Session};
