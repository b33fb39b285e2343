//! Orchestration layer
//!
//! ```text
//! orchestrator::App (one run of the binary)
//!     ↓
//! workflow::AltTextFlow (phases and state)
//!     ↓
//! services (scanner / selection / generator / matcher / applier / export)
//!     ↓
//! infrastructure (HostCanvas, AccessorPlan) + clients (completion API)
//! ```

pub mod app;

pub use app::App;
