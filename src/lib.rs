//! # Framer Alt Text
//!
//! Finds images without alt text on a design canvas, asks a vision model to
//! describe them, and writes the descriptions back.
//!
//! ## Architecture
//!
//! ### ① Infrastructure
//! - `infrastructure/` - the host canvas seam, only exposes capabilities
//! - `HostCanvas` - node enumeration and attribute read/write
//! - `AccessorPlan` - ordered fallback accessors per operation
//!
//! ### ② Clients
//! - `clients/` - the external completion API (direct or via relay server)
//!
//! ### ③ Services
//! - `services/` - one stage each: scan, select, generate, match, apply, export
//!
//! ### ④ Workflow
//! - `workflow/` - `AltTextFlow` owns `WorkflowState` and moves it through
//!   `Idle → Scanning → Scanned → Generating → Generated → Applying → Idle`
//!
//! ### ⑤ Orchestration
//! - `orchestrator/` - `App`, one run of the binary against a document snapshot

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// re-exports
pub use clients::{DescriptionClient, OpenAiVisionClient, RelayClient};
pub use config::{Config, RunMode, Settings};
pub use error::{AppError, AppResult};
pub use infrastructure::{AccessorPlan, HostCanvas, SnapshotCanvas};
pub use models::{Candidate, GenerationResult, NodeId};
pub use orchestrator::App;
pub use services::scanner::ScanScope;
pub use workflow::{AltTextFlow, Phase, WorkflowState};
