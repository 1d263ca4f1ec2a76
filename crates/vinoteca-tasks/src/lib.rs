//! # vinoteca-tasks: Background Task Runner
//!
//! A generic adapter between asynchronous units of work and a UI shell
//! whose control thread must never block.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Task Dispatch Flow                               │
//! │                                                                         │
//! │  Control thread                       Tokio runtime                     │
//! │  ──────────────                       ─────────────                     │
//! │                                                                         │
//! │  runner.dispatch(repo.insert(form))                                     │
//! │       │                                                                 │
//! │       ├──────────────── spawn ──────► worker drives the future         │
//! │       │                               │                                 │
//! │       ▼                               ├── Ok(v)      ──┐               │
//! │  TaskHandle<T>                        ├── Err(e)     ──┤               │
//! │   ├── cancel()                        ├── timeout    ──┤ oneshot       │
//! │   ├── try_outcome()  ◄────────────────┴── cancelled ──┘               │
//! │   └── outcome().await                                                   │
//! │                                                                         │
//! │  EXACTLY ONE outcome is delivered per dispatch. Dispatches are         │
//! │  independent: no shared state, no completion-order guarantee.          │
//! │  Callers that need "update then reload" chain the second dispatch      │
//! │  from the first handle's outcome.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod runner;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::TaskError;
pub use runner::{TaskHandle, TaskRunner};
