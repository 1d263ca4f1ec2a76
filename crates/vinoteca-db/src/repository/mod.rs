//! # Repository Module
//!
//! Database repository implementations for Vinoteca.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Dispatched worker                                                     │
//! │       │                                                                 │
//! │       │  db.bottles().search("chia", &filter, order)                    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BottleRepository                                                      │
//! │  ├── fetch_all(&self, order)                                           │
//! │  ├── insert(&self, form)                                               │
//! │  ├── update(&self, id, form)                                           │
//! │  ├── delete(&self, id)                                                 │
//! │  ├── search(&self, term, filter, order)                                │
//! │  ├── statistics(&self)                                                 │
//! │  └── export_dataset(&self, order)                                      │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  MySQL store                                                           │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Callers see typed results and typed errors                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bottle;
