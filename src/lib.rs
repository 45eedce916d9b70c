//! # nota
//!
//! Validation engine for Brazilian fiscal documents: NF-e and NFC-e invoices,
//! CT-e transport services, and MDF-e transport manifests.
//!
//! The engine takes an already-parsed [`DocumentRecord`](crate::core::DocumentRecord)
//! and returns an ordered list of issues. It never mutates the record and never
//! fails because an external data source is slow or down.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use nota::checksum::{check_cnpj, CheckResult};
//!
//! assert_eq!(check_cnpj("11222333000181"), CheckResult::Valid);
//! assert!(matches!(check_cnpj("11222333000182"), CheckResult::Mismatch { .. }));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record model, issues, checksums, consistency checks |
//! | `engine` (default) | Rule registry, adapters, orchestrator |
//! | `brasilapi` | HTTP taxpayer and postal sources backed by BrasilAPI |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod checksum;

#[cfg(feature = "core")]
pub mod consistency;

#[cfg(feature = "engine")]
pub mod adapters;

#[cfg(feature = "engine")]
pub mod engine;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
