//! Rule registry and validation orchestrator.
//!
//! A [`Rule`] is a tagged value: code, severity, applicability, scope, and a
//! pure evaluation function. The [`Validator`] filters the registry by the
//! record's category, skips item-level rules for documents without items and
//! external rules when they are disabled, evaluates everything else without
//! short-circuiting, and returns the issues ordered by severity then code.
//!
//! ```
//! use nota::core::*;
//! use nota::engine::{ValidateOptions, Validator};
//!
//! let validator = Validator::new().unwrap();
//! let record = DocumentBuilder::new(
//!     DocumentCategory::TransportManifest,
//!     "bad-key",
//!     PartyBuilder::new("11222333000181", "ACME Transportes", "SP").build(),
//! )
//! .build();
//!
//! let issues = validator.validate(&record, &ValidateOptions::default());
//! assert!(issues.has_code("IDN-01"));
//! assert!(issues.iter().all(|i| !i.code.starts_with("ITM-")));
//! ```

mod context;
mod registry;
mod rule;
pub mod rules;
mod validator;

pub use context::RuleContext;
pub use registry::RuleRegistry;
pub use rule::{Applicability, CheckFn, Rule, RuleInfo, RuleScope};
pub use validator::{DUPLICATE_CODE, ValidateOptions, Validator, ValidatorBuilder};
