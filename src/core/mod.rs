//! Core document types, issues, and jurisdiction data.
//!
//! This module provides the normalized record model for Brazilian fiscal
//! documents (NF-e, NFC-e, CT-e, MDF-e) that every other module reads.

mod amounts;
mod builder;
mod error;
mod jurisdictions;
mod types;

pub use amounts::*;
pub use builder::*;
pub use error::*;
pub use jurisdictions::*;
pub use types::*;
