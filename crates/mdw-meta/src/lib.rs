//! Metainf block support for mdw content files.
//!
//! Content files carry a small `key: value` block at the top of the file
//! (the "metainf" block). This crate provides:
//! - [`MetaInfSchema`]: static field registries for pages and navigation levels
//! - [`parse`]: the block parser, producing a typed [`ParsedMetaInf`]
//! - [`MetaInfFieldError`]: errors for unknown fields, empty or invalid values
//!
//! # Example
//!
//! ```
//! use mdw_meta::{MetaInfSchema, parse};
//!
//! let meta = parse(&MetaInfSchema::page(), "Title: Home\nOrder: 3").unwrap();
//! assert_eq!(meta.text("title"), Some("Home"));
//! assert_eq!(meta.int("order"), Some(3));
//! ```

mod date;
mod error;
mod parser;
mod schema;
mod value;

pub use date::parse_date;
pub use error::MetaInfFieldError;
pub use parser::{normalize_key, parse};
pub use schema::{FieldDefault, FieldKind, FieldSpec, MetaInfSchema, NAV_FIELDS, PAGE_FIELDS};
pub use value::{MetaValue, ParsedMetaInf};
