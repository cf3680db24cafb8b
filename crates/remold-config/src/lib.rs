#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Declarative decode hook pipelines for remold.
//!
//! A `[decode]` table names built-in hooks and decoder settings. Loading
//! validates the table, and [`DecodeSection::build_decoder`] resolves every
//! name once, up front.
//!
//! # Usage
//!
//! ```rust
//! use remold_config::from_toml_str;
//! use remold_core::{Shape, Value};
//!
//! let config = from_toml_str(
//!     r#"
//!     [decode]
//!     hooks = ["string_to_u16"]
//!     "#,
//! )
//! .unwrap();
//! let decoder = config.decode.build_decoder().unwrap();
//! let port = decoder.decode(&Value::from("0x1F90"), &Shape::U16).unwrap();
//! assert_eq!(port, Value::U16(8080));
//! ```
//!
//! Data documents can be loaded from TOML or JSON with [`load_document`]
//! and decoded in one step with [`decode_file`].

/// Hook and decoder construction from configuration.
pub mod build;
/// Document to value conversion.
pub mod document;
/// Configuration error types.
pub mod error;
/// Configuration and document loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

// Re-export primary types at the crate root.
pub use build::HOOK_NAMES;
pub use document::{value_from_json, value_from_toml};
pub use error::{ConfigError, ConfigResult};
pub use loader::{decode_file, from_toml_str, load_document, load_file};
pub use types::*;
