//! Prelude module - commonly used types for convenient import.
//!
//! Use `use remold_core::prelude::*;` to import all essential types.

// Values and shapes
pub use crate::{Kind, Record, RecordShape, Shape, Value};

// Hooks and combinators
pub use crate::{Hook, Target, compose, decode_hook_exec, or_compose};

// Decoder
pub use crate::{Decoder, DecoderConfig};

// Errors
pub use crate::{DecodeError, HookError};

// Built-in hooks
pub use crate::catalog::{
    TimeLayout, recursive_struct_to_map_hook, string_to_basic_type_hook,
    string_to_duration_hook, string_to_slice_hook, string_to_time_hook, weakly_typed_hook,
};
