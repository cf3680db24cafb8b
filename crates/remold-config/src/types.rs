//! Configuration types.
//!
//! Every struct implements [`Default`], so an empty file or a bare
//! `[decode]` header yields a working pipeline.

use remold_core::{ComposePolicy, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decode hook pipeline.
    pub decode: DecodeSection,
}

/// How the listed hooks are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeMode {
    /// Run every hook in order.
    #[default]
    All,
    /// Use the first hook that succeeds.
    Any,
}

impl From<ComposeMode> for ComposePolicy {
    fn from(mode: ComposeMode) -> Self {
        match mode {
            ComposeMode::All => Self::All,
            ComposeMode::Any => Self::Any,
        }
    }
}

/// The `[decode]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSection {
    /// Built-in hook names, without the `_hook` suffix.
    pub hooks: Vec<String>,
    /// Combination of `hooks`.
    pub compose: ComposeMode,
    /// Separator used by `string_to_slice`.
    pub slice_delimiter: String,
    /// `"rfc3339"`, `"rfc2822"`, or a strftime pattern, used by
    /// `string_to_time`.
    pub time_layout: String,
    /// Append the weak-typing hook after `hooks`.
    pub weakly_typed: bool,
    /// Append the record-to-map hook after `hooks`.
    pub struct_to_map: bool,
    /// Reject map keys the destination record does not declare.
    pub error_unused: bool,
    /// Deepest nesting level the decoder will walk.
    pub max_depth: usize,
}

impl Default for DecodeSection {
    fn default() -> Self {
        Self {
            hooks: vec!["string_to_duration".to_owned(), "string_to_slice".to_owned()],
            compose: ComposeMode::All,
            slice_delimiter: ",".to_owned(),
            time_layout: "rfc3339".to_owned(),
            weakly_typed: false,
            struct_to_map: false,
            error_unused: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
