//! Remold Core - Decode hooks for coercing dynamic values into typed shapes.
//!
//! A decode hook sits in front of a structural decoder. For every value the
//! decoder is about to assign, the hook sees the source [`Value`] and the
//! destination [`Shape`] and either converts the value, passes it through
//! for generic assignment, or fails the field.
//!
//! # Pieces
//!
//! - [`Hook`]: a shareable handle around one [`DecodeHook`], built from
//!   whichever calling convention suits the hook
//! - [`compose`] / [`or_compose`]: sequential and first-success combinators
//! - [`catalog`]: text to numbers, durations, timestamps, URLs and network
//!   addresses, plus weak typing and record-to-map conversion
//! - [`Decoder`]: a small structural decoder that drives all of the above
//! - [`AggregateError`]: sorted reports of every failing field
//!
//! # Example
//!
//! ```rust
//! use remold_core::prelude::*;
//!
//! let decoder = Decoder::new(DecoderConfig {
//!     hook: Some(compose([
//!         string_to_duration_hook(),
//!         string_to_slice_hook(","),
//!     ])),
//!     ..DecoderConfig::default()
//! });
//!
//! let shape = Shape::Record(
//!     RecordShape::new("Worker")
//!         .field("timeout", Shape::Duration)
//!         .field("queues", Shape::seq(Shape::Text)),
//! );
//! let input = Value::map([("timeout", "1m30s"), ("queues", "high,low")]);
//!
//! let Value::Record(worker) = decoder.decode(&input, &shape)? else {
//!     unreachable!();
//! };
//! assert_eq!(worker.get("queues"), Some(&Value::seq(["high", "low"])));
//! # Ok::<(), remold_core::DecodeError>(())
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod catalog;
pub mod compose;
pub mod decoder;
pub mod error;
pub mod hook;
pub mod net;
pub mod shape;
pub mod value;

pub use compose::{ComposePolicy, CompositeHook, compose, or_compose};
pub use decoder::{Decoder, DecoderConfig};
pub use error::{
    AggregateError, DecodeError, DecodeResult, HookError, HookResult, MessageError,
};
pub use hook::{
    DEFAULT_MAX_DEPTH, DecodeHook, Hook, HookOutput, Reenter, Target, decode_hook_exec,
};
pub use net::{IpNet, IpPrefix, NetParseError};
pub use shape::{RecordShape, Shape, TextType};
pub use value::{Complex, Kind, Opaque, Record, Value};
