//! Built-in hooks.
//!
//! Every text hook here follows the same rules: it only fires when the
//! source is [`Value::Text`] and the destination has the hook's kind, any
//! other pair is passed through untouched, and a parse failure is reported
//! as [`HookError::Parse`](crate::HookError::Parse) without the rejected text.

mod net;
mod numeric;
mod structs;
mod text;
mod time;
mod weak;

pub use net::{
    string_to_addr_port_hook, string_to_ip_hook, string_to_ip_net_hook, string_to_net_addr_hook,
    string_to_prefix_hook, string_to_url_hook,
};
pub use numeric::{
    string_to_complex64_hook, string_to_complex128_hook, string_to_f32_hook, string_to_f64_hook,
    string_to_i8_hook, string_to_i16_hook, string_to_i32_hook, string_to_i64_hook,
    string_to_isize_hook, string_to_u8_hook, string_to_u16_hook, string_to_u32_hook,
    string_to_u64_hook, string_to_usize_hook,
};
pub use structs::recursive_struct_to_map_hook;
pub use text::{
    string_to_bool_hook, string_to_byte_hook, string_to_char_hook, string_to_slice_hook,
    text_unmarshaller_hook,
};
pub use time::{DurationError, TimeLayout, string_to_duration_hook, string_to_time_hook};
pub use weak::weakly_typed_hook;

use crate::compose::compose;
use crate::error::HookResult;
use crate::hook::{Hook, Target};
use crate::value::{Kind, Value};

/// Every scalar text hook chained together.
///
/// Covers all integer widths, floats, complex numbers, booleans and code
/// points. Each member only fires for its own destination kind, so at most
/// one of them converts a given value.
#[must_use]
pub fn string_to_basic_type_hook() -> Hook {
    compose([
        string_to_i8_hook(),
        string_to_u8_hook(),
        string_to_i16_hook(),
        string_to_u16_hook(),
        string_to_i32_hook(),
        string_to_u32_hook(),
        string_to_i64_hook(),
        string_to_u64_hook(),
        string_to_isize_hook(),
        string_to_usize_hook(),
        string_to_f32_hook(),
        string_to_f64_hook(),
        string_to_bool_hook(),
        string_to_char_hook(),
        string_to_complex64_hook(),
        string_to_complex128_hook(),
    ])
    .named("string_to_basic_type")
}

/// Hook that parses text when the destination kind is `target`.
fn text_hook<F>(name: &'static str, target: Kind, parse: F) -> Hook
where
    F: Fn(&str, &Target<'_>) -> HookResult<Value> + Send + Sync + 'static,
{
    Hook::from_values(move |from: &Value, to: &Target<'_>| match from {
        Value::Text(text) if to.kind() == target => parse(text, to),
        _ => Ok(from.clone()),
    })
    .named(name)
}
