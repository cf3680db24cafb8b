//! Turning a [`DecodeSection`] into hooks and decoders.
//!
//! All name resolution happens here, once. A misspelled hook name fails the
//! build instead of surfacing later while decoding records.

use remold_core::catalog::{self, TimeLayout};
use remold_core::{CompositeHook, Decoder, DecoderConfig, Hook, compose};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::DecodeSection;

/// Names accepted in `decode.hooks`.
pub const HOOK_NAMES: &[&str] = &[
    "string_to_slice",
    "string_to_duration",
    "string_to_time",
    "string_to_url",
    "string_to_ip",
    "string_to_ip_net",
    "string_to_net_addr",
    "string_to_addr_port",
    "string_to_prefix",
    "string_to_i8",
    "string_to_i16",
    "string_to_i32",
    "string_to_i64",
    "string_to_isize",
    "string_to_u8",
    "string_to_u16",
    "string_to_u32",
    "string_to_u64",
    "string_to_usize",
    "string_to_f32",
    "string_to_f64",
    "string_to_complex64",
    "string_to_complex128",
    "string_to_bool",
    "string_to_byte",
    "string_to_char",
    "string_to_basic_type",
    "text_unmarshaller",
];

impl DecodeSection {
    /// Timestamp layout named by `time_layout`.
    #[must_use]
    pub fn layout(&self) -> TimeLayout {
        match self.time_layout.as_str() {
            "rfc3339" => TimeLayout::Rfc3339,
            "rfc2822" => TimeLayout::Rfc2822,
            other => TimeLayout::Format(other.to_owned()),
        }
    }

    /// Build the configured hook.
    ///
    /// The listed hooks are combined per `compose`; the record-to-map and
    /// weak-typing hooks, when enabled, run after them in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownHook`] for a name not in
    /// [`HOOK_NAMES`].
    pub fn build_hook(&self) -> ConfigResult<Hook> {
        let mut listed = CompositeHook::new(self.compose.into());
        for name in &self.hooks {
            listed.push(self.hook_by_name(name.trim())?);
        }

        let mut chain = vec![listed.into_hook()];
        if self.struct_to_map {
            chain.push(catalog::recursive_struct_to_map_hook());
        }
        if self.weakly_typed {
            chain.push(catalog::weakly_typed_hook());
        }
        debug!(
            hooks = self.hooks.len(),
            compose = ?self.compose,
            struct_to_map = self.struct_to_map,
            weakly_typed = self.weakly_typed,
            "built decode hook pipeline"
        );
        Ok(compose(chain).named("configured"))
    }

    /// Build a decoder around [`build_hook`](Self::build_hook).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownHook`] for a name not in
    /// [`HOOK_NAMES`].
    pub fn build_decoder(&self) -> ConfigResult<Decoder> {
        Ok(Decoder::new(DecoderConfig {
            hook: Some(self.build_hook()?),
            error_unused: self.error_unused,
            max_depth: self.max_depth,
        }))
    }

    fn hook_by_name(&self, name: &str) -> ConfigResult<Hook> {
        let hook = match name {
            "string_to_slice" => catalog::string_to_slice_hook(self.slice_delimiter.as_str()),
            "string_to_duration" => catalog::string_to_duration_hook(),
            "string_to_time" => catalog::string_to_time_hook(self.layout()),
            "string_to_url" => catalog::string_to_url_hook(),
            "string_to_ip" => catalog::string_to_ip_hook(),
            "string_to_ip_net" => catalog::string_to_ip_net_hook(),
            "string_to_net_addr" => catalog::string_to_net_addr_hook(),
            "string_to_addr_port" => catalog::string_to_addr_port_hook(),
            "string_to_prefix" => catalog::string_to_prefix_hook(),
            "string_to_i8" => catalog::string_to_i8_hook(),
            "string_to_i16" => catalog::string_to_i16_hook(),
            "string_to_i32" => catalog::string_to_i32_hook(),
            "string_to_i64" => catalog::string_to_i64_hook(),
            "string_to_isize" => catalog::string_to_isize_hook(),
            "string_to_u8" => catalog::string_to_u8_hook(),
            "string_to_u16" => catalog::string_to_u16_hook(),
            "string_to_u32" => catalog::string_to_u32_hook(),
            "string_to_u64" => catalog::string_to_u64_hook(),
            "string_to_usize" => catalog::string_to_usize_hook(),
            "string_to_f32" => catalog::string_to_f32_hook(),
            "string_to_f64" => catalog::string_to_f64_hook(),
            "string_to_complex64" => catalog::string_to_complex64_hook(),
            "string_to_complex128" => catalog::string_to_complex128_hook(),
            "string_to_bool" => catalog::string_to_bool_hook(),
            "string_to_byte" => catalog::string_to_byte_hook(),
            "string_to_char" => catalog::string_to_char_hook(),
            "string_to_basic_type" => catalog::string_to_basic_type_hook(),
            "text_unmarshaller" => catalog::text_unmarshaller_hook(),
            _ => {
                return Err(ConfigError::UnknownHook {
                    name: name.to_owned(),
                });
            },
        };
        Ok(hook)
    }
}

#[cfg(test)]
mod tests {
    use remold_core::{Shape, Value, decode_hook_exec};

    use super::*;

    #[test]
    fn test_every_listed_name_builds() {
        let section = DecodeSection {
            hooks: HOOK_NAMES.iter().map(|&name| name.to_owned()).collect(),
            ..DecodeSection::default()
        };
        assert!(section.build_hook().is_ok());
    }

    #[test]
    fn test_unknown_name_fails_at_build() {
        let section = DecodeSection {
            hooks: vec!["string_to_duration".to_owned(), "string_to_yaml".to_owned()],
            ..DecodeSection::default()
        };
        let err = section.build_hook().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownHook { ref name } if name == "string_to_yaml"));
    }

    #[test]
    fn test_delimiter_applies() {
        let section = DecodeSection {
            hooks: vec!["string_to_slice".to_owned()],
            slice_delimiter: "|".to_owned(),
            ..DecodeSection::default()
        };
        let hook = section.build_hook().unwrap();
        let out = decode_hook_exec(&hook, &Value::from("a|b"), &Shape::seq(Shape::Text)).unwrap();
        assert_eq!(out, Value::seq(["a", "b"]));
    }

    #[test]
    fn test_weak_flag_appends_hook() {
        let strict = DecodeSection::default().build_hook().unwrap();
        let weak = DecodeSection {
            weakly_typed: true,
            ..DecodeSection::default()
        }
        .build_hook()
        .unwrap();
        let input = Value::Bool(true);
        assert_eq!(decode_hook_exec(&strict, &input, &Shape::Text).unwrap(), input);
        assert_eq!(
            decode_hook_exec(&weak, &input, &Shape::Text).unwrap(),
            Value::from("1")
        );
    }

    #[test]
    fn test_layout_names() {
        let mut section = DecodeSection::default();
        assert_eq!(section.layout(), TimeLayout::Rfc3339);
        section.time_layout = "%d/%m/%Y".to_owned();
        assert_eq!(section.layout(), TimeLayout::Format("%d/%m/%Y".to_owned()));
    }

    #[test]
    fn test_decoder_settings() {
        let section = DecodeSection {
            error_unused: true,
            max_depth: 4,
            ..DecodeSection::default()
        };
        let decoder = section.build_decoder().unwrap();
        assert!(decoder.config().error_unused);
        assert_eq!(decoder.config().max_depth, 4);
        assert!(decoder.config().hook.is_some());
    }
}
