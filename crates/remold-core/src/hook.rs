//! Hook execution engine.
//!
//! Every hook implements [`DecodeHook`]. The three calling conventions a
//! hook can be written in (kind tags, full shapes, or value plus target) are
//! adapted into that one trait when the [`Hook`] handle is built, so the
//! decoder never has to inspect a hook's signature at call time.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::error::{DecodeResult, HookError, HookResult};
use crate::shape::Shape;
use crate::value::{Kind, Value};

/// Default limit on nested decode depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// A value coercion run before generic assignment.
///
/// Returning `from` unchanged means "not applicable": the decoder then
/// falls back to its own assignment rules. An error is authoritative.
pub trait DecodeHook: Send + Sync {
    /// Convert `from` toward `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`] if `from` is applicable but malformed.
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value>;
}

/// Entry point back into the decoder that invoked a hook.
pub trait Reenter {
    /// Decode `input` into `shape` as the field `name` at `depth`.
    ///
    /// # Errors
    ///
    /// Returns whatever the nested decode reports.
    fn reenter(&self, name: &str, input: &Value, shape: &Shape, depth: usize)
    -> DecodeResult<Value>;
}

/// Destination of a single hook invocation.
#[derive(Clone, Copy)]
pub struct Target<'a> {
    shape: &'a Shape,
    name: &'a str,
    depth: usize,
    max_depth: usize,
    reentry: Option<&'a dyn Reenter>,
}

impl<'a> Target<'a> {
    /// Root target for `shape` with no decoder attached.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self {
            shape,
            name: "",
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            reentry: None,
        }
    }

    /// Same target with a different shape.
    #[must_use]
    pub fn with_shape(self, shape: &'a Shape) -> Self {
        Self { shape, ..self }
    }

    /// Same target at field path `name`.
    #[must_use]
    pub fn with_name(self, name: &'a str) -> Self {
        Self { name, ..self }
    }

    /// Same target at nesting `depth`.
    #[must_use]
    pub fn with_depth(self, depth: usize) -> Self {
        Self { depth, ..self }
    }

    /// Same target with a different depth limit.
    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Attach the decoder to re-enter for nested values.
    #[must_use]
    pub fn with_reentry(self, reentry: &'a dyn Reenter) -> Self {
        Self {
            reentry: Some(reentry),
            ..self
        }
    }

    /// Destination shape.
    #[must_use]
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Destination category.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.shape.kind()
    }

    /// Zero value of the destination.
    #[must_use]
    pub fn zero(&self) -> Value {
        self.shape.zero()
    }

    /// Field path, empty at the root.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum nesting depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decoder to re-enter, if the hook runs inside one.
    #[must_use]
    pub fn reentry(&self) -> Option<&'a dyn Reenter> {
        self.reentry
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("shape", &self.shape)
            .field("name", &self.name)
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .field("reentry", &self.reentry.is_some())
            .finish()
    }
}

/// Return types accepted from hook functions.
///
/// A bare [`Value`] is a hook that always succeeds.
pub trait HookOutput {
    /// Normalize into a hook result.
    ///
    /// # Errors
    ///
    /// Returns the function's own error converted into a [`HookError`].
    fn into_hook_result(self) -> HookResult<Value>;
}

impl HookOutput for Value {
    fn into_hook_result(self) -> HookResult<Value> {
        Ok(self)
    }
}

impl<E: Into<HookError>> HookOutput for Result<Value, E> {
    fn into_hook_result(self) -> HookResult<Value> {
        self.map_err(Into::into)
    }
}

struct KindFn<F, R> {
    f: F,
    _output: PhantomData<fn() -> R>,
}

impl<F, R> DecodeHook for KindFn<F, R>
where
    F: Fn(Kind, Kind, &Value) -> R + Send + Sync,
    R: HookOutput,
{
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        (self.f)(from.kind(), to.kind(), from).into_hook_result()
    }
}

struct ShapeFn<F, R> {
    f: F,
    _output: PhantomData<fn() -> R>,
}

impl<F, R> DecodeHook for ShapeFn<F, R>
where
    F: Fn(&Shape, &Shape, &Value) -> R + Send + Sync,
    R: HookOutput,
{
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        (self.f)(&from.shape(), to.shape(), from).into_hook_result()
    }
}

struct ValueFn<F, R> {
    f: F,
    _output: PhantomData<fn() -> R>,
}

impl<F, R> DecodeHook for ValueFn<F, R>
where
    F: Fn(&Value, &Target<'_>) -> R + Send + Sync,
    R: HookOutput,
{
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        (self.f)(from, to).into_hook_result()
    }
}

/// Cloneable, shareable handle to a hook.
#[derive(Clone)]
pub struct Hook {
    name: Cow<'static, str>,
    inner: Arc<dyn DecodeHook>,
}

impl Hook {
    /// Wrap a [`DecodeHook`] implementation.
    pub fn new(hook: impl DecodeHook + 'static) -> Self {
        Self {
            name: Cow::Borrowed("custom"),
            inner: Arc::new(hook),
        }
    }

    /// Hook written against category tags only.
    pub fn from_kinds<F, R>(f: F) -> Self
    where
        F: Fn(Kind, Kind, &Value) -> R + Send + Sync + 'static,
        R: HookOutput + 'static,
    {
        Self::new(KindFn {
            f,
            _output: PhantomData,
        })
    }

    /// Hook written against the full source and destination shapes.
    pub fn from_shapes<F, R>(f: F) -> Self
    where
        F: Fn(&Shape, &Shape, &Value) -> R + Send + Sync + 'static,
        R: HookOutput + 'static,
    {
        Self::new(ShapeFn {
            f,
            _output: PhantomData,
        })
    }

    /// Hook that sees the value and the whole [`Target`], including the
    /// re-entry handle for structural recursion.
    pub fn from_values<F, R>(f: F) -> Self
    where
        F: Fn(&Value, &Target<'_>) -> R + Send + Sync + 'static,
        R: HookOutput + 'static,
    {
        Self::new(ValueFn {
            f,
            _output: PhantomData,
        })
    }

    /// Rename the hook; the name shows up in traces.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Hook name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the hook.
    ///
    /// # Errors
    ///
    /// Returns the hook's error unchanged.
    pub fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        trace!(
            hook = %self.name,
            from = %from.kind(),
            to = %to.shape(),
            field = to.name(),
            "running decode hook"
        );
        self.inner.call(from, to)
    }
}

impl DecodeHook for Hook {
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        Hook::call(self, from, to)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name).finish()
    }
}

/// Run `hook` against `shape` outside of any decoder.
///
/// # Errors
///
/// Returns the hook's error unchanged.
pub fn decode_hook_exec(hook: &Hook, from: &Value, shape: &Shape) -> HookResult<Value> {
    hook.call(from, &Target::new(shape))
}

/// Join a parent field path and a child key with `.`.
pub(crate) fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_adapter_sees_tags() {
        let hook = Hook::from_kinds(|from: Kind, to: Kind, value: &Value| {
            if from == Kind::Text && to == Kind::Bool {
                Value::Bool(value.as_text() == Some("yes"))
            } else {
                value.clone()
            }
        });
        let out = decode_hook_exec(&hook, &Value::from("yes"), &Shape::Bool).unwrap();
        assert_eq!(out, Value::Bool(true));
        let out = decode_hook_exec(&hook, &Value::from("yes"), &Shape::Text).unwrap();
        assert_eq!(out, Value::from("yes"));
    }

    #[test]
    fn test_shape_adapter_sees_full_types() {
        let hook = Hook::from_shapes(|from: &Shape, to: &Shape, value: &Value| {
            if *from == Shape::seq(Shape::Text) && *to == Shape::Text {
                Err(HookError::msg("no joining"))
            } else {
                Ok(value.clone())
            }
        });
        let err = decode_hook_exec(&hook, &Value::seq(["a"]), &Shape::Text).unwrap_err();
        assert_eq!(err.to_string(), "no joining");
    }

    #[test]
    fn test_value_adapter_sees_target() {
        let hook = Hook::from_values(|_: &Value, to: &Target<'_>| {
            Value::Text(format!("{}@{}", to.name(), to.depth()))
        });
        let shape = Shape::Text;
        let target = Target::new(&shape).with_name("a.b").with_depth(2);
        assert_eq!(hook.call(&Value::Null, &target).unwrap(), Value::from("a.b@2"));
    }

    #[test]
    fn test_hook_name() {
        let hook = Hook::from_values(|v: &Value, _: &Target<'_>| v.clone()).named("noop");
        assert_eq!(hook.name(), "noop");
        assert!(format!("{hook:?}").contains("noop"));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a", "b"), "a.b");
    }
}
