//! Hook combinators.
//!
//! [`compose`] chains hooks: each one sees the previous one's output. The
//! destination stays fixed while the source kind is re-read from every
//! intermediate value. [`or_compose`] tries hooks in order and keeps the
//! first success.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{HookError, HookResult};
use crate::hook::{DecodeHook, Hook, Target};
use crate::value::Value;

/// How a [`CompositeHook`] combines its members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposePolicy {
    /// Run every hook in sequence, stopping at the first error.
    #[default]
    All,
    /// Return the first hook that succeeds.
    Any,
}

/// Ordered hooks plus a combination policy.
#[derive(Debug, Clone, Default)]
pub struct CompositeHook {
    policy: ComposePolicy,
    hooks: Vec<Hook>,
}

impl CompositeHook {
    /// Create an empty composite.
    #[must_use]
    pub fn new(policy: ComposePolicy) -> Self {
        Self {
            policy,
            hooks: Vec::new(),
        }
    }

    /// Append a hook.
    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    /// Append a hook, builder style.
    #[must_use]
    pub fn with_hook(mut self, hook: Hook) -> Self {
        self.push(hook);
        self
    }

    /// Combination policy.
    #[must_use]
    pub fn policy(&self) -> ComposePolicy {
        self.policy
    }

    /// Member hooks in declaration order.
    #[must_use]
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// Freeze into a shareable [`Hook`].
    #[must_use]
    pub fn into_hook(self) -> Hook {
        let name = match self.policy {
            ComposePolicy::All => "compose",
            ComposePolicy::Any => "or_compose",
        };
        Hook::new(self).named(name)
    }

    fn call_all(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        let mut current = Cow::Borrowed(from);
        for hook in &self.hooks {
            current = Cow::Owned(hook.call(&current, to)?);
        }
        Ok(current.into_owned())
    }

    fn call_any(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        let mut messages = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            match hook.call(from, to) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(
                        hook = hook.name(),
                        field = to.name(),
                        "decode hook alternative failed"
                    );
                    messages.push(err.to_string());
                },
            }
        }
        Err(HookError::Alternatives { messages })
    }
}

impl DecodeHook for CompositeHook {
    fn call(&self, from: &Value, to: &Target<'_>) -> HookResult<Value> {
        match self.policy {
            ComposePolicy::All => self.call_all(from, to),
            ComposePolicy::Any => self.call_any(from, to),
        }
    }
}

impl Extend<Hook> for CompositeHook {
    fn extend<I: IntoIterator<Item = Hook>>(&mut self, iter: I) {
        self.hooks.extend(iter);
    }
}

/// Chain `hooks` left to right. An empty chain passes values through.
pub fn compose(hooks: impl IntoIterator<Item = Hook>) -> Hook {
    let mut composite = CompositeHook::new(ComposePolicy::All);
    composite.extend(hooks);
    composite.into_hook()
}

/// First success among `hooks`. An empty list always fails.
pub fn or_compose(hooks: impl IntoIterator<Item = Hook>) -> Hook {
    let mut composite = CompositeHook::new(ComposePolicy::Any);
    composite.extend(hooks);
    composite.into_hook()
}
