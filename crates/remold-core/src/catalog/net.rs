//! URL and network address hooks.

use std::net::{IpAddr, SocketAddr};

use url::Url;

use super::text_hook;
use crate::error::HookError;
use crate::hook::Hook;
use crate::net::{IpNet, IpPrefix};
use crate::value::{Kind, Value};

/// Text to an absolute URL.
#[must_use]
pub fn string_to_url_hook() -> Hook {
    text_hook("string_to_url_hook", Kind::Url, |text, to| {
        Url::parse(text)
            .map(Value::Url)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to an IPv4 or IPv6 address.
#[must_use]
pub fn string_to_ip_hook() -> Hook {
    text_hook("string_to_ip_hook", Kind::Ip, |text, to| {
        text.parse::<IpAddr>()
            .map(Value::Ip)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text in CIDR notation to a network with host bits cleared.
#[must_use]
pub fn string_to_ip_net_hook() -> Hook {
    text_hook("string_to_ip_net_hook", Kind::IpNet, |text, to| {
        text.parse::<IpNet>()
            .map(Value::IpNet)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to a bare network address.
///
/// Same grammar as [`string_to_ip_hook`], producing [`Value::Addr`].
/// [`IpAddr`] has nowhere to keep a zone, so scoped IPv6 addresses
/// (`fe80::1%eth0`) are rejected rather than silently losing the zone.
#[must_use]
pub fn string_to_net_addr_hook() -> Hook {
    text_hook("string_to_net_addr_hook", Kind::Addr, |text, to| {
        text.parse::<IpAddr>()
            .map(Value::Addr)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to an address with port: `ip:port` or `[v6]:port`.
#[must_use]
pub fn string_to_addr_port_hook() -> Hook {
    text_hook("string_to_addr_port_hook", Kind::AddrPort, |text, to| {
        text.parse::<SocketAddr>()
            .map(Value::AddrPort)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text in `ip/len` form, keeping the address unmasked.
#[must_use]
pub fn string_to_prefix_hook() -> Hook {
    text_hook("string_to_prefix_hook", Kind::Prefix, |text, to| {
        text.parse::<IpPrefix>()
            .map(Value::Prefix)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}
