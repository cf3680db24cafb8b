//! Network prefix types.
//!
//! `std::net` has addresses and socket addresses but nothing for CIDR
//! notation, so the two flavours the catalog needs live here: [`IpNet`]
//! clears host bits, [`IpPrefix`] keeps the address as written.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

/// Failure parsing CIDR notation. Messages never include the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetParseError {
    /// No `/` separator.
    #[error("missing prefix length")]
    MissingPrefix,
    /// The address part is not an IP address.
    #[error("invalid IP address syntax")]
    InvalidAddress,
    /// The prefix length is not a number or exceeds the address width.
    #[error("invalid prefix length")]
    InvalidPrefixLength,
}

/// IP network in CIDR form with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    network: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    /// Build a network, masking `addr` to `prefix_len` bits.
    ///
    /// Returns `None` if `prefix_len` exceeds the address width.
    #[must_use]
    pub fn new(addr: IpAddr, prefix_len: u8) -> Option<Self> {
        if prefix_len > max_prefix_len(addr) {
            return None;
        }
        Some(Self {
            network: mask(addr, prefix_len),
            prefix_len,
        })
    }

    /// Network address.
    #[must_use]
    pub fn network(&self) -> IpAddr {
        self.network
    }

    /// Prefix length in bits.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Network mask as an address.
    #[must_use]
    pub fn netmask(&self) -> IpAddr {
        match self.network {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::from(v4_mask(self.prefix_len))),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::from(v6_mask(self.prefix_len))),
        }
    }

    /// Whether `addr` falls inside this network.
    #[must_use]
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.network, addr) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(addr, self.prefix_len) == self.network
            },
            _ => false,
        }
    }
}

impl Default for IpNet {
    fn default() -> Self {
        Self {
            network: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl FromStr for IpNet {
    type Err = NetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix_len) = split_cidr(s)?;
        Self::new(addr, prefix_len).ok_or(NetParseError::InvalidPrefixLength)
    }
}

/// IP address paired with a prefix length; the address is kept unmasked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpPrefix {
    /// Pair `addr` with `prefix_len`.
    ///
    /// Returns `None` if `prefix_len` exceeds the address width.
    #[must_use]
    pub fn new(addr: IpAddr, prefix_len: u8) -> Option<Self> {
        (prefix_len <= max_prefix_len(addr)).then_some(Self { addr, prefix_len })
    }

    /// Address as written.
    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Prefix length in bits.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The network this prefix denotes.
    #[must_use]
    pub fn masked(&self) -> IpNet {
        IpNet {
            network: mask(self.addr, self.prefix_len),
            prefix_len: self.prefix_len,
        }
    }
}

impl Default for IpPrefix {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl FromStr for IpPrefix {
    type Err = NetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix_len) = split_cidr(s)?;
        Self::new(addr, prefix_len).ok_or(NetParseError::InvalidPrefixLength)
    }
}

fn split_cidr(s: &str) -> Result<(IpAddr, u8), NetParseError> {
    let (addr, bits) = s.rsplit_once('/').ok_or(NetParseError::MissingPrefix)?;
    let addr: IpAddr = addr.parse().map_err(|_| NetParseError::InvalidAddress)?;
    // Digits only: no sign, no leading zeros.
    if bits.is_empty()
        || !bits.bytes().all(|b| b.is_ascii_digit())
        || (bits.len() > 1 && bits.starts_with('0'))
    {
        return Err(NetParseError::InvalidPrefixLength);
    }
    let prefix_len: u8 = bits
        .parse()
        .map_err(|_| NetParseError::InvalidPrefixLength)?;
    Ok((addr, prefix_len))
}

fn max_prefix_len(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn v4_mask(prefix_len: u8) -> u32 {
    u32::MAX
        .checked_shl(32_u32.saturating_sub(u32::from(prefix_len)))
        .unwrap_or(0)
}

fn v6_mask(prefix_len: u8) -> u128 {
    u128::MAX
        .checked_shl(128_u32.saturating_sub(u32::from(prefix_len)))
        .unwrap_or(0)
}

fn mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(prefix_len))),
        IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(prefix_len))),
    }
}
