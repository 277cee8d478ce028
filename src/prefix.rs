//! IPv4 prefixes as fixed-length bit strings.
//!
//! A [`Prefix`] keeps the leading `len` bits of an address left-aligned in a
//! `u32`, with every bit below `len` cleared. Ordering is by length first and
//! then by value, which for equal lengths matches lexicographic order of the
//! bit strings ('0' < '1').

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;

use crate::error::{CidrcapError, Result};

/// Number of bits in an IPv4 address.
pub const MAX_LEN: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix {
    // Field order drives the derived ordering: (len, bits).
    len: u8,
    bits: u32,
}

/// Mask keeping the top `len` bits.
fn mask(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (MAX_LEN - len)
    }
}

impl Prefix {
    /// The zero-length prefix covering the whole address space.
    pub const ROOT: Prefix = Prefix { len: 0, bits: 0 };

    /// Build a prefix from an address and a length, clearing host bits.
    pub fn new(addr: Ipv4Addr, len: u8) -> Result<Self> {
        if len > MAX_LEN {
            return Err(CidrcapError::MalformedInput(format!(
                "{}/{}: prefix length exceeds {}",
                addr, len, MAX_LEN
            )));
        }
        Ok(Self {
            len,
            bits: u32::from(addr) & mask(len),
        })
    }

    /// Parse `a.b.c.d/n`.
    ///
    /// Octets may carry leading zeros. Host bits below `n` are dropped, so
    /// `10.0.0.5/24` parses to `10.0.0.0/24`.
    ///
    /// # Examples
    /// ```
    /// use cidrcap::prefix::Prefix;
    /// let p = Prefix::parse("10.0.1.7/23").unwrap();
    /// assert_eq!(p.to_string(), "10.0.0.0/23");
    /// assert!(Prefix::parse("10.0.0.256/24").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = |reason: &str| CidrcapError::MalformedInput(format!("{}: {}", s, reason));

        let (addr, len) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| malformed("missing prefix length"))?;

        let mut octets = [0u8; 4];
        let mut parts = addr.split('.');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| malformed("expected four octets"))?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("octet is not a decimal number"));
            }
            *octet = part
                .parse::<u8>()
                .map_err(|_| malformed("octet out of range 0-255"))?;
        }
        if parts.next().is_some() {
            return Err(malformed("expected four octets"));
        }

        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("prefix length is not a decimal number"));
        }
        let len = len
            .parse::<u8>()
            .ok()
            .filter(|l| *l <= MAX_LEN)
            .ok_or_else(|| malformed("prefix length out of range 0-32"))?;

        Self::new(Ipv4Addr::from(octets), len)
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    /// True for the zero-length root prefix.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Left-aligned prefix bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Network address of the block.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.bits)
    }

    /// Bit at `index` (0 = most significant). `index` must be below `len`.
    pub fn bit(&self, index: u8) -> usize {
        debug_assert!(index < self.len);
        ((self.bits >> (MAX_LEN - 1 - index)) & 1) as usize
    }

    /// The prefix one bit shorter, or `None` for the root.
    pub fn parent(&self) -> Option<Prefix> {
        if self.len == 0 {
            return None;
        }
        let len = self.len - 1;
        Some(Prefix {
            len,
            bits: self.bits & mask(len),
        })
    }

    /// The prefix one bit longer along `bit`.
    pub fn child(&self, bit: usize) -> Prefix {
        debug_assert!(self.len < MAX_LEN);
        let len = self.len + 1;
        let bits = self.bits | ((bit as u32 & 1) << (MAX_LEN - len));
        Prefix { len, bits }
    }

    /// True when every address of `other` is inside `self`.
    pub fn contains(&self, other: &Prefix) -> bool {
        self.len <= other.len && (other.bits & mask(self.len)) == self.bits
    }

    /// True when `addr` is inside the block.
    pub fn contains_addr(&self, addr: Ipv4Addr) -> bool {
        (u32::from(addr) & mask(self.len)) == self.bits
    }

    /// Number of addresses in the block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LEN - self.len)
    }

    /// The prefix as a string of '0'/'1' characters, empty for the root.
    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .map(|i| if self.bit(i) == 1 { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

impl FromStr for Prefix {
    type Err = CidrcapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Ipv4Net> for Prefix {
    fn from(net: Ipv4Net) -> Self {
        let len = net.prefix_len();
        Prefix {
            len,
            bits: u32::from(net.network()) & mask(len),
        }
    }
}

impl From<Prefix> for Ipv4Net {
    fn from(prefix: Prefix) -> Self {
        match Ipv4Net::new(prefix.network(), prefix.len) {
            Ok(net) => net,
            Err(_) => unreachable!("prefix length is at most {}", MAX_LEN),
        }
    }
}
