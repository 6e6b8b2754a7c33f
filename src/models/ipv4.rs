//! IPv4 address arithmetic and CIDR sizing.
//!
//! Addresses are handled as plain `u32` values. [`AddressBlock`] pairs a network address
//! with a prefix length, and the free functions below compute masks, capacities and the
//! minimal prefix for a host count.

use crate::error::{PlanError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Smallest prefix a carved subnet or base network may have.
pub const MIN_PREFIX: u8 = 1;

/// Largest prefix a carved subnet or base network may have. Keeps two usable hosts.
pub const MAX_PREFIX: u8 = 30;

lazy_static! {
    static ref DOTTED_RE: Regex =
        Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").expect("Invalid Regex?");
}

/// Parse a dotted-decimal string into a 32-bit address.
///
/// # Examples
/// ```
/// use vlsm_planner::models::to_int;
/// assert_eq!(to_int("192.168.1.10").unwrap(), 0xC0A8010A);
/// assert!(to_int("192.168.1").is_err());
/// ```
pub fn to_int(dotted: &str) -> Result<u32> {
    let trimmed = dotted.trim();
    let caps = DOTTED_RE
        .captures(trimmed)
        .ok_or_else(|| PlanError::MalformedAddress(dotted.to_string()))?;

    let mut addr: u32 = 0;
    for i in 1..=4 {
        let octet: u16 = caps[i]
            .parse()
            .map_err(|_| PlanError::MalformedAddress(dotted.to_string()))?;
        if octet > 255 {
            return Err(PlanError::MalformedAddress(dotted.to_string()));
        }
        addr = (addr << 8) | octet as u32;
    }
    Ok(addr)
}

/// Render a 32-bit address in dotted-decimal form.
pub fn to_dotted(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// Prefixes above 32 are treated as /32.
pub fn get_cidr_mask(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Network address of `addr` under `prefix`.
pub fn network_address(addr: u32, prefix: u8) -> u32 {
    addr & get_cidr_mask(prefix)
}

/// Last address of the block starting at `network`.
pub fn broadcast_address(network: u32, prefix: u8) -> u32 {
    network_address(network, prefix) | !get_cidr_mask(prefix)
}

/// Subnet mask for a prefix, e.g. /26 -> 255.255.255.192.
pub fn prefix_to_mask(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(get_cidr_mask(prefix))
}

/// Wildcard (inverse) mask for a prefix, e.g. /26 -> 0.0.0.63.
pub fn prefix_to_wildcard(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(!get_cidr_mask(prefix))
}

/// Number of addresses in a block of the given prefix.
pub fn block_size(prefix: u8) -> u64 {
    1u64 << (MAX_LENGTH - prefix.min(MAX_LENGTH))
}

/// Usable hosts in a block: all addresses minus network and broadcast.
///
/// /31 and /32 have no usable hosts under this definition.
pub fn usable_host_count(prefix: u8) -> u64 {
    block_size(prefix).saturating_sub(2)
}

/// The largest prefix in `1..=30` whose usable capacity covers `hosts`.
///
/// # Examples
/// ```
/// use vlsm_planner::models::minimal_prefix_for;
/// assert_eq!(minimal_prefix_for(50).unwrap(), 26);
/// assert_eq!(minimal_prefix_for(62).unwrap(), 26);
/// assert_eq!(minimal_prefix_for(63).unwrap(), 25);
/// ```
pub fn minimal_prefix_for(hosts: u64) -> Result<u8> {
    (MIN_PREFIX..=MAX_PREFIX)
        .rev()
        .find(|&prefix| usable_host_count(prefix) >= hosts)
        .ok_or(PlanError::UnsatisfiableHostCount { hosts })
}

/// A CIDR block identified by its network address and prefix length.
///
/// Ordering is by address, then by prefix, so on an address tie the larger block sorts
/// first.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct AddressBlock {
    /// Network address.
    pub addr: u32,
    /// Prefix length (0-32).
    pub prefix: u8,
}

impl AddressBlock {
    /// Create a block, normalising `addr` to the network address of `prefix`.
    pub fn new(addr: u32, prefix: u8) -> Result<AddressBlock> {
        if prefix > MAX_LENGTH {
            return Err(PlanError::InvalidBaseNetwork {
                input: format!("{}/{}", to_dotted(addr), prefix),
                reason: "Network length is too long".to_string(),
            });
        }
        Ok(AddressBlock {
            addr: network_address(addr, prefix),
            prefix,
        })
    }

    /// Parse and validate a base network such as `192.168.1.0/24`.
    ///
    /// The prefix must be within `1..=30`.
    pub fn base_network(cidr: &str) -> Result<AddressBlock> {
        let block: AddressBlock = cidr.parse()?;
        if !(MIN_PREFIX..=MAX_PREFIX).contains(&block.prefix) {
            return Err(PlanError::InvalidBaseNetwork {
                input: cidr.trim().to_string(),
                reason: format!("prefix must be between /{MIN_PREFIX} and /{MAX_PREFIX}"),
            });
        }
        Ok(block)
    }

    /// Number of addresses covered.
    pub fn size(&self) -> u64 {
        block_size(self.prefix)
    }

    /// One past the last address, as u64 so a block ending at 255.255.255.255 does not wrap.
    pub fn end(&self) -> u64 {
        self.addr as u64 + self.size()
    }

    pub fn broadcast(&self) -> u32 {
        broadcast_address(self.addr, self.prefix)
    }

    pub fn first_usable(&self) -> u32 {
        if self.prefix >= MAX_LENGTH - 1 {
            self.addr
        } else {
            self.addr + 1
        }
    }

    pub fn last_usable(&self) -> u32 {
        if self.prefix >= MAX_LENGTH - 1 {
            self.broadcast()
        } else {
            self.broadcast() - 1
        }
    }

    pub fn mask(&self) -> Ipv4Addr {
        prefix_to_mask(self.prefix)
    }

    pub fn wildcard(&self) -> Ipv4Addr {
        prefix_to_wildcard(self.prefix)
    }

    pub fn usable_hosts(&self) -> u64 {
        usable_host_count(self.prefix)
    }

    /// True if `other` lies entirely inside this block.
    pub fn contains(&self, other: &AddressBlock) -> bool {
        other.addr >= self.addr && other.end() <= self.end()
    }

    pub fn overlaps(&self, other: &AddressBlock) -> bool {
        (self.addr as u64) < other.end() && (other.addr as u64) < self.end()
    }
}

impl FromStr for AddressBlock {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<AddressBlock> {
        let s = s.trim();
        let invalid = |reason: String| PlanError::InvalidBaseNetwork {
            input: s.to_string(),
            reason,
        };
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| invalid("expected address/prefix".to_string()))?;
        let addr = to_int(addr).map_err(|e| invalid(e.to_string()))?;
        let prefix: u8 = prefix
            .trim()
            .parse()
            .map_err(|_| invalid(format!("invalid prefix length '{prefix}'")))?;
        if prefix > MAX_LENGTH {
            return Err(invalid("Network length is too long".to_string()));
        }
        AddressBlock::new(addr, prefix)
    }
}

impl Serialize for AddressBlock {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressBlock {
    fn deserialize<D>(deserializer: D) -> std::result::Result<AddressBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl std::fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.addr), self.prefix)
    }
}
