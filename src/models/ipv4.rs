//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing IPv4 blocks with a prefix length,
//! along with the arithmetic the subnet allocator needs.

use crate::error::{Error, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Addresses AWS reserves in every subnet (network, router, DNS, future, broadcast).
pub const AWS_RESERVED_ADDRESSES: u64 = 5;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use platform_network::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(Error::cidr(format!("prefix length /{len} is too long")))
    } else {
        Ok(mask_bits(len))
    }
}

fn mask_bits(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Ok(Ipv4Addr::from(network_bits | !mask))
}

/// Number of addresses an AWS subnet of this size leaves for hosts.
pub fn usable_hosts(len: u8) -> Result<u64> {
    if len >= MAX_LENGTH - 2 {
        Err(Error::cidr(format!("/{len} leaves no usable hosts")))
    } else {
        Ok((1u64 << (MAX_LENGTH - len)) - AWS_RESERVED_ADDRESSES)
    }
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(de::Error::custom)
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| Error::cidr(format!("invalid CIDR format: {addr_cidr}")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::cidr(format!("invalid IP address: {addr}")))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| Error::cidr(format!("invalid subnet mask: {mask}")))?;
        if mask > MAX_LENGTH {
            return Err(Error::cidr(format!("prefix length /{mask} is too long")));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Get the highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !mask_bits(self.mask))
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & mask_bits(self.mask))
    }

    /// True when the address part has no host bits set.
    pub fn is_network_address(&self) -> bool {
        self.addr == self.lo()
    }

    /// True when `addr` falls inside this block.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }

    /// True when `other` lies entirely inside this block.
    pub fn covers(&self, other: &Ipv4) -> bool {
        self.contains(other.lo()) && self.contains(other.hi())
    }

    /// True when the two blocks share at least one address.
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }

    /// The /24 whose first two octets come from this block and whose third octet is `octet`.
    pub fn with_third_octet(&self, octet: u8) -> Ipv4 {
        let [a, b, _, _] = self.addr.octets();
        Ipv4 {
            addr: Ipv4Addr::new(a, b, octet, 0),
            mask: 24,
        }
    }
}

impl FromStr for Ipv4 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Ipv4> {
        Ipv4::new(s)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_broadcast_addr() {
        let ip = Ipv4Addr::new(10, 20, 16, 0);
        assert_eq!(
            broadcast_addr(ip, 24).unwrap(),
            Ipv4Addr::new(10, 20, 16, 255)
        );
        assert_eq!(
            broadcast_addr(ip, 16).unwrap(),
            Ipv4Addr::new(10, 20, 255, 255)
        );
        assert!(broadcast_addr(ip, 40).is_err());
    }

    #[test]
    fn test_usable_hosts() {
        assert_eq!(usable_hosts(16).unwrap(), 65531);
        assert_eq!(usable_hosts(24).unwrap(), 251);
        assert_eq!(usable_hosts(28).unwrap(), 11);
        assert!(usable_hosts(30).is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let cidr = Ipv4::new(" 10.20.0.0/16 ").unwrap();
        assert_eq!(cidr.addr, Ipv4Addr::new(10, 20, 0, 0));
        assert_eq!(cidr.mask, 16);
        assert_eq!(cidr.to_string(), "10.20.0.0/16");
        assert_eq!("10.20.0.0/16".parse::<Ipv4>().unwrap(), cidr);
        assert!(Ipv4::new("10.20.0.0").is_err());
        assert!(Ipv4::new("10.20.0.300/16").is_err());
        assert!(Ipv4::new("10.20.0.0/33").is_err());
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let cidr = Ipv4::new("10.20.0.0/16").unwrap();
        let json = serde_json::to_string(&cidr).unwrap();
        assert_eq!(json, "\"10.20.0.0/16\"");
        let err = serde_json::from_str::<Ipv4>("\"not-a-cidr\"").unwrap_err();
        assert!(err.to_string().contains("invalid CIDR format"));
    }

    #[test]
    fn test_lo_hi_contains() {
        let vpc = Ipv4::new("10.20.0.0/16").unwrap();
        assert_eq!(vpc.lo(), Ipv4Addr::new(10, 20, 0, 0));
        assert_eq!(vpc.hi(), Ipv4Addr::new(10, 20, 255, 255));
        assert!(vpc.contains(Ipv4Addr::new(10, 20, 48, 7)));
        assert!(!vpc.contains(Ipv4Addr::new(10, 21, 0, 0)));
        assert!(vpc.is_network_address());
        assert!(!Ipv4::new("10.20.1.0/16").unwrap().is_network_address());
    }

    #[test]
    fn test_overlaps_and_covers() {
        let vpc = Ipv4::new("10.20.0.0/16").unwrap();
        let a = Ipv4::new("10.20.16.0/24").unwrap();
        let b = Ipv4::new("10.20.32.0/24").unwrap();
        let wide = Ipv4::new("10.0.0.0/8").unwrap();
        assert!(vpc.covers(&a));
        assert!(!a.covers(&vpc));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&vpc));
        assert!(wide.overlaps(&vpc));
        assert!(!vpc.overlaps(&Ipv4::new("172.16.0.0/12").unwrap()));
    }

    #[test]
    fn test_with_third_octet() {
        let vpc = Ipv4::new("10.20.0.0/16").unwrap();
        assert_eq!(vpc.with_third_octet(0).to_string(), "10.20.0.0/24");
        assert_eq!(vpc.with_third_octet(48).to_string(), "10.20.48.0/24");
    }

    #[test]
    fn test_ip4_cmp() {
        let ip1 = Ipv4::new("10.0.0.1/24").unwrap();
        let ip2 = Ipv4::new("10.0.0.2/24").unwrap();
        let ip3 = Ipv4::new("10.0.0.1/24").unwrap();

        assert!(ip1 < ip2);
        assert!(ip1 == ip3);
        assert!(ip2 >= ip3);
    }
}
