//! Target Resolver - CIDR expansion into probeable host addresses
//!
//! Takes an IPv4 CIDR string such as "192.168.1.0/24" and expands it into
//! the ordered list of host addresses to sweep:
//! - host bits in the input are masked off ("192.168.1.5/24" sweeps 192.168.1.0/24)
//! - blocks with more than two addresses drop the network and broadcast address
//! - "/31" and "/32" blocks are returned whole

use ipnet::Ipv4Net;
use pingsweep_common::{PingsweepError, PingsweepResult};
use std::net::Ipv4Addr;
use tracing::debug;

/// Expands subnets into host lists, optionally refusing oversized blocks.
#[derive(Debug, Clone, Default)]
pub struct TargetResolver {
    max_hosts: Option<u64>,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse subnets that would enumerate more than `limit` hosts.
    pub fn with_max_hosts(mut self, limit: u64) -> Self {
        self.max_hosts = Some(limit);
        self
    }

    /// Resolve a CIDR string into ascending dotted-quad host addresses.
    pub fn resolve(&self, subnet: &str) -> PingsweepResult<Vec<String>> {
        let net = parse_subnet(subnet)?;

        let hosts = host_count(net);
        if let Some(limit) = self.max_hosts {
            if hosts > limit {
                return Err(PingsweepError::TooManyHosts {
                    subnet: net.trunc().to_string(),
                    hosts,
                    limit,
                });
            }
        }

        debug!("Expanding {} into {} host(s)", net.trunc(), hosts);
        Ok(enumerate_hosts(net)
            .into_iter()
            .map(|ip| ip.to_string())
            .collect())
    }
}

/// Parse an IPv4 CIDR string. Surrounding whitespace is rejected.
pub fn parse_subnet(subnet: &str) -> PingsweepResult<Ipv4Net> {
    subnet
        .parse::<Ipv4Net>()
        .map_err(|e| PingsweepError::InvalidSubnet(format!("invalid CIDR notation: {}", e)))
}

/// Number of addresses [`enumerate_hosts`] yields for `net`, without iterating.
pub fn host_count(net: Ipv4Net) -> u64 {
    let block = 1u64 << (32 - u32::from(net.prefix_len()));
    if block > 2 {
        block - 2
    } else {
        block
    }
}

/// Walk the block from its network address upward and collect every address
/// still inside it, then strip network and broadcast when there are more than two.
pub fn enumerate_hosts(net: Ipv4Net) -> Vec<Ipv4Addr> {
    let mask = u32::from(net.netmask());
    let network = u32::from(net.network());

    let mut hosts = Vec::with_capacity(host_count(net).min(1 << 16) as usize + 2);
    let mut octets = net.network().octets();
    loop {
        let addr = Ipv4Addr::from(octets);
        if u32::from(addr) & mask != network {
            break;
        }
        hosts.push(addr);
        if !increment(&mut octets) {
            break;
        }
    }

    if hosts.len() > 2 {
        hosts.pop();
        hosts.remove(0);
    }
    hosts
}

/// Add one to a big-endian address, carrying on 255 -> 0.
/// Returns false when the carry runs off the top octet (255.255.255.255 + 1).
fn increment(octets: &mut [u8; 4]) -> bool {
    for byte in octets.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            return true;
        }
    }
    false
}
