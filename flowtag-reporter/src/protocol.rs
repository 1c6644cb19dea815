//! Protocol-number resolution.
//!
//! Only TCP and UDP are recognized. Every other protocol number, including
//! malformed tokens, falls into the `icmp` bucket; there is no IANA registry.

use std::fmt;

/// IANA protocol number for TCP.
pub const TCP_PROTOCOL_NUMBER: &str = "6";

/// IANA protocol number for UDP.
pub const UDP_PROTOCOL_NUMBER: &str = "17";

/// Canonical protocol name used in lookup keys and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp,
    Udp,
    /// Fallback for every protocol number other than TCP and UDP.
    Icmp,
}

impl Protocol {
    /// Lowercase name as it appears in lookup tables and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a protocol-number token from a flow record to a protocol name.
///
/// Total over all inputs: the token is compared literally, so `"06"` or
/// `" 6"` resolve to the fallback.
pub fn resolve(protocol_number: &str) -> Protocol {
    match protocol_number {
        TCP_PROTOCOL_NUMBER => Protocol::Tcp,
        UDP_PROTOCOL_NUMBER => Protocol::Udp,
        _ => Protocol::Icmp,
    }
}
