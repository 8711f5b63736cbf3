//! CIDR validation
//!
//! Candidates that do not parse as `address/prefix` are dropped with a
//! warning. Validation never fails the batch.

use ipnet::IpNet;
use tracing::warn;

/// Check whether a string is a valid IPv4 or IPv6 CIDR network
///
/// Host bits may be set (`10.1.2.3/8` is accepted). A bare address without a
/// prefix length is rejected.
pub fn is_valid_cidr(candidate: &str) -> bool {
    candidate.parse::<IpNet>().is_ok()
}

/// Keep the valid CIDRs from a sequence of candidates
///
/// Each candidate is trimmed first. Blank candidates are skipped silently,
/// invalid ones are logged and skipped.
pub fn filter_valid<'a, I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .filter(|candidate| {
            let valid = is_valid_cidr(candidate);
            if !valid {
                warn!("invalid CIDR [{}]", candidate);
            }
            valid
        })
        .map(str::to_string)
        .collect()
}
