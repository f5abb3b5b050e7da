//! Persisted layout: the two string entries the store keeps in the medium.

use tracing::warn;

use crate::policy::Policy;

/// Key holding the JSON array of policy records, in insertion order.
pub const POLICIES_KEY: &str = "insurance_policies";

/// Key holding the decimal-encoded next id to allocate.
pub const NEXT_ID_KEY: &str = "insurance_policies_next_id";

/// Allocator value for a store with no history.
pub(crate) const FIRST_ID: u64 = 1;

pub(crate) fn encode_policies(policies: &[Policy]) -> Result<String, serde_json::Error> {
    serde_json::to_string(policies)
}

/// Decode a persisted collection. Corrupt data degrades to empty.
pub(crate) fn decode_policies(raw: &str) -> Vec<Policy> {
    match serde_json::from_str(raw) {
        Ok(policies) => policies,
        Err(e) => {
            warn!(error = %e, "corrupt policy collection in medium, starting empty");
            Vec::new()
        }
    }
}

pub(crate) fn encode_next_id(next_id: u64) -> String {
    next_id.to_string()
}

/// Decode the persisted counter, clamped so it can never re-issue an id
/// already present in `policies`. A missing or corrupt entry falls back to
/// one past the highest stored id.
pub(crate) fn decode_next_id(raw: Option<&str>, policies: &[Policy]) -> u64 {
    let floor = policies
        .iter()
        .map(|p| p.id + 1)
        .max()
        .unwrap_or(FIRST_ID);
    match raw.map(|s| s.trim().parse::<u64>()) {
        Some(Ok(stored)) => stored.max(floor),
        Some(Err(e)) => {
            warn!(error = %e, "corrupt next-id entry in medium");
            floor
        }
        None => floor,
    }
}
