//! Stable fingerprint of a recorded graph.
//!
//! FNV-1a over the registration stream. Not cryptographic; used to
//! compare two assembly runs for equality.

use crate::recording::RecordingEngine;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u32(hash: u64, v: u32) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Length-prefixed so that `("ab", "c")` and `("a", "bc")` differ.
#[inline]
fn fnv1a_str(hash: u64, s: &str) -> u64 {
    let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
    fnv1a_bytes(fnv1a_u32(hash, len), s.as_bytes())
}

/// Hash every component (name, type tag, parameters in insertion order)
/// and every link (name, delay, bound ends) in registration order.
///
/// Two runs that issue the same registrations in the same order produce
/// the same fingerprint. An empty engine hashes to the FNV offset basis
/// folded with two zero counts.
pub fn fingerprint(engine: &RecordingEngine) -> u64 {
    let mut hash = FNV_OFFSET;

    hash = fnv1a_u32(hash, engine.component_count() as u32);
    for (_, name, record) in engine.components() {
        hash = fnv1a_str(hash, name);
        hash = fnv1a_str(hash, &record.type_tag);
        hash = fnv1a_u32(hash, record.params.len() as u32);
        for (key, value) in &record.params {
            hash = fnv1a_str(hash, key);
            hash = fnv1a_str(hash, value);
        }
    }

    hash = fnv1a_u32(hash, engine.link_count() as u32);
    for (_, name, record) in engine.links() {
        hash = fnv1a_str(hash, name);
        hash = fnv1a_str(hash, &record.delay.to_string());
        match record.ends {
            Some((a, b)) => {
                hash = fnv1a_bytes(hash, &[1]);
                for end in [a, b] {
                    hash = fnv1a_u32(hash, end.component.0);
                    hash = fnv1a_str(hash, end.port.as_str());
                }
            }
            None => hash = fnv1a_bytes(hash, &[0]),
        }
    }

    hash
}
