//! Content identity for curves.
//!
//! A loaded curve is identified by SHA-256 over the little-endian bytes of
//! its raw Y samples, base64 encoded. Empty curves and live streams get a
//! random UUID instead, so they never compare equal to anything.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveIdentity(String);

impl CurveIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CurveIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Hash of `ys`, or `None` for an empty series.
pub fn content_identity(ys: &[f64]) -> Option<CurveIdentity> {
    if ys.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    for y in ys {
        hasher.update(y.to_le_bytes());
    }
    Some(CurveIdentity(STANDARD.encode(hasher.finalize())))
}

pub fn generate_identity(ys: &[f64], is_stream: bool) -> CurveIdentity {
    if is_stream {
        return CurveIdentity::random();
    }
    content_identity(ys).unwrap_or_else(CurveIdentity::random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_stability() {
        let a = generate_identity(&[1.0, 2.0, 3.0], false);
        let b = generate_identity(&[1.0, 2.0, 3.0], false);
        assert_eq!(a, b);
        // 32 bytes -> 44 base64 characters
        assert_eq!(a.as_str().len(), 44);
    }

    #[test]
    fn hash_known_value() {
        // sha256 of eight zero bytes
        let id = content_identity(&[0.0]).unwrap();
        assert_eq!(id.as_str(), "r1Vw9aGBC3r3jK9LxwpmDw31HkK6+R1N5bIyjeDoPfw=");

        let id = content_identity(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(id.as_str(), "po3ktelqYMjOs8e375NGFyW9u/81FrE2WFp0O1wOxmQ=");
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = generate_identity(&[1.0, 2.0, 3.0], false);
        let b = generate_identity(&[1.0, 2.0, 3.5], false);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_and_stream_curves_are_unique() {
        assert!(content_identity(&[]).is_none());
        assert_ne!(generate_identity(&[], false), generate_identity(&[], false));
        assert_ne!(
            generate_identity(&[1.0], true),
            generate_identity(&[1.0], true)
        );
    }

    #[test]
    fn negative_zero_is_distinct() {
        assert_ne!(content_identity(&[0.0]), content_identity(&[-0.0]));
    }

    proptest! {
        #[test]
        fn deterministic(ys in proptest::collection::vec(-1e9f64..1e9, 1..64)) {
            prop_assert_eq!(content_identity(&ys), content_identity(&ys.clone()));
        }
    }
}
