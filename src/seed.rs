use crate::error::{SeedwalkError, SeedwalkResult};

/// Immutable byte sequence that determines every pseudo-random decision of a
/// run. Parsed from a hex string; never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Parses a hex seed, stripping an optional `0x` prefix.
    ///
    /// Any nonzero number of bytes is accepted here; the RPC fetch path
    /// enforces the 32-byte on-chain width separately.
    pub fn from_hex(s: &str) -> SeedwalkResult<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(SeedwalkError::validation("seed hex must be non-empty"));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| SeedwalkError::validation(format!("invalid seed hex '{s}': {e}")))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> SeedwalkResult<Self> {
        if bytes.is_empty() {
            return Err(SeedwalkError::validation("seed must be non-empty"));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An all-zero value is the on-chain sentinel for "token does not exist".
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
