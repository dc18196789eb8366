use core::fmt;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::{Deserialize, Serialize};

pub const SIGNATURE_SIZE: usize = 65;

/// Compact recoverable signature. Carried opaquely in traces; this crate
/// never verifies or recovers keys from it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }
}

impl Default for Signature {
    fn default() -> Self {
        Signature([0u8; SIGNATURE_SIZE])
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::encode(self.0).fmt(f)
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        let bytes = hex::decode(hex_string).map_err(serde::de::Error::custom)?;
        if bytes.len() != SIGNATURE_SIZE {
            return Err(serde::de::Error::custom("signature must be 65 bytes"));
        }
        let mut sig = [0u8; SIGNATURE_SIZE];
        sig.copy_from_slice(&bytes);
        Ok(Signature(sig))
    }
}

impl NumBytes for Signature {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        SIGNATURE_SIZE
    }
}

impl Read for Signature {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if *pos + SIGNATURE_SIZE > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }
        let mut sig = [0u8; SIGNATURE_SIZE];
        sig.copy_from_slice(&bytes[*pos..*pos + SIGNATURE_SIZE]);
        *pos += SIGNATURE_SIZE;
        Ok(Signature(sig))
    }
}

impl Write for Signature {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        if *pos + SIGNATURE_SIZE > bytes.len() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + SIGNATURE_SIZE].copy_from_slice(&self.0);
        *pos += SIGNATURE_SIZE;
        Ok(())
    }
}
