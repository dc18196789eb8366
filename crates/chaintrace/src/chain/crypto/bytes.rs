use core::fmt;

use chaintrace_serialization::{NumBytes, Read, ReadError, VarUint32, Write, WriteError};
use serde::{Deserialize, Serialize};

/// Opaque byte blob, hex-encoded in JSON, length-prefixed on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(data: Vec<u8>) -> Self {
        Bytes(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::encode(self.0.as_slice()).fmt(f)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(data: Vec<u8>) -> Self {
        Bytes(data)
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        let bytes = hex::decode(hex_string).map_err(serde::de::Error::custom)?;
        Ok(Bytes(bytes))
    }
}

impl NumBytes for Bytes {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.0.len().num_bytes() + self.0.len()
    }
}

impl Read for Bytes {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let len = VarUint32::read(bytes, pos)?.0 as usize;
        if *pos + len > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }
        let data = bytes[*pos..*pos + len].to_vec();
        *pos += len;
        Ok(Bytes(data))
    }
}

impl Write for Bytes {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        VarUint32::from(self.0.len()).write(bytes, pos)?;
        if *pos + self.0.len() > bytes.len() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + self.0.len()].copy_from_slice(&self.0);
        *pos += self.0.len();
        Ok(())
    }
}
