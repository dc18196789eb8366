use serde::{Deserialize, Serialize};

use crate::{NumBytes, Read, ReadError, Write, WriteError};

/// Unsigned 32-bit integer in LEB128-style variable-length encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VarUint32(pub u32);

impl NumBytes for VarUint32 {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        let v = self.0;
        if v == 0 {
            return 1;
        }
        let bits = 32 - v.leading_zeros();
        core::cmp::min((bits as usize + 6) / 7, 5)
    }
}

impl Read for VarUint32 {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let mut result: u32 = 0;
        let mut shift = 0u32;

        // u32 needs at most 5 groups of 7 bits; the 5th group holds 4 bits.
        for i in 0..5 {
            if *pos >= bytes.len() {
                return Err(ReadError::NotEnoughBytes);
            }
            let byte = bytes[*pos];
            *pos += 1;

            let low7 = (byte & 0x7F) as u32;

            if i == 4 && (low7 & 0xF0) != 0 {
                return Err(ReadError::Overflow);
            }

            result |= low7 << shift;

            if (byte & 0x80) == 0 {
                return Ok(VarUint32(result));
            }

            shift += 7;
        }

        // Five continuation bits seen, too long for u32.
        Err(ReadError::ParseError)
    }
}

impl Write for VarUint32 {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        let need = self.num_bytes();
        if bytes.len() < *pos + need {
            return Err(WriteError::NotEnoughSpace);
        }

        let mut v = self.0;
        loop {
            let mut b = (v & 0x7F) as u8;
            v >>= 7;
            if v != 0 {
                b |= 0x80;
            }
            bytes[*pos] = b;
            *pos += 1;
            if v == 0 {
                break;
            }
        }
        Ok(())
    }
}

impl From<usize> for VarUint32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from(v: usize) -> Self {
        Self(v as u32)
    }
}

impl From<u32> for VarUint32 {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<u16> for VarUint32 {
    fn from(v: u16) -> Self {
        Self(v.into())
    }
}

impl From<u8> for VarUint32 {
    fn from(v: u8) -> Self {
        Self(v.into())
    }
}

impl From<VarUint32> for u32 {
    fn from(v: VarUint32) -> Self {
        v.0
    }
}

impl Serialize for VarUint32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for VarUint32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(VarUint32(u32::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Read, Write};

    #[test]
    fn boundary_values_round_trip() {
        for v in [0u32, 1, 127, 128, 16383, 16384, u32::MAX] {
            let packed = VarUint32(v).pack().unwrap();
            assert_eq!(VarUint32::unpack(&packed).unwrap().0, v);
        }
    }

    #[test]
    fn single_byte_values() {
        assert_eq!(VarUint32(0).pack().unwrap(), vec![0]);
        assert_eq!(VarUint32(127).pack().unwrap(), vec![0x7F]);
        assert_eq!(VarUint32(128).pack().unwrap(), vec![0x80, 0x01]);
    }

    #[test]
    fn overflow_rejected() {
        // 5th byte carries bits beyond 32.
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        assert_eq!(
            VarUint32::read(&bytes, &mut 0).unwrap_err(),
            ReadError::Overflow
        );
    }
}
