use core::fmt;
use std::error::Error;

mod primitives;

mod varint;
pub use varint::VarUint32;

/// Error that can be returned when writing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// Not enough space in the buffer.
    NotEnoughSpace,
    /// Failed to convert an integer.
    TryFromIntError,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::NotEnoughSpace => write!(f, "not enough space in buffer"),
            WriteError::TryFromIntError => write!(f, "integer conversion failed"),
        }
    }
}

impl Error for WriteError {}

/// Error that can be returned when reading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// Not enough bytes left in the input.
    NotEnoughBytes,
    /// A variable-length integer did not fit its target type.
    Overflow,
    ParseError,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NotEnoughBytes => write!(f, "not enough bytes"),
            ReadError::Overflow => write!(f, "varint overflow"),
            ReadError::ParseError => write!(f, "parse error"),
        }
    }
}

impl Error for ReadError {}

/// Number of bytes a value occupies in its packed binary form.
pub trait NumBytes {
    fn num_bytes(&self) -> usize;
}

/// Read a value from its packed binary form.
pub trait Read: Sized {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError>;

    fn unpack(bytes: &[u8]) -> Result<Self, ReadError> {
        let mut pos = 0;
        Self::read(bytes, &mut pos)
    }
}

/// Write a value into its packed binary form.
pub trait Write: NumBytes {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError>;

    fn pack(&self) -> Result<Vec<u8>, WriteError> {
        let mut bytes = vec![0u8; self.num_bytes()];
        let mut pos = 0;
        self.write(&mut bytes, &mut pos)?;
        Ok(bytes)
    }
}
