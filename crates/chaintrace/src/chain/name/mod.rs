use core::{fmt, str};
use std::str::FromStr;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::{Deserialize, Deserializer, Serialize};

pub const NAME_CHARS: [u8; 32] = *b".12345abcdefghijklmnopqrstuvwxyz";
pub const NAME_MAX_LEN: usize = 13;

/// Account, action, and permission identifier: up to 13 characters over
/// `.12345a-z`, bit-packed into a u64.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(u64);

impl Name {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Builds a name from a string literal at compile time. Panics on
    /// invalid input, so only use it for well-known names.
    pub const fn named(s: &str) -> Self {
        let bytes = s.as_bytes();
        assert!(bytes.len() <= NAME_MAX_LEN, "name is too long");

        let mut value = 0u64;
        let mut len = 0usize;
        while len < bytes.len() && len < 12 {
            value <<= 5;
            value |= char_to_value_const(bytes[len]) as u64;
            len += 1;
        }
        if len == 0 {
            return Name(0);
        }
        value <<= 4 + 5 * (12 - len);

        if bytes.len() == NAME_MAX_LEN {
            let v = char_to_value_const(bytes[12]);
            // The 13th character only has 4 bits available.
            assert!(v <= 0x0F, "13th character out of range");
            value |= v as u64;
        }

        Name(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub const fn empty(&self) -> bool {
        self.0 == 0
    }

    pub fn as_bytes(&self) -> [u8; NAME_MAX_LEN] {
        name_to_bytes(self.0)
    }
}

const fn char_to_value_const(c: u8) -> u8 {
    match c {
        b'.' => 0,
        b'1'..=b'5' => c - b'1' + 1,
        b'a'..=b'z' => c - b'a' + 6,
        _ => panic!("bad character in name"),
    }
}

impl From<u64> for Name {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<Name> for u64 {
    fn from(n: Name) -> Self {
        n.0
    }
}

impl FromStr for Name {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = name_from_bytes(s.bytes())?;
        Ok(name.into())
    }
}

impl fmt::Display for Name {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = name_to_bytes(self.0);
        let value = str::from_utf8(&bytes)
            .map(|s| s.trim_end_matches('.'))
            .map_err(|_| fmt::Error)?;
        write!(f, "{}", value)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Name::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl NumBytes for Name {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.0.num_bytes()
    }
}

impl Read for Name {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok(Name(u64::read(bytes, pos)?))
    }
}

impl Write for Name {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.0.write(bytes, pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParseNameError {
    /// The name contains a disallowed character.
    BadChar(u8),
    /// The name is over the maximum allowed length.
    TooLong,
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNameError::BadChar(c) => write!(f, "bad character in name: '{}'", *c as char),
            ParseNameError::TooLong => write!(f, "name is too long"),
        }
    }
}

impl std::error::Error for ParseNameError {}

pub fn name_from_bytes<I>(mut iter: I) -> Result<u64, ParseNameError>
where
    I: Iterator<Item = u8>,
{
    let mut value = 0_u64;
    let mut len = 0_u64;

    // Loop through up to 12 characters
    while let Some(c) = iter.next() {
        let v = char_to_value(c).ok_or(ParseNameError::BadChar(c))?;
        value <<= 5;
        value |= u64::from(v);
        len += 1;

        if len == 12 {
            break;
        }
    }

    if len == 0 {
        return Ok(0);
    }

    value <<= 4 + 5 * (12 - len);

    // Check if we have a 13th character
    if let Some(c) = iter.next() {
        let v = char_to_value(c).ok_or(ParseNameError::BadChar(c))?;

        // The 13th character can only be 4 bits, it has to be between letters
        // 'a' to 'j'
        if v > 0x0F {
            return Err(ParseNameError::BadChar(c));
        }

        value |= u64::from(v);

        // Check if we have more than 13 characters
        if iter.next().is_some() {
            return Err(ParseNameError::TooLong);
        }
    }

    Ok(value)
}

fn char_to_value(c: u8) -> Option<u8> {
    if c == b'.' {
        Some(0)
    } else if (b'1'..=b'5').contains(&c) {
        Some(c - b'1' + 1)
    } else if c.is_ascii_lowercase() {
        Some(c - b'a' + 6)
    } else {
        None
    }
}

#[inline]
#[must_use]
pub fn name_to_bytes(value: u64) -> [u8; NAME_MAX_LEN] {
    let mut chars = [b'.'; NAME_MAX_LEN];
    if value == 0 {
        return chars;
    }

    let mask = 0xF800_0000_0000_0000;
    let mut v = value;
    for (i, c) in chars.iter_mut().enumerate() {
        let index = (v & mask) >> (if i == 12 { 60 } else { 59 });
        *c = NAME_CHARS[index as usize];
        v <<= 5;
    }
    chars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for s in ["chain", "active", "onblock", "a", "abc.def", "zzzzzzzzzzzzj"] {
            let name = Name::from_str(s).unwrap();
            assert_eq!(name.to_string(), s);
        }
    }

    #[test]
    fn const_parser_matches_runtime_parser() {
        assert_eq!(Name::named("chain"), Name::from_str("chain").unwrap());
        assert_eq!(Name::named("active"), Name::from_str("active").unwrap());
        assert_eq!(Name::named("onblock"), Name::from_str("onblock").unwrap());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Name::from_str("UPPER").is_err());
        assert!(Name::from_str("zzzzzzzzzzzzzz").is_err());
        assert_eq!(Name::from_str("").unwrap(), Name::new(0));
    }

    #[test]
    fn binary_form_is_u64() {
        let name = Name::named("onblock");
        let packed = name.pack().unwrap();
        assert_eq!(packed.len(), 8);
        assert_eq!(Name::unpack(&packed).unwrap(), name);
    }
}
