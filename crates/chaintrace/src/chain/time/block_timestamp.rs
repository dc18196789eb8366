use core::fmt;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};
use time::{Duration, OffsetDateTime, macros::format_description};

/// Block production slot: 500ms intervals since 2000-01-01T00:00:00Z.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct BlockTimestamp {
    pub slot: u32,
}

impl BlockTimestamp {
    pub const BLOCK_INTERVAL_MS: i32 = 500;
    pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000; // 2000-01-01T00:00:00Z

    #[inline]
    pub const fn new(slot: u32) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let dur = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let now_ms: i128 =
            (dur.as_secs() as i128) * 1_000 + (dur.subsec_nanos() as i128) / 1_000_000;

        let epoch_ms = Self::BLOCK_TIMESTAMP_EPOCH_MS as i128;
        let interval = Self::BLOCK_INTERVAL_MS as i128;

        // Truncate to the lower 500ms boundary; clamp before-epoch to 0
        let delta = (now_ms - epoch_ms).max(0);
        let slot_i128 = delta / interval;

        let slot = if slot_i128 > u32::MAX as i128 {
            u32::MAX
        } else {
            slot_i128 as u32
        };

        Self { slot }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn to_block_string(&self) -> String {
        // total ms since Unix epoch
        let total_ms = (self.slot as i64) * (Self::BLOCK_INTERVAL_MS as i64)
            + Self::BLOCK_TIMESTAMP_EPOCH_MS;

        let secs = total_ms.div_euclid(1000);
        let rem_ms = total_ms.rem_euclid(1000);

        let mut dt =
            OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH);
        dt += Duration::milliseconds(rem_ms);

        // "YYYY-MM-DDTHH:MM:SS.sss" with no zone suffix
        const FMT: &[time::format_description::FormatItem<'_>] = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
        );

        dt.format(FMT).unwrap_or_default()
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_block_string())
    }
}

impl Serialize for BlockTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_block_string())
    }
}

impl<'de> Deserialize<'de> for BlockTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BtVisitor;

        impl<'de> Visitor<'de> for BtVisitor {
            type Value = BlockTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(r#"a block timestamp like "YYYY-MM-DDTHH:MM:SS.sss""#)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                const FMT: &[time::format_description::FormatItem<'_>] = format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
                );
                let trimmed = v.trim_end_matches('Z');
                let dt = time::PrimitiveDateTime::parse(trimmed, FMT)
                    .map_err(|e| E::custom(format!("bad block timestamp: {e}")))?
                    .assume_utc();

                let total_ms = dt.unix_timestamp() * 1_000
                    + (dt.millisecond() as i64);
                let delta = total_ms - BlockTimestamp::BLOCK_TIMESTAMP_EPOCH_MS;
                if delta < 0 {
                    return Err(E::custom("timestamp precedes the block epoch"));
                }
                let slot = delta / (BlockTimestamp::BLOCK_INTERVAL_MS as i64);
                if slot > u32::MAX as i64 {
                    return Err(E::custom("timestamp out of range"));
                }
                Ok(BlockTimestamp::new(slot as u32))
            }
        }

        deserializer.deserialize_str(BtVisitor)
    }
}

impl NumBytes for BlockTimestamp {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        4
    }
}

impl Read for BlockTimestamp {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok(BlockTimestamp::new(u32::read(bytes, pos)?))
    }
}

impl Write for BlockTimestamp {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.slot.write(bytes, pos)
    }
}
