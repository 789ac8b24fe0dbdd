use core::fmt;

use crate::id::PackedId;

macro_rules! define_packed_id {
    (
        $(#[$meta:meta])*
        $name:ident {
            total_bits: $total:expr,
            timestamp: ($ts_bits:expr, $ts_shift:expr),
            shard_id: ($shard_bits:expr, $shard_shift:expr),
            sequence: ($seq_bits:expr, $seq_shift:expr) $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: i64,
        }

        impl $name {
            /// Width of the whole ID in bits.
            pub const TOTAL_BITS: u32 = $total;

            /// Width of the timestamp field.
            pub const TIMESTAMP_BITS: u32 = $ts_bits;

            /// Width of the shard field.
            pub const SHARD_ID_BITS: u32 = $shard_bits;

            /// Width of the sequence field.
            pub const SEQUENCE_BITS: u32 = $seq_bits;

            /// Bitmask for the timestamp field, before shifting.
            pub const TIMESTAMP_MASK: i64 = (1 << Self::TIMESTAMP_BITS) - 1;

            /// Bitmask for the shard field, before shifting.
            pub const SHARD_ID_MASK: i64 = (1 << Self::SHARD_ID_BITS) - 1;

            /// Bitmask for the sequence field, before shifting.
            pub const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

            /// Bit position of the timestamp field.
            pub const TIMESTAMP_SHIFT: u32 = $ts_shift;

            /// Bit position of the shard field.
            pub const SHARD_ID_SHIFT: u32 = $shard_shift;

            /// Bit position of the sequence field.
            pub const SEQUENCE_SHIFT: u32 = $seq_shift;

            /// Packs components, masking each one to its field width.
            pub const fn from(timestamp: i64, shard_id: i64, sequence: i64) -> Self {
                let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let shard_id = (shard_id & Self::SHARD_ID_MASK) << Self::SHARD_ID_SHIFT;
                let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self {
                    id: timestamp | shard_id | sequence,
                }
            }

            /// Extracts the timestamp from the packed ID.
            pub const fn timestamp(&self) -> i64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the shard ID from the packed ID.
            pub const fn shard_id(&self) -> i64 {
                (self.id >> Self::SHARD_ID_SHIFT) & Self::SHARD_ID_MASK
            }

            /// Extracts the sequence number from the packed ID.
            pub const fn sequence(&self) -> i64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            pub const fn to_raw(&self) -> i64 {
                self.id
            }

            pub const fn from_raw(raw: i64) -> Self {
                Self { id: raw }
            }
        }

        impl PackedId for $name {
            const TOTAL_BITS: u32 = $total;
            const TIMESTAMP_BITS: u32 = $ts_bits;
            const SHARD_ID_BITS: u32 = $shard_bits;
            const SEQUENCE_BITS: u32 = $seq_bits;

            fn timestamp(&self) -> i64 {
                self.timestamp()
            }

            fn shard_id(&self) -> i64 {
                self.shard_id()
            }

            fn sequence(&self) -> i64 {
                self.sequence()
            }

            fn from_components(timestamp: i64, shard_id: i64, sequence: i64) -> Self {
                debug_assert!(
                    (0..=Self::TIMESTAMP_MASK).contains(&timestamp),
                    "timestamp overflow"
                );
                debug_assert!(
                    (0..=Self::SHARD_ID_MASK).contains(&shard_id),
                    "shard_id overflow"
                );
                debug_assert!(
                    (0..=Self::SEQUENCE_MASK).contains(&sequence),
                    "sequence overflow"
                );
                Self::from(timestamp, shard_id, sequence)
            }

            fn to_raw(&self) -> i64 {
                self.id
            }

            fn from_raw(raw: i64) -> Self {
                Self { id: raw }
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self::from_raw(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.to_raw()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .field("timestamp", &self.timestamp())
                    .field("shard_id", &self.shard_id())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_packed_id! {
    /// A 64-bit ID using Instagram's sharding layout
    ///
    /// - 41 bits timestamp (ms since [`INSTAGRAM_EPOCH`])
    /// - 13 bits shard ID
    /// - 10 bits sequence
    ///
    /// ```text
    ///  Bit Index:  63             23 22            10 9              0
    ///              +----------------+----------------+---------------+
    ///  Field:      | timestamp (41) | shard ID (13)  | sequence (10) |
    ///              +----------------+----------------+---------------+
    ///              |<----- MSB ---------- 64 bits --------- LSB ---->|
    /// ```
    ///
    /// The timestamp reaches the sign bit about 35 years after the epoch, after
    /// which raw values turn negative and stop sorting as integers.
    ///
    /// [`INSTAGRAM_EPOCH`]: crate::time::INSTAGRAM_EPOCH
    InstagramId {
        total_bits: 64,
        timestamp: (41, 23),
        shard_id: (13, 10),
        sequence: (10, 0),
    }
}

define_packed_id! {
    /// A 63-bit ID using Sony's Sonyflake layout
    ///
    /// - 1 bit unused (always zero, so raw values are never negative)
    /// - 39 bits timestamp (milliseconds since [`SONYFLAKE_EPOCH`])
    /// - 8 bits sequence
    /// - 16 bits shard (machine) ID
    ///
    /// ```text
    ///  Bit Index:  63         63 62             24 23           16 15             0
    ///              +------------+-----------------+---------------+---------------+
    ///  Field:      | unused (1) | timestamp (39)  | sequence (8)  | shard ID (16) |
    ///              +------------+-----------------+---------------+---------------+
    ///              |<----------- MSB ------------ 64 bits ------------ LSB ------>|
    /// ```
    ///
    /// The sequence sits above the shard ID, so within one tick IDs order by
    /// sequence first and shard ID last.
    ///
    /// [`SONYFLAKE_EPOCH`]: crate::time::SONYFLAKE_EPOCH
    SonyflakeId {
        total_bits: 63,
        timestamp: (39, 24),
        shard_id: (16, 0),
        sequence: (8, 16),
    }
}
