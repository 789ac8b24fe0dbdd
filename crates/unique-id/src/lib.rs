//! Time-sortable 64-bit identifiers.
//!
//! An ID is a fixed-width integer split into fields, most significant first.
//! [`SnowflakeAssembler`] packs values into any [`FieldLayout`]; the
//! [`Instagram`] and [`Sonyflake`] policies fix a layout, an epoch and a tick
//! size, and turn a clock reading, a shard ID and a sequence value into a
//! typed ID.
//!
//! ```
//! use unique_id::{AtomicSequence, MonotonicClock, generate_instagram_id};
//!
//! let clock = MonotonicClock::default();
//! let sequence = AtomicSequence::for_width(10);
//!
//! let id = generate_instagram_id(&clock, &sequence, 5).unwrap();
//! assert_eq!((id >> 10) & 0x1FFF, 5);
//! ```

pub mod assembler;
pub mod error;
pub mod generator;
pub mod id;
pub mod layout;
pub mod policy;
pub mod sequence;
pub mod time;

pub use crate::assembler::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::policy::*;
pub use crate::sequence::*;
pub use crate::time::*;
