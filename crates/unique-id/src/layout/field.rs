/// A single field paired with the value to place in it.
///
/// This is the one-shot form used by
/// [`SnowflakeAssembler::assemble_specs`], where the widths and values arrive
/// together instead of through a prebuilt [`FieldLayout`].
///
/// [`SnowflakeAssembler::assemble_specs`]: crate::assembler::SnowflakeAssembler::assemble_specs
/// [`FieldLayout`]: crate::layout::FieldLayout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Number of bits the field occupies.
    pub bit_width: u32,
    /// Raw value for the field. It must already fit in `bit_width` bits.
    pub value: i64,
}

impl FieldSpec {
    pub const fn new(bit_width: u32, value: i64) -> Self {
        Self { bit_width, value }
    }
}

/// Placement of one field inside a [`FieldLayout`].
///
/// ```text
///  Bit Index:  total_bits - 1                                0
///              +------------+-----------------+--------------+
///  Field:      |    ...     |  this (width)   |     ...      |
///              +------------+-----------------+--------------+
///              |<- offset ->|                 |<-- shift --->|
/// ```
///
/// [`FieldLayout`]: crate::layout::FieldLayout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub(crate) width: u32,
    pub(crate) offset: u32,
    pub(crate) shift: u32,
}

impl Field {
    /// Number of bits the field occupies.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Distance from the top of the container to the field's most
    /// significant bit. The first field always has offset zero.
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Bit position of the field's least significant bit.
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Unshifted bitmask covering `width` bits.
    pub const fn mask(&self) -> u64 {
        if self.width >= u64::BITS {
            u64::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Largest non-negative value the field can hold.
    ///
    /// Fields of 63 or 64 bits are capped at [`i64::MAX`] since values are
    /// carried as `i64`.
    pub const fn max_value(&self) -> i64 {
        if self.width >= i64::BITS - 1 {
            i64::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Returns true if `value` fits without touching neighbouring fields.
    pub const fn fits(&self, value: i64) -> bool {
        value >= 0 && value <= self.max_value()
    }

    /// Reads this field out of a packed value.
    pub const fn extract(&self, packed: i64) -> i64 {
        (((packed as u64) >> self.shift) & self.mask()) as i64
    }
}
