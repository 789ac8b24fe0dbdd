use core::slice;

use crate::{
    error::{ConfigError, Error, Result},
    layout::Field,
};

/// Widest container a layout may declare.
pub const MAX_TOTAL_BITS: u32 = 64;

/// The declarative bit-width and ordering contract for one ID format.
///
/// Fields are listed most significant first. The first field occupies the
/// highest bits of the container and each following field sits directly
/// below the previous one, so comparing two packed values compares the
/// first field before any other.
///
/// A layout narrower than 64 bits is right-justified: the unused high bits
/// of the container stay zero.
///
/// Every `FieldLayout` that exists has passed validation, so its widths
/// always add up to [`FieldLayout::total_bits`] and it never exceeds
/// [`MAX_TOTAL_BITS`]. Layouts are not mutated after construction.
///
/// # Example
///
/// ```
/// use unique_id::layout::FieldLayout;
///
/// let layout = FieldLayout::new(64, [41, 13, 10]).unwrap();
/// assert_eq!(layout.total_bits(), 64);
/// assert_eq!(layout.offset(1), Some(41));
/// assert_eq!(layout.shift(1), Some(10));
/// assert_eq!(layout.max_value(2), Some(1023));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldLayout {
    total_bits: u32,
    fields: Vec<Field>,
}

impl FieldLayout {
    /// Builds a layout from a declared total width and ordered field widths.
    ///
    /// There is no cap on the number of fields beyond what the widths
    /// themselves allow.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoFields`] if `widths` is empty
    /// - [`ConfigError::ZeroWidth`] if any width is zero
    /// - [`Error::LayoutTooWide`] if `total_bits` exceeds [`MAX_TOTAL_BITS`]
    /// - [`Error::WidthMismatch`] if the widths do not add up to `total_bits`
    pub fn new(total_bits: u32, widths: impl IntoIterator<Item = u32>) -> Result<Self> {
        let widths: Vec<u32> = widths.into_iter().collect();

        if widths.is_empty() {
            return Err(ConfigError::NoFields.into());
        }
        if let Some(index) = widths.iter().position(|&width| width == 0) {
            return Err(ConfigError::ZeroWidth { index }.into());
        }
        if total_bits > MAX_TOTAL_BITS {
            return Err(Error::LayoutTooWide {
                total_bits,
                max: MAX_TOTAL_BITS,
            });
        }

        let actual = widths
            .iter()
            .fold(0u32, |sum, &width| sum.saturating_add(width));
        if actual != total_bits {
            return Err(Error::WidthMismatch {
                expected: total_bits,
                actual,
            });
        }

        let mut offset = 0;
        let fields = widths
            .into_iter()
            .map(|width| {
                let field = Field {
                    width,
                    offset,
                    shift: total_bits - offset - width,
                };
                offset += width;
                field
            })
            .collect();

        Ok(Self { total_bits, fields })
    }

    /// Declared width of the container in bits.
    pub const fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Number of fields in the layout.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed layout.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the placement of field `index`.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Iterates over the fields, most significant first.
    pub fn fields(&self) -> slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Width of field `index` in bits.
    pub fn width(&self, index: usize) -> Option<u32> {
        self.field(index).map(Field::width)
    }

    /// Offset of field `index` from the top of the container, i.e. the sum
    /// of all preceding widths.
    pub fn offset(&self, index: usize) -> Option<u32> {
        self.field(index).map(Field::offset)
    }

    /// Bit position of the least significant bit of field `index`.
    pub fn shift(&self, index: usize) -> Option<u32> {
        self.field(index).map(Field::shift)
    }

    /// Largest value field `index` can hold.
    pub fn max_value(&self, index: usize) -> Option<i64> {
        self.field(index).map(Field::max_value)
    }

    /// Reads field `index` back out of a packed value.
    pub fn extract(&self, packed: i64, index: usize) -> Option<i64> {
        self.field(index).map(|field| field.extract(packed))
    }

    /// Splits a packed value into its field values, in layout order.
    ///
    /// This is the inverse of assembly for values that fit their fields.
    pub fn decompose(&self, packed: i64) -> Vec<i64> {
        self.fields
            .iter()
            .map(|field| field.extract(packed))
            .collect()
    }

    /// Ordered field widths, as passed to [`FieldLayout::new`].
    pub fn widths(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        self.fields.iter().map(Field::width)
    }
}

impl<'a> IntoIterator for &'a FieldLayout {
    type Item = &'a Field;
    type IntoIter = slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields()
    }
}
