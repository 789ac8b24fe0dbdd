#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{ConfigError, Error, Result},
    layout::{FieldLayout, FieldSpec, MAX_TOTAL_BITS},
};

/// Packs ordered field values into a single sortable integer.
///
/// The assembler is stateless: every operation is a pure function of its
/// arguments, so it can be called from any number of threads at once.
///
/// Fields are placed most significant first. For each field in order the
/// running bit count grows by the field's width and the value is shifted to
/// `total_bits - bits_consumed`. After the last field the running count must
/// land exactly on `total_bits`.
///
/// # Caller obligations
///
/// [`SnowflakeAssembler::assemble`] does not mask values. A value wider than
/// its field bleeds its high bits into the more significant neighbour, and a
/// negative value sets every bit above its field. Callers must derive values
/// from sources that are already bounded, e.g. a sequence counter wrapped at
/// `2^width`. Use [`SnowflakeAssembler::assemble_checked`] to reject such
/// values instead.
///
/// # Example
///
/// ```
/// use unique_id::{assembler::SnowflakeAssembler, layout::FieldLayout};
///
/// let layout = FieldLayout::new(8, [4, 4]).unwrap();
/// let packed = SnowflakeAssembler::assemble(&layout, &[0xA, 0x5]).unwrap();
/// assert_eq!(packed, 0xA5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnowflakeAssembler;

impl SnowflakeAssembler {
    /// Packs `values` according to `layout`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::FieldCount`] if `values` and `layout` differ in length
    /// - [`Error::LayoutTooWide`] or [`Error::WidthMismatch`] if the running
    ///   bit count does not fit the layout, which a validated layout never
    ///   produces
    pub fn assemble(layout: &FieldLayout, values: &[i64]) -> Result<i64> {
        Self::check_count(layout, values)?;
        pack(
            layout.total_bits(),
            layout.widths().zip(values.iter().copied()),
        )
    }

    /// Packs `values` according to `layout`, rejecting any value that does not
    /// fit its field.
    ///
    /// # Errors
    ///
    /// Everything [`SnowflakeAssembler::assemble`] returns, plus
    /// [`Error::FieldOverflow`] for the first value that is negative or wider
    /// than its field.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(layout)))]
    pub fn assemble_checked(layout: &FieldLayout, values: &[i64]) -> Result<i64> {
        Self::check_count(layout, values)?;

        for (index, (field, &value)) in layout.fields().zip(values).enumerate() {
            if !field.fits(value) {
                #[cfg(feature = "tracing")]
                tracing::warn!(index, value, max = field.max_value(), "field overflow");
                return Err(Error::FieldOverflow {
                    index,
                    value,
                    max: field.max_value(),
                });
            }
        }

        Self::assemble(layout, values)
    }

    /// Packs width/value pairs into a container of `total_bits`.
    ///
    /// This runs the same algorithm as [`SnowflakeAssembler::assemble`]
    /// without a prebuilt layout, so the layout checks happen around the
    /// packing loop: the container width is checked before any field is
    /// placed and the width sum is checked after the last one.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoFields`] if `specs` is empty
    /// - [`ConfigError::ZeroWidth`] if a spec has zero bits
    /// - [`Error::LayoutTooWide`] if `total_bits` exceeds 64
    /// - [`Error::WidthMismatch`] if the widths do not add up to `total_bits`
    pub fn assemble_specs(total_bits: u32, specs: &[FieldSpec]) -> Result<i64> {
        if specs.is_empty() {
            return Err(ConfigError::NoFields.into());
        }
        if let Some(index) = specs.iter().position(|spec| spec.bit_width == 0) {
            return Err(ConfigError::ZeroWidth { index }.into());
        }
        pack(
            total_bits,
            specs.iter().map(|spec| (spec.bit_width, spec.value)),
        )
    }

    fn check_count(layout: &FieldLayout, values: &[i64]) -> Result<()> {
        if values.len() == layout.len() {
            Ok(())
        } else {
            Err(ConfigError::FieldCount {
                expected: layout.len(),
                actual: values.len(),
            }
            .into())
        }
    }
}

/// Core packing loop. Widths must be non-zero.
fn pack(total_bits: u32, fields: impl IntoIterator<Item = (u32, i64)>) -> Result<i64> {
    if total_bits > MAX_TOTAL_BITS {
        return Err(Error::LayoutTooWide {
            total_bits,
            max: MAX_TOTAL_BITS,
        });
    }

    let mut bits_consumed: u32 = 0;
    let mut result: i64 = 0;
    for (width, value) in fields {
        bits_consumed = bits_consumed.saturating_add(width);
        // A field running past the container has no position; keep counting
        // so the mismatch below reports the real sum.
        if let Some(shift) = total_bits.checked_sub(bits_consumed) {
            result |= value << shift;
        }
    }

    if bits_consumed != total_bits {
        return Err(Error::WidthMismatch {
            expected: total_bits,
            actual: bits_consumed,
        });
    }
    Ok(result)
}
