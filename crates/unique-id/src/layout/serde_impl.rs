use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::layout::FieldLayout;

/// Wire shape of a layout: the declared width plus ordered field widths.
#[derive(Serialize, Deserialize)]
struct RawLayout {
    total_bits: u32,
    widths: Vec<u32>,
}

impl Serialize for FieldLayout {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RawLayout {
            total_bits: self.total_bits(),
            widths: self.widths().collect(),
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for FieldLayout {
    /// Deserializes and validates a layout.
    ///
    /// # Errors
    ///
    /// Fails with the same conditions as [`FieldLayout::new`].
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawLayout::deserialize(d)?;
        Self::new(raw.total_bits, raw.widths).map_err(serde::de::Error::custom)
    }
}
