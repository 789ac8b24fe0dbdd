mod field;
mod field_layout;
#[cfg(feature = "serde")]
mod serde_impl;

pub use field::*;
pub use field_layout::*;
