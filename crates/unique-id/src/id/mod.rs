mod interface;
mod packed;

pub use interface::*;
pub use packed::*;
