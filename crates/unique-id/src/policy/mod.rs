mod instagram;
mod interface;
mod sonyflake;

pub use instagram::*;
pub use interface::*;
pub use sonyflake::*;
