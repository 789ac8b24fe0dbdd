mod atomic;
mod interface;
mod registry;

pub use atomic::*;
pub use interface::*;
pub use registry::*;
