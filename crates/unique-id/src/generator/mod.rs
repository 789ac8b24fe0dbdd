mod sharded;
#[cfg(test)]
mod tests;

pub use sharded::*;
