
#[cfg(feature = "std")]
pub mod live;
