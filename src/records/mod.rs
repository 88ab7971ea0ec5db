pub mod codebook;
pub mod dataset;
pub mod source;
#[cfg(feature = "database")]
pub mod store;
pub mod table;
