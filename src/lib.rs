pub mod analysis;
pub mod error;
pub mod mining;
pub mod records;
pub mod tree;

/// dimensional analysis types
type Count = i64;
type Information = f64;
type Ratio = f64;

// mining parameters
const MAX_LEVEL: usize = 3;
const T_ALPHA: Count = 5;
const FIRSTS_N: usize = 20;
const ELBOW_PROMINENCE: f64 = 0.1;

// saturation guards
const ARITY_LIMIT: usize = 1 << 31;
const RECORD_LIMIT: u128 = 1 << 63;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging for the binaries
#[cfg(feature = "cli")]
pub fn init() {
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        simplelog::ConfigBuilder::new()
            .set_location_level(log::LevelFilter::Off)
            .set_target_level(log::LevelFilter::Off)
            .set_thread_level(log::LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
