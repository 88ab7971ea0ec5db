pub mod cache;
pub mod combos;
pub mod contingency;
pub mod elbow;
pub mod grouping;
pub mod mutual;
pub mod pairing;
