pub mod atlas;
pub mod dxt5;
pub mod pixel;
pub mod rl;
