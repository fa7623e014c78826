pub mod downsample;
pub mod export;
pub mod sample;
pub mod signal;
pub mod window;
