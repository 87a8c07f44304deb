pub mod config;
pub mod distraction;
pub mod session;
pub mod stats;
pub mod theme;
pub mod timer;
