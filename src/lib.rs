//! Panoview library
//!
//! Gyroscope- and swipe-driven camera control for a 360° panorama viewer,
//! provided as a library to enable integration testing.

pub mod cli;
pub mod config;
pub mod events;
pub mod orientation;
pub mod platform;
pub mod plugins;
pub mod prelude;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;
