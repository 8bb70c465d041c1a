#![cfg_attr(not(test), no_std)]

//! Temperature alert controller.
//!
//! A sampler loop reads the onboard temperature sensor, classifies the
//! calibrated reading against fixed thresholds and publishes the result into
//! [`state::SharedState`]. An alerter loop running on a second executor reads
//! that state and drives the buzzer and a blinking region of the LED matrix.
//! The matrix is shared by both loops through disjoint [`matrix::Region`]s.

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod alerter;
pub mod buzzer;
pub mod calibration;
pub mod config;
pub mod error;
pub mod input;
pub mod matrix;
pub mod mirror;
pub mod report;
pub mod sampler;
pub mod sensor;
pub mod state;
pub mod thresholds;

pub use error::{Device, Error};
