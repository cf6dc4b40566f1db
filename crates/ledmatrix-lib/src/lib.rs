//! ledmatrix — pixel-buffer control for WS281x RGB(W) LED strips.
//!
//! A [`MatrixController`] turns a [`HardwareConfig`] and a strip length into
//! a driver descriptor, then exposes index → color access on top of the
//! native ws2811 driver's LED buffer.

pub mod color;
pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod layout;
pub mod matrix;

pub use color::{Color, PackedColor, Rgba8, Rgba16};
pub use config::HardwareConfig;
pub use error::MatrixError;
pub use layout::StripLayout;
pub use matrix::{Matrix, MatrixController, State};
