//! Driver library for the dual-controller 13.3" six-color e-paper panel (1200x1600, two 600 pixel
//! wide halves each behind its own controller and chip select line).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
#[macro_use]
mod testing;

pub mod color;
pub mod command;
pub mod compositor;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod splash;
pub mod status;

// Re-exports for primary API.
pub use color::Color;
pub use command::consts;
pub use compositor::{HalfRow, Panel, RowSource};
pub use config::Config;
pub use display::{Display, Frame, State};
pub use error::Error;
pub use interface::spi::SpiInterface;
pub use interface::{ChipSelect, DisplayInterface};
pub use splash::BootSplash;
pub use status::StatusLines;
