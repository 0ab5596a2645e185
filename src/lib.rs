//! An undamped spring, simulated with Hooke's Law and drawn in the terminal.
pub mod config;
pub mod driver;
pub mod graphics;
pub mod math;
pub mod render;
pub mod state;
pub mod terminal;
pub mod vertex;
pub mod widget;
