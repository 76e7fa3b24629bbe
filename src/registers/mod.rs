//! Register definitions for the nRF24L01(+) radio
//! Generated from the nRF24L01+ Product Specification v1.0, chapter 9

mod config;
mod pipes;
mod rf;

pub use config::*;
pub use pipes::*;
pub use rf::*;

pub use crate::commands::StatusRegister;
