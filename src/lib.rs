#![cfg_attr(not(test), no_std)]
//! nRF24L01 Register Interface
//!
//! This crate provides register-level access to the Nordic nRF24L01 and
//! nRF24L01+ 2.4GHz transceivers over SPI. It frames instruction bytes,
//! register addresses and payloads into bus transactions and sequences the
//! CSN line around them. Higher layers (packet handling, pipe management,
//! radio configuration policy) are built on top of it.
//!
//! # Bus Protocol
//! - SPI mode 0 (clock idle low, data sampled on the rising edge)
//! - MSB first, up to 10MHz
//! - CSN low for the whole transaction, high between transactions
//! - 1 instruction byte, answered with STATUS, then 0 to 32 payload bytes
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface
//!   - The five register operations: read one/many bytes, write one/many
//!     bytes, send a bare instruction
//!   - Typed register access through `regiface`
//!
//! - [`bus`]: The [`BusTransport`] capability a [`Device`] is built on
//!   - [`SpiTransport`] implements it over embedded-hal SPI, GPIO and delay
//!
//! - [`commands`]: Instruction opcodes and the [`Status`] byte
//!
//! - [`registers`]: Register map definitions for direct hardware access
//!
//! # Important Notes
//! - Register indices at or above [`NUM_REGISTERS`] never reach the bus
//! - Reads of such indices report [`Status::SENTINEL`] (`0xFF`), which a
//!   chip could also legitimately return
//! - Writes of such indices fail with [`Error::InvalidRegister`]
//! - Bus failures are reported, but a missing or stuck chip is not detected
//!   and shows up as wrong data
//! - Nothing here locks: devices sharing one SPI bus must be serialized by
//!   their owner
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
//! use nrf24l01_iface::{commands::FLUSH_TX, Device, SpiTransport};
//!
//! fn setup<SPI: SpiBus, CS: OutputPin, D: DelayNs>(spi: SPI, csn: CS, delay: D) {
//!     let Ok(transport) = SpiTransport::new(spi, csn, delay) else {
//!         return;
//!     };
//!     let mut device = Device::new(transport, 4_000_000);
//!
//!     let _ = device.write_command(FLUSH_TX);
//! }
//! ```

pub mod bus;
pub mod commands;
pub mod device;
pub mod error;
pub mod registers;

#[cfg(test)]
mod testutils;

pub use bus::{BusSettings, BusTransport, SpiTransport};
pub use commands::{Status, NUM_REGISTERS};
pub use device::Device;
pub use error::{BusError, Error};
