//! nRF24L01 Register Interface
//!
//! This module provides register-level access to nRF24L01(+) radios. Every
//! operation is one complete SPI transaction:
//!
//! 1. The bus is configured (SPI mode 0, MSB first, the device's clock)
//! 2. CSN is driven low and allowed to settle
//! 3. The instruction byte is sent; the chip answers with its STATUS
//! 4. Zero or more payload bytes are exchanged
//! 5. CSN is driven high and allowed to settle
//!
//! There is no way to leave a transaction open between calls.
//!
//! # Register Indices
//! Only indices below [`NUM_REGISTERS`] are ever placed on the bus. A read
//! of any other index does nothing and reports [`Status::SENTINEL`]; a write
//! does nothing and fails with [`Error::InvalidRegister`].
//!
//! # Example
//! ```no_run
//! use nrf24l01_iface::{Device, SpiTransport, registers::RfChannel};
//! # fn demo<SPI, CS, D>(spi: SPI, csn: CS, delay: D) -> Option<()>
//! # where
//! #     SPI: embedded_hal::spi::SpiBus,
//! #     CS: embedded_hal::digital::OutputPin,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! let transport = SpiTransport::new(spi, csn, delay).ok()?;
//! let mut device = Device::new(transport, 4_000_000);
//!
//! // Raw access
//! device.write_register_byte(0x05, 76).ok()?;
//! let (_status, channel) = device.read_register_byte(0x05).ok()?;
//!
//! // Typed access
//! let channel: RfChannel = device.read_register().ok()?;
//! # Some(())
//! # }
//! ```

use regiface::{ByteArray, FromByteArray, ReadableRegister, WritableRegister};

use crate::bus::{BusSettings, BusTransport};
use crate::commands::{
    is_valid_register, read_instruction, write_instruction, Status, FLUSH_RX, FLUSH_TX, NOP,
    NUM_REGISTERS, REUSE_TX_PL,
};
use crate::error::Error;

/// Byte clocked out while reading a register's content
const FILLER: u8 = 0xFF;

/// Main device interface for the nRF24L01 radio.
///
/// Wraps a [`BusTransport`] together with the bus settings applied at the
/// start of each transaction.
pub struct Device<BUS> {
    bus: BUS,
    settings: BusSettings,
}

impl<BUS> Device<BUS> {
    /// Creates a new Device clocking the bus at `frequency_hz`.
    ///
    /// # Arguments
    /// * `bus` - The transport the radio is attached to, with CSN deasserted
    /// * `frequency_hz` - SCK frequency, at most 10MHz
    pub fn new(bus: BUS, frequency_hz: u32) -> Self {
        Self::with_settings(bus, BusSettings::new(frequency_hz))
    }

    /// Creates a new Device applying `settings` to every transaction.
    pub fn with_settings(bus: BUS, settings: BusSettings) -> Self {
        Self { bus, settings }
    }

    /// Settings applied at the start of every transaction.
    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    /// Releases the underlying transport.
    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS> Device<BUS>
where
    BUS: BusTransport,
{
    /// Runs `f` between `begin` and `end`.
    ///
    /// `end` is attempted even when `f` fails so CSN never stays asserted
    /// after a transfer error; the first error is returned.
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut BUS) -> Result<T, BUS::Error>,
    ) -> Result<T, Error<BUS::Error>> {
        self.bus.begin(&self.settings).map_err(Error::Bus)?;
        let result = f(&mut self.bus);
        let ended = self.bus.end();

        let value = result.map_err(Error::Bus)?;
        ended.map_err(Error::Bus)?;
        Ok(value)
    }

    /// Reads one byte from register `index`.
    ///
    /// Returns the STATUS byte clocked out during the instruction and the
    /// register content.
    ///
    /// If `index` is not below [`NUM_REGISTERS`] nothing is sent and
    /// `(Status::SENTINEL, 0xFF)` is returned. The sentinel is
    /// indistinguishable from a real status of `0xFF`.
    ///
    /// # Errors
    /// * `Error::Bus` - The transport failed
    pub fn read_register_byte(&mut self, index: u8) -> Result<(Status, u8), Error<BUS::Error>> {
        if !is_valid_register(index) {
            #[cfg(feature = "defmt")]
            defmt::warn!("read of invalid register {=u8:#x} ignored", index);
            return Ok((Status::SENTINEL, FILLER));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("R_REGISTER {=u8:#x}", index);

        self.transaction(|bus| {
            let status = bus.transfer_byte(read_instruction(index))?;
            let value = bus.transfer_byte(FILLER)?;
            Ok((Status::from_bits_retain(status), value))
        })
    }

    /// Reads `buf.len()` bytes from register `index` into `buf`.
    ///
    /// Multi-byte registers are read LSByte first. An empty `buf` sends only
    /// the instruction byte.
    ///
    /// If `index` is not below [`NUM_REGISTERS`] nothing is sent, `buf` is
    /// left untouched and [`Status::SENTINEL`] is returned.
    ///
    /// # Errors
    /// * `Error::Bus` - The transport failed; `buf` may be partially filled
    pub fn read_registers(&mut self, index: u8, buf: &mut [u8]) -> Result<Status, Error<BUS::Error>> {
        if !is_valid_register(index) {
            #[cfg(feature = "defmt")]
            defmt::warn!("read of invalid register {=u8:#x} ignored", index);
            return Ok(Status::SENTINEL);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("R_REGISTER {=u8:#x}, {=usize} bytes", index, buf.len());

        self.transaction(|bus| {
            let status = bus.transfer_byte(read_instruction(index))?;
            for byte in buf.iter_mut() {
                *byte = bus.transfer_byte(FILLER)?;
            }
            Ok(Status::from_bits_retain(status))
        })
    }

    /// Sends a bare one-byte instruction, such as [`FLUSH_TX`] or [`NOP`].
    ///
    /// Returns the STATUS byte the chip clocked out in reply.
    ///
    /// # Errors
    /// * `Error::Bus` - The transport failed
    pub fn write_command(&mut self, command: u8) -> Result<Status, Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("command {=u8:#x}", command);

        self.transaction(|bus| bus.transfer_byte(command).map(Status::from_bits_retain))
    }

    /// Writes one byte to register `index`.
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - `index` is not below [`NUM_REGISTERS`];
    ///   nothing was sent
    /// * `Error::Bus` - The transport failed
    pub fn write_register_byte(&mut self, index: u8, value: u8) -> Result<(), Error<BUS::Error>> {
        self.write_registers(index, &[value])
    }

    /// Writes `bytes` to register `index`.
    ///
    /// Multi-byte registers are written LSByte first. An empty `bytes` sends
    /// only the instruction byte.
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - `index` is not below [`NUM_REGISTERS`];
    ///   nothing was sent
    /// * `Error::Bus` - The transport failed
    pub fn write_registers(&mut self, index: u8, bytes: &[u8]) -> Result<(), Error<BUS::Error>> {
        if !is_valid_register(index) {
            #[cfg(feature = "defmt")]
            defmt::warn!("write to invalid register {=u8:#x} rejected", index);
            return Err(Error::InvalidRegister(index));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("W_REGISTER {=u8:#x} {=[u8]:#x}", index, bytes);

        self.transaction(|bus| {
            bus.transfer_byte(write_instruction(index))?;
            for &byte in bytes {
                bus.transfer_byte(byte)?;
            }
            Ok(())
        })
    }

    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - `R` is not part of the register map
    /// * `Error::Bus` - The transport failed
    /// * `Error::Deserialization` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, Error<BUS::Error>>
    where
        R: ReadableRegister<IdType = u8>,
    {
        if R::id() >= NUM_REGISTERS {
            return Err(Error::InvalidRegister(R::id()));
        }

        let mut raw_value = <R as FromByteArray>::Array::new();
        self.read_registers(R::id(), raw_value.as_mut())?;

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a value to a device register.
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - `R` is not part of the register map
    /// * `Error::Bus` - The transport failed
    /// * `Error::Serialization` - Failed to encode register value
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error<BUS::Error>>
    where
        R: WritableRegister<IdType = u8>,
    {
        let raw_value = register.to_bytes().map_err(|_| Error::Serialization)?;
        self.write_registers(R::id(), raw_value.as_ref())
    }

    /// Reads register `R`, applies `f` and writes the result back.
    ///
    /// The read and the write are separate transactions.
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - `R` is not part of the register map
    /// * `Error::Bus` - The transport failed
    /// * `Error::Deserialization` - Failed to parse register value
    /// * `Error::Serialization` - Failed to encode the modified value
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<(), Error<BUS::Error>>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8>,
        F: FnOnce(R) -> R,
    {
        let register = self.read_register::<R>()?;
        self.write_register(f(register))
    }

    /// Reads STATUS with a single [`NOP`].
    pub fn get_status(&mut self) -> Result<Status, Error<BUS::Error>> {
        self.write_command(NOP)
    }

    /// Flushes the TX FIFO.
    pub fn flush_tx(&mut self) -> Result<Status, Error<BUS::Error>> {
        self.write_command(FLUSH_TX)
    }

    /// Flushes the RX FIFO.
    pub fn flush_rx(&mut self) -> Result<Status, Error<BUS::Error>> {
        self.write_command(FLUSH_RX)
    }

    /// Keeps retransmitting the last TX payload while CE is high.
    pub fn reuse_tx_payload(&mut self) -> Result<Status, Error<BUS::Error>> {
        self.write_command(REUSE_TX_PL)
    }
}
