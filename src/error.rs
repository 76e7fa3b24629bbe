//! Error types

use core::fmt;

/// Errors reported by [`Device`](crate::Device) operations.
///
/// `E` is the error type of the underlying [`BusTransport`](crate::BusTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus, chip-select line or its configuration failed
    Bus(E),
    /// A write targeted an index outside the register map. Nothing was
    /// placed on the bus.
    InvalidRegister(u8),
    /// Bytes read from a register did not decode into the register type
    Deserialization,
    /// A register value could not be encoded
    Serialization,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Error::InvalidRegister(index) => write!(f, "invalid register index {index:#04x}"),
            Error::Deserialization => f.write_str("failed to decode register value"),
            Error::Serialization => f.write_str("failed to encode register value"),
        }
    }
}

/// Errors raised by [`SpiTransport`](crate::SpiTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<SpiE, PinE> {
    /// SPI error
    Spi(SpiE),
    /// Chip-select pin error
    Pin(PinE),
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> fmt::Display for BusError<SpiE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Spi(e) => write!(f, "SPI error: {e:?}"),
            BusError::Pin(e) => write!(f, "chip-select error: {e:?}"),
        }
    }
}
