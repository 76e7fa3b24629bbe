//! STATUS byte
//!
//! The chip shifts its STATUS register out on MISO while the instruction byte
//! of every transaction is shifted in. The same layout is also readable as
//! register 0x07.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// RX_P_NO value reported while the RX FIFO is empty
const RX_FIFO_EMPTY: u8 = 0b111;

bitflags! {
    /// Device status
    ///
    /// # Status Byte Format
    /// - Bit 7: Reserved, reads 0
    /// - Bit 6: RX_DR, data ready in the RX FIFO
    /// - Bit 5: TX_DS, data sent (ACK received when auto-ack is on)
    /// - Bit 4: MAX_RT, maximum number of retransmits reached
    /// - Bits 3:1: RX_P_NO, pipe of the payload at the top of the RX FIFO
    /// - Bit 0: TX_FULL, TX FIFO full
    ///
    /// # Important Notes
    /// - RX_DR, TX_DS and MAX_RT are cleared by writing 1 to them
    /// - MAX_RT must be cleared before further communication is possible
    /// - A status of `0xFF` is also what a transport reports for a rejected
    ///   register index (see [`Status::SENTINEL`]); it cannot be told apart
    ///   from a floating MISO line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Data ready RX FIFO interrupt
        const RX_DR = 1 << 6;
        /// Data sent TX FIFO interrupt
        const TX_DS = 1 << 5;
        /// Maximum number of TX retransmits interrupt
        const MAX_RT = 1 << 4;
        /// TX FIFO full flag
        const TX_FULL = 1 << 0;

        const _ = !0;
    }
}

impl Status {
    /// Value reported when a read was rejected before reaching the bus.
    pub const SENTINEL: Self = Self::from_bits_retain(0xFF);

    /// All interrupt flags; write these back to clear them.
    pub const INTERRUPTS: Self =
        Self::from_bits_retain(Self::RX_DR.bits() | Self::TX_DS.bits() | Self::MAX_RT.bits());

    /// Returns whether this is the rejected-index sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Data pipe number of the payload available in the RX FIFO.
    ///
    /// Returns `None` when the RX FIFO is empty (or the pipe field holds the
    /// unused value 0b110).
    pub fn rx_pipe(&self) -> Option<u8> {
        match (self.bits() >> 1) & 0x07 {
            RX_FIFO_EMPTY | 0b110 => None,
            pipe => Some(pipe),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status({=u8:#x})", self.bits())
    }
}

/// STATUS register (address: 0x07)
///
/// Register view of the status byte. Writing it is the only way to clear
/// the interrupt flags.
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusRegister {
    /// Raw status flags
    pub status: Status,
}

impl StatusRegister {
    /// Register value clearing all interrupt flags.
    pub fn clear_interrupts() -> Self {
        Self {
            status: Status::INTERRUPTS,
        }
    }
}

impl FromByteArray for StatusRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            status: Status::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for StatusRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        // RX_P_NO and TX_FULL are read-only
        Ok([self.status.intersection(Status::INTERRUPTS).bits()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rx_pipe() {
        assert_eq!(Status::from_bits_retain(0x0E).rx_pipe(), None);
        assert_eq!(Status::from_bits_retain(0x40 | (3 << 1)).rx_pipe(), Some(3));
        assert_eq!(Status::from_bits_retain(0x00).rx_pipe(), Some(0));
    }

    #[test]
    fn sentinel_is_all_ones() {
        assert_eq!(Status::SENTINEL.bits(), 0xFF);
        assert!(Status::SENTINEL.is_sentinel());
        assert!(!Status::from_bits_retain(0x0E).is_sentinel());
    }

    #[test]
    fn clearing_interrupts_only_writes_flag_bits() {
        let raw = StatusRegister {
            status: Status::SENTINEL,
        }
        .to_bytes()
        .unwrap();
        assert_eq!(raw, [0x70]);
        assert_eq!(StatusRegister::clear_interrupts().to_bytes().unwrap(), [0x70]);
    }
}
