//! SPI instruction set
//!
//! Every transaction with the nRF24L01 starts with a single instruction byte
//! clocked out MSB first while CSN is held low. While that byte is shifted in,
//! the chip shifts out its STATUS register, so every transaction also yields
//! a [`Status`] for free.
//!
//! # Instruction Layout
//! - `R_REGISTER`: `000A AAAA`, followed by 1-5 bytes read LSByte first
//! - `W_REGISTER`: `001A AAAA`, followed by 1-5 bytes written LSByte first
//! - Everything else is a fixed opcode with an optional payload phase
//!
//! The register address occupies the five low bits (`AAAAA`), which is why
//! only indices below [`NUM_REGISTERS`] are ever placed on the bus.
//!
//! # Important Notes
//! - `W_REGISTER` is only honoured in power down or standby modes
//! - `ACTIVATE` (followed by `0x73`) is only needed on the non-plus nRF24L01
//!   to unlock `R_RX_PL_WID`, `W_ACK_PAYLOAD` and `W_TX_PAYLOAD_NO_ACK`
//! - `NOP` is the cheapest way to read STATUS

mod status;

pub use status::*;

/// Read command and STATUS register (`000A AAAA`)
pub const R_REGISTER: u8 = 0x00;
/// Write command and STATUS register (`001A AAAA`)
pub const W_REGISTER: u8 = 0x20;
/// The bits of an instruction byte carrying the register address
pub const REGISTER_MASK: u8 = 0x1F;

/// Read RX payload, 1-32 bytes
pub const R_RX_PAYLOAD: u8 = 0x61;
/// Write TX payload, 1-32 bytes
pub const W_TX_PAYLOAD: u8 = 0xA0;
/// Flush the TX FIFO
pub const FLUSH_TX: u8 = 0xE1;
/// Flush the RX FIFO
pub const FLUSH_RX: u8 = 0xE2;
/// Reuse the last transmitted payload
pub const REUSE_TX_PL: u8 = 0xE3;
/// Toggle the extended feature set (nRF24L01 only)
pub const ACTIVATE: u8 = 0x50;
/// Data byte that must follow [`ACTIVATE`]
pub const ACTIVATE_KEY: u8 = 0x73;
/// Read the payload width of the top of the RX FIFO
pub const R_RX_PL_WID: u8 = 0x60;
/// Write an ACK payload for pipe `PPP` (`1010 1PPP`)
pub const W_ACK_PAYLOAD: u8 = 0xA8;
/// Write a TX payload with auto-acknowledge disabled
pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
/// No operation, only clocks out STATUS
pub const NOP: u8 = 0xFF;

/// Number of addressable registers, `CONFIG` (0x00) through `FEATURE` (0x1D).
///
/// Indices at or above this value never reach the bus.
pub const NUM_REGISTERS: u8 = 0x1E;

/// Builds the instruction byte reading register `index`.
///
/// The caller is responsible for checking `index` against [`NUM_REGISTERS`].
#[inline]
pub const fn read_instruction(index: u8) -> u8 {
    R_REGISTER | (index & REGISTER_MASK)
}

/// Builds the instruction byte writing register `index`.
///
/// The caller is responsible for checking `index` against [`NUM_REGISTERS`].
#[inline]
pub const fn write_instruction(index: u8) -> u8 {
    W_REGISTER | (index & REGISTER_MASK)
}

/// Returns whether `index` names a register of the chip's register map.
#[inline]
pub const fn is_valid_register(index: u8) -> bool {
    index < NUM_REGISTERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_carry_the_register_index() {
        for index in 0..NUM_REGISTERS {
            assert_eq!(read_instruction(index), index);
            assert_eq!(write_instruction(index), 0x20 | index);
        }
    }

    #[test]
    fn register_bound_fits_the_address_field() {
        assert!(NUM_REGISTERS - 1 <= REGISTER_MASK);
        assert!(is_valid_register(0x1D));
        assert!(!is_valid_register(0x1E));
        assert!(!is_valid_register(0xFF));
    }
}
