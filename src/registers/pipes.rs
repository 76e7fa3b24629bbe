//! Data pipe registers
//!
//! The nRF24L01 receives on up to six data pipes that share one frequency
//! channel. This module contains the per-pipe register layouts:
//! - Auto-acknowledge and pipe enables (EN_AA, EN_RXADDR, DYNPD)
//! - Address width (SETUP_AW)
//! - Receive and transmit addresses (RX_ADDR_Px, TX_ADDR)
//! - Static payload widths (RX_PW_Px)
//!
//! Pipes 0 and 1 carry a full-width address. Pipes 2-5 only store their
//! least significant byte and share the upper bytes with pipe 1.
//! Addresses are written LSByte first.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Width of the full RX_ADDR_P0/P1 and TX_ADDR registers
pub const ADDRESS_REGISTER_WIDTH: usize = 5;

/// Largest static payload width
pub const MAX_PAYLOAD_WIDTH: u8 = 32;

bitflags! {
    /// Set of data pipes, one bit per pipe
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pipes: u8 {
        /// Data pipe 0
        const P0 = 1 << 0;
        /// Data pipe 1
        const P1 = 1 << 1;
        /// Data pipe 2
        const P2 = 1 << 2;
        /// Data pipe 3
        const P3 = 1 << 3;
        /// Data pipe 4
        const P4 = 1 << 4;
        /// Data pipe 5
        const P5 = 1 << 5;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pipes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Pipes({=u8:#b})", self.bits())
    }
}

/// Error type for invalid address width values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidthError {
    /// The value 0b00 is illegal
    InvalidValue(u8),
}

/// RX/TX address field width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    /// 3 bytes
    Bytes3 = 0b01,
    /// 4 bytes
    Bytes4 = 0b10,
    /// 5 bytes
    #[default]
    Bytes5 = 0b11,
}

impl AddressWidth {
    /// Address width in bytes.
    pub fn bytes(&self) -> usize {
        *self as usize + 2
    }
}

impl TryFrom<u8> for AddressWidth {
    type Error = AddressWidthError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value & 0x03 {
            0b01 => Ok(Self::Bytes3),
            0b10 => Ok(Self::Bytes4),
            0b11 => Ok(Self::Bytes5),
            _ => Err(AddressWidthError::InvalidValue(value)),
        }
    }
}

/// Enhanced ShockBurst auto acknowledgment register (address: 0x01)
///
/// Reset value enables auto-acknowledge on all pipes.
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnableAutoAck {
    /// Pipes with auto-acknowledge enabled
    pub pipes: Pipes,
}

/// Enabled RX addresses register (address: 0x02)
///
/// Reset value enables pipes 0 and 1.
#[register(0x02u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnableRxAddress {
    /// Pipes accepting packets
    pub pipes: Pipes,
}

/// Dynamic payload length register (address: 0x1C)
///
/// # Important Notes
/// - Requires `Feature::dynamic_payloads`
/// - Requires auto-acknowledge on the same pipe
#[register(0x1Cu8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicPayloads {
    /// Pipes with dynamic payload length enabled
    pub pipes: Pipes,
}

macro_rules! pipe_set_bytes {
    ($($reg:ident),+ $(,)?) => {
        $(
            impl FromByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self {
                        pipes: Pipes::from_bits_truncate(bytes[0]),
                    })
                }
            }

            impl ToByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.pipes.bits()])
                }
            }
        )+
    };
}

pipe_set_bytes!(EnableAutoAck, EnableRxAddress, DynamicPayloads);

/// Setup of address widths register (address: 0x03)
///
/// Common for all data pipes.
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupAddressWidth {
    /// Address field width
    pub width: AddressWidth,
}

impl FromByteArray for SetupAddressWidth {
    type Error = AddressWidthError;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            width: AddressWidth::try_from(bytes[0])?,
        })
    }
}

impl ToByteArray for SetupAddressWidth {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.width as u8])
    }
}

macro_rules! full_address_registers {
    ($($(#[$meta:meta])* $reg:ident = $id:tt;)+) => {
        $(
            $(#[$meta])*
            ///
            /// Holds the address LSByte first, as clocked on the bus. Only the
            /// first `SETUP_AW` bytes are significant.
            #[register($id)]
            #[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub struct $reg {
                /// Address bytes, LSByte first
                pub address: [u8; ADDRESS_REGISTER_WIDTH],
            }

            impl FromByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; ADDRESS_REGISTER_WIDTH];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { address: bytes })
                }
            }

            impl ToByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; ADDRESS_REGISTER_WIDTH];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok(self.address)
                }
            }
        )+
    };
}

full_address_registers! {
    /// Receive address data pipe 0 (address: 0x0A)
    RxAddressP0 = 0x0Au8;
    /// Receive address data pipe 1 (address: 0x0B)
    RxAddressP1 = 0x0Bu8;
    /// Transmit address (address: 0x10)
    ///
    /// Set RX_ADDR_P0 equal to this address to receive auto-acknowledgements.
    TxAddress = 0x10u8;
}

macro_rules! single_byte_registers {
    ($($(#[$meta:meta])* $reg:ident = $id:tt, $field:ident, $mask:expr;)+) => {
        $(
            $(#[$meta])*
            #[register($id)]
            #[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub struct $reg {
                #[allow(missing_docs)]
                pub $field: u8,
            }

            impl FromByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self {
                        $field: bytes[0] & $mask,
                    })
                }
            }

            impl ToByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.$field & $mask])
                }
            }
        )+
    };
}

single_byte_registers! {
    /// Receive address data pipe 2 (address: 0x0C), LSByte only
    RxAddressP2 = 0x0Cu8, lsb, 0xFF;
    /// Receive address data pipe 3 (address: 0x0D), LSByte only
    RxAddressP3 = 0x0Du8, lsb, 0xFF;
    /// Receive address data pipe 4 (address: 0x0E), LSByte only
    RxAddressP4 = 0x0Eu8, lsb, 0xFF;
    /// Receive address data pipe 5 (address: 0x0F), LSByte only
    RxAddressP5 = 0x0Fu8, lsb, 0xFF;
    /// Payload width of data pipe 0 (address: 0x11), 0 disables the pipe
    RxPayloadWidthP0 = 0x11u8, width, 0x3F;
    /// Payload width of data pipe 1 (address: 0x12), 0 disables the pipe
    RxPayloadWidthP1 = 0x12u8, width, 0x3F;
    /// Payload width of data pipe 2 (address: 0x13), 0 disables the pipe
    RxPayloadWidthP2 = 0x13u8, width, 0x3F;
    /// Payload width of data pipe 3 (address: 0x14), 0 disables the pipe
    RxPayloadWidthP3 = 0x14u8, width, 0x3F;
    /// Payload width of data pipe 4 (address: 0x15), 0 disables the pipe
    RxPayloadWidthP4 = 0x15u8, width, 0x3F;
    /// Payload width of data pipe 5 (address: 0x16), 0 disables the pipe
    RxPayloadWidthP5 = 0x16u8, width, 0x3F;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_width_decoding() {
        assert_eq!(AddressWidth::try_from(0x03), Ok(AddressWidth::Bytes5));
        assert_eq!(AddressWidth::try_from(0x01).unwrap().bytes(), 3);
        assert_eq!(
            AddressWidth::try_from(0x00),
            Err(AddressWidthError::InvalidValue(0x00))
        );
    }

    #[test]
    fn pipe_sets_ignore_reserved_bits() {
        let en_aa = EnableAutoAck::from_bytes([0xFF]).unwrap();
        assert_eq!(en_aa.pipes, Pipes::all());
        assert_eq!(en_aa.to_bytes().unwrap(), [0x3F]);
    }

    #[test]
    fn payload_width_is_six_bits() {
        let pw = RxPayloadWidthP3 { width: 0xE0 | MAX_PAYLOAD_WIDTH };
        assert_eq!(pw.to_bytes().unwrap(), [0x20]);
    }

    #[test]
    fn addresses_keep_bus_order() {
        let tx = TxAddress::from_bytes([0xE7, 0xE6, 0xE5, 0xE4, 0xE3]).unwrap();
        assert_eq!(tx.address[0], 0xE7);
        assert_eq!(tx.to_bytes().unwrap(), [0xE7, 0xE6, 0xE5, 0xE4, 0xE3]);
    }
}
