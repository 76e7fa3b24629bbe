//! Configuration registers
//!
//! This module contains the registers controlling the chip-wide behaviour:
//! - Power state and primary role (CONFIG)
//! - CRC scheme (CONFIG)
//! - Interrupt masking (CONFIG)
//! - FIFO state (FIFO_STATUS)
//! - Extended features (FEATURE)

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// CRC encoding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcScheme {
    /// 1 byte CRC
    OneByte,
    /// 2 byte CRC
    TwoBytes,
}

/// Configuration register (address: 0x00)
///
/// # Important Notes
/// - Reset value is 0x08 (CRC enabled, 1 byte, powered down, PTX)
/// - CRC is forced on when auto-acknowledge is enabled on any pipe
/// - Allow 1.5ms after setting `power_up` before leaving standby-I
#[register(0x00u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Hide RX_DR from the IRQ pin
    pub mask_rx_dr: bool,
    /// Hide TX_DS from the IRQ pin
    pub mask_tx_ds: bool,
    /// Hide MAX_RT from the IRQ pin
    pub mask_max_rt: bool,
    /// Enable CRC
    pub crc_enabled: bool,
    /// CRC encoding scheme
    pub crc_scheme: CrcScheme,
    /// Power up (true) or power down (false)
    pub power_up: bool,
    /// Primary receiver (true) or primary transmitter (false)
    pub prim_rx: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mask_rx_dr: false,
            mask_tx_ds: false,
            mask_max_rt: false,
            crc_enabled: true,
            crc_scheme: CrcScheme::OneByte,
            power_up: false,
            prim_rx: false,
        }
    }
}

impl FromByteArray for Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let b = bytes[0];
        Ok(Self {
            mask_rx_dr: b & (1 << 6) != 0,
            mask_tx_ds: b & (1 << 5) != 0,
            mask_max_rt: b & (1 << 4) != 0,
            crc_enabled: b & (1 << 3) != 0,
            crc_scheme: if b & (1 << 2) != 0 {
                CrcScheme::TwoBytes
            } else {
                CrcScheme::OneByte
            },
            power_up: b & (1 << 1) != 0,
            prim_rx: b & 1 != 0,
        })
    }
}

impl ToByteArray for Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.mask_rx_dr as u8) << 6)
            | ((self.mask_tx_ds as u8) << 5)
            | ((self.mask_max_rt as u8) << 4)
            | ((self.crc_enabled as u8) << 3)
            | (((self.crc_scheme == CrcScheme::TwoBytes) as u8) << 2)
            | ((self.power_up as u8) << 1)
            | (self.prim_rx as u8)])
    }
}

/// FIFO status register (address: 0x17)
///
/// Read-only view of the TX and RX FIFOs.
#[register(0x17u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// The last TX payload is being reused (REUSE_TX_PL)
    pub tx_reuse: bool,
    /// TX FIFO is full
    pub tx_full: bool,
    /// TX FIFO is empty
    pub tx_empty: bool,
    /// RX FIFO is full
    pub rx_full: bool,
    /// RX FIFO is empty
    pub rx_empty: bool,
}

impl FromByteArray for FifoStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let b = bytes[0];
        Ok(Self {
            tx_reuse: b & (1 << 6) != 0,
            tx_full: b & (1 << 5) != 0,
            tx_empty: b & (1 << 4) != 0,
            rx_full: b & (1 << 1) != 0,
            rx_empty: b & 1 != 0,
        })
    }
}

/// Feature register (address: 0x1D)
///
/// # Important Notes
/// - On the non-plus nRF24L01 this register only responds after `ACTIVATE`
/// - Dynamic payload length must be enabled here before DYNPD has effect
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Feature {
    /// Enable dynamic payload length
    pub dynamic_payloads: bool,
    /// Enable payload with ACK
    pub ack_payloads: bool,
    /// Enable the W_TX_PAYLOAD_NOACK command
    pub dynamic_ack: bool,
}

impl FromByteArray for Feature {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            dynamic_payloads: bytes[0] & 0x04 != 0,
            ack_payloads: bytes[0] & 0x02 != 0,
            dynamic_ack: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for Feature {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.dynamic_payloads as u8) << 2)
            | ((self.ack_payloads as u8) << 1)
            | (self.dynamic_ack as u8)])
    }
}
