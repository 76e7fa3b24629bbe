//! RF-related registers
//!
//! This module contains registers for configuring the radio front end:
//! - Channel frequency (RF_CH)
//! - Air data rate and output power (RF_SETUP)
//! - Automatic retransmission (SETUP_RETR)
//! - Transmit observation (OBSERVE_TX)
//! - Received power detection (RPD)

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Error type for reserved RF_SETUP encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RfSetupError {
    /// RF_DR_LOW and RF_DR_HIGH are both set
    ReservedDataRate(u8),
}

/// Air data rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 250kbps (nRF24L01+ only)
    Kbps250,
    /// 1Mbps
    Mbps1,
    /// 2Mbps
    Mbps2,
}

/// Output power in TX mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerLevel {
    /// -18dBm
    Min = 0,
    /// -12dBm
    Low = 1,
    /// -6dBm
    High = 2,
    /// 0dBm
    Max = 3,
}

impl From<u8> for PowerLevel {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Min,
            1 => Self::Low,
            2 => Self::High,
            _ => Self::Max,
        }
    }
}

/// Setup of automatic retransmission register (address: 0x04)
///
/// # Important Notes
/// - Delay is `(delay + 1) * 250µs`, measured from end of transmission
///   to start of retransmission
/// - Reset value is 0x03 (250µs, 3 retransmits)
/// - A count of 0 disables retransmission
#[register(0x04u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupRetr {
    /// Auto retransmit delay, 0-15
    pub delay: u8,
    /// Auto retransmit count, 0-15
    pub count: u8,
}

impl Default for SetupRetr {
    fn default() -> Self {
        Self { delay: 0, count: 3 }
    }
}

impl FromByteArray for SetupRetr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            delay: bytes[0] >> 4,
            count: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for SetupRetr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.delay & 0x0F) << 4) | (self.count & 0x0F)])
    }
}

/// RF channel register (address: 0x05)
///
/// The channel frequency is `2400 + channel` MHz.
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfChannel {
    /// Channel, 0-125
    pub channel: u8,
}

impl FromByteArray for RfChannel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            channel: bytes[0] & 0x7F,
        })
    }
}

impl ToByteArray for RfChannel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.channel & 0x7F])
    }
}

/// RF setup register (address: 0x06)
///
/// # Important Notes
/// - Reset value is 0x0E (2Mbps, 0dBm)
/// - 250kbps is not available on the non-plus nRF24L01
/// - `pll_lock` and `continuous_wave` are test features
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfSetup {
    /// Enable continuous carrier transmit
    pub continuous_wave: bool,
    /// Force PLL lock signal
    pub pll_lock: bool,
    /// Air data rate
    pub data_rate: DataRate,
    /// TX output power
    pub power: PowerLevel,
}

impl Default for RfSetup {
    fn default() -> Self {
        Self {
            continuous_wave: false,
            pll_lock: false,
            data_rate: DataRate::Mbps2,
            power: PowerLevel::Max,
        }
    }
}

impl FromByteArray for RfSetup {
    type Error = RfSetupError;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let b = bytes[0];
        let data_rate = match (b & (1 << 5) != 0, b & (1 << 3) != 0) {
            (false, false) => DataRate::Mbps1,
            (false, true) => DataRate::Mbps2,
            (true, false) => DataRate::Kbps250,
            (true, true) => return Err(RfSetupError::ReservedDataRate(b)),
        };

        Ok(Self {
            continuous_wave: b & (1 << 7) != 0,
            pll_lock: b & (1 << 4) != 0,
            data_rate,
            power: PowerLevel::from(b >> 1),
        })
    }
}

impl ToByteArray for RfSetup {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let rate = match self.data_rate {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 1 << 3,
            DataRate::Kbps250 => 1 << 5,
        };

        Ok([((self.continuous_wave as u8) << 7)
            | ((self.pll_lock as u8) << 4)
            | rate
            | ((self.power as u8) << 1)])
    }
}

/// Transmit observe register (address: 0x08)
///
/// Read-only.
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObserveTx {
    /// Lost packets, saturates at 15. Reset by writing RF_CH
    pub lost_packets: u8,
    /// Retransmitted packets for the last transmission
    pub retransmits: u8,
}

impl FromByteArray for ObserveTx {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            lost_packets: bytes[0] >> 4,
            retransmits: bytes[0] & 0x0F,
        })
    }
}

/// Received power detector register (address: 0x09)
///
/// Read-only. Named CD (carrier detect) on the non-plus nRF24L01.
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedPower {
    /// A signal above -64dBm was present on the current channel
    pub detected: bool,
}

impl FromByteArray for ReceivedPower {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            detected: bytes[0] & 0x01 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rf_setup_reset_value() {
        assert_eq!(RfSetup::default().to_bytes().unwrap(), [0x0E]);

        let setup = RfSetup::from_bytes([0x0E]).unwrap();
        assert_eq!(setup.data_rate, DataRate::Mbps2);
        assert_eq!(setup.power, PowerLevel::Max);
    }

    #[test]
    fn rf_setup_rejects_reserved_data_rate() {
        assert_eq!(
            RfSetup::from_bytes([0x28]).unwrap_err(),
            RfSetupError::ReservedDataRate(0x28)
        );
        assert_eq!(
            RfSetup::from_bytes([0x20]).unwrap().data_rate,
            DataRate::Kbps250
        );
    }

    #[test]
    fn setup_retr_packs_nibbles() {
        let retr = SetupRetr { delay: 5, count: 15 };
        assert_eq!(retr.to_bytes().unwrap(), [0x5F]);
        assert_eq!(SetupRetr::default().to_bytes().unwrap(), [0x03]);
    }
}
