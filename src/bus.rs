//! Bus access for the nRF24L01
//!
//! [`Device`](crate::Device) never talks to a HAL directly. It frames its
//! transactions against the [`BusTransport`] capability, which exposes the
//! three primitives a transaction is built from:
//!
//! 1. `begin`: apply the bus settings, assert CSN, wait for it to settle
//! 2. `transfer_byte`: clock one byte out on MOSI while one is clocked in
//! 3. `end`: deassert CSN, wait for it to settle
//!
//! [`SpiTransport`] implements the capability on top of the embedded-hal
//! [`SpiBus`], [`OutputPin`] and [`DelayNs`] traits. Test doubles implement
//! [`BusTransport`] directly.
//!
//! # Shared Buses
//! The bus settings are re-applied at the start of every transaction, so a
//! [`SpiTransport`] holding `&mut SPI` can share one peripheral with other
//! devices. Mutual exclusion between their transactions is the owner's job;
//! nothing in this module locks.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{ErrorType, Mode, SpiBus, MODE_0};

use crate::error::BusError;

/// Minimum time CSN is held after each edge, in microseconds.
///
/// Covers Tcc (CSN to SCK setup) and Tcwh (CSN inactive time) of the
/// nRF24L01+ datasheet with margin.
pub const CSN_SETTLE_US: u32 = 1;

/// SPI clock used when none is specified. The chip accepts up to 10MHz.
pub const DEFAULT_FREQUENCY_HZ: u32 = 8_000_000;

/// Order in which bits of a byte are clocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Per-transaction bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusSettings {
    /// SCK frequency in Hz
    pub frequency_hz: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order
    pub bit_order: BitOrder,
}

impl BusSettings {
    /// Settings the nRF24L01 requires at the given clock: SPI mode 0
    /// (idle low, sample on rising edge), MSB first.
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            mode: MODE_0,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

impl Default for BusSettings {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY_HZ)
    }
}

/// Byte-level access to the bus the radio sits on.
///
/// Implementations must keep the chip selected from the end of [`begin`]
/// until [`end`] is called, and must not let any other device's bytes onto
/// the bus in between.
///
/// [`begin`]: BusTransport::begin
/// [`end`]: BusTransport::end
pub trait BusTransport {
    /// Error raised by the bus or the chip-select line
    type Error;

    /// Configures the bus with `settings` and selects the chip.
    fn begin(&mut self, settings: &BusSettings) -> Result<(), Self::Error>;

    /// Exchanges one byte, returning the byte clocked in.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Deselects the chip and releases the bus.
    fn end(&mut self) -> Result<(), Self::Error>;
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    type Error = T::Error;

    fn begin(&mut self, settings: &BusSettings) -> Result<(), Self::Error> {
        T::begin(self, settings)
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        T::transfer_byte(self, byte)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        T::end(self)
    }
}

/// Applies [`BusSettings`] to a bus peripheral.
///
/// embedded-hal leaves clock rate and mode to the HAL, so this is the hook
/// for HALs that can reconfigure a running peripheral.
pub trait ConfigureBus<SPI: ErrorType> {
    /// Reconfigures `spi` for the next transaction.
    fn configure(&mut self, spi: &mut SPI, settings: &BusSettings) -> Result<(), SPI::Error>;
}

/// For buses configured once at HAL construction, and not shared with
/// devices that need different settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preconfigured;

impl<SPI: ErrorType> ConfigureBus<SPI> for Preconfigured {
    fn configure(&mut self, _spi: &mut SPI, _settings: &BusSettings) -> Result<(), SPI::Error> {
        Ok(())
    }
}

/// [`BusTransport`] over an embedded-hal SPI bus with a manually driven
/// CSN line.
pub struct SpiTransport<SPI, CS, D, C = Preconfigured> {
    spi: SPI,
    csn: CS,
    delay: D,
    configurator: C,
}

impl<SPI, CS, D> SpiTransport<SPI, CS, D>
where
    SPI: ErrorType,
    CS: OutputPin,
{
    /// Creates a transport for a bus whose settings never change.
    ///
    /// Drives CSN high so the chip starts out deselected.
    pub fn new(spi: SPI, csn: CS, delay: D) -> Result<Self, CS::Error> {
        Self::with_configurator(spi, csn, delay, Preconfigured)
    }
}

impl<SPI, CS, D, C> SpiTransport<SPI, CS, D, C>
where
    SPI: ErrorType,
    CS: OutputPin,
    C: ConfigureBus<SPI>,
{
    /// Creates a transport that calls `configurator` at the start of every
    /// transaction.
    ///
    /// Drives CSN high so the chip starts out deselected.
    pub fn with_configurator(
        spi: SPI,
        mut csn: CS,
        delay: D,
        configurator: C,
    ) -> Result<Self, CS::Error> {
        csn.set_high()?;

        Ok(Self {
            spi,
            csn,
            delay,
            configurator,
        })
    }
}

impl<SPI, CS, D, C> SpiTransport<SPI, CS, D, C> {
    /// Releases the bus, the CSN pin and the delay provider.
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.csn, self.delay)
    }
}

impl<SPI, CS, D, C> BusTransport for SpiTransport<SPI, CS, D, C>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
    C: ConfigureBus<SPI>,
{
    type Error = BusError<SPI::Error, CS::Error>;

    fn begin(&mut self, settings: &BusSettings) -> Result<(), Self::Error> {
        self.configurator
            .configure(&mut self.spi, settings)
            .map_err(BusError::Spi)?;

        self.csn.set_low().map_err(BusError::Pin)?;
        self.delay.delay_us(CSN_SETTLE_US);
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(BusError::Spi)?;
        Ok(buf[0])
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        // CSN goes high even when the flush fails
        let flushed = self.spi.flush().map_err(BusError::Spi);

        self.csn.set_high().map_err(BusError::Pin)?;
        self.delay.delay_us(CSN_SETTLE_US);
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{ErrorKind, Phase, Polarity};
    use embedded_hal_mock::eh1::{
        delay::{CheckedDelay, NoopDelay, Transaction as DelayTransaction},
        digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    struct Recorder<'a> {
        frequencies: &'a mut Vec<u32>,
    }

    impl ConfigureBus<SpiMock<u8>> for Recorder<'_> {
        fn configure(
            &mut self,
            _spi: &mut SpiMock<u8>,
            settings: &BusSettings,
        ) -> Result<(), <SpiMock<u8> as ErrorType>::Error> {
            self.frequencies.push(settings.frequency_hz);
            Ok(())
        }
    }

    #[test]
    fn default_settings_match_the_chip() {
        let settings = BusSettings::default();
        assert_eq!(settings.frequency_hz, DEFAULT_FREQUENCY_HZ);
        assert_eq!(settings.mode.polarity, Polarity::IdleLow);
        assert_eq!(settings.mode.phase, Phase::CaptureOnFirstTransition);
        assert_eq!(settings.bit_order, BitOrder::MsbFirst);
    }

    #[test]
    fn construction_deselects_the_chip() {
        let spi = SpiMock::<u8>::new(&[]);
        let csn = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let transport = SpiTransport::new(spi, csn, NoopDelay).unwrap();

        let (mut spi, mut csn, _) = transport.release();
        spi.done();
        csn.done();
    }

    #[test]
    fn bracket_drives_csn_around_transfers() {
        let spi = SpiMock::new(&[
            SpiTransaction::transfer_in_place(vec![0x07], vec![0x0E]),
            SpiTransaction::transfer_in_place(vec![0xFF], vec![0x42]),
            SpiTransaction::flush(),
        ]);
        let csn = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut transport = SpiTransport::new(spi, csn, NoopDelay).unwrap();
        transport.begin(&BusSettings::new(4_000_000)).unwrap();
        assert_eq!(transport.transfer_byte(0x07).unwrap(), 0x0E);
        assert_eq!(transport.transfer_byte(0xFF).unwrap(), 0x42);
        transport.end().unwrap();

        let (mut spi, mut csn, _) = transport.release();
        spi.done();
        csn.done();
    }

    #[test]
    fn settings_are_applied_on_every_begin() {
        let spi = SpiMock::new(&[SpiTransaction::flush(), SpiTransaction::flush()]);
        let csn = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut frequencies = Vec::new();

        let mut transport = SpiTransport::with_configurator(
            spi,
            csn,
            NoopDelay,
            Recorder {
                frequencies: &mut frequencies,
            },
        )
        .unwrap();
        transport.begin(&BusSettings::new(4_000_000)).unwrap();
        transport.end().unwrap();
        transport.begin(&BusSettings::new(2_000_000)).unwrap();
        transport.end().unwrap();

        let (mut spi, mut csn, _) = transport.release();
        spi.done();
        csn.done();
        assert_eq!(frequencies, [4_000_000, 2_000_000]);
    }

    #[test]
    fn csn_settles_after_each_edge() {
        let spi = SpiMock::new(&[SpiTransaction::flush()]);
        let csn = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let delay = CheckedDelay::new(&[
            DelayTransaction::delay_us(CSN_SETTLE_US),
            DelayTransaction::delay_us(CSN_SETTLE_US),
        ]);

        let mut transport = SpiTransport::new(spi, csn, delay).unwrap();
        transport.begin(&BusSettings::default()).unwrap();
        transport.end().unwrap();

        let (mut spi, mut csn, mut delay) = transport.release();
        spi.done();
        csn.done();
        delay.done();
    }

    #[test]
    fn failed_flush_still_deselects() {
        let spi = SpiMock::new(&[SpiTransaction::flush().with_error(ErrorKind::Other)]);
        let csn = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut transport = SpiTransport::new(spi, csn, NoopDelay).unwrap();
        transport.begin(&BusSettings::default()).unwrap();
        assert!(matches!(
            transport.end(),
            Err(BusError::Spi(ErrorKind::Other))
        ));

        let (mut spi, mut csn, _) = transport.release();
        spi.done();
        csn.done();
    }
}
