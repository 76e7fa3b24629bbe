//! Test utilities.

use crate::bus::{BusSettings, BusTransport};
use crate::commands::{NUM_REGISTERS, REGISTER_MASK, R_REGISTER, W_REGISTER};

/// Deepest register the simulated chip stores, in bytes.
const REGISTER_DEPTH: usize = 32;

/// Something that happened on the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    /// Bus configured and CSN driven low
    Select(BusSettings),
    /// One byte exchanged
    Transfer { mosi: u8, miso: u8 },
    /// CSN driven high
    Deselect,
}

/// Error injected into the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fault;

/// What the chip does with the bytes following the instruction byte.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Read { index: usize, offset: usize },
    Write { index: usize, offset: usize },
    Command,
}

/// A [`BusTransport`] backed by an in-memory register file.
///
/// Register reads and writes behave like the real chip: the instruction
/// byte is answered with `status`, the following bytes read or write the
/// addressed register LSByte first. Every edge and byte is logged.
pub(crate) struct SimulatedChip {
    pub(crate) status: u8,
    pub(crate) registers: [[u8; REGISTER_DEPTH]; NUM_REGISTERS as usize],
    pub(crate) events: Vec<Event>,
    /// Fail the transfer with this position in the log
    pub(crate) fail_transfer_at: Option<usize>,
    selected: bool,
    phase: Phase,
}

impl SimulatedChip {
    pub(crate) fn new(status: u8) -> Self {
        Self {
            status,
            registers: [[0; REGISTER_DEPTH]; NUM_REGISTERS as usize],
            events: Vec::new(),
            fail_transfer_at: None,
            selected: false,
            phase: Phase::Idle,
        }
    }

    /// Bytes sent to the chip, in bus order.
    pub(crate) fn mosi(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Transfer { mosi, .. } => Some(*mosi),
                _ => None,
            })
            .collect()
    }

    /// Number of bytes exchanged.
    pub(crate) fn transfers(&self) -> usize {
        self.mosi().len()
    }

    /// Panics unless every transfer happened while CSN was low, and CSN is
    /// high before the first and after the last transaction.
    pub(crate) fn assert_framed(&self) {
        let mut selected = false;
        for (i, event) in self.events.iter().enumerate() {
            match event {
                Event::Select(_) => {
                    assert!(!selected, "CSN asserted twice at event {i}");
                    selected = true;
                }
                Event::Deselect => {
                    assert!(selected, "CSN released while inactive at event {i}");
                    selected = false;
                }
                Event::Transfer { .. } => {
                    assert!(selected, "byte transferred with CSN high at event {i}");
                }
            }
        }
        assert!(!selected, "CSN left asserted");
    }
}

impl BusTransport for SimulatedChip {
    type Error = Fault;

    fn begin(&mut self, settings: &BusSettings) -> Result<(), Self::Error> {
        self.selected = true;
        self.phase = Phase::Idle;
        self.events.push(Event::Select(*settings));
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        assert!(self.selected, "transfer outside of a transaction");
        if self.fail_transfer_at == Some(self.events.len()) {
            return Err(Fault);
        }

        let miso = match self.phase {
            Phase::Idle => {
                let index = (byte & REGISTER_MASK) as usize;
                self.phase = match byte & !REGISTER_MASK {
                    R_REGISTER if index < NUM_REGISTERS as usize => {
                        Phase::Read { index, offset: 0 }
                    }
                    W_REGISTER if index < NUM_REGISTERS as usize => {
                        Phase::Write { index, offset: 0 }
                    }
                    _ => Phase::Command,
                };
                self.status
            }
            Phase::Read { index, offset } => {
                self.phase = Phase::Read {
                    index,
                    offset: offset + 1,
                };
                self.registers[index].get(offset).copied().unwrap_or(0xFF)
            }
            Phase::Write { index, offset } => {
                if let Some(slot) = self.registers[index].get_mut(offset) {
                    *slot = byte;
                }
                self.phase = Phase::Write {
                    index,
                    offset: offset + 1,
                };
                self.status
            }
            Phase::Command => self.status,
        };

        self.events.push(Event::Transfer { mosi: byte, miso });
        Ok(miso)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.selected = false;
        self.phase = Phase::Idle;
        self.events.push(Event::Deselect);
        Ok(())
    }
}
