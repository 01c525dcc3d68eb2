//! Collaborator traits (spec.md §6): the ADC/DAC drivers, interrupt
//! plumbing, timer module, and debug strobes this crate treats as external.
//!
//! The split mirrors the granularity of Tock's `hil` traits (separate
//! `radio::Radio`/`TxClient`/`RxClient` rather than one monolithic trait)
//! and the teacher's own per-peripheral `hardware::{Adc0Input, Dac0Output}`
//! pattern: each collaborator is independently mockable, and a board need
//! not implement [`AdcIrq`] at all if its ADC DMA completion is handled
//! entirely outside this crate.

/// Read access to the sampling ADC.
pub trait Adc {
    /// Reads the most recent signed, centered sample.
    fn read_sample(&self) -> i8;
    /// One-time hardware initialization, called from `Modem::init`.
    fn init(&self);
}

/// ADC sample-rate interrupt control.
pub trait AdcIrq {
    /// Acknowledges/clears the interrupt at the end of the ISR.
    fn end(&self);
}

/// Write access to the synthesis DAC.
pub trait Dac {
    /// Writes one unsigned output code, full range centered at 128.
    fn write_sample(&self, sample: u8);
}

/// DAC sample-rate interrupt control.
pub trait DacIrq {
    /// Enables the DAC interrupt; called once at the start of a
    /// transmission (spec.md §4.4 `afsk_txStart`).
    fn start(&self);
    /// Disables the DAC interrupt; called once the transmitter has
    /// nothing left to send.
    fn stop(&self);
    /// Acknowledges/clears the interrupt at the end of the ISR.
    fn end(&self);
}

/// A debug/test-point GPIO toggled around time-critical sections.
pub trait Strobe {
    fn on(&self);
    fn off(&self);
}

/// Monotonic clock and idle-hint collaborator backing `read`'s timeout
/// support and the foreground's busy-wait loops (spec.md §5).
pub trait Platform {
    /// Current monotonic tick count.
    fn now(&self) -> u32;
    /// Converts a millisecond budget to a tick count.
    fn ms_to_ticks(&self, ms: i32) -> u32;
    /// Idle hint permitting the ADC/DAC interrupts to run; never disables
    /// interrupts (spec.md §5 "Suspension").
    fn relax(&self);
}
