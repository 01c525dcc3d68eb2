//! Delay-line frequency discriminator and first-order IIR low-pass
//! (spec.md §4.2 steps 1–2).
//!
//! The discriminator turns the frequency-modulated ADC signal into a
//! polarity that the bit slicer in [`crate::clock_recovery`] can threshold
//! directly: it multiplies the newest sample by one delayed
//! `SAMPLES_PER_BIT/2` ticks (a quadrature-ish trick that is positive when
//! the two samples are in phase, i.e. near the lower MARK tone, and
//! negative near SPACE), then smooths the product with a cutoff tuned to
//! roughly half the bit rate. Both IIR variants are shift-and-add
//! approximations of the feedback coefficient — no multiplier is assumed
//! to exist (spec.md §9).

use crate::fifo::Fifo;

/// Feedback approximation selected at build time. Exactly one of
/// `butterworth`/`chebyshev` must be active; `default-features` picks
/// `butterworth`.
#[cfg(all(feature = "butterworth", feature = "chebyshev"))]
compile_error!("enable at most one of the `butterworth`/`chebyshev` features");

#[cfg(not(any(feature = "butterworth", feature = "chebyshev")))]
compile_error!("enable one of the `butterworth`/`chebyshev` features");

/// `y[1] = x[0] + x[1] + approx(0.668 * y[0])`, feedback via `y>>1 + y>>3 +
/// y>>5` (spec.md §4.2).
#[cfg(feature = "butterworth")]
fn feedback(y0: i16) -> i16 {
    (y0 >> 1) + (y0 >> 3) + (y0 >> 5)
}

/// `y[1] = x[0] + x[1] + approx(0.438 * y[0])`, feedback via `y>>1`
/// (spec.md §4.2).
#[cfg(feature = "chebyshev")]
fn feedback(y0: i16) -> i16 {
    y0 >> 1
}

/// Discriminator + IIR state: the delay line of raw samples, and the two
/// single-pole registers `x[0..1]`/`y[0..1]` (spec.md §3).
pub struct Discriminator<const DELAY_LEN: usize> {
    delay_fifo: Fifo<i8, DELAY_LEN>,
    x: [i16; 2],
    y: [i16; 2],
}

impl<const DELAY_LEN: usize> Discriminator<DELAY_LEN> {
    /// Builds a discriminator with `delay_fifo` pre-filled with
    /// `DELAY_LEN - 1` zero samples, matching `init`'s invariant that the
    /// delay line always holds exactly `SAMPLES_PER_BIT/2` samples in
    /// flight (spec.md §8 invariant 3; `DELAY_LEN` here is the backing
    /// capacity, one more than that count per [`crate::fifo::Fifo`]'s
    /// sentinel slot).
    pub fn new() -> Self {
        let mut delay_fifo = Fifo::new();
        for _ in 0..delay_fifo.capacity() {
            let _ = delay_fifo.push(0);
        }
        Self {
            delay_fifo,
            x: [0, 0],
            y: [0, 0],
        }
    }

    /// Processes one new signed ADC sample: correlator multiply against
    /// the delayed sample, IIR update, delay-line refill. Returns the new
    /// IIR output `y[1]`; the bit slicer thresholds it against zero.
    pub fn process(&mut self, sample: i8) -> i16 {
        let delayed = self.delay_fifo.pop().unwrap_or(0);

        self.x[0] = self.x[1];
        self.x[1] = ((sample as i32 * delayed as i32) >> 2) as i16;

        self.y[0] = self.y[1];
        self.y[1] = self.x[0]
            .wrapping_add(self.x[1])
            .wrapping_add(feedback(self.y[0]));

        let _ = self.delay_fifo.push(sample);

        self.y[1]
    }

    /// Number of samples currently queued in the delay line; should always
    /// equal `DELAY_LEN - 1` (spec.md §8 invariant 3).
    pub fn delay_len(&self) -> usize {
        self.delay_fifo.len()
    }
}

impl<const DELAY_LEN: usize> Default for Discriminator<DELAY_LEN> {
    fn default() -> Self {
        Self::new()
    }
}
