//! Build-time configuration (spec.md §6).
//!
//! Every tunable in this module is a compile-time constant: the modem is
//! board hardware, not a runtime-reconfigurable value (spec.md §3). A board
//! selects a configuration by implementing [`ModemConfig`] (or using
//! [`DefaultConfig`]) and monomorphizing [`crate::modem::Modem`] over it.
//! The plain-data subset is also exposed as a `serde`-serializable
//! [`Config`] snapshot so a board's own runtime settings/telemetry tree can
//! report what was compiled in, without this crate depending on any
//! specific settings framework.

use crate::dds::phase_increment;

/// HDLC frame delimiter, `01111110`.
pub const HDLC_FLAG: u8 = 0x7E;
/// Eight consecutive `1` bits: abort/reset.
pub const HDLC_RESET: u8 = 0x7F;
/// AX.25 in-band escape byte.
pub const AX25_ESC: u8 = 0x1B;
/// Run length of `1` bits after which the transmitter inserts a stuffing `0`.
pub const BIT_STUFF_LEN: u8 = 5;

/// A build-time configuration record. Associated constants rather than
/// runtime fields: the compiler can fold `DAC_SAMPLES_PER_BIT`,
/// `MARK_INC`, etc. into the generated code exactly as the filter variant
/// is selected with a `#[cfg(feature = ...)]` in [`crate::discriminator`].
pub trait ModemConfig: Clone + Copy + 'static {
    /// ADC sampling rate, in Hz. Fixed at 9600 Hz per spec.md §3.
    const SAMPLE_RATE: u32 = 9600;
    /// Link bit rate, in bps. Fixed at 1200 per spec.md §3.
    const BIT_RATE: u32 = 1200;
    /// `SAMPLE_RATE / BIT_RATE`, i.e. ADC samples observed per bit period.
    const SAMPLES_PER_BIT: usize = (Self::SAMPLE_RATE / Self::BIT_RATE) as usize;
    /// Length of `delay_fifo`, in samples: `SAMPLES_PER_BIT / 2` (spec.md
    /// §3/§4.2 step 1).
    const DELAY_LEN: usize = Self::SAMPLES_PER_BIT / 2;

    /// Per-sample phase-recovery step added to `curr_phase` every ADC tick.
    const PHASE_BIT: u16 = 8;
    /// Upper bound (exclusive) of the clock-recovery phase accumulator.
    const PHASE_MAX: u16 = (Self::SAMPLES_PER_BIT as u16) * Self::PHASE_BIT;
    /// Phase-nudge threshold: below it nudges up, at or above nudges down.
    const PHASE_THRES: u16 = Self::PHASE_MAX / 2;

    /// Bell-202 MARK tone, Hz (binary `1`).
    const MARK_FREQ: u32 = 1200;
    /// Bell-202 SPACE tone, Hz (binary `0`).
    const SPACE_FREQ: u32 = 2200;

    /// DAC sample rate driving the modulator. Must be an integer multiple
    /// of `BIT_RATE` (checked by [`assert_divisible`]): this yields an
    /// integer [`Self::DAC_SAMPLES_PER_BIT`] and therefore deterministic
    /// bit boundaries, per spec.md §4.1.
    const DAC_SAMPLERATE: u32;
    /// DAC samples emitted per transmitted bit.
    const DAC_SAMPLES_PER_BIT: u32 = Self::DAC_SAMPLERATE / Self::BIT_RATE;

    /// Precomputed DDS phase increment for the MARK tone.
    const MARK_INC: u16 = phase_increment(Self::MARK_FREQ, Self::DAC_SAMPLERATE);
    /// Precomputed DDS phase increment for the SPACE tone.
    const SPACE_INC: u16 = phase_increment(Self::SPACE_FREQ, Self::DAC_SAMPLERATE);

    /// Depth, in bytes, of the receive FIFO (ADC ISR producer, foreground
    /// consumer).
    const RX_BUFLEN: usize = 256;
    /// Depth, in bytes, of the transmit FIFO (foreground producer, DAC ISR
    /// consumer).
    const TX_BUFLEN: usize = 256;

    /// Duration of the flag-fill preamble, in milliseconds.
    const PREAMBLE_LEN_MS: u32 = 100;
    /// Duration of the flag-fill trailer, in milliseconds.
    const TRAILER_LEN_MS: u32 = 50;

    /// Receive timeout, in milliseconds: `-1` infinite, `0` non-blocking,
    /// `>0` a millisecond budget (spec.md §6).
    const RX_TIMEOUT_MS: i32 = -1;

    /// Converts a millisecond duration to a flag-byte count:
    /// `round(ms * BIT_RATE / 8000)` (spec.md §6).
    fn ms_to_flags(ms: u32) -> u16 {
        let bit_rate = Self::BIT_RATE as u64;
        let numerator = 2 * ms as u64 * bit_rate;
        let denominator = 2 * 8000u64;
        ((numerator + denominator / 2) / denominator) as u16
    }
}

/// Compile-time check that `a` is an integer multiple of `b`. Called from
/// a `const _: () = ...` item in a board's configuration module; a failing
/// check is a build error, never a runtime panic (spec.md §7 "Fatal").
pub const fn assert_divisible(a: u32, b: u32) {
    assert!(b > 0 && a % b == 0);
}

/// The modem's default configuration: 9600 Hz sampling, 76800 Hz DAC rate
/// (8 DAC samples per bit at 1200 bps * 8 samples/bit = 9600, and a DAC
/// oversampled by an additional factor of 8 for a smoother synthesized
/// tone), 256-byte FIFOs, 100ms preamble / 50ms trailer, infinite RX wait.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfig;

impl ModemConfig for DefaultConfig {
    const DAC_SAMPLERATE: u32 = 76800;
}

const _: () = assert_divisible(DefaultConfig::DAC_SAMPLERATE, DefaultConfig::BIT_RATE);
const _: () = assert!(crate::sine::SIN_LEN.is_power_of_two());

/// A runtime, `serde`-serializable snapshot of the plain-data subset of a
/// [`ModemConfig`], for boards that want to surface the compiled-in modem
/// configuration through their own settings/telemetry tree (in the manner
/// of `stabilizer`'s `Settings`/`Telemetry` split) without this crate
/// depending on that tree's framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub sample_rate: u32,
    pub bit_rate: u32,
    pub dac_samplerate: u32,
    pub rx_buflen: u16,
    pub tx_buflen: u16,
    pub preamble_len_ms: u32,
    pub trailer_len_ms: u32,
    pub rx_timeout_ms: i32,
}

impl Config {
    pub fn of<C: ModemConfig>() -> Self {
        Self {
            sample_rate: C::SAMPLE_RATE,
            bit_rate: C::BIT_RATE,
            dac_samplerate: C::DAC_SAMPLERATE,
            rx_buflen: C::RX_BUFLEN as u16,
            tx_buflen: C::TX_BUFLEN as u16,
            preamble_len_ms: C::PREAMBLE_LEN_MS,
            trailer_len_ms: C::TRAILER_LEN_MS,
            rx_timeout_ms: C::RX_TIMEOUT_MS,
        }
    }
}
