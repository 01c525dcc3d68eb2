//! Public façade: `init`/`read`/`write`/`flush` and the two ISR entry
//! points a board calls directly, `on_adc_sample`/`on_dac_tick`
//! (spec.md §4.5, §9).

use embedded_io::{ErrorType, Read, Write};

use crate::clock_recovery::ClockRecovery;
use crate::config::ModemConfig;
use crate::discriminator::Discriminator;
use crate::fifo::{self, Fifo};
use crate::hal::{Adc, AdcIrq, Dac, DacIrq, Platform, Strobe};
use crate::hdlc::{HdlcRx, HdlcTx, RxEvent};

/// The modem singleton. `RX_CAP`/`TX_CAP`/`DELAY_CAP` are the *backing*
/// FIFO capacities (one more than the usable depth, per
/// [`crate::fifo::Fifo`]'s sentinel slot): a board picks
/// `RX_CAP = C::RX_BUFLEN + 1`, `TX_CAP = C::TX_BUFLEN + 1`,
/// `DELAY_CAP = C::DELAY_LEN + 1` when instantiating.
///
/// All wire-processing state lives here rather than in crate-level
/// statics (spec.md §9, SPEC_FULL.md §4): a board's ISR calls
/// `modem.on_adc_sample()` / `modem.on_dac_tick()` directly — each reads
/// its own collaborator (`self.adc.read_sample()`) rather than taking the
/// sample as an argument. A board
/// whose ISR linkage forbids a context argument can still stash a single
/// `Modem` behind a `critical_section`-guarded `RefCell` at the
/// integration layer; that remains the board's choice, not this crate's.
pub struct Modem<'a, C, const RX_CAP: usize, const TX_CAP: usize, const DELAY_CAP: usize>
where
    C: ModemConfig,
{
    adc: &'a dyn Adc,
    adc_irq: &'a dyn AdcIrq,
    dac: &'a dyn Dac,
    dac_irq: &'a dyn DacIrq,
    strobe: &'a dyn Strobe,
    platform: &'a dyn Platform,

    rx_fifo: Fifo<u8, RX_CAP>,
    tx_fifo: Fifo<u8, TX_CAP>,
    discriminator: Discriminator<DELAY_CAP>,
    clock_recovery: ClockRecovery<C>,
    hdlc_rx: HdlcRx,
    hdlc_tx: HdlcTx<C>,
}

impl<'a, C, const RX_CAP: usize, const TX_CAP: usize, const DELAY_CAP: usize>
    Modem<'a, C, RX_CAP, TX_CAP, DELAY_CAP>
where
    C: ModemConfig,
{
    /// Binds the FIFOs to their backing buffers, pre-fills `delay_fifo`,
    /// initializes the ADC and strobe, and zeroes the rest of the modem
    /// state (spec.md §4.5 `init`).
    pub fn init(
        adc: &'a dyn Adc,
        adc_irq: &'a dyn AdcIrq,
        dac: &'a dyn Dac,
        dac_irq: &'a dyn DacIrq,
        strobe: &'a dyn Strobe,
        platform: &'a dyn Platform,
    ) -> Self {
        adc.init();
        strobe.off();
        Self {
            adc,
            adc_irq,
            dac,
            dac_irq,
            strobe,
            platform,
            rx_fifo: Fifo::new(),
            tx_fifo: Fifo::new(),
            discriminator: Discriminator::new(),
            clock_recovery: ClockRecovery::new(),
            hdlc_rx: HdlcRx::new(),
            hdlc_tx: HdlcTx::new(),
        }
    }

    /// ADC sample-rate ISR entry point (spec.md §4.2). Reads the latest
    /// sample, runs the discriminator, clock recovery, and (on a bit
    /// decision) the HDLC RX parser, then acknowledges the interrupt.
    pub fn on_adc_sample(&mut self) {
        self.strobe.on();
        let sample = self.adc.read_sample();
        let discriminator_out = self.discriminator.process(sample);
        if let Some(bit) = self.clock_recovery.process(discriminator_out) {
            match self.hdlc_rx.process(bit, &mut self.rx_fifo) {
                Some(RxEvent::Overflow) => {
                    log::warn!("rx_fifo overflow, frame abandoned");
                }
                Some(RxEvent::Abort) => {
                    log::debug!("hdlc abort/reset detected");
                }
                None => {}
            }
        }
        self.strobe.off();
        self.adc_irq.end();
    }

    /// DAC sample-rate ISR entry point (spec.md §4.4). Runs the HDLC TX
    /// framer and DDS for one sample, tearing the interrupt down once the
    /// transmitter has nothing left to send.
    pub fn on_dac_tick(&mut self) {
        match self.hdlc_tx.tick(&mut self.tx_fifo) {
            Some(sample) => self.dac.write_sample(sample),
            None => self.dac_irq.stop(),
        }
        self.dac_irq.end();
    }

    /// `afsk_txStart`: primes the transmitter and starts the DAC interrupt
    /// if it was not already running. `trailer_len` is reloaded inside a
    /// critical section on every call (spec.md §5 "Atomicity").
    fn tx_start(&mut self) {
        let newly_started = fifo::locked(|| self.hdlc_tx.start());
        if newly_started {
            self.dac_irq.start();
        }
    }

    fn is_sending(&self) -> bool {
        fifo::locked(|| self.hdlc_tx.is_sending())
    }
}

impl<'a, C, const RX_CAP: usize, const TX_CAP: usize, const DELAY_CAP: usize> ErrorType
    for Modem<'a, C, RX_CAP, TX_CAP, DELAY_CAP>
where
    C: ModemConfig,
{
    type Error = core::convert::Infallible;
}

impl<'a, C, const RX_CAP: usize, const TX_CAP: usize, const DELAY_CAP: usize> Read
    for Modem<'a, C, RX_CAP, TX_CAP, DELAY_CAP>
where
    C: ModemConfig,
{
    /// Spins waiting on `rx_fifo`, honoring `C::RX_TIMEOUT_MS` (`-1`
    /// infinite, `0` non-blocking, `>0` a millisecond budget). Returns the
    /// count of bytes actually delivered, which may be short on timeout
    /// (spec.md §4.5, §7).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let deadline = if C::RX_TIMEOUT_MS > 0 {
            Some(
                self.platform
                    .now()
                    .wrapping_add(self.platform.ms_to_ticks(C::RX_TIMEOUT_MS)),
            )
        } else {
            None
        };

        let mut n = 0;
        for slot in buf.iter_mut() {
            loop {
                if let Some(byte) = self.rx_fifo.pop() {
                    *slot = byte;
                    n += 1;
                    break;
                }
                if C::RX_TIMEOUT_MS == 0 {
                    return Ok(n);
                }
                if let Some(deadline) = deadline {
                    let expired = (self.platform.now().wrapping_sub(deadline) as i32) >= 0;
                    if expired {
                        return Ok(n);
                    }
                }
                self.platform.relax();
            }
        }
        Ok(n)
    }
}

impl<'a, C, const RX_CAP: usize, const TX_CAP: usize, const DELAY_CAP: usize> Write
    for Modem<'a, C, RX_CAP, TX_CAP, DELAY_CAP>
where
    C: ModemConfig,
{
    /// For each byte, spins while `tx_fifo` is full, pushes it, and starts
    /// (or extends) the transmission. Always consumes the whole buffer
    /// (spec.md §4.5: "may block indefinitely if the ISR never drains").
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            while self.tx_fifo.is_full() {
                self.platform.relax();
            }
            let _ = self.tx_fifo.push(byte);
            self.tx_start();
        }
        Ok(buf.len())
    }

    /// Spins while the transmitter is still sending; returns once the DAC
    /// interrupt has torn down. Idempotent once quiescent (spec.md §8
    /// invariant 6).
    fn flush(&mut self) -> Result<(), Self::Error> {
        while self.is_sending() {
            self.platform.relax();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultConfig;
    use crate::hal::test_support::{MockAdc, MockDac, MockIrq, MockPlatform, MockStrobe};

    type TestModem<'a> = Modem<'a, DefaultConfig, 257, 257, 5>;

    struct Harness {
        adc: MockAdc,
        dac: MockDac,
        adc_irq: MockIrq,
        dac_irq: MockIrq,
        strobe: MockStrobe,
        platform: MockPlatform,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                adc: MockAdc::new(),
                dac: MockDac::new(),
                adc_irq: MockIrq::new(),
                dac_irq: MockIrq::new(),
                strobe: MockStrobe::new(),
                platform: MockPlatform::new(),
            }
        }

        fn modem(&self) -> TestModem<'_> {
            Modem::init(
                &self.adc,
                &self.adc_irq,
                &self.dac,
                &self.dac_irq,
                &self.strobe,
                &self.platform,
            )
        }
    }

    /// Hand-drives `on_dac_tick` (no RTIC, no hardware) until the
    /// transmitter tears itself down.
    fn drain_tx<const RC: usize, const TC: usize, const DC: usize>(
        modem: &mut Modem<'_, DefaultConfig, RC, TC, DC>,
    ) {
        let mut ticks = 0;
        while modem.is_sending() {
            modem.on_dac_tick();
            ticks += 1;
            assert!(ticks < 200_000, "transmitter never stopped");
        }
    }

    #[test]
    fn flush_is_idempotent_when_quiescent() {
        let harness = Harness::new();
        let mut modem = harness.modem();
        modem.flush().unwrap();
        modem.flush().unwrap();
    }

    #[test]
    fn read_with_zero_timeout_on_empty_fifo_returns_zero() {
        // DefaultConfig uses an infinite timeout; this test exercises the
        // non-blocking contract directly against a config with
        // RX_TIMEOUT_MS == 0.
        #[derive(Clone, Copy, Debug, Default)]
        struct NonBlocking;
        impl ModemConfig for NonBlocking {
            const DAC_SAMPLERATE: u32 = 76800;
            const RX_TIMEOUT_MS: i32 = 0;
        }

        let harness = Harness::new();
        let mut modem: Modem<'_, NonBlocking, 257, 257, 5> = Modem::init(
            &harness.adc,
            &harness.adc_irq,
            &harness.dac,
            &harness.dac_irq,
            &harness.strobe,
            &harness.platform,
        );
        let mut buf = [0u8; 4];
        let n = modem.read(&mut buf).unwrap();
        assert_eq!(n, 0);
    }

    /// Writes `input` to `modem`, feeds the resulting DAC waveform straight
    /// back into its own demodulator (a noise-free electrical loopback),
    /// and returns every byte the HDLC RX parser pushed onto `rx_fifo`,
    /// `HDLC_FLAG`-delimiters included.
    fn loopback(harness: &Harness, input: &[u8]) -> std::vec::Vec<u8> {
        let mut modem = harness.modem();
        modem.write(input).unwrap();
        drain_tx(&mut modem);

        for sample in harness.dac.drain() {
            let centered = sample as i16 - 128;
            harness.adc.feed(centered.clamp(-127, 127) as i8);
            modem.on_adc_sample();
        }

        let mut recovered = std::vec::Vec::new();
        while let Some(b) = modem.rx_fifo.pop() {
            recovered.push(b);
        }
        recovered
    }

    /// Splits a `HDLC_FLAG`-delimited byte stream into frame payloads,
    /// dropping the empty segments produced by back-to-back idle flags
    /// (preamble/trailer fill). An `AX25_ESC` byte always keeps the byte
    /// that follows it, so a reassembled payload byte that merely
    /// coincides with `HDLC_FLAG` (and was therefore escaped on its way
    /// into `rx_fifo`) is never mistaken for a real flag delimiter.
    fn frames(stream: &[u8]) -> std::vec::Vec<std::vec::Vec<u8>> {
        let mut out = std::vec::Vec::new();
        let mut cur = std::vec::Vec::new();
        let mut i = 0;
        while i < stream.len() {
            let b = stream[i];
            if b == crate::config::AX25_ESC && i + 1 < stream.len() {
                cur.push(b);
                cur.push(stream[i + 1]);
                i += 2;
                continue;
            }
            if b == crate::config::HDLC_FLAG {
                if !cur.is_empty() {
                    out.push(core::mem::take(&mut cur));
                }
            } else {
                cur.push(b);
            }
            i += 1;
        }
        if !cur.is_empty() {
            out.push(cur);
        }
        out
    }

    /// Runs one row of spec.md §8's end-to-end scenario table: the
    /// recovered frame stream must contain the expected (possibly
    /// escaped) payload byte-for-byte, modulo the surrounding idle flags.
    fn assert_scenario(input: &[u8], expected_payload: &[u8]) {
        let harness = Harness::new();
        let recovered = loopback(&harness, input);
        let payloads = frames(&recovered);
        assert!(
            payloads.iter().any(|f| f == expected_payload),
            "expected payload {:02x?} not found in recovered frames {:02x?}",
            expected_payload,
            payloads,
        );
    }

    #[test]
    fn scenario_plain_byte_round_trips() {
        // Row 1: 0x55 -> 0x55 (no escaping needed).
        assert_scenario(&[0x55], &[0x55]);
    }

    #[test]
    fn scenario_flag_byte_is_escaped() {
        // Row 2: 0x7E -> AX25_ESC, 0x7E.
        assert_scenario(&[0x7E], &[crate::config::AX25_ESC, 0x7E]);
    }

    #[test]
    fn scenario_repeated_ff_is_transparent_through_stuffing() {
        // Row 3: 0xFF 0xFF -> 0xFF, 0xFF (bit stuffing invisible to the
        // byte-level payload).
        assert_scenario(&[0xFF, 0xFF], &[0xFF, 0xFF]);
    }

    #[test]
    fn scenario_escape_byte_is_escaped() {
        // Row 4: 0x1B -> AX25_ESC, 0x1B.
        assert_scenario(&[0x1B], &[crate::config::AX25_ESC, 0x1B]);
    }

    #[test]
    fn scenario_256_byte_sweep_round_trips() {
        // Row 6: the full 0x00..=0xFF byte sweep, including the three
        // reserved sentinel values, recovers byte-identical modulo the
        // parser escaping those three coincidental byte values the same
        // way rows 2 and 4 do.
        let input: std::vec::Vec<u8> = (0..=255u8).collect();
        let expected: std::vec::Vec<u8> = input
            .iter()
            .flat_map(|&b| {
                if b == crate::config::HDLC_FLAG
                    || b == crate::config::HDLC_RESET
                    || b == crate::config::AX25_ESC
                {
                    std::vec![crate::config::AX25_ESC, b]
                } else {
                    std::vec![b]
                }
            })
            .collect();
        assert_scenario(&input, &expected);
    }
}
