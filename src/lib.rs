//! A full-duplex Bell-202-compatible AFSK1200 software modem.
//!
//! This crate implements the three tightly-coupled subsystems of an
//! AFSK1200 packet-radio modem: a [`dds`]-driven transmit modulator, a
//! delay-line-discriminator receive demodulator ([`discriminator`],
//! [`clock_recovery`]), and an HDLC ([`hdlc`]) framing parser that recovers
//! flag-delimited, bit-stuffed frames from (and reassembles them onto) the
//! recovered/transmitted bitstream.
//!
//! The crate owns none of the hardware: the ADC/DAC sampling ISRs, timers,
//! and debug strobes are reached only through the collaborator traits in
//! [`hal`]. A board wires a concrete ADC/DAC pair and a timer interrupt to
//! the two entry points on [`modem::Modem`]:
//!
//! ```rust,ignore
//! # use afsk1200_modem::{modem::Modem, config::DefaultConfig};
//! #[task(binds = ADC_DMA, local = [modem], priority = 3)]
//! fn adc_isr(c: adc_isr::Context) {
//!     c.local.modem.on_adc_sample();
//! }
//!
//! #[task(binds = DAC_DMA, local = [modem], priority = 3)]
//! fn dac_isr(c: dac_isr::Context) {
//!     c.local.modem.on_dac_tick();
//! }
//! ```
//!
//! Everything above the HDLC byte stream (AX.25 addressing, FCS checking,
//! retransmission) is out of scope, per the design notes in `SPEC_FULL.md`.
#![cfg_attr(not(test), no_std)]
#![deny(warnings)]

pub mod clock_recovery;
pub mod config;
pub mod dds;
pub mod discriminator;
pub mod fifo;
pub mod hal;
pub mod hdlc;
pub mod modem;
pub mod nrzi;
pub mod sine;

pub use config::{Config, ModemConfig};
pub use modem::Modem;
