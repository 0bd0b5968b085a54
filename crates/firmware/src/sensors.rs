//! Capture of the instrument's physical inputs.
//!
//! One [`Sensors`] bundle owns every input peripheral: the two on-board buttons, the four finger
//! switches on the edge connector, the flex sensor's ADC channel, and the on-board LSM303AGR
//! accelerometer. [`Sensors::snapshot`] reads them all once and freezes the result for the tick.

use defmt::warn;
use embassy_nrf::gpio::Input;
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::saadc::Saadc;
use embassy_nrf::twim::Twim;
use lsm303agr::Lsm303agr;
use lsm303agr::interface::I2cInterface;
use lsm303agr::mode::MagOneShot;
use strumbit_lib::input::{Fingers, SensorSnapshot};

/// Every input peripheral, bundled for the poll loop.
pub struct Sensors<'d> {
    /// Hand button A, active low.
    pub button_a: Input<'d>,
    /// Hand button B, active low.
    pub button_b: Input<'d>,
    /// Index finger switch, active high.
    pub index: Input<'d>,
    /// Middle finger switch, active high.
    pub middle: Input<'d>,
    /// Ring finger switch, active high.
    pub ring: Input<'d>,
    /// Pinky finger switch, active high.
    pub pinky: Input<'d>,
    /// ADC with the flex sensor on its only channel, 10-bit.
    pub saadc: Saadc<'d, 1>,
    /// The on-board accelerometer; the strumming axis is z.
    pub accelerometer: Lsm303agr<I2cInterface<Twim<'d, TWISPI0>>, MagOneShot>,
    /// Previous z-axis sample, reused if a read fails.
    pub last_accel: i32,
}

impl Sensors<'_> {
    /// Reads every input once and returns the frozen snapshot.
    pub async fn snapshot(&mut self) -> SensorSnapshot {
        let mut adc_buf = [0_i16; 1];
        self.saadc.sample(&mut adc_buf).await;
        // single-ended SAADC readings can dip slightly below zero near ground
        let flex = adc_buf[0].max(0) as u16;

        let accel = match self.accelerometer.acceleration() {
            Ok(sample) => sample.z_mg(),
            Err(_) => {
                warn!("Accelerometer read failed; reusing the previous sample");
                self.last_accel
            }
        };
        self.last_accel = accel;

        SensorSnapshot {
            button_a: self.button_a.is_low(),
            button_b: self.button_b.is_low(),
            fingers: Fingers {
                index: self.index.is_high(),
                middle: self.middle.is_high(),
                ring: self.ring.is_high(),
                pinky: self.pinky.is_high(),
            },
            flex,
            accel,
        }
    }
}
