//! strumbit is [Embassy](https://embassy.dev)-based firmware for a gesture-controlled MIDI air
//! guitar built around the BBC micro:bit v2 (nRF52833). One hand wears four finger switches; the
//! strumming hand holds the board itself, with a flex sensor on one finger and the two on-board
//! buttons under the others. Strumming motion is picked up by the on-board accelerometer, and the
//! resulting Note On/Off and Control Change messages stream out over serial MIDI to a downstream
//! synthesizer host.
//!
//! All gesture recognition lives in the architecture-agnostic [`strumbit_lib`] crate; this binary
//! only wires up peripherals, polls them into [`SensorSnapshot`]s, and transmits whatever frames
//! the [`AirGuitar`] state machine produces.
//!
//! Pin map (micro:bit v2 edge connector):
//! - pin 0 (P0.02): MIDI out, 31250 baud 8N1
//! - pin 2 (P0.04): flex sensor, analog
//! - pins 3/4/6/7 (P0.31/P0.28/P1.05/P0.11): index/middle/ring/pinky switches
//!
//! The LED matrix is left uninitialized so its rows and columns are free for the edge connector.

#![no_std]
#![no_main]

mod sensors;

use crate::sensors::Sensors;
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Pull},
    peripherals, saadc,
    saadc::{ChannelConfig, Resolution, Saadc},
    twim::{self, Twim},
    uarte::{self, Baudrate, Parity, UarteTx},
};
use embassy_time::{Delay, Timer};
use lsm303agr::{AccelMode, AccelOutputDataRate, Lsm303agr};
use strumbit_lib::SensorSnapshot;
use strumbit_lib::configuration::Configuration;
use strumbit_lib::mode::AirGuitar;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Initializing strumbit");
    let p = embassy_nrf::init(Default::default());

    // MIDI out on edge pin 0: the standard serial MIDI physical layer.
    let mut uart_config = uarte::Config::default();
    uart_config.baudrate = Baudrate::BAUD31250;
    uart_config.parity = Parity::EXCLUDED;
    let mut midi_out = UarteTx::new(p.UARTE0, Irqs, p.P0_02, uart_config);

    // Flex sensor on edge pin 2. 10-bit resolution so raw readings span 0-1023, the range the
    // flex mapping is calibrated for.
    let mut adc_config = saadc::Config::default();
    adc_config.resolution = Resolution::_10BIT;
    let flex_channel = ChannelConfig::single_ended(p.P0_04);
    let saadc = Saadc::new(p.SAADC, Irqs, adc_config, [flex_channel]);

    // On-board LSM303AGR on the internal I2C bus.
    let twim = Twim::new(p.TWISPI0, Irqs, p.P0_16, p.P0_08, twim::Config::default());
    let mut accelerometer = Lsm303agr::new_with_i2c(twim);
    if accelerometer.init().is_err() {
        error!("Accelerometer init failed");
    }
    if accelerometer
        .set_accel_mode_and_odr(&mut Delay, AccelMode::Normal, AccelOutputDataRate::Hz100)
        .is_err()
    {
        error!("Accelerometer configuration failed");
    }

    let mut sensors = Sensors {
        // the on-board buttons idle high and read low when pressed
        button_a: Input::new(p.P0_14, Pull::None),
        button_b: Input::new(p.P0_23, Pull::None),
        // the finger switches close to 3V, so they get pull-downs and read high when pressed
        index: Input::new(p.P0_31, Pull::Down),
        middle: Input::new(p.P0_28, Pull::Down),
        ring: Input::new(p.P1_05, Pull::Down),
        pinky: Input::new(p.P0_11, Pull::Down),
        saadc,
        accelerometer,
        last_accel: 0,
    };

    let mut guitar = AirGuitar::new(Configuration::default());
    info!("strumbit ready");

    loop {
        let snapshot: SensorSnapshot = sensors.snapshot().await;

        let mode_before = guitar.mode();
        let frames = guitar.tick(&snapshot);
        let mode_after = guitar.mode();
        if mode_after != mode_before {
            info!("Mode transition: {} -> {}", mode_before, mode_after);
        }

        for frame in frames.iter() {
            // no acknowledgment and no retry; a failed write costs one frame
            if let Err(err) = midi_out.write(frame).await {
                error!("MIDI write failed: {}", err);
            }
        }

        Timer::after(guitar.period()).await;
    }
}
