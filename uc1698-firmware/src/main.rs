//! UC1698 panel demo firmware
//!
//! Drives a 160x160 monochrome UC1698 panel over the 8080 parallel bus
//! from an RP2040. Pin assignment:
//!
//! | Signal | GPIO   |
//! |--------|--------|
//! | D0-D7  | 0-7    |
//! | CS0    | 8      |
//! | CD     | 9      |
//! | RD     | 10     |
//! | WR     | 11     |
//! | RST    | 12     |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::Flex;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use uc1698_core::address::{WordAddress, FIRST_COLUMN, WORDS_PER_ROW};
use uc1698_drivers::{BusTransport, ControlLines, Error, Uc1698};
use uc1698_hal_rp2040::{ControlPin, FlexPort};

mod config;
mod scene;

/// Rows covered by the diagonal triplet pattern
const PATTERN_ROWS: u16 = 100;

type Display = Uc1698<ControlPin<'static>, FlexPort<'static>, Delay>;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("UC1698 firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    let port = FlexPort::new([
        Flex::new(p.PIN_0),
        Flex::new(p.PIN_1),
        Flex::new(p.PIN_2),
        Flex::new(p.PIN_3),
        Flex::new(p.PIN_4),
        Flex::new(p.PIN_5),
        Flex::new(p.PIN_6),
        Flex::new(p.PIN_7),
    ]);

    let lines = ControlLines {
        chip_select: ControlPin::new(p.PIN_8),
        command_data: ControlPin::new(p.PIN_9),
        read_strobe: ControlPin::new(p.PIN_10),
        write_strobe: ControlPin::new(p.PIN_11),
        reset: ControlPin::new(p.PIN_12),
    };

    let bus = BusTransport::new(lines, port, Delay, config.timing);
    let mut display: Display = Uc1698::new(bus, config);

    display.init();
    display.fill_screen(false);
    info!("Display initialized");

    if let Err(e) = scene::draw(&mut display) {
        warn!("Scene failed: {}", Debug2Format(&e));
    }

    if let Err(e) = draw_triplet_pattern(&mut display).await {
        warn!("Pattern failed: {}", Debug2Format(&e));
    }

    info!("Entering main loop");

    let mut inverse = display.config().inverse;
    let mut beat: u32 = 0;
    loop {
        Timer::after_secs(2).await;

        inverse = !inverse;
        display.set_inverse_display(inverse);

        beat = beat.wrapping_add(1);
        debug!("heartbeat {} inverse={}", beat, inverse);
    }
}

/// Walk a lit triplet diagonally down the panel, one row at a time
async fn draw_triplet_pattern(display: &mut Display) -> Result<(), Error> {
    for row in 0..PATTERN_ROWS {
        let column = FIRST_COLUMN + (row % WORDS_PER_ROW as u16) as u8;
        let address = WordAddress::new(row, column)?;
        display.draw_pixel_triplet_at(address, true, true, true);
        Timer::after_millis(50).await;
    }
    Ok(())
}
