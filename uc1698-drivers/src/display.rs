//! UC1698 display driver
//!
//! [`Uc1698`] owns the bus and the panel configuration. Mirroring lives in
//! the driver instance and every pixel operation re-addresses the
//! controller, so a mirror change never leaves a stale cursor behind.
//!
//! Single pixels are updated with a read-modify-write of their 3-pixel
//! word. The sequence is modelled by [`PixelUpdate`]: it is validated up
//! front and then applied in one call, so the steps cannot be reordered
//! or interleaved by callers.

use embedded_hal::delay::DelayNs;
use uc1698_core::address::{
    locate, validate_column, validate_row, AddressError, MirrorMode, PixelLocation, WordAddress,
    WORDS_PER_ROW,
};
use uc1698_core::command::{
    Command, BIAS_RATIO_DEFAULT, COM_END_160, COM_SCAN_FUNCTION_DEFAULT, LINE_RATE_DEFAULT,
    RAM_ADDRESS_CONTROL_AUTO_INCREMENT,
};
use uc1698_core::config::{PanelConfig, TemperatureCompensation};
use uc1698_core::pixel::PixelWord;
use uc1698_hal::{DataPort, OutputPin};

use crate::transport::BusTransport;

/// Driver errors
///
/// Everything here is caught before any bus traffic. The bus itself has no
/// way to report failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Coordinate or address outside the visible window
    Address(AddressError),
}

impl From<AddressError> for Error {
    fn from(err: AddressError) -> Self {
        Error::Address(err)
    }
}

/// A validated single-pixel update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelUpdate {
    location: PixelLocation,
    on: bool,
}

impl PixelUpdate {
    /// Resolve `(x, y)` under `mirror`
    pub fn new(x: u16, y: u16, on: bool, mirror: MirrorMode) -> Result<Self, AddressError> {
        Ok(Self {
            location: locate(x, y, mirror)?,
            on,
        })
    }

    /// Word and field the update touches
    pub fn location(&self) -> PixelLocation {
        self.location
    }

    /// Target state of the pixel
    pub fn on(&self) -> bool {
        self.on
    }

    /// Word after the update, given its current content
    pub fn merge(&self, current: PixelWord) -> PixelWord {
        current.with(self.location.position, self.on)
    }

    /// Run the read-modify-write on the bus and return the written word
    ///
    /// The read advances the controller cursor, so the address is sent
    /// again before the write.
    pub(crate) fn apply<P, D, T>(&self, bus: &mut BusTransport<P, D, T>) -> PixelWord
    where
        P: OutputPin,
        D: DataPort,
        T: DelayNs,
    {
        let address = self.location.address;
        bus.set_address(address);
        let current = bus.read_word();
        let updated = self.merge(current);
        bus.set_address(address);
        bus.write_word(updated);
        updated
    }
}

/// UC1698 160x160 monochrome panel
pub struct Uc1698<P, D, T> {
    bus: BusTransport<P, D, T>,
    config: PanelConfig,
}

impl<P, D, T> Uc1698<P, D, T>
where
    P: OutputPin,
    D: DataPort,
    T: DelayNs,
{
    /// Create a driver; nothing is sent until [`init`](Self::init)
    pub fn new(bus: BusTransport<P, D, T>, config: PanelConfig) -> Self {
        Self { bus, config }
    }

    /// Reset and configure the controller, then switch the display on
    pub fn init(&mut self) {
        info!("UC1698 init: mirror {}, vbias {}", self.config.mirror, self.config.vbias);

        self.bus.hardware_reset();
        self.system_reset();

        let config = self.config;
        self.bus.send(Command::PowerControl {
            high_capacitance: config.high_capacitance,
            internal_pump: config.internal_pump,
        });
        self.bus.send(Command::TemperatureCompensation(
            config.temperature_compensation.bits(),
        ));
        self.bus.send(Command::LcdMapping(config.mirror));
        self.bus
            .send(Command::RamAddressControl(RAM_ADDRESS_CONTROL_AUTO_INCREMENT));
        self.bus
            .send(Command::ComScanFunction(COM_SCAN_FUNCTION_DEFAULT));
        self.bus.send(Command::LineRate(LINE_RATE_DEFAULT));
        self.bus.send(Command::BiasRatio(BIAS_RATIO_DEFAULT));
        self.bus.send(Command::ComEnd(COM_END_160));
        self.bus.send(Command::NLineInversion(0));
        self.bus.send(Command::PartialDisplayDisable);
        self.bus.send(Command::VBiasPotentiometer(config.vbias));
        self.bus.send(Command::InverseDisplay(config.inverse));
        self.bus.send(Command::ColorPattern);
        self.bus.send(Command::ColorMode);
        self.bus.send(Command::DisplayEnable(true));

        info!("UC1698 ready");
    }

    /// Give back the bus
    pub fn release(self) -> BusTransport<P, D, T> {
        self.bus
    }

    /// Current panel configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Mirroring used for coordinate mapping
    pub fn mirror_mode(&self) -> MirrorMode {
        self.config.mirror
    }

    /// Change SEG/COM mirroring
    ///
    /// Pixels already in RAM stay where they are; only later coordinate
    /// mapping changes.
    pub fn set_mirror_mode(&mut self, mirror: MirrorMode) {
        debug!("mirror mode {}", mirror);
        self.bus.send(Command::LcdMapping(mirror));
        self.config.mirror = mirror;
    }

    /// Set the contrast potentiometer
    pub fn set_vbias_potentiometer(&mut self, value: u8) {
        self.bus.send(Command::VBiasPotentiometer(value));
        self.config.vbias = value;
    }

    /// Force every pixel on, ignoring RAM
    pub fn set_all_pixels_on(&mut self, on: bool) {
        self.bus.send(Command::AllPixelsOn(on));
    }

    /// Invert the whole panel
    pub fn set_inverse_display(&mut self, inverse: bool) {
        self.bus.send(Command::InverseDisplay(inverse));
        self.config.inverse = inverse;
    }

    /// Wake (`true`) or sleep (`false`) the display
    pub fn set_display_enable(&mut self, enable: bool) {
        self.bus.send(Command::DisplayEnable(enable));
    }

    /// Set the temperature compensation slope
    pub fn set_temperature_compensation(&mut self, slope: TemperatureCompensation) {
        self.bus.send(Command::TemperatureCompensation(slope.bits()));
        self.config.temperature_compensation = slope;
    }

    /// Software reset, followed by the configured settle delay
    ///
    /// Resets the controller registers, including mirroring; call
    /// [`init`](Self::init) to bring the panel back up.
    pub fn system_reset(&mut self) {
        self.bus.send(Command::SystemReset);
        let settle = self.bus.timing().system_reset_settle_ms;
        self.bus.delay_ms(settle);
    }

    /// Send a no-operation command
    pub fn nop(&mut self) {
        self.bus.send(Command::Nop);
    }

    /// Move the controller cursor to a word column (37..=90)
    ///
    /// The controller expects the column before the row on every address
    /// change; follow this with [`set_row_address`](Self::set_row_address).
    pub fn set_column_address(&mut self, column: u8) -> Result<(), Error> {
        let column = validate_column(column)?;
        self.bus.send(Command::ColumnAddress(column));
        Ok(())
    }

    /// Move the controller cursor to a row (0..=159)
    ///
    /// Must come after [`set_column_address`](Self::set_column_address).
    pub fn set_row_address(&mut self, row: u16) -> Result<(), Error> {
        let row = validate_row(row)?;
        self.bus.send(Command::RowAddress(row));
        Ok(())
    }

    /// Turn a single pixel on or off
    ///
    /// The two neighbours sharing its word are preserved.
    pub fn draw_pixel(&mut self, x: u16, y: u16, on: bool) -> Result<(), Error> {
        let update = PixelUpdate::new(x, y, on, self.config.mirror)?;
        let word = update.apply(&mut self.bus);
        trace!("pixel ({}, {}) = {} -> {=u16:#x}", x, y, on, word.raw());
        Ok(())
    }

    /// Read back a single pixel
    ///
    /// A pixel is on only if its whole field is set, matching what
    /// [`draw_pixel`](Self::draw_pixel) writes.
    pub fn pixel(&mut self, x: u16, y: u16) -> Result<bool, Error> {
        let location = locate(x, y, self.config.mirror)?;
        Ok(self.read_word_at(location.address).is_on(location.position))
    }

    /// Set every visible pixel on or off
    ///
    /// Write-only: each row is addressed once and the controller's
    /// auto-increment walks the 54 words.
    pub fn fill_screen(&mut self, on: bool) {
        debug!("fill screen {}", on);
        let word = PixelWord::uniform(on);
        for start in WordAddress::row_starts() {
            self.bus.set_address(start);
            for _ in 0..WORDS_PER_ROW {
                self.bus.write_word(word);
            }
        }
    }

    /// Write three pixels at the controller cursor
    ///
    /// The cursor advances by one word.
    pub fn draw_pixel_triplet(&mut self, p1: bool, p2: bool, p3: bool) {
        self.bus.write_word(PixelWord::from_triplet(p1, p2, p3));
    }

    /// Write three pixels at `address`
    ///
    /// Addresses column then row before the write. The cursor ends one
    /// word past `address`.
    pub fn draw_pixel_triplet_at(&mut self, address: WordAddress, p1: bool, p2: bool, p3: bool) {
        self.bus.set_address(address);
        self.draw_pixel_triplet(p1, p2, p3);
    }

    /// Read the word at `address`
    pub fn read_word_at(&mut self, address: WordAddress) -> PixelWord {
        self.bus.set_address(address);
        self.bus.read_word()
    }

    /// Overwrite the word at `address`
    pub fn write_word_at(&mut self, address: WordAddress, word: PixelWord) {
        self.bus.set_address(address);
        self.bus.write_word(word);
    }
}
