//! embedded-graphics support
//!
//! Every drawn pixel goes through [`Uc1698::draw_pixel`], so drawing is a
//! read-modify-write per pixel. Clearing uses the write-only fill.

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::Pixel;
use embedded_hal::delay::DelayNs;
use uc1698_core::address::{HEIGHT, WIDTH};
use uc1698_hal::{DataPort, OutputPin};

use crate::display::{Error, Uc1698};

impl<P, D, T> OriginDimensions for Uc1698<P, D, T>
where
    P: OutputPin,
    D: DataPort,
    T: DelayNs,
{
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<P, D, T> DrawTarget for Uc1698<P, D, T>
where
    P: OutputPin,
    D: DataPort,
    T: DelayNs,
{
    type Color = BinaryColor;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            // Only draw pixels that would be on screen
            let (Ok(x), Ok(y)) = (u16::try_from(coord.x), u16::try_from(coord.y)) else {
                continue;
            };
            if x < WIDTH && y < HEIGHT {
                self.draw_pixel(x, y, color.is_on())?;
            }
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color.is_on());
        Ok(())
    }
}
