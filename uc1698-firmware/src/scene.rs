//! Start-up screen

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

/// Border, title and a small test figure
pub fn draw<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    target.bounding_box().into_styled(stroke).draw(target)?;

    Text::new(
        "UC1698 160x160",
        Point::new(8, 14),
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
    )
    .draw(target)?;

    Line::new(Point::new(4, 20), Point::new(155, 20))
        .into_styled(stroke)
        .draw(target)?;

    Circle::new(Point::new(110, 110), 40)
        .into_styled(stroke)
        .draw(target)?;

    Rectangle::new(Point::new(10, 110), Size::new(40, 40))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    Ok(())
}
