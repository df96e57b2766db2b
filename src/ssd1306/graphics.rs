//! embedded-graphics binding
//!
//! [`Framebuffer`] is a `DrawTarget<Color = BinaryColor>` and a pixel source,
//! so every embedded-graphics primitive writes straight into the packed page
//! layout. [`Canvas`] pairs such a buffer with a display; each canvas has its
//! own buffer until [`Canvas::push_buffer`] sends it.

use core::convert::Infallible;

use embedded_graphics::image::GetPixel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::i2c::I2c;
use image::DynamicImage;

use crate::ssd1306::display::OledDisplay;
use crate::ssd1306::error::Result;
use crate::ssd1306::framebuffer::Framebuffer;

fn extent(length: u32) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            extent(area.size.width),
            extent(area.size.height),
            color.is_on(),
        );
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        Framebuffer::clear(self, color.is_on());
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl GetPixel for Framebuffer {
    type Color = BinaryColor;

    fn pixel(&self, p: Point) -> Option<Self::Color> {
        self.get_pixel(p.x, p.y).ok().map(BinaryColor::from)
    }
}

/// Drawing surface bound to one display
pub struct Canvas<'a, I2C>
where
    I2C: I2c,
{
    display: &'a OledDisplay<I2C>,
    framebuffer: Framebuffer,
}

impl<'a, I2C> Canvas<'a, I2C>
where
    I2C: I2c,
{
    pub(crate) fn new(display: &'a OledDisplay<I2C>) -> Result<Self> {
        Ok(Canvas {
            framebuffer: Framebuffer::new(display.width(), display.height())?,
            display,
        })
    }

    /// The canvas' working buffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Mutable access for direct pixel work
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Compose an image using the display's threshold
    pub fn draw_image(&mut self, image: &DynamicImage, x: i32, y: i32) -> Result<()> {
        self.framebuffer
            .draw_image(image, x, y, self.display.threshold())
    }

    /// Send the working buffer to the display
    pub fn push_buffer(&self) -> Result<()> {
        self.display.write_display(self.framebuffer.buffer())
    }
}

impl<I2C> DrawTarget for Canvas<'_, I2C>
where
    I2C: I2c,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.framebuffer.clear(color.is_on());
        Ok(())
    }
}

impl<I2C> OriginDimensions for Canvas<'_, I2C>
where
    I2C: I2c,
{
    fn size(&self) -> Size {
        self.framebuffer.size()
    }
}

impl<I2C> GetPixel for Canvas<'_, I2C>
where
    I2C: I2c,
{
    type Color = BinaryColor;

    fn pixel(&self, p: Point) -> Option<Self::Color> {
        self.framebuffer.pixel(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1306::testing::RecordingI2c;
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use embedded_graphics::mono_font::MonoTextStyle;
    use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
    use embedded_graphics::text::{Baseline, Text};

    #[test]
    fn diagonal_line_lands_in_page_layout() {
        let mut fb = Framebuffer::new(16, 16).unwrap();
        let _ = Line::new(Point::new(0, 0), Point::new(15, 15))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb);

        let mut expected = [0u8; 32];
        for i in 0..8 {
            expected[i] = 1 << i;
            expected[16 + 8 + i] = 1 << i;
        }
        assert_eq!(fb.buffer(), &expected[..]);
    }

    #[test]
    fn filled_rectangle_is_clipped() {
        let mut fb = Framebuffer::new(128, 64).unwrap();
        let _ = Rectangle::new(Point::new(-2, 60), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb);

        let last_page = &fb.buffer()[7 * 128..];
        assert!(last_page[..8].iter().all(|&b| b == 0xF0));
        assert!(last_page[8..].iter().all(|&b| b == 0));
        assert!(fb.buffer()[..7 * 128].iter().all(|&b| b == 0));
    }

    #[test]
    fn filled_circle_reads_back() {
        let mut fb = Framebuffer::new(32, 32).unwrap();
        let _ = Circle::new(Point::new(2, 2), 10)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb);

        assert_eq!(fb.pixel(Point::new(6, 6)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(2, 2)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(Point::new(20, 20)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(Point::new(32, 0)), None);
    }

    #[test]
    fn text_stays_inside_its_glyph_cells() {
        let mut fb = Framebuffer::new(64, 16).unwrap();
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline("Hi", Point::zero(), style, Baseline::Top).draw(&mut fb);

        let mut lit = 0;
        for y in 0..16 {
            for x in 0..64 {
                if fb.get_pixel(x, y).unwrap() {
                    lit += 1;
                    assert!(x < 12 && y < 10, "pixel ({x}, {y}) outside the text");
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn draw_target_clear_fills_the_buffer() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        let _ = DrawTarget::clear(&mut fb, BinaryColor::On);
        assert_eq!(fb.buffer(), &[0xFF; 8]);
        assert_eq!(fb.size(), Size::new(8, 8));
    }

    #[test]
    fn canvases_have_independent_buffers() {
        let bus = RecordingI2c::new();
        let display = OledDisplay::new(bus.clone(), 0x3C).unwrap();
        bus.clear();

        let mut first = display.graphics().unwrap();
        let second = display.graphics().unwrap();
        let _ = Pixel(Point::new(1, 1), BinaryColor::On).draw(&mut first);

        assert_eq!(first.pixel(Point::new(1, 1)), Some(BinaryColor::On));
        assert_eq!(second.pixel(Point::new(1, 1)), Some(BinaryColor::Off));
        assert!(bus.writes().is_empty());
        assert!(!display.get_pixel(1, 1).unwrap());

        first.push_buffer().unwrap();
        assert!(display.get_pixel(1, 1).unwrap());
        assert_eq!(bus.data_writes().concat(), first.framebuffer().buffer());

        // pushing the untouched canvas blanks the panel again
        second.push_buffer().unwrap();
        assert!(!display.get_pixel(1, 1).unwrap());
    }
}
