//! Mirrors a [`FrameBuffer`] onto a TFT as a grid of square cells.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::matrix::FrameBuffer;

/// Redraws only the cells that changed since the previous flush.
pub struct PanelMirror<const W: usize, const H: usize> {
    origin: Point,
    cell: u32,
    shadow: [[Option<Rgb888>; W]; H],
}

impl<const W: usize, const H: usize> PanelMirror<W, H> {
    pub const fn new(origin: Point, cell: u32) -> Self {
        Self {
            origin,
            cell,
            shadow: [[None; W]; H],
        }
    }

    /// Area covered on the target.
    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            self.origin,
            Size::new(self.cell * W as u32, self.cell * H as u32),
        )
    }

    /// Forget what was drawn; the next flush repaints everything.
    pub fn invalidate(&mut self) {
        self.shadow = [[None; W]; H];
    }

    /// Returns the number of cells redrawn.
    pub fn flush<D>(&mut self, frame: &FrameBuffer<W, H>, target: &mut D) -> Result<usize, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let origin = self.origin;
        let cell = self.cell;
        let mut redrawn = 0;

        for (y, row) in self.shadow.iter_mut().enumerate() {
            for (x, drawn) in row.iter_mut().enumerate() {
                let Some(color) = frame.get_pixel(x, y) else {
                    continue;
                };
                if *drawn == Some(color) {
                    continue;
                }
                let top_left = origin + Point::new(x as i32 * cell as i32, y as i32 * cell as i32);
                Rectangle::new(top_left, Size::new_equal(cell))
                    .into_styled(PrimitiveStyle::with_fill(Rgb565::from(color)))
                    .draw(target)?;
                *drawn = Some(color);
                redrawn += 1;
            }
        }

        if redrawn > 0 {
            trace!("panel flush: {} cells", redrawn);
        }
        Ok(redrawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{palette, LedMatrix};
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn first_flush_paints_every_cell() {
        let fb: FrameBuffer<16, 7> = FrameBuffer::new();
        let mut mirror: PanelMirror<16, 7> = PanelMirror::new(Point::zero(), 2);
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();

        assert_eq!(mirror.flush(&fb, &mut display), Ok(16 * 7));
        assert_eq!(display.affected_area(), mirror.bounding_box());
        assert_eq!(display.get_pixel(Point::new(31, 13)), Some(Rgb565::BLACK));
    }

    #[test]
    fn later_flushes_only_touch_changes() {
        let fb: FrameBuffer<16, 7> = FrameBuffer::new();
        let mut mirror: PanelMirror<16, 7> = PanelMirror::new(Point::new(0, 1), 3);
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);

        mirror.flush(&fb, &mut display).unwrap();
        assert_eq!(mirror.flush(&fb, &mut display), Ok(0));

        fb.set_pixel(15, 0, palette::RED);
        fb.set_pixel(2, 6, palette::GREEN);
        assert_eq!(mirror.flush(&fb, &mut display), Ok(2));

        // cell (15, 0) spans x 45..48, y 1..4
        assert_eq!(display.get_pixel(Point::new(45, 1)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(47, 3)), Some(Rgb565::RED));
        assert_eq!(
            display.get_pixel(Point::new(7, 19)),
            Some(Rgb565::from(palette::GREEN))
        );
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let fb: FrameBuffer<16, 7> = FrameBuffer::new();
        let mut mirror: PanelMirror<16, 7> = PanelMirror::new(Point::zero(), 1);
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);

        mirror.flush(&fb, &mut display).unwrap();
        mirror.invalidate();
        assert_eq!(mirror.flush(&fb, &mut display), Ok(16 * 7));
    }
}
