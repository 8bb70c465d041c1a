//! The shared LED matrix and how it is split between the two loops.
//!
//! Both executors write to the same device, but never to the same pixel: each
//! loop only holds [`RegionWriter`]s for its own [`Region`]s, and the
//! [`Layout`] guarantees those regions are disjoint. No lock is involved.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::pixelcolor::raw::RawU24;
use embedded_graphics::pixelcolor::IntoStorage;
use portable_atomic::{AtomicU32, Ordering};

pub use embedded_graphics::pixelcolor::Rgb888;

use crate::Error;

pub mod palette {
    use super::Rgb888;

    pub const BLACK: Rgb888 = Rgb888::new(0, 0, 0);
    pub const RED: Rgb888 = Rgb888::new(255, 0, 0);
    pub const GREEN: Rgb888 = Rgb888::new(0, 50, 0);
    pub const BLUE: Rgb888 = Rgb888::new(0, 0, 50);
    pub const WHITE: Rgb888 = Rgb888::new(50, 50, 50);
    pub const MAGENTA: Rgb888 = Rgb888::new(255, 0, 255);
    pub const AMBER: Rgb888 = Rgb888::new(50, 25, 0);
}

/// An RGB pixel matrix that can be written from more than one context.
pub trait LedMatrix {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Out-of-range coordinates are ignored.
    fn set_pixel(&self, x: usize, y: usize, color: Rgb888);
}

impl<T: LedMatrix + ?Sized> LedMatrix for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn set_pixel(&self, x: usize, y: usize, color: Rgb888) {
        (**self).set_pixel(x, y, color)
    }
}

/// Lock-free pixel store, one atomic word per pixel.
///
/// This is the device both loops draw on; a separate task mirrors it onto the
/// physical panel (see [`crate::mirror`]).
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[AtomicU32; W]; H],
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    pub const fn new() -> Self {
        Self {
            pixels: [const { [const { AtomicU32::new(0) }; W] }; H],
            changed: Signal::new(),
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .map(|p| Rgb888::from(RawU24::new(p.load(Ordering::Relaxed))))
    }

    /// Resolves once any pixel changed since the last call.
    pub async fn wait_changed(&self) {
        self.changed.wait().await
    }
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> LedMatrix for FrameBuffer<W, H> {
    fn width(&self) -> usize {
        W
    }

    fn height(&self) -> usize {
        H
    }

    fn set_pixel(&self, x: usize, y: usize, color: Rgb888) {
        if let Some(p) = self.pixels.get(y).and_then(|row| row.get(x)) {
            if p.swap(color.into_storage(), Ordering::Relaxed) != color.into_storage() {
                self.changed.signal(());
            }
        }
    }
}

/// Half-open rectangle of pixels, `x0..x1` × `y0..y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Region {
    pub const fn new(x0: usize, x1: usize, y0: usize, y1: usize) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub const fn overlaps(&self, other: &Region) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Fits on a `width` × `height` panel.
    pub const fn within(&self, width: usize, height: usize) -> bool {
        self.x0 <= self.x1 && self.x1 <= width && self.y0 <= self.y1 && self.y1 <= height
    }

    pub fn points(&self) -> impl Iterator<Item = (usize, usize)> {
        let Region { x0, x1, y0, y1 } = *self;
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Region assignment for both loops.
///
/// Sampler regions may overlap each other (the notify strip sits inside the
/// heartbeat column), but no sampler region may touch an alerter region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub sampler_heartbeat: Region,
    pub sample_notify: Region,
    pub status: Region,
    pub alert: Region,
    pub alerter_heartbeat: Region,
}

impl Layout {
    /// 16×7 panel: column 0 sampler pulses, columns 1–13 status, columns
    /// 14–15 alert blink (rows 0–4) over the alerter heartbeat (rows 5–6).
    pub const PANEL: Self = Self {
        width: 16,
        height: 7,
        sampler_heartbeat: Region::new(0, 1, 0, 7),
        sample_notify: Region::new(0, 1, 2, 5),
        status: Region::new(1, 14, 0, 7),
        alert: Region::new(14, 16, 0, 5),
        alerter_heartbeat: Region::new(14, 16, 5, 7),
    };

    pub const fn sampler_regions(&self) -> [Region; 3] {
        [self.sampler_heartbeat, self.sample_notify, self.status]
    }

    pub const fn alerter_regions(&self) -> [Region; 2] {
        [self.alert, self.alerter_heartbeat]
    }

    pub const fn validate(&self) -> Result<(), Error> {
        let sampler = self.sampler_regions();
        let alerter = self.alerter_regions();

        let mut i = 0;
        while i < sampler.len() {
            if !sampler[i].within(self.width, self.height) {
                return Err(Error::InvalidLayout);
            }
            let mut j = 0;
            while j < alerter.len() {
                if sampler[i].overlaps(&alerter[j]) {
                    return Err(Error::InvalidLayout);
                }
                j += 1;
            }
            i += 1;
        }

        let mut j = 0;
        while j < alerter.len() {
            if !alerter[j].within(self.width, self.height) {
                return Err(Error::InvalidLayout);
            }
            j += 1;
        }

        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::PANEL
    }
}

const _: () = assert!(matches!(Layout::PANEL.validate(), Ok(())));

/// Write access to one region of a shared matrix.
pub struct RegionWriter<'a, M: ?Sized> {
    matrix: &'a M,
    region: Region,
}

impl<'a, M: LedMatrix + ?Sized> RegionWriter<'a, M> {
    pub fn new(matrix: &'a M, region: Region) -> Self {
        debug_assert!(region.within(matrix.width(), matrix.height()));
        Self { matrix, region }
    }

    pub fn set(&self, x: usize, y: usize, color: Rgb888) {
        debug_assert!(
            self.region.contains(x, y),
            "pixel outside the writer's region"
        );
        if self.region.contains(x, y) {
            self.matrix.set_pixel(x, y, color);
        }
    }

    pub fn fill(&self, color: Rgb888) {
        for (x, y) in self.region.points() {
            self.matrix.set_pixel(x, y, color);
        }
    }

    pub fn clear(&self) {
        self.fill(palette::BLACK);
    }
}
