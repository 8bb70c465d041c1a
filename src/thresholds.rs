use crate::matrix::{palette, Rgb888};
use crate::Error;

/// Temperature band a reading falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// At or above the hot threshold.
    Alert,
    Normal,
    /// At or below the cold threshold.
    Cold,
}

impl Band {
    pub const fn is_alert(self) -> bool {
        matches!(self, Band::Alert)
    }

    /// Color of the status region while in this band.
    pub const fn color(self) -> Rgb888 {
        match self {
            Band::Alert => palette::RED,
            Band::Normal => palette::GREEN,
            Band::Cold => palette::BLUE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Band::Alert => "alert",
            Band::Normal => "normal",
            Band::Cold => "cold",
        }
    }
}

/// Hot and cold limits in whole degrees Celsius. `cold < hot` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdConfig {
    hot: i32,
    cold: i32,
}

impl ThresholdConfig {
    pub const fn new(hot: i32, cold: i32) -> Result<Self, Error> {
        if cold >= hot {
            return Err(Error::InvalidThresholds { hot, cold });
        }
        Ok(Self { hot, cold })
    }

    pub const fn hot(&self) -> i32 {
        self.hot
    }

    pub const fn cold(&self) -> i32 {
        self.cold
    }

    /// Both limits are inclusive; `Normal` is strictly between them.
    pub const fn classify(&self, whole: i32) -> Band {
        if whole >= self.hot {
            Band::Alert
        } else if whole <= self.cold {
            Band::Cold
        } else {
            Band::Normal
        }
    }
}
