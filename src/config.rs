//! Compile-time configuration.

use embassy_time::Duration;

use crate::calibration::Calibration;

/// Readings at or above this many °C raise the alert.
pub const HOT: i32 = 30;
/// Readings at or below this many °C show the cold color.
pub const COLD: i32 = 18;

/// Library default: the RP2040 diode the thresholds were tuned on.
pub const CALIBRATION: Calibration = Calibration::ONBOARD;
/// What the STM32F401 firmware samples with.
pub const BOARD_CALIBRATION: Calibration = Calibration::STM32F401;

/// ADC clock: APB2 at 84 MHz through the /4 prescaler.
pub const ADC_CLOCK_HZ: u32 = 21_000_000;
/// Sampling window for the temperature channel, ADC cycles.
pub const SENSOR_SAMPLE_CYCLES: u32 = 480;
/// Shortest sampling time the on-die sensor settles in.
pub const SENSOR_MIN_SAMPLE_NS: u32 = 10_000;

/// Length of a sampling window of `cycles` at `clock_hz`, nanoseconds.
pub const fn sample_window_ns(cycles: u32, clock_hz: u32) -> u32 {
    (cycles as u64 * 1_000_000_000 / clock_hz as u64) as u32
}

pub const PANEL_WIDTH: usize = 16;
pub const PANEL_HEIGHT: usize = 7;

/// Side of one matrix cell on the TFT, pixels.
pub const PANEL_CELL: u32 = 15;
/// Top-left corner of the matrix on the TFT (portrait 240×320).
pub const PANEL_ORIGIN: (i32, i32) = (0, 120);
/// Minimum time between two panel flushes.
pub const PANEL_REFRESH: Duration = Duration::from_millis(50);

pub const TONE_HZ: u32 = 2_000;
pub const TONE_DUTY_PERCENT: u8 = 50;

/// Ignore further edges for this long after a mute press.
pub const MUTE_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerTiming {
    pub notify_on: Duration,
    pub notify_off: Duration,
    pub heartbeat_on: Duration,
    pub heartbeat_off: Duration,
    /// Heartbeat pulses per iteration; together with the durations above this
    /// sets the sampling period.
    pub heartbeat_pulses: u8,
}

impl SamplerTiming {
    pub const DEFAULT: Self = Self {
        notify_on: Duration::from_millis(200),
        notify_off: Duration::from_millis(200),
        heartbeat_on: Duration::from_millis(500),
        heartbeat_off: Duration::from_millis(500),
        heartbeat_pulses: 1,
    };

    /// Wall time of one iteration, ignoring the sensor read itself.
    pub fn period(&self) -> Duration {
        let pulse = self.heartbeat_on + self.heartbeat_off;
        self.notify_on + self.notify_off + pulse * u32::from(self.heartbeat_pulses)
    }
}

impl Default for SamplerTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlerterTiming {
    /// Half period of the alert blink; the buzzer follows the same phase.
    pub blink: Duration,
    pub idle_pulse: Duration,
    pub idle_rest: Duration,
}

impl AlerterTiming {
    pub const DEFAULT: Self = Self {
        blink: Duration::from_millis(200),
        idle_pulse: Duration::from_millis(200),
        idle_rest: Duration::from_millis(800),
    };
}

impl Default for AlerterTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}
