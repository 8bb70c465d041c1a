//! Raw ADC sample to calibrated Celsius.
//!
//! Onboard sensors are modelled as a straight line through one reference
//! point: the output voltage at a reference temperature, and the change per
//! degree. The RP2040 diode falls by 1.721 mV per degree from 0.706 V at
//! 27 °C; the STM32F401 sensor rises by 2.5 mV per degree from 0.76 V at
//! 25 °C. A fixed empirical adjustment is added on top to correct for the
//! individual part.
//!
//! Everything is computed in `f32`, which the Cortex-M4F FPU handles in
//! hardware. The last decimal can differ from an `f64` evaluation; the whole
//! degrees only do so far outside any physical range.

use core::fmt;

/// Fixed-point temperature in tenths of a degree Celsius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeciCelsius(pub i32);

impl DeciCelsius {
    pub const fn from_whole(celsius: i32) -> Self {
        Self(celsius * 10)
    }

    /// Rounds to the nearest tenth, halves away from zero.
    pub fn from_celsius(celsius: f32) -> Self {
        let scaled = celsius * 10.0;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        // `as` saturates and maps NaN to zero
        Self(rounded as i32)
    }

    pub const fn tenths(self) -> i32 {
        self.0
    }

    /// Whole degrees, truncated toward zero.
    pub const fn whole(self) -> i32 {
        self.0 / 10
    }

}

impl fmt::Display for DeciCelsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeciCelsius {
    fn format(&self, fmt: defmt::Formatter) {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        defmt::write!(fmt, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

/// One sensor sample and what it calibrates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    /// Sample as delivered by the sensor driver (16-bit full scale).
    pub raw: u16,
    pub celsius: DeciCelsius,
    /// `celsius` truncated; this is what gets classified.
    pub whole: i32,
}

/// Linear response of a temperature sensor through one reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorModel {
    pub reference_celsius: f32,
    /// Output at `reference_celsius`.
    pub reference_volts: f32,
    /// Signed slope; negative when the output falls as temperature rises.
    pub volts_per_degree: f32,
}

impl SensorModel {
    /// RP2040 internal diode.
    pub const RP2040: Self = Self {
        reference_celsius: 27.0,
        reference_volts: 0.706,
        volts_per_degree: -0.001721,
    };

    /// STM32F401 internal sensor (V25 and Avg_Slope from the datasheet).
    pub const STM32F401: Self = Self {
        reference_celsius: 25.0,
        reference_volts: 0.76,
        volts_per_degree: 0.0025,
    };

    pub fn celsius(&self, volts: f32) -> f32 {
        self.reference_celsius + (volts - self.reference_volts) / self.volts_per_degree
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Volts per ADC count: reference voltage / full-scale count.
    pub conversion_factor: f32,
    /// Empirical correction added to the computed temperature, °C.
    pub adjustment: f32,
    pub sensor: SensorModel,
}

impl Calibration {
    /// RP2040 diode, 3.3 V reference over a 16-bit sample, +3.1 °C board
    /// correction.
    pub const ONBOARD: Self = Self {
        conversion_factor: 3.3 / 65535.0,
        adjustment: 3.1,
        sensor: SensorModel::RP2040,
    };

    /// STM32F401 sensor, 12-bit sample left-justified to 16 bits against a
    /// 3.3 V reference. No board correction.
    pub const STM32F401: Self = Self {
        conversion_factor: 3.3 / 65535.0,
        adjustment: 0.0,
        sensor: SensorModel::STM32F401,
    };

    /// Uses the RP2040 sensor model; see [`Calibration::with_sensor`].
    pub const fn new(conversion_factor: f32, adjustment: f32) -> Self {
        Self {
            conversion_factor,
            adjustment,
            sensor: SensorModel::RP2040,
        }
    }

    pub const fn with_sensor(mut self, sensor: SensorModel) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn volts(&self, raw: u16) -> f32 {
        raw as f32 * self.conversion_factor
    }

    /// Unrounded temperature for `raw`.
    pub fn celsius(&self, raw: u16) -> f32 {
        self.sensor.celsius(self.volts(raw)) + self.adjustment
    }

    pub fn reading(&self, raw: u16) -> TemperatureReading {
        let celsius = DeciCelsius::from_celsius(self.celsius(raw));
        TemperatureReading {
            raw,
            celsius,
            whole: celsius.whole(),
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::ONBOARD
    }
}
