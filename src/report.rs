//! Per-iteration status line.

use core::fmt;

use crate::calibration::TemperatureReading;
use crate::thresholds::Band;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryUsage {
    /// Bytes still available, in whatever sense the probe measures.
    pub free: usize,
    pub used: usize,
}

/// Reports memory figures for the status line.
pub trait MemoryProbe {
    fn usage(&self) -> MemoryUsage;
}

impl<T: MemoryProbe + ?Sized> MemoryProbe for &T {
    fn usage(&self) -> MemoryUsage {
        (**self).usage()
    }
}

/// For targets with nothing to report.
impl MemoryProbe for () {
    fn usage(&self) -> MemoryUsage {
        MemoryUsage::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusReport {
    pub sampler_loops: u32,
    pub alerter_loops: u32,
    pub reading: TemperatureReading,
    /// Sensor output the reading was calibrated from.
    pub volts: f32,
    pub band: Band,
    pub alert_loops: u32,
    pub alert: bool,
    pub muted: bool,
    pub memory: MemoryUsage,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sampler #{} alerter #{} | raw={} volts={:.3}V temp={}C whole={}C band={} | alerts={} alert={} mute={} | mem free={}B used={}B",
            self.sampler_loops,
            self.alerter_loops,
            self.reading.raw,
            self.volts,
            self.reading.celsius,
            self.reading.whole,
            self.band.name(),
            self.alert_loops,
            self.alert,
            self.muted,
            self.memory.free,
            self.memory.used,
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusReport {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "sampler #{} alerter #{} | raw={} volts={=f32}V temp={}C whole={}C band={} | alerts={} alert={} mute={} | mem free={}B used={}B",
            self.sampler_loops,
            self.alerter_loops,
            self.reading.raw,
            self.volts,
            self.reading.celsius,
            self.reading.whole,
            self.band.name(),
            self.alert_loops,
            self.alert,
            self.muted,
            self.memory.free,
            self.memory.used,
        )
    }
}
