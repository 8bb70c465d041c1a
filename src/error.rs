use core::fmt;

/// Peripheral a fault was reported by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    Sensor,
    Buzzer,
    Button,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Device::Sensor => "sensor",
            Device::Buzzer => "buzzer",
            Device::Button => "button",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Rejected at startup: the cold band must sit strictly below the hot band.
    #[error("cold threshold {cold} must be below hot threshold {hot}")]
    InvalidThresholds { hot: i32, cold: i32 },
    /// Rejected at startup: matrix regions leave the panel or cross contexts.
    #[error("matrix regions overlap between loops or leave the panel")]
    InvalidLayout,
    /// A driver reported an error. There is no recovery path.
    #[error("{0} fault")]
    Fault(Device),
}
