//! Scripted peripherals for driving the loops on the host.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Mutex;

use embassy_time::Duration;
use embedded_hal::digital::{ErrorKind, ErrorType};
use embedded_hal::pwm::SetDutyCycle;
use temp_alert::buzzer::{Buzzer, TonePwm};
use temp_alert::config::{AlerterTiming, SamplerTiming};
use temp_alert::input::MuteInput;
use temp_alert::matrix::{FrameBuffer, LedMatrix, Rgb888};
use temp_alert::report::{MemoryProbe, MemoryUsage};
use temp_alert::sensor::TemperatureSensor;
use temp_alert::{Device, Error};

pub const SAMPLER_FAST: SamplerTiming = SamplerTiming {
    notify_on: Duration::from_millis(1),
    notify_off: Duration::from_millis(1),
    heartbeat_on: Duration::from_millis(1),
    heartbeat_off: Duration::from_millis(1),
    heartbeat_pulses: 1,
};

pub const ALERTER_FAST: AlerterTiming = AlerterTiming {
    blink: Duration::from_millis(1),
    idle_pulse: Duration::from_millis(1),
    idle_rest: Duration::from_millis(1),
};

#[derive(Debug)]
pub struct SensorFault;

/// Returns the queued samples in order, then repeats the last one (or fails,
/// see [`ScriptedSensor::then_fail`]).
pub struct ScriptedSensor {
    raws: VecDeque<u16>,
    last: u16,
    fail_when_empty: bool,
    pub broken: bool,
}

impl ScriptedSensor {
    pub fn new(raws: &[u16]) -> Self {
        Self {
            raws: raws.iter().copied().collect(),
            last: raws.last().copied().unwrap_or(0),
            fail_when_empty: false,
            broken: false,
        }
    }

    pub fn then_fail(mut self) -> Self {
        self.fail_when_empty = true;
        self
    }

    pub fn broken() -> Self {
        Self {
            raws: VecDeque::new(),
            last: 0,
            fail_when_empty: false,
            broken: true,
        }
    }
}

impl TemperatureSensor for ScriptedSensor {
    type Error = SensorFault;

    fn read_raw(&mut self) -> Result<u16, SensorFault> {
        if self.broken || (self.fail_when_empty && self.raws.is_empty()) {
            return Err(SensorFault);
        }
        Ok(self.raws.pop_front().unwrap_or(self.last))
    }
}

/// Frame buffer that also keeps every write, per pixel, in order.
pub struct RecordingMatrix {
    pub frame: FrameBuffer<16, 7>,
    writes: Mutex<Vec<(usize, usize, Rgb888)>>,
}

impl RecordingMatrix {
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes_at(&self, x: usize, y: usize) -> Vec<Rgb888> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.0 == x && w.1 == y)
            .map(|w| w.2)
            .collect()
    }
}

impl LedMatrix for RecordingMatrix {
    fn width(&self) -> usize {
        self.frame.width()
    }

    fn height(&self) -> usize {
        self.frame.height()
    }

    fn set_pixel(&self, x: usize, y: usize, color: Rgb888) {
        self.writes.lock().unwrap().push((x, y, color));
        self.frame.set_pixel(x, y, color);
    }
}

/// Every state the buzzer was driven to, in order.
#[derive(Default)]
pub struct RecordingBuzzer {
    pub states: Vec<bool>,
    pub broken: bool,
}

impl RecordingBuzzer {
    pub fn ever_on(&self) -> bool {
        self.states.iter().any(|&on| on)
    }
}

impl Buzzer for RecordingBuzzer {
    fn set_output(&mut self, on: bool) -> Result<(), Error> {
        if self.broken {
            return Err(Error::Fault(Device::Buzzer));
        }
        self.states.push(on);
        Ok(())
    }
}

/// PWM channel with a 0..=1000 duty range that keeps every duty written.
#[derive(Default)]
pub struct RecordingPwm {
    pub hz: u32,
    pub duties: Vec<u16>,
}

impl embedded_hal::pwm::ErrorType for RecordingPwm {
    type Error = Infallible;
}

impl SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duties.push(duty);
        Ok(())
    }
}

impl TonePwm for RecordingPwm {
    fn set_frequency(&mut self, hz: u32) -> Result<(), Infallible> {
        self.hz = hz;
        Ok(())
    }
}

/// One entry per poll; empty means released.
#[derive(Default)]
pub struct ScriptedButton {
    pub presses: VecDeque<bool>,
}

impl ScriptedButton {
    pub fn new(presses: &[bool]) -> Self {
        Self {
            presses: presses.iter().copied().collect(),
        }
    }
}

impl MuteInput for ScriptedButton {
    fn is_pressed(&mut self) -> Result<bool, Error> {
        Ok(self.presses.pop_front().unwrap_or(false))
    }
}

pub struct FixedMemory(pub MemoryUsage);

impl MemoryProbe for FixedMemory {
    fn usage(&self) -> MemoryUsage {
        self.0
    }
}

#[derive(Debug)]
pub struct Disconnected;

impl embedded_hal::digital::Error for Disconnected {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Yields `edges` edges of any kind, then fails.
pub struct EdgeButton {
    pub edges: usize,
}

impl EdgeButton {
    fn next(&mut self) -> Result<(), Disconnected> {
        if self.edges == 0 {
            return Err(Disconnected);
        }
        self.edges -= 1;
        Ok(())
    }
}

impl ErrorType for EdgeButton {
    type Error = Disconnected;
}

impl embedded_hal_async::digital::Wait for EdgeButton {
    async fn wait_for_high(&mut self) -> Result<(), Disconnected> {
        self.next()
    }

    async fn wait_for_low(&mut self) -> Result<(), Disconnected> {
        self.next()
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Disconnected> {
        self.next()
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Disconnected> {
        self.next()
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Disconnected> {
        self.next()
    }
}
