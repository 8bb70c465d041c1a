//! Mute button handling, polled or edge-triggered.

use core::convert::Infallible;

use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::state::SharedState;
use crate::{Device, Error};

/// Logic level at which the button reads as pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pulled down, pressed connects to VCC.
    High,
    /// Pulled up, pressed connects to ground.
    Low,
}

/// Polled by the alerter once per iteration.
pub trait MuteInput {
    fn is_pressed(&mut self) -> Result<bool, Error>;
}

impl<T: MuteInput + ?Sized> MuteInput for &mut T {
    fn is_pressed(&mut self) -> Result<bool, Error> {
        (**self).is_pressed()
    }
}

pub struct PolledButton<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P: InputPin> PolledButton<P> {
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }
}

impl<P: InputPin> MuteInput for PolledButton<P> {
    fn is_pressed(&mut self) -> Result<bool, Error> {
        let res = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        };
        res.map_err(|_| Error::Fault(Device::Button))
    }
}

/// Placeholder input for the alerter when [`watch_mute_button`] owns the
/// button. Never reports a press.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTriggered;

impl MuteInput for EdgeTriggered {
    fn is_pressed(&mut self) -> Result<bool, Error> {
        Ok(false)
    }
}

/// Latch mute on every press edge of `button`.
///
/// Must be started before the alerter so no press is missed. Only returns on
/// a button fault.
pub async fn watch_mute_button<W: Wait>(
    button: &mut W,
    active: ActiveLevel,
    state: &SharedState,
    debounce: Duration,
) -> Result<Infallible, Error> {
    loop {
        let edge = match active {
            ActiveLevel::High => button.wait_for_rising_edge().await,
            ActiveLevel::Low => button.wait_for_falling_edge().await,
        };
        edge.map_err(|_| Error::Fault(Device::Button))?;

        if state.request_mute() {
            info!("buzzer muted");
        }
        Timer::after(debounce).await;
    }
}
