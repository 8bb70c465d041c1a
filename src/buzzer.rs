//! Audible output strategies.
//!
//! [`Siren`] drives a self-oscillating buzzer from a plain GPIO. [`Tone`]
//! drives a passive buzzer from a PWM channel at a fixed frequency.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;

use crate::{Device, Error};

pub trait Buzzer {
    fn set_output(&mut self, on: bool) -> Result<(), Error>;
}

impl<T: Buzzer + ?Sized> Buzzer for &mut T {
    fn set_output(&mut self, on: bool) -> Result<(), Error> {
        (**self).set_output(on)
    }
}

pub struct Siren<P> {
    pin: P,
}

impl<P: OutputPin> Siren<P> {
    /// Takes the pin and drives it low.
    pub fn new(mut pin: P) -> Result<Self, Error> {
        pin.set_low().map_err(|_| Error::Fault(Device::Buzzer))?;
        Ok(Self { pin })
    }
}

impl<P: OutputPin> Buzzer for Siren<P> {
    fn set_output(&mut self, on: bool) -> Result<(), Error> {
        self.pin
            .set_state(PinState::from(on))
            .map_err(|_| Error::Fault(Device::Buzzer))
    }
}

/// A PWM channel whose timer frequency can be changed.
pub trait TonePwm: SetDutyCycle {
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;
}

impl<T: TonePwm + ?Sized> TonePwm for &mut T {
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        (**self).set_frequency(hz)
    }
}

pub struct Tone<C> {
    channel: C,
    duty_percent: u8,
}

impl<C: TonePwm> Tone<C> {
    /// Sets the tone frequency and starts silent.
    pub fn new(mut channel: C, hz: u32, duty_percent: u8) -> Result<Self, Error> {
        channel
            .set_frequency(hz)
            .and_then(|_| channel.set_duty_cycle_fully_off())
            .map_err(|_| Error::Fault(Device::Buzzer))?;
        Ok(Self {
            channel,
            duty_percent: duty_percent.min(100),
        })
    }
}

impl<C: TonePwm> Buzzer for Tone<C> {
    fn set_output(&mut self, on: bool) -> Result<(), Error> {
        let res = if on {
            self.channel.set_duty_cycle_percent(self.duty_percent)
        } else {
            self.channel.set_duty_cycle_fully_off()
        };
        res.map_err(|_| Error::Fault(Device::Buzzer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::pwm::ErrorType as PwmErrorType;

    #[derive(Default)]
    struct Pin {
        high: Option<bool>,
        broken: bool,
    }

    #[derive(Debug)]
    struct Broken;

    impl embedded_hal::digital::Error for Broken {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl PinErrorType for Pin {
        type Error = Broken;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Broken> {
            if self.broken {
                return Err(Broken);
            }
            self.high = Some(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Broken> {
            if self.broken {
                return Err(Broken);
            }
            self.high = Some(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Pwm {
        duty: u16,
        hz: u32,
    }

    impl PwmErrorType for Pwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for Pwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    impl TonePwm for Pwm {
        fn set_frequency(&mut self, hz: u32) -> Result<(), Infallible> {
            self.hz = hz;
            Ok(())
        }
    }

    #[test]
    fn siren_starts_low_and_follows_output() {
        let mut siren = Siren::new(Pin::default()).unwrap();
        assert_eq!(siren.pin.high, Some(false));
        siren.set_output(true).unwrap();
        assert_eq!(siren.pin.high, Some(true));
        siren.set_output(false).unwrap();
        assert_eq!(siren.pin.high, Some(false));
    }

    #[test]
    fn siren_pin_error_is_buzzer_fault() {
        let pin = Pin {
            broken: true,
            ..Default::default()
        };
        assert_eq!(Siren::new(pin).err(), Some(Error::Fault(Device::Buzzer)));
    }

    #[test]
    fn tone_sets_frequency_and_duty() {
        let mut tone = Tone::new(Pwm::default(), 2_000, 50).unwrap();
        assert_eq!(tone.channel.hz, 2_000);
        assert_eq!(tone.channel.duty, 0);

        tone.set_output(true).unwrap();
        assert_eq!(tone.channel.duty, 500);
        tone.set_output(false).unwrap();
        assert_eq!(tone.channel.duty, 0);
        assert_eq!(tone.channel.hz, 2_000);
    }

    #[test]
    fn tone_duty_is_clamped() {
        let mut tone = Tone::new(Pwm::default(), 1_000, 250).unwrap();
        tone.set_output(true).unwrap();
        assert_eq!(tone.channel.duty, 1000);
    }
}
