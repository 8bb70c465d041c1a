//! Board glue between embassy-stm32 and the library traits.

use core::convert::Infallible;

use embassy_stm32::adc::{Adc, SampleTime, Temperature};
use embassy_stm32::peripherals::ADC1;
use temp_alert::config::SENSOR_SAMPLE_CYCLES;
use temp_alert::report::{MemoryProbe, MemoryUsage};
use temp_alert::sensor::{scale_to_u16, TemperatureSensor};

/// On-die temperature channel of ADC1.
pub struct AdcTemperature {
    adc: Adc<'static, ADC1>,
    channel: Temperature,
}

impl AdcTemperature {
    pub fn new(adc: ADC1) -> Self {
        let mut delay = embassy_time::Delay;
        let mut adc = Adc::new(adc, &mut delay);
        const _: () = assert!(SENSOR_SAMPLE_CYCLES == 480);
        adc.set_sample_time(SampleTime::Cycles480);
        let channel = adc.enable_temperature();
        Self { adc, channel }
    }
}

impl TemperatureSensor for AdcTemperature {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<u16, Infallible> {
        let sample = self.adc.read(&mut self.channel);
        Ok(scale_to_u16(sample, 12))
    }
}

/// Stack headroom: distance from the current stack pointer down to the end of
/// static RAM, and from it up to the top of the stack.
pub struct StackProbe;

extern "C" {
    static mut __sheap: u32;
    static mut _stack_start: u32;
}

impl MemoryProbe for StackProbe {
    fn usage(&self) -> MemoryUsage {
        let sp = cortex_m::register::msp::read() as usize;
        // SAFETY: only the addresses of the linker symbols are taken
        let (heap_start, stack_top) = unsafe {
            (
                core::ptr::addr_of!(__sheap) as usize,
                core::ptr::addr_of!(_stack_start) as usize,
            )
        };
        MemoryUsage {
            free: sp.saturating_sub(heap_start),
            used: stack_top.saturating_sub(sp),
        }
    }
}

#[cfg(feature = "tone-buzzer")]
pub use tone::BuzzerPwm;

#[cfg(feature = "tone-buzzer")]
mod tone {
    use core::convert::Infallible;

    use embassy_stm32::peripherals::TIM4;
    use embassy_stm32::time::Hertz;
    use embassy_stm32::timer::simple_pwm::SimplePwm;
    use embassy_stm32::timer::Channel;
    use embedded_hal::pwm::{ErrorType, SetDutyCycle};
    use temp_alert::buzzer::TonePwm;

    /// Channel 1 of TIM4 (PB6) driving a passive buzzer.
    pub struct BuzzerPwm {
        pwm: SimplePwm<'static, TIM4>,
    }

    impl BuzzerPwm {
        pub fn new(mut pwm: SimplePwm<'static, TIM4>) -> Self {
            pwm.set_duty(Channel::Ch1, 0);
            pwm.enable(Channel::Ch1);
            Self { pwm }
        }
    }

    impl ErrorType for BuzzerPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for BuzzerPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.pwm.get_max_duty()
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.pwm.set_duty(Channel::Ch1, duty);
            Ok(())
        }
    }

    impl TonePwm for BuzzerPwm {
        fn set_frequency(&mut self, hz: u32) -> Result<(), Infallible> {
            self.pwm.set_frequency(Hertz(hz));
            Ok(())
        }
    }
}
