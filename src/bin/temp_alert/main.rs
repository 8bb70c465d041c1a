#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use display_task::DisplayPins;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::gpio::Pin;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::time::Hertz;
use static_cell::StaticCell;
use temp_alert::config::{COLD, HOT, PANEL_HEIGHT, PANEL_WIDTH};
use temp_alert::matrix::FrameBuffer;
use temp_alert::state::SharedState;
use temp_alert::thresholds::ThresholdConfig;
use {defmt_rtt as _, panic_probe as _};

mod alerter_task;
#[cfg(feature = "edge-mute")]
mod button_task;
mod display_task;
mod hw;
mod sampler_task;

/// Alert and mute flags plus loop counters, shared by both executors.
pub static STATE: SharedState = SharedState::new();
/// The LED matrix both loops draw on.
pub static PANEL: FrameBuffer<PANEL_WIDTH, PANEL_HEIGHT> = FrameBuffer::new();

static INTERRUPT_EXECUTOR: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SPI4() {
    INTERRUPT_EXECUTOR.on_interrupt()
}

#[entry]
fn main() -> ! {
    // Setup clocks
    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hse = Some(Hse {
            freq: Hertz(25_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV25,  // 1Mhz
            mul: PllMul::MUL336,       // 336Mhz
            divp: Some(PllPDiv::DIV4), // 336MHz / 4 = 84Mhz SYSCLK
            divq: Some(PllQDiv::DIV7), // 336MHz / 7 = 48MHz
            divr: None,
        });
        config.rcc.sys = Sysclk::PLL1_P; // SYSCLK = PLL1_P (84MHz)
        config.rcc.ahb_pre = AHBPrescaler::DIV1; // AHB = SYSCLK     (84MHz)
        config.rcc.apb1_pre = APBPrescaler::DIV2; // APB1 = SYSCLK/2  (42MHz)
        config.rcc.apb2_pre = APBPrescaler::DIV1; // APB2 = SYSCLK    (84MHz)
    }

    let p = embassy_stm32::init(config);
    info!("embassy_stm32::init");

    let thresholds = match ThresholdConfig::new(HOT, COLD) {
        Ok(t) => t,
        Err(e) => defmt::panic!("bad thresholds: {}", e),
    };
    info!("hot>={}C cold<={}C", thresholds.hot(), thresholds.cold());

    let display_pins = DisplayPins {
        sck: p.PB13,
        mosi: p.PB15,
        dc: p.PB0.degrade(),
        cs: p.PB1.degrade(),
        reset: p.PB2.degrade(),
        backlight: p.PB12.degrade(),
    };

    // Alerter side: buzzer on PB6, mute button on PA0 (active low)
    interrupt::SPI4.set_priority(Priority::P6);
    let interrupt_spawner = INTERRUPT_EXECUTOR.start(interrupt::SPI4);

    #[cfg(not(feature = "tone-buzzer"))]
    let buzzer = {
        use embassy_stm32::gpio::{Level, Output, Speed};
        unwrap!(temp_alert::buzzer::Siren::new(Output::new(
            p.PB6.degrade(),
            Level::Low,
            Speed::Low
        )))
    };
    #[cfg(feature = "tone-buzzer")]
    let buzzer = {
        use embassy_stm32::gpio::OutputType;
        use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
        use embassy_stm32::timer::CountingMode;
        use temp_alert::config::{TONE_DUTY_PERCENT, TONE_HZ};

        let pwm = SimplePwm::new(
            p.TIM4,
            Some(PwmPin::new_ch1(p.PB6, OutputType::PushPull)),
            None,
            None,
            None,
            Hertz(TONE_HZ),
            CountingMode::EdgeAlignedUp,
        );
        unwrap!(temp_alert::buzzer::Tone::new(
            hw::BuzzerPwm::new(pwm),
            TONE_HZ,
            TONE_DUTY_PERCENT
        ))
    };

    #[cfg(not(feature = "edge-mute"))]
    let mute = {
        use embassy_stm32::gpio::{Input, Pull};
        use temp_alert::input::{ActiveLevel, PolledButton};
        PolledButton::new(Input::new(p.PA0, Pull::Up).degrade(), ActiveLevel::Low)
    };
    #[cfg(feature = "edge-mute")]
    let mute = {
        use embassy_stm32::exti::{Channel, ExtiInput};
        use embassy_stm32::gpio::{Input, Pull};

        // started before the alerter so no press is missed
        let button = ExtiInput::new(Input::new(p.PA0, Pull::Up).degrade(), p.EXTI0.degrade());
        interrupt_spawner.must_spawn(button_task::mute_button(button));
        temp_alert::input::EdgeTriggered
    };

    interrupt_spawner.must_spawn(alerter_task::alerter(buzzer, mute));

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(display_task::display(
            display_pins,
            p.SPI2,
            p.DMA1_CH4,
            thresholds,
        ));
        spawner.must_spawn(sampler_task::sampler(p.ADC1, thresholds));
    });
}
