//! Alert loop: mute polling, blink, buzzer, idle heartbeat.

use core::convert::Infallible;

use embassy_time::Timer;

use crate::buzzer::Buzzer;
use crate::config::AlerterTiming;
use crate::input::MuteInput;
use crate::matrix::{palette, Layout, LedMatrix, RegionWriter};
use crate::state::{AlertMode, SharedState};
use crate::Error;

pub struct Alerter<'a, B, I, M: ?Sized> {
    buzzer: B,
    mute: I,
    state: &'a SharedState,
    timing: AlerterTiming,
    alert: RegionWriter<'a, M>,
    heartbeat: RegionWriter<'a, M>,
    last_mode: Option<AlertMode>,
}

impl<'a, B, I, M> Alerter<'a, B, I, M>
where
    B: Buzzer,
    I: MuteInput,
    M: LedMatrix + ?Sized,
{
    pub fn new(
        buzzer: B,
        mute: I,
        matrix: &'a M,
        layout: &Layout,
        state: &'a SharedState,
    ) -> Result<Self, Error> {
        layout.validate()?;
        Ok(Self {
            buzzer,
            mute,
            state,
            timing: AlerterTiming::DEFAULT,
            alert: RegionWriter::new(matrix, layout.alert),
            heartbeat: RegionWriter::new(matrix, layout.alerter_heartbeat),
            last_mode: None,
        })
    }

    pub fn with_timing(mut self, timing: AlerterTiming) -> Self {
        self.timing = timing;
        self
    }

    /// One iteration; returns what was rendered.
    ///
    /// The flags are read once, after the mute poll, so a press is honoured
    /// in the same iteration.
    pub async fn step(&mut self) -> Result<AlertMode, Error> {
        let state = self.state;
        let counters = state.counters();
        counters.tick_alerter();

        if self.mute.is_pressed()? && state.request_mute() {
            info!("buzzer muted");
        }

        let mode = state.snapshot().mode();
        if self.last_mode != Some(mode) {
            debug!("alerter mode {}", mode_name(mode));
            self.last_mode = Some(mode);
        }

        match mode {
            AlertMode::Siren | AlertMode::Silent => {
                counters.tick_alert();
                self.blink(mode == AlertMode::Siren).await?;
            }
            AlertMode::Idle => self.idle().await?,
        }
        Ok(mode)
    }

    /// Red/black blink; the buzzer follows the red phase when `audible`.
    async fn blink(&mut self, audible: bool) -> Result<(), Error> {
        self.heartbeat.clear();

        self.alert.fill(palette::RED);
        self.buzzer.set_output(audible)?;
        Timer::after(self.timing.blink).await;

        self.alert.clear();
        self.buzzer.set_output(false)?;
        Timer::after(self.timing.blink).await;
        Ok(())
    }

    async fn idle(&mut self) -> Result<(), Error> {
        self.buzzer.set_output(false)?;
        self.alert.clear();

        self.heartbeat.fill(palette::AMBER);
        Timer::after(self.timing.idle_pulse).await;
        self.heartbeat.clear();
        Timer::after(self.timing.idle_rest).await;
        Ok(())
    }

    /// Runs until the buzzer or the button faults.
    pub async fn run(mut self) -> Result<Infallible, Error> {
        loop {
            self.step().await?;
        }
    }
}

fn mode_name(mode: AlertMode) -> &'static str {
    match mode {
        AlertMode::Siren => "siren",
        AlertMode::Silent => "silent",
        AlertMode::Idle => "idle",
    }
}
