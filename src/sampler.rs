//! Sampling loop: read, classify, publish, show.

use core::convert::Infallible;

use embassy_time::Timer;

use crate::calibration::Calibration;
use crate::config::{self, SamplerTiming};
use crate::matrix::{palette, Layout, LedMatrix, RegionWriter};
use crate::report::{MemoryProbe, StatusReport};
use crate::sensor::TemperatureSensor;
use crate::state::SharedState;
use crate::thresholds::ThresholdConfig;
use crate::{Device, Error};

/// Owns the sensor and the sampler side of the matrix.
///
/// Each iteration pulses the notify strip, takes and classifies one reading,
/// publishes the band, paints the status region in the band color, logs a
/// [`StatusReport`] and then pulses the heartbeat column, which also paces
/// the loop.
pub struct Sampler<'a, S, P, M: ?Sized> {
    sensor: S,
    memory: P,
    state: &'a SharedState,
    calibration: Calibration,
    thresholds: ThresholdConfig,
    timing: SamplerTiming,
    notify: RegionWriter<'a, M>,
    status: RegionWriter<'a, M>,
    heartbeat: RegionWriter<'a, M>,
}

impl<'a, S, P, M> Sampler<'a, S, P, M>
where
    S: TemperatureSensor,
    P: MemoryProbe,
    M: LedMatrix + ?Sized,
{
    /// Uses the compile-time calibration and thresholds; override with the
    /// `with_*` methods.
    pub fn new(
        sensor: S,
        memory: P,
        matrix: &'a M,
        layout: &Layout,
        state: &'a SharedState,
    ) -> Result<Self, Error> {
        layout.validate()?;
        Ok(Self {
            sensor,
            memory,
            state,
            calibration: config::CALIBRATION,
            thresholds: ThresholdConfig::new(config::HOT, config::COLD)?,
            timing: SamplerTiming::DEFAULT,
            notify: RegionWriter::new(matrix, layout.sample_notify),
            status: RegionWriter::new(matrix, layout.status),
            heartbeat: RegionWriter::new(matrix, layout.sampler_heartbeat),
        })
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_timing(mut self, timing: SamplerTiming) -> Self {
        self.timing = timing;
        self
    }

    /// One full iteration.
    pub async fn step(&mut self) -> Result<StatusReport, Error> {
        let state = self.state;
        let counters = state.counters();
        let sampler_loops = counters.tick_sampler();

        self.notify.fill(palette::MAGENTA);
        Timer::after(self.timing.notify_on).await;
        self.notify.clear();
        Timer::after(self.timing.notify_off).await;

        let raw = self.sensor.read_raw().map_err(|_| {
            error!("sensor read failed");
            Error::Fault(Device::Sensor)
        })?;
        let reading = self.calibration.reading(raw);
        let band = self.thresholds.classify(reading.whole);
        let prev = state.publish(band);

        match (prev.alert, band.is_alert()) {
            (false, true) => warn!(
                "temperature {}C at or above {}C",
                reading.celsius,
                self.thresholds.hot()
            ),
            (true, false) => info!(
                "temperature back to {}C ({})",
                reading.celsius,
                band.name()
            ),
            _ => {}
        }
        if prev.muted && !band.is_alert() {
            debug!("mute released");
        }

        self.status.fill(band.color());

        let flags = state.snapshot();
        let report = StatusReport {
            sampler_loops,
            alerter_loops: counters.alerter_loops(),
            reading,
            volts: self.calibration.volts(raw),
            band,
            alert_loops: counters.alert_loops(),
            alert: flags.alert,
            muted: flags.muted,
            memory: self.memory.usage(),
        };
        info!("{}", report);

        for _ in 0..self.timing.heartbeat_pulses {
            self.heartbeat.fill(palette::WHITE);
            Timer::after(self.timing.heartbeat_on).await;
            self.heartbeat.clear();
            Timer::after(self.timing.heartbeat_off).await;
        }

        Ok(report)
    }

    /// Runs until the sensor faults.
    pub async fn run(mut self) -> Result<Infallible, Error> {
        info!(
            "sampler: hot>={}C cold<={}C",
            self.thresholds.hot(),
            self.thresholds.cold()
        );
        loop {
            self.step().await?;
        }
    }
}
