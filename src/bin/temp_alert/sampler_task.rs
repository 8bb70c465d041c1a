use defmt::*;
use embassy_stm32::peripherals::ADC1;
use temp_alert::config::BOARD_CALIBRATION;
use temp_alert::matrix::Layout;
use temp_alert::sampler::Sampler;
use temp_alert::thresholds::ThresholdConfig;

use crate::hw::{AdcTemperature, StackProbe};
use crate::{PANEL, STATE};

#[embassy_executor::task]
pub async fn sampler(adc: ADC1, thresholds: ThresholdConfig) {
    let sensor = AdcTemperature::new(adc);
    let sampler = unwrap!(Sampler::new(sensor, StackProbe, &PANEL, &Layout::PANEL, &STATE))
        .with_calibration(BOARD_CALIBRATION)
        .with_thresholds(thresholds);

    info!("Starting Sampler");
    match sampler.run().await {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("sampler halted: {}", e),
    }
}
