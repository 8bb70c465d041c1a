use defmt::*;
use temp_alert::alerter::Alerter;
use temp_alert::matrix::Layout;

use crate::{PANEL, STATE};

#[cfg(not(feature = "tone-buzzer"))]
pub type AlertBuzzer = temp_alert::buzzer::Siren<
    embassy_stm32::gpio::Output<'static, embassy_stm32::gpio::AnyPin>,
>;
#[cfg(feature = "tone-buzzer")]
pub type AlertBuzzer = temp_alert::buzzer::Tone<crate::hw::BuzzerPwm>;

#[cfg(not(feature = "edge-mute"))]
pub type MuteButton = temp_alert::input::PolledButton<
    embassy_stm32::gpio::Input<'static, embassy_stm32::gpio::AnyPin>,
>;
#[cfg(feature = "edge-mute")]
pub type MuteButton = temp_alert::input::EdgeTriggered;

/// Runs on the interrupt executor so blinking and mute handling are never
/// held up by the sampler or the display.
#[embassy_executor::task]
pub async fn alerter(buzzer: AlertBuzzer, mute: MuteButton) {
    let alerter = unwrap!(Alerter::new(buzzer, mute, &PANEL, &Layout::PANEL, &STATE));

    info!("Starting Alerter");
    match alerter.run().await {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("alerter halted: {}", e),
    }
}
