use defmt::*;
use embassy_stm32::{exti::ExtiInput, gpio::AnyPin};
use temp_alert::config::MUTE_DEBOUNCE;
use temp_alert::input::{watch_mute_button, ActiveLevel};

use crate::STATE;

#[embassy_executor::task]
pub async fn mute_button(mut button: ExtiInput<'static, AnyPin>) {
    info!("Mute button on EXTI");
    match watch_mute_button(&mut button, ActiveLevel::Low, &STATE, MUTE_DEBOUNCE).await {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("mute button halted: {}", e),
    }
}
