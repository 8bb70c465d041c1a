use core::fmt::Write;

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_stm32::{
    dma::NoDma,
    gpio::{AnyPin, Level, Output, Speed},
    spi,
    time::Hertz,
};
use embassy_time::Timer;
use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    text::{Alignment, Text},
};
use embedded_hal_bus::spi::ExclusiveDevice;
use ili9341::{DisplaySize240x320, Ili9341, Orientation};
use profont::{PROFONT_14_POINT, PROFONT_18_POINT};
use temp_alert::config::{PANEL_CELL, PANEL_HEIGHT, PANEL_ORIGIN, PANEL_REFRESH, PANEL_WIDTH};
use temp_alert::mirror::PanelMirror;
use temp_alert::thresholds::ThresholdConfig;

use crate::PANEL;

pub type DisplaySpi = embassy_stm32::peripherals::SPI2;
pub type DisplaySpiSck = embassy_stm32::peripherals::PB13;
pub type DisplaySpiMosi = embassy_stm32::peripherals::PB15;
pub type DisplaySpiTxDma = embassy_stm32::peripherals::DMA1_CH4;

pub struct DisplayPins {
    pub sck: DisplaySpiSck,
    pub mosi: DisplaySpiMosi,
    pub dc: AnyPin,
    pub cs: AnyPin,
    pub reset: AnyPin,
    pub backlight: AnyPin,
}

/// Owns the TFT and mirrors [`PANEL`] onto it whenever either loop draws.
#[embassy_executor::task]
pub async fn display(
    pins: DisplayPins,
    spi: DisplaySpi,
    txdma: DisplaySpiTxDma,
    thresholds: ThresholdConfig,
) {
    let mut config = spi::Config::default();
    config.mode = spi::Mode {
        polarity: spi::Polarity::IdleLow,
        phase: spi::Phase::CaptureOnFirstTransition,
    };
    config.frequency = Hertz(30_000_000);

    let mut delay = embassy_time::Delay;

    let spi_bus = spi::Spi::new_txonly(spi, pins.sck, pins.mosi, txdma, NoDma, config);

    let lcd_dc = Output::new(pins.dc, Level::Low, Speed::High);
    let lcd_cs = Output::new(pins.cs, Level::High, Speed::High);
    let lcd_reset = Output::new(pins.reset, Level::Low, Speed::High);
    let mut lcd_backlight = Output::new(pins.backlight, Level::Low, Speed::Low);

    let spi_device = unwrap!(ExclusiveDevice::new(spi_bus, lcd_cs, delay.clone()));
    let display_if = SPIInterface::new(spi_device, lcd_dc);

    let Ok(mut display) = Ili9341::new(
        display_if,
        lcd_reset,
        &mut delay,
        Orientation::Portrait,
        DisplaySize240x320,
    ) else {
        defmt::panic!("display init failed");
    };

    info!("Starting Display");
    lcd_backlight.set_high();
    display.clear(Rgb565::BLACK).ok();

    Text::with_alignment(
        "TEMP ALERT",
        Point::new(120, 40),
        MonoTextStyle::new(&PROFONT_18_POINT, Rgb565::WHITE),
        Alignment::Center,
    )
    .draw(&mut display)
    .ok();

    let mut caption: heapless::String<32> = heapless::String::new();
    write!(caption, "hot>={}C cold<={}C", thresholds.hot(), thresholds.cold()).ok();
    Text::with_alignment(
        &caption,
        Point::new(120, 80),
        MonoTextStyle::new(&PROFONT_14_POINT, Rgb565::CSS_LIGHT_GRAY),
        Alignment::Center,
    )
    .draw(&mut display)
    .ok();

    let mut mirror: PanelMirror<PANEL_WIDTH, PANEL_HEIGHT> =
        PanelMirror::new(Point::new(PANEL_ORIGIN.0, PANEL_ORIGIN.1), PANEL_CELL);

    loop {
        if mirror.flush(&PANEL, &mut display).is_err() {
            warn!("panel flush failed");
            mirror.invalidate();
        }
        PANEL.wait_changed().await;
        // coalesce bursts of pixel writes into one flush
        Timer::after(PANEL_REFRESH).await;
    }
}
