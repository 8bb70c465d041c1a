/// Source of raw temperature samples.
///
/// Samples are scaled to a 16-bit full range regardless of the converter's
/// native width, so [`crate::calibration::Calibration::ONBOARD`] applies.
pub trait TemperatureSensor {
    type Error;

    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for &mut T {
    type Error = T::Error;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        (**self).read_raw()
    }
}

/// Left-justify an `bits`-wide sample into 16 bits. A zero-width sample
/// carries no value and scales to 0.
pub const fn scale_to_u16(sample: u16, bits: u32) -> u16 {
    match bits {
        0 => 0,
        1..=15 => sample << (16 - bits),
        _ => sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_bit_samples_fill_sixteen_bits() {
        assert_eq!(scale_to_u16(0x0FFF, 12), 0xFFF0);
        assert_eq!(scale_to_u16(0x0384, 12), 0x3840);
        assert_eq!(scale_to_u16(0x1234, 16), 0x1234);
    }

    #[test]
    fn degenerate_widths() {
        assert_eq!(scale_to_u16(0x0001, 0), 0);
        assert_eq!(scale_to_u16(0x0001, 1), 0x8000);
        assert_eq!(scale_to_u16(0xABCD, 32), 0xABCD);
    }
}
