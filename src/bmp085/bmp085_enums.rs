use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bmp085OverSampling {
    UltraLowPower,
    Standard,
    HighRes,
    UltraHighRes,
}

impl Default for Bmp085OverSampling {
    fn default() -> Self {
        Self::UltraHighRes
    }
}

impl Bmp085OverSampling {
    const OSS_ULTRA_LOW_POWER: u8 = 0x00;
    const OSS_STANDARD: u8 = 0x01;
    const OSS_HIGH_RES: u8 = 0x02;
    const OSS_ULTRA_HIGH_RES: u8 = 0x03;

    // -- max. conversion times are 4.5, 7.5, 13.5 and 25.5 ms, rounded up
    const CONVERSION_DELAY_ULTRA_LOW_POWER_MS: u32 = 5;
    const CONVERSION_DELAY_STANDARD_MS: u32 = 8;
    const CONVERSION_DELAY_HIGH_RES_MS: u32 = 14;
    const CONVERSION_DELAY_ULTRA_HIGH_RES_MS: u32 = 26;

    pub fn value(&self) -> u8 {
        match *self {
            Self::UltraLowPower => Self::OSS_ULTRA_LOW_POWER,
            Self::Standard => Self::OSS_STANDARD,
            Self::HighRes => Self::OSS_HIGH_RES,
            Self::UltraHighRes => Self::OSS_ULTRA_HIGH_RES,
        }
    }

    // -- anything above the highest setting is clamped to UltraHighRes
    pub fn from_raw(oss: u8) -> Self {
        match oss {
            Self::OSS_ULTRA_LOW_POWER => Self::UltraLowPower,
            Self::OSS_STANDARD => Self::Standard,
            Self::OSS_HIGH_RES => Self::HighRes,
            _ => Self::UltraHighRes,
        }
    }

    pub fn conversion_delay_ms(&self) -> u32 {
        match *self {
            Self::UltraLowPower => Self::CONVERSION_DELAY_ULTRA_LOW_POWER_MS,
            Self::Standard => Self::CONVERSION_DELAY_STANDARD_MS,
            Self::HighRes => Self::CONVERSION_DELAY_HIGH_RES_MS,
            Self::UltraHighRes => Self::CONVERSION_DELAY_ULTRA_HIGH_RES_MS,
        }
    }
}

impl fmt::Display for Bmp085OverSampling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::UltraLowPower => write!(f, "UltraLowPower/{}", self.value()),
            Self::Standard => write!(f, "Standard/{}", self.value()),
            Self::HighRes => write!(f, "HighRes/{}", self.value()),
            Self::UltraHighRes => write!(f, "UltraHighRes/{}", self.value()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bmp085State {
    Uninitialized,
    Identified,
    Calibrated,
}

impl fmt::Display for Bmp085State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Identified => write!(f, "Identified"),
            Self::Calibrated => write!(f, "Calibrated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_oversampling_is_clamped() {
        assert_eq!(Bmp085OverSampling::from_raw(0), Bmp085OverSampling::UltraLowPower);
        assert_eq!(Bmp085OverSampling::from_raw(2), Bmp085OverSampling::HighRes);
        assert_eq!(Bmp085OverSampling::from_raw(3), Bmp085OverSampling::UltraHighRes);
        assert_eq!(Bmp085OverSampling::from_raw(4), Bmp085OverSampling::UltraHighRes);
        assert_eq!(Bmp085OverSampling::from_raw(255), Bmp085OverSampling::UltraHighRes);
    }

    #[test]
    fn state_is_displayed_by_name() {
        assert_eq!(Bmp085State::Uninitialized.to_string(), "Uninitialized");
        assert_eq!(Bmp085State::Calibrated.to_string(), "Calibrated");
    }

    #[test]
    fn conversion_delay_grows_with_oversampling() {
        let delays: Vec<u32> = (0..4).map(|oss| Bmp085OverSampling::from_raw(oss).conversion_delay_ms()).collect();
        assert_eq!(delays, vec![5, 8, 14, 26]);
    }
}
