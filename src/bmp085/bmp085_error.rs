use std::fmt;

#[derive(Debug)]
pub enum Bmp085Error {
    // -- chip id register did not hold the expected value
    ChipIdMismatch { found: u8, expected: u8 },
    // -- compensated reading requested before the coefficients were loaded
    NotCalibrated,
    AlreadyInitialized,
    // -- a divisor of the compensation formulas evaluated to zero
    DivisionHazard,
    DeviceNotResponding(std::io::Error),
}

impl fmt::Display for Bmp085Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ChipIdMismatch { found, expected } =>
                write!(f, "Found unknown chip id '{found:#04x}', expected '{expected:#04x}'"),
            Self::NotCalibrated => write!(f, "Calibration data not loaded, initialize the sensor first"),
            Self::AlreadyInitialized => write!(f, "Sensor is already initialized"),
            Self::DivisionHazard => write!(f, "Division by zero in compensation formula, calibration data is invalid"),
            Self::DeviceNotResponding(err) => write!(f, "Device not responding: {err}"),
        }
    }
}

impl std::error::Error for Bmp085Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DeviceNotResponding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Bmp085Error {
    fn from(err: std::io::Error) -> Self {
        Self::DeviceNotResponding(err)
    }
}
