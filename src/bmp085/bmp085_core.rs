use log::{debug, info, warn};

use embedded_hal::delay::DelayNs;

use crate::i2cio::{self, TwoWireBus};

use super::bmp085_compensation::{self, CalibData};
use super::bmp085_enums::*;
use super::bmp085_error::Bmp085Error;

// -- device address and chip id
pub const BMP085_DEV_ADDR: u16 = 0x77;
const BMP085_CHIP_ID: u8 = 0x55;

// -- registers
const BMP085_REG_CAL_AC1: u8 = 0xaa;
const BMP085_REG_CAL_AC2: u8 = 0xac;
const BMP085_REG_CAL_AC3: u8 = 0xae;
const BMP085_REG_CAL_AC4: u8 = 0xb0;
const BMP085_REG_CAL_AC5: u8 = 0xb2;
const BMP085_REG_CAL_AC6: u8 = 0xb4;
const BMP085_REG_CAL_B1: u8 = 0xb6;
const BMP085_REG_CAL_B2: u8 = 0xb8;
const BMP085_REG_CAL_MB: u8 = 0xba;
const BMP085_REG_CAL_MC: u8 = 0xbc;
const BMP085_REG_CAL_MD: u8 = 0xbe;
const BMP085_REG_CHIP_ID: u8 = 0xd0;
const BMP085_REG_VERSION: u8 = 0xd1;
const BMP085_REG_SOFT_RESET: u8 = 0xe0;
const BMP085_REG_CONTROL: u8 = 0xf4;
const BMP085_REG_TEMPERATURE_DATA: u8 = 0xf6;
const BMP085_REG_PRESSURE_DATA: u8 = 0xf6;
const BMP085_REG_PRESSURE_DATA_XLSB: u8 = BMP085_REG_PRESSURE_DATA + 2;

// -- commands
const BMP085_CMD_READ_TEMPERATURE: u8 = 0x2e;
const BMP085_CMD_READ_PRESSURE: u8 = 0x34;
const BMP085_CMD_SOFT_RESET: u8 = 0xb6;

// -- other constants
const BMP085_TEMPERATURE_DELAY_MS: u32 = 5;
const BMP085_STARTUP_DELAY_MS: u32 = 10;
const BMP085_OSS_SHIFT: u8 = 6;

#[derive(Debug, Default)]
pub struct DataRaw {
    // -- Un-compensated temperature
    pub temperature: i32,
    // -- Un-compensated pressure
    pub pressure: i32,
}

pub struct BMP085<B: TwoWireBus, D: DelayNs> {
    // -- two-wire bus
    bus: B,
    // -- blocking delay used while the adc converts
    delay: D,
    state: Bmp085State,
    oss: Bmp085OverSampling,
    calib_data: Option<CalibData>,
}

impl<B: TwoWireBus, D: DelayNs> BMP085<B, D> {

    pub fn new(bus: B, delay: D) -> BMP085<B, D> {
        BMP085 {
            bus,
            delay,
            state: Bmp085State::Uninitialized,
            oss: Bmp085OverSampling::default(),
            calib_data: None,
        }
    }

    // -- calibrated sensor from known coefficients, e.g. CalibData::datasheet(), no bus access
    pub fn with_calib_data(bus: B, delay: D, oss: Bmp085OverSampling, calib_data: CalibData) -> BMP085<B, D> {
        BMP085 {
            bus,
            delay,
            state: Bmp085State::Calibrated,
            oss,
            calib_data: Some(calib_data),
        }
    }

    pub fn initialize(&mut self, oss: u8) -> Result<(), Bmp085Error> {
        if self.state == Bmp085State::Calibrated {
            return Err(Bmp085Error::AlreadyInitialized)
        }
        // -- make sure we talk to the right device
        let chip_id = self.get_chip_id()?;
        if chip_id != BMP085_CHIP_ID {
            return Err(Bmp085Error::ChipIdMismatch { found: chip_id, expected: BMP085_CHIP_ID })
        }
        debug!("Got chip id: {chip_id:#x}");
        self.state = Bmp085State::Identified;
        // -- oversampling out of range falls back to the highest setting
        let mode = Bmp085OverSampling::from_raw(oss);
        if mode.value() != oss {
            warn!("Oversampling setting {oss} out of range, using {mode}");
        }
        self.oss = mode;
        // -- the coefficients need to be read once
        let calib_data = self.get_calib_data()?;
        self.calib_data = Some(calib_data);
        self.state = Bmp085State::Calibrated;
        info!("BMP085 {}, oversampling {}", self.state, self.oss);
        Ok(())
    }

    // -- same as initialize but only reports success
    pub fn begin(&mut self, oss: u8) -> bool {
        match self.initialize(oss) {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to initialize BMP085: {err}");
                false
            }
        }
    }

    pub fn get_state(&self) -> Bmp085State {
        self.state
    }

    pub fn get_oversampling(&self) -> Bmp085OverSampling {
        self.oss
    }

    pub fn get_calib(&self) -> Option<&CalibData> {
        self.calib_data.as_ref()
    }

    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    pub fn get_chip_id(&mut self) -> Result<u8, Bmp085Error> {
        Ok(i2cio::read_byte(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_CHIP_ID)?)
    }

    pub fn get_version(&mut self) -> Result<u8, Bmp085Error> {
        let version = i2cio::read_byte(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_VERSION)?;
        debug!("Got version: {version:#x}");
        Ok(version)
    }

    pub fn soft_reset(&mut self) -> Result<(), Bmp085Error> {
        // -- initiate soft reset
        debug!("Initiating soft reset");
        i2cio::write_register(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_SOFT_RESET, BMP085_CMD_SOFT_RESET)?;
        // -- wait for the device to startup
        self.delay.delay_ms(BMP085_STARTUP_DELAY_MS);
        Ok(())
    }

    fn read_s16(&mut self, register: u8) -> Result<i16, std::io::Error> {
        i2cio::read_signed_word(&mut self.bus, BMP085_DEV_ADDR, register)
    }

    fn read_u16(&mut self, register: u8) -> Result<u16, std::io::Error> {
        i2cio::read_word(&mut self.bus, BMP085_DEV_ADDR, register)
    }

    fn get_calib_data(&mut self) -> Result<CalibData, std::io::Error> {
        let calib_data = CalibData {
            ac1: self.read_s16(BMP085_REG_CAL_AC1)?,
            ac2: self.read_s16(BMP085_REG_CAL_AC2)?,
            ac3: self.read_s16(BMP085_REG_CAL_AC3)?,
            ac4: self.read_u16(BMP085_REG_CAL_AC4)?,
            ac5: self.read_u16(BMP085_REG_CAL_AC5)?,
            ac6: self.read_u16(BMP085_REG_CAL_AC6)?,
            b1: self.read_s16(BMP085_REG_CAL_B1)?,
            b2: self.read_s16(BMP085_REG_CAL_B2)?,
            mb: self.read_s16(BMP085_REG_CAL_MB)?,
            mc: self.read_s16(BMP085_REG_CAL_MC)?,
            md: self.read_s16(BMP085_REG_CAL_MD)?,
        };
        debug!("Got calibration data: {calib_data:#?}");
        Ok(calib_data)
    }

    fn calib(&self) -> Result<&CalibData, Bmp085Error> {
        self.calib_data.as_ref().ok_or(Bmp085Error::NotCalibrated)
    }

    pub fn read_raw_temperature(&mut self) -> Result<i32, Bmp085Error> {
        i2cio::write_register(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_CONTROL, BMP085_CMD_READ_TEMPERATURE)?;
        self.delay.delay_ms(BMP085_TEMPERATURE_DELAY_MS);
        let temperature = i2cio::read_word(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_TEMPERATURE_DATA)?;
        debug!("Got raw temperature: {temperature}");
        Ok(temperature as i32)
    }

    pub fn read_raw_pressure(&mut self) -> Result<i32, Bmp085Error> {
        let oss = self.oss.value();
        let reg_val = BMP085_CMD_READ_PRESSURE + (oss << BMP085_OSS_SHIFT);
        debug!("Setting register BMP085_REG_CONTROL {BMP085_REG_CONTROL:#x} to value {reg_val:#010b}");
        i2cio::write_register(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_CONTROL, reg_val)?;
        self.delay.delay_ms(self.oss.conversion_delay_ms());
        let data_msb_lsb = i2cio::read_word(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_PRESSURE_DATA)? as i32;
        let data_xlsb = i2cio::read_byte(&mut self.bus, BMP085_DEV_ADDR, BMP085_REG_PRESSURE_DATA_XLSB)? as i32;
        let pressure = ((data_msb_lsb << 8) | data_xlsb) >> (8 - oss);
        debug!("Got raw pressure: {pressure}");
        Ok(pressure)
    }

    pub fn get_data_raw(&mut self) -> Result<DataRaw, Bmp085Error> {
        let temperature = self.read_raw_temperature()?;
        let pressure = self.read_raw_pressure()?;
        Ok(DataRaw { temperature, pressure })
    }

    pub fn compute_b5(&self, temperature_raw: i32) -> Result<i32, Bmp085Error> {
        bmp085_compensation::compute_b5(temperature_raw, self.calib()?)
    }

    // -- compensated pressure in Pa and temperature in °C of a raw reading
    pub fn get_pressure_and_temperature(&self, data_raw: &DataRaw) -> Result<(f64, f64), Bmp085Error> {
        let calib = self.calib()?;
        // -- b5 from the temperature taken together with the pressure
        let b5 = bmp085_compensation::compute_b5(data_raw.temperature, calib)?;
        let temperature = ((b5 + 8) >> 4) as f64 / 10.0;
        let pressure = bmp085_compensation::compensate_pressure(data_raw.pressure, b5, self.oss, calib)?;
        Ok((pressure as f64, temperature))
    }

    pub fn read_temperature_celsius(&mut self) -> Result<f64, Bmp085Error> {
        let calib = self.calib()?.clone();
        let temperature_raw = self.read_raw_temperature()?;
        let temperature = bmp085_compensation::compensate_temperature(temperature_raw, &calib)?;
        Ok(temperature as f64 / 10.0)
    }

    pub fn read_pressure_pascals(&mut self) -> Result<f64, Bmp085Error> {
        self.calib()?;
        let data_raw = self.get_data_raw()?;
        let (pressure, _temperature) = self.get_pressure_and_temperature(&data_raw)?;
        Ok(pressure)
    }

    pub fn read_altitude_meters(&mut self, sea_level_hpa: f64) -> Result<f64, Bmp085Error> {
        let pressure = self.read_pressure_pascals()?;
        Ok(Self::altitude_meters(sea_level_hpa, pressure / 100.0))
    }

    pub fn altitude_meters(sea_level_hpa: f64, atmospheric_hpa: f64) -> f64 {
        bmp085_compensation::pressure_to_altitude(sea_level_hpa, atmospheric_hpa)
    }
}
