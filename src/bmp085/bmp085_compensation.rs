// -- fixed-point compensation of the datasheet, intermediate values keep its
// -- 32 bit integer arithmetic including the unsigned wrap-around of b4 and b7

use super::bmp085_enums::Bmp085OverSampling;
use super::bmp085_error::Bmp085Error;

const ALTITUDE_SCALE_M: f64 = 44330.0;
const ALTITUDE_EXPONENT: f64 = 0.1903;
const SEA_LEVEL_EXPONENT: f64 = 5.255;

#[derive(Clone, Debug, PartialEq)]
pub struct CalibData {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

impl CalibData {
    // -- coefficients of the worked example in the datasheet
    pub fn datasheet() -> CalibData {
        CalibData {
            ac1: 408,
            ac2: -72,
            ac3: -14383,
            ac4: 32741,
            ac5: 32757,
            ac6: 23153,
            b1: 6190,
            b2: 4,
            mb: -32768,
            mc: -8711,
            md: 2868,
        }
    }
}

// -- rounds towards negative infinity like the datasheet's worked example
fn div_floor(dividend: i32, divisor: i32) -> i32 {
    let quotient = dividend / divisor;
    if (dividend % divisor != 0) && ((dividend < 0) != (divisor < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

pub fn compute_b5(temperature_raw: i32, calib: &CalibData) -> Result<i32, Bmp085Error> {
    let x1 = (temperature_raw - calib.ac6 as i32).wrapping_mul(calib.ac5 as i32) >> 15;
    let divisor = x1 + calib.md as i32;
    if divisor == 0 {
        return Err(Bmp085Error::DivisionHazard)
    }
    let x2 = div_floor((calib.mc as i32) << 11, divisor);
    Ok(x1 + x2)
}

// -- temperature in 0.1 °C
pub fn compensate_temperature(temperature_raw: i32, calib: &CalibData) -> Result<i32, Bmp085Error> {
    let b5 = compute_b5(temperature_raw, calib)?;
    Ok((b5 + 8) >> 4)
}

// -- pressure in Pa
pub fn compensate_pressure(pressure_raw: i32, b5: i32, oss: Bmp085OverSampling, calib: &CalibData) -> Result<i32, Bmp085Error> {
    let oss = oss.value() as u32;
    let b6 = b5 - 4000;
    let b6_sq = b6.wrapping_mul(b6) >> 12;
    let x1 = (calib.b2 as i32).wrapping_mul(b6_sq) >> 11;
    let x2 = (calib.ac2 as i32).wrapping_mul(b6) >> 11;
    let x3 = x1 + x2;
    let b3 = ((((calib.ac1 as i32) * 4 + x3) << oss) + 2) >> 2;
    let x1 = (calib.ac3 as i32).wrapping_mul(b6) >> 13;
    let x2 = (calib.b1 as i32).wrapping_mul(b6_sq) >> 16;
    let x3 = ((x1 + x2) + 2) >> 2;
    let b4 = (calib.ac4 as u32).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
    if b4 == 0 {
        return Err(Bmp085Error::DivisionHazard)
    }
    let b7 = (pressure_raw.wrapping_sub(b3) as u32).wrapping_mul(50000 >> oss);
    // -- keep the branch, shifting first would lose the top bit
    let p = if b7 < 0x80000000 {
        ((b7 << 1) / b4) as i32
    } else {
        ((b7 / b4) << 1) as i32
    };
    let x1 = (p >> 8).wrapping_mul(p >> 8);
    let x1 = x1.wrapping_mul(3038) >> 16;
    let x2 = (-7357i32).wrapping_mul(p) >> 16;
    Ok(p + ((x1 + x2 + 3791) >> 4))
}

// -- altitude in m from the atmospheric and the sea level pressure, both in hPa
pub fn pressure_to_altitude(sea_level_hpa: f64, atmospheric_hpa: f64) -> f64 {
    ALTITUDE_SCALE_M * (1.0 - (atmospheric_hpa / sea_level_hpa).powf(ALTITUDE_EXPONENT))
}

// -- kept for callers of the older temperature based formula, the temperature is ignored
pub fn pressure_to_altitude_with_temperature(sea_level_hpa: f64, atmospheric_hpa: f64, _temperature: f64) -> f64 {
    pressure_to_altitude(sea_level_hpa, atmospheric_hpa)
}

// -- pressure at sea level for a pressure measured at a known altitude in m,
// -- the result has the unit of pressure
pub fn sea_level_pressure(pressure: f64, altitude_m: f64) -> f64 {
    pressure / (1.0 - altitude_m / ALTITUDE_SCALE_M).powf(SEA_LEVEL_EXPONENT)
}
