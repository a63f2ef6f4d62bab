use chrono::Local;
use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

use bmp085_i2c::bmp085::*;
use bmp085_i2c::i2cio::{LinuxI2cBus, ThreadDelay, TwoWireBus};
use embedded_hal::delay::DelayNs;

const EXIT_CODE_SET_CTR_C_HNDLR_FAILED: u8 = 0x02;
const EXIT_CODE_OPEN_BUS_FAILED: u8 = 0x03;
const EXIT_CODE_BMP085_INIT_FAILED: u8 = 0x71;
const EXIT_CODE_BMP085_GET_DATA_RAW_FAILED: u8 = 0x72;
const EXIT_CODE_BMP085_COMPENSATION_FAILED: u8 = 0x73;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OverSampling {
    UltraLowPower,
    Standard,
    HighRes,
    UltraHighRes,
}

impl OverSampling {
    fn value(&self) -> u8 {
        match *self {
            Self::UltraLowPower => 0,
            Self::Standard => 1,
            Self::HighRes => 2,
            Self::UltraHighRes => 3,
        }
    }
}

#[derive(Parser)]
struct Args {
    // -- i2c bus device
    bus_path: String,
    #[clap(value_enum, default_value_t = OverSampling::UltraHighRes)]
    mode: OverSampling,
    // -- pressure at sea level in hPa, used for the altitude
    #[clap(long, default_value_t = 1013.25)]
    sea_level_hpa: f64,
    // -- delay between two readings
    #[clap(long, default_value_t = 2000)]
    interval_ms: u32,
    // -- compensate the datasheet example instead of reading the sensor
    #[clap(long)]
    datasheet: bool,
}

fn report<B: TwoWireBus, D: DelayNs>(bmp085: &BMP085<B, D>, data_raw: &DataRaw, sea_level_hpa: f64) -> Result<(), Bmp085Error> {
    let (pressure, temperature) = bmp085.get_pressure_and_temperature(data_raw)?;
    let altitude = BMP085::<B, D>::altitude_meters(sea_level_hpa, pressure / 100.0);
    info!("pressure: {pressure} Pa, temperature: {temperature} °C, altitude: {altitude:.1} m");
    Ok(())
}

fn main() -> ExitCode {

    // -- read .env file
    dotenv::dotenv().ok();
    // -- setup logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let now = Local::now();
    info!("Starting up: {now}");

    let args = Args::parse();
    let bus_path = args.bus_path;
    info!("Using i2c bus device {bus_path}");

    // -- set handler for Ctrl-C
    if let Err(err) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, terminating...");
        std::process::exit(0);
    }) {
        error!("ERROR - Failed to set Ctrl-C handler: {err}");
        return ExitCode::from(EXIT_CODE_SET_CTR_C_HNDLR_FAILED);
    }

    let bus = match LinuxI2cBus::new(Path::new(&bus_path)) {
        Ok(bus) => bus,
        Err(err) => {
            error!("ERROR - Failed to open i2c bus {bus_path}: {err}");
            return ExitCode::from(EXIT_CODE_OPEN_BUS_FAILED);
        }
    };

    if args.datasheet {
        info!("Using datasheet calibration data");
        let bmp085 = BMP085::with_calib_data(bus, ThreadDelay, Bmp085OverSampling::UltraLowPower, CalibData::datasheet());
        let data_raw = DataRaw { temperature: 27898, pressure: 23843 };
        if let Err(err) = report(&bmp085, &data_raw, args.sea_level_hpa) {
            error!("ERROR - Failed to compensate datasheet values: {err}");
            return ExitCode::from(EXIT_CODE_BMP085_COMPENSATION_FAILED);
        }
        return ExitCode::SUCCESS;
    }

    info!("Initializing BMP085");
    let mut bmp085 = BMP085::new(bus, ThreadDelay);
    if let Err(err) = bmp085.initialize(args.mode.value()) {
        error!("ERROR - Failed to initialize BMP085: {err}");
        return ExitCode::from(EXIT_CODE_BMP085_INIT_FAILED);
    }
    loop {
        // -- get the raw data
        let data_raw = match bmp085.get_data_raw() {
            Ok(data_raw) => data_raw,
            Err(err) => {
                error!("ERROR - Failed to get raw data from BMP085: {err}");
                return ExitCode::from(EXIT_CODE_BMP085_GET_DATA_RAW_FAILED);
            },
        };
        // -- get the compensated data
        if let Err(err) = report(&bmp085, &data_raw, args.sea_level_hpa) {
            error!("ERROR - Failed to compensate BMP085 data: {err}");
            return ExitCode::from(EXIT_CODE_BMP085_COMPENSATION_FAILED);
        }
        // -- delay next reading
        ThreadDelay.delay_ms(args.interval_ms);
    }
}
