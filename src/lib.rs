pub mod bmp085;
pub mod i2cio;
