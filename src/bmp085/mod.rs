mod bmp085_compensation;
mod bmp085_core;
mod bmp085_enums;
mod bmp085_error;

pub use bmp085_compensation::*;
pub use bmp085_core::*;
pub use bmp085_enums::*;
pub use bmp085_error::*;
