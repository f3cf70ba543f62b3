//! Physical constants and legacy default thresholds shared by the converters.

/// Speed of light in cm/s, used to turn TMAD frequencies into wavenumbers.
pub const SPEED_OF_LIGHT_CM_PER_S: f64 = 2.997_924_58e10;
/// Wavenumbers in cm^-1 to wavelengths in Angstrom: `lambda = 1e8 / sigma`.
pub const ANGSTROM_PER_CM: f64 = 1.0e8;
/// `f = gA * 1.49919e-16 * lambda^2 / g` with lambda in Angstrom.
pub const OSCILLATOR_RATE_FACTOR: f64 = 1.499_19e-16;

pub const DEFAULT_MAX_ENERGY: f64 = 9.9e30;
pub const DEFAULT_MAX_N: i32 = 26;
pub const DEFAULT_MAX_L: i32 = 23;

/// Relative deviation between f from log gf and f from gA above which a line is reported.
pub const OSCILLATOR_DEVIATION_LIMIT: f64 = 0.5;
