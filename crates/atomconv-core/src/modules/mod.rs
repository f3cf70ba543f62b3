pub mod adamant;
pub mod filter;
pub mod fplot;
pub mod grotrian;
pub mod nist;
pub mod report;
pub mod serialization;
pub mod tmad;
pub mod toss;

mod helpers;
mod traits;

pub use adamant::AdamantConverter;
pub use fplot::FplotConverter;
pub use nist::NistConverter;
pub use tmad::TmadConverter;
pub use toss::TossConverter;
pub use traits::{ConversionOutput, Converter};
