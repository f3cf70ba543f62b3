pub mod constants;
pub mod quantum;
