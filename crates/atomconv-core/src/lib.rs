pub mod common;
pub mod domain;
pub mod modules;
pub mod parser;
