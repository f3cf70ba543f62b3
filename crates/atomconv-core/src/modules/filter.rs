//! `key=value` option tokens of the Grotrian converters.

use crate::common::constants::{DEFAULT_MAX_ENERGY, DEFAULT_MAX_L, DEFAULT_MAX_N};
use crate::domain::TermLevel;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionToken {
    MaxEnergy(f64),
    MaxN(i32),
    MaxL(i32),
    ExcludeTerm(String),
    ColumnOffset(f64),
    LineFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionTokenError {
    #[error("option '{0}' is not of the form key=value")]
    MissingValue(String),
    #[error("unknown option key '{key}' in '{token}'")]
    UnknownKey { key: String, token: String },
    #[error("invalid numeric value in option '{0}'")]
    InvalidNumber(String),
}

impl FromStr for OptionToken {
    type Err = OptionTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| OptionTokenError::MissingValue(token.to_string()))?;
        let invalid = || OptionTokenError::InvalidNumber(token.to_string());

        match key {
            "e" => value.trim().parse().map(Self::MaxEnergy).map_err(|_| invalid()),
            "n" => value.trim().parse().map(Self::MaxN).map_err(|_| invalid()),
            "l" => value.trim().parse().map(Self::MaxL).map_err(|_| invalid()),
            "c" => Ok(Self::ExcludeTerm(value.to_string())),
            "off" => value.trim().parse().map(Self::ColumnOffset).map_err(|_| invalid()),
            "lf" => Ok(Self::LineFile(PathBuf::from(value))),
            _ => Err(OptionTokenError::UnknownKey {
                key: key.to_string(),
                token: token.to_string(),
            }),
        }
    }
}

/// Exclusion rules applied to levels before they are grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelFilter {
    pub max_energy: f64,
    pub max_n: i32,
    pub max_l: i32,
    pub excluded_terms: Vec<String>,
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            max_n: DEFAULT_MAX_N,
            max_l: DEFAULT_MAX_L,
            excluded_terms: Vec::new(),
        }
    }
}

impl LevelFilter {
    /// Thresholds are exclusive: a level sitting exactly on `e`, `n` or `l` is dropped.
    pub fn excludes(&self, level: &TermLevel) -> bool {
        if level.energy() >= self.max_energy
            || level.n >= self.max_n
            || i32::from(level.symbol.l) >= self.max_l
        {
            return true;
        }

        let term = level.term_with_parity();
        self.excluded_terms.iter().any(|excluded| *excluded == term)
    }
}

/// Options accepted after the positional arguments of the Grotrian converters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GrotrianOptions {
    pub filter: LevelFilter,
    pub column_offset: f64,
    pub line_file: Option<PathBuf>,
}

impl GrotrianOptions {
    pub fn from_tokens(tokens: impl IntoIterator<Item = OptionToken>) -> Self {
        let mut options = Self::default();
        for token in tokens {
            options.apply(token);
        }
        options
    }

    pub fn apply(&mut self, token: OptionToken) {
        match token {
            OptionToken::MaxEnergy(value) => self.filter.max_energy = value,
            OptionToken::MaxN(value) => self.filter.max_n = value,
            OptionToken::MaxL(value) => self.filter.max_l = value,
            OptionToken::ExcludeTerm(term) => self.filter.excluded_terms.push(term),
            OptionToken::ColumnOffset(value) => self.column_offset = value,
            OptionToken::LineFile(path) => self.line_file = Some(path),
        }
    }
}
