pub mod errors;

pub use errors::{ConvertError, ConvertErrorCategory, ConvertResult};

use crate::common::quantum::{orbital_code, orbital_letter};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const MAX_MULTIPLICITY: u8 = 9;
pub const MIN_MULTIPLICITY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Dialect {
    Adamant,
    Nist,
    Tmad,
    Toss,
    TossFplot,
}

impl Dialect {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adamant => "ADAMANT",
            Self::Nist => "NIST",
            Self::Tmad => "TMAD",
            Self::Toss => "TOSS",
            Self::TossFplot => "TOSS-FPLOT",
        }
    }

    /// Program name of the standalone converter this dialect belongs to.
    pub const fn legacy_program(self) -> &'static str {
        match self {
            Self::Adamant => "adamant_to_toss",
            Self::Nist => "nist_to_toss",
            Self::Tmad => "tmad_to_grotrian",
            Self::Toss => "toss_to_grotrian",
            Self::TossFplot => "toss_to_fplot",
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub dialect: Dialect,
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
}

impl ConvertRequest {
    pub fn new(dialect: Dialect, input_path: impl Into<PathBuf>) -> Self {
        Self {
            dialect,
            input_path: input_path.into(),
            output_path: None,
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    /// Name used in diagram titles, exactly as given on the command line.
    pub fn source_label(&self) -> String {
        self.input_path.display().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Parity {
    #[default]
    Even,
    Odd,
}

impl Parity {
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Even => "e",
            Self::Odd => "o",
        }
    }

    pub const fn is_odd(self) -> bool {
        matches!(self, Self::Odd)
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "e" | "E" => Some(Self::Even),
            "o" | "O" => Some(Self::Odd),
            _ => None,
        }
    }
}

impl Display for Parity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    pub name: String,
    pub configuration: String,
    pub term: String,
    pub parity: Parity,
    pub energy: f64,
    pub j: f64,
}

impl Level {
    pub fn statistical_weight(&self) -> f64 {
        2.0 * self.j + 1.0
    }
}

pub fn compare_by_energy(lhs: &Level, rhs: &Level) -> Ordering {
    lhs.energy.total_cmp(&rhs.energy)
}

/// Decoded LS term: multiplicity `2S+1` and the orbital angular momentum code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermSymbol {
    pub multiplicity: u8,
    pub l: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermSymbolError {
    #[error("malformed term '{0}'")]
    Malformed(String),
    #[error("error with multiplicity in term '{0}'")]
    Multiplicity(String),
    #[error("error with angular momentum L in term '{0}'")]
    AngularMomentum(String),
}

impl TermSymbol {
    /// Parses the leading `<multiplicity><letter>` pair of a term such as `3P` or `2Do`.
    pub fn parse(term: &str) -> Result<Self, TermSymbolError> {
        let mut chars = term.chars();
        let (Some(mult_char), Some(letter)) = (chars.next(), chars.next()) else {
            return Err(TermSymbolError::Malformed(term.to_string()));
        };

        let multiplicity = mult_char
            .to_digit(10)
            .map(|digit| digit as u8)
            .filter(|value| (MIN_MULTIPLICITY..=MAX_MULTIPLICITY).contains(value))
            .ok_or_else(|| TermSymbolError::Multiplicity(term.to_string()))?;
        let l = orbital_code(letter)
            .ok_or_else(|| TermSymbolError::AngularMomentum(term.to_string()))?;

        Ok(Self { multiplicity, l })
    }

    /// Spin quantum number `S = (2S+1 - 1) / 2`.
    pub fn spin(self) -> f64 {
        (f64::from(self.multiplicity) - 1.0) * 0.5
    }

    pub fn letter(self) -> &'static str {
        orbital_letter(self.l)
    }
}

/// A level whose term decoded cleanly; the only record the layout engine accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct TermLevel {
    pub level: Level,
    pub symbol: TermSymbol,
    pub n: i32,
}

impl TermLevel {
    pub fn multiplicity(&self) -> u8 {
        self.symbol.multiplicity
    }

    pub fn column_key(&self) -> ColumnKey {
        ColumnKey {
            l: self.symbol.l,
            parity: self.level.parity,
        }
    }

    pub fn energy(&self) -> f64 {
        self.level.energy
    }

    /// Term and parity marker as matched by `c=` exclusions, e.g. `3Po` or `4Se`.
    pub fn term_with_parity(&self) -> String {
        format!("{}{}", self.level.term, self.level.parity.marker())
    }
}

/// Column of a Grotrian diagram inside one multiplicity group.
///
/// Derived ordering sorts by `l` first, then parity (even before odd).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub l: u8,
    pub parity: Parity,
}

/// Radiative transition between two entries of a level table.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub lower: usize,
    pub upper: usize,
    pub wavelength: f64,
    pub gf: f64,
    pub g_a: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransition {
    pub transition: Transition,
    pub swapped: bool,
}

impl Transition {
    /// Connects levels `first` and `second` of `energies`, ordering the
    /// endpoints so that `lower` never lies above `upper`.
    pub fn between(
        energies: impl Fn(usize) -> f64,
        first: usize,
        second: usize,
        wavelength: f64,
        gf: f64,
        g_a: f64,
    ) -> ResolvedTransition {
        let swapped = energies(first) > energies(second);
        let (lower, upper) = if swapped {
            (second, first)
        } else {
            (first, second)
        };

        ResolvedTransition {
            transition: Self {
                lower,
                upper,
                wavelength,
                gf,
                g_a,
            },
            swapped,
        }
    }

    pub fn log_gf(&self) -> f64 {
        self.gf.log10()
    }
}

pub fn compare_by_wavelength(lhs: &Transition, rhs: &Transition) -> Ordering {
    lhs.wavelength
        .total_cmp(&rhs.wavelength)
        .then_with(|| lhs.gf.total_cmp(&rhs.gf))
}
