use crate::domain::{Level, Parity, TermLevel, TermSymbol, Transition};
use crate::modules::filter::LevelFilter;
use crate::modules::report::{Diagnostics, SkipKind};
use crate::parser::{SourceLine, fixed_field, parse_leading_f64, parse_leading_i32, source_lines};
use tracing::{debug, warn};

const CONFIGURATION_START: usize = 3;
const CONFIGURATION_WIDTH: usize = 3;
const J_POSITION: usize = 6;
const TERM_START: usize = 7;
const TERM_WIDTH: usize = 2;
const PARITY_POSITION: usize = 9;

/// One row of a TOSS transition table:
/// `wvl E_low (p) J_low E_up (p) J_up loggf gA [CF]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TossRow {
    pub wavelength: f64,
    pub lower_energy: f64,
    pub lower_j: f64,
    pub upper_energy: f64,
    pub upper_j: f64,
    pub log_gf: f64,
    pub g_a: f64,
}

impl TossRow {
    /// Returns `None` for banner, blank and otherwise non-numeric rows.
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 9 {
            return None;
        }
        let number = |index: usize| parse_leading_f64(tokens[index]);

        Some(Self {
            wavelength: number(0)?,
            lower_energy: number(1)?,
            lower_j: number(3)?,
            upper_energy: number(4)?,
            upper_j: number(6)?,
            log_gf: number(7)?,
            g_a: number(8)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TossLevels {
    pub levels: Vec<TermLevel>,
    pub filtered: usize,
}

pub(crate) fn parse_levels(
    source: &str,
    filter: &LevelFilter,
    diagnostics: &mut Diagnostics,
) -> TossLevels {
    let mut parsed = TossLevels {
        levels: Vec::new(),
        filtered: 0,
    };

    for line in source_lines(source) {
        if line.is_blank() {
            continue;
        }
        let Some(level) = parse_level(&line, diagnostics) else {
            continue;
        };
        if filter.excludes(&level) {
            debug!(line = line.number, name = %level.level.name, "level filtered");
            parsed.filtered += 1;
            continue;
        }
        parsed.levels.push(level);
    }

    parsed
}

fn parse_level(line: &SourceLine<'_>, diagnostics: &mut Diagnostics) -> Option<TermLevel> {
    let trimmed = line.raw.trim();
    let Some((energy_token, rest)) = trimmed.split_once(char::is_whitespace) else {
        diagnostics.skip(SkipKind::Level, line, "missing level name");
        return None;
    };
    let Some(energy) = parse_leading_f64(energy_token) else {
        diagnostics.skip(SkipKind::Level, line, "error with level energy");
        return None;
    };

    let rest = rest.trim();
    if rest.chars().count() < TERM_START + TERM_WIDTH {
        diagnostics.skip(SkipKind::Level, line, "level name too short");
        return None;
    }

    let term = fixed_field(rest, TERM_START, TERM_WIDTH).to_uppercase();
    let configuration = fixed_field(rest, CONFIGURATION_START, CONFIGURATION_WIDTH)
        .trim()
        .to_lowercase();
    let j = parse_leading_f64(fixed_field(rest, J_POSITION, 1)).unwrap_or(0.0);

    let symbol = match TermSymbol::parse(&term) {
        Ok(symbol) => symbol,
        Err(error) => {
            diagnostics.skip(SkipKind::Level, line, error.to_string());
            return None;
        }
    };
    let n = parse_leading_i32(fixed_field(&configuration, 0, 2)).unwrap_or(0);

    let parity = match fixed_field(rest, PARITY_POSITION, 1) {
        "o" | "O" => Parity::Odd,
        "" | " " => Parity::Even,
        _ => {
            diagnostics.skip(SkipKind::Level, line, "error with parity");
            return None;
        }
    };

    Some(TermLevel {
        level: Level {
            name: rest.to_string(),
            configuration,
            term,
            parity,
            energy,
            j,
        },
        symbol,
        n,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TossTransitions {
    pub transitions: Vec<Transition>,
    pub swapped: usize,
}

/// Attaches transition rows to `levels` by exact energy match.
pub(crate) fn parse_transitions(
    source: &str,
    levels: &[TermLevel],
    diagnostics: &mut Diagnostics,
) -> TossTransitions {
    let mut parsed = TossTransitions {
        transitions: Vec::new(),
        swapped: 0,
    };
    let find = |energy: f64| levels.iter().position(|level| level.energy() == energy);

    for line in source_lines(source) {
        let Some(row) = TossRow::parse(line.raw) else {
            debug!(line = line.number, "not a transition row");
            continue;
        };
        let (Some(first), Some(second)) = (find(row.lower_energy), find(row.upper_energy)) else {
            diagnostics.skip(SkipKind::Transition, &line, "levels not found");
            continue;
        };

        let resolved = Transition::between(
            |index| levels[index].energy(),
            first,
            second,
            row.wavelength,
            10f64.powf(row.log_gf),
            row.g_a,
        );
        if resolved.swapped {
            warn!(
                line = line.number,
                "upper level lies below lower level, endpoints swapped"
            );
            parsed.swapped += 1;
        }
        parsed.transitions.push(resolved.transition);
    }

    parsed
}
