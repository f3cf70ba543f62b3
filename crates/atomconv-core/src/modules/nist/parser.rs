use crate::domain::{Level, Parity};
use crate::parser::{parse_fraction, parse_leading_f64};

const WAVELENGTH_COLUMN: usize = 0;
const G_A_COLUMN: usize = 5;
const LOG_GF_COLUMN: usize = 6;
const ENERGY_COLUMN: usize = 8;
const LOWER_COLUMNS: usize = 9;
const UPPER_COLUMNS: usize = 12;

/// Transition row of a NIST ASD line listing with both endpoints attached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NistRow {
    pub wavelength: f64,
    pub g_a: f64,
    pub log_gf: f64,
    pub lower: Level,
    pub upper: Level,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowOutcome {
    Complete(NistRow),
    /// Separator, header or a row without upper-level data.
    Ignored,
    Rejected(String),
}

#[derive(Debug, Default)]
struct RowBuilder {
    wavelength: Option<f64>,
    g_a: Option<f64>,
    log_gf: Option<f64>,
    energies: Vec<f64>,
    lower: Level,
    upper: Level,
}

fn is_separator(token: &str) -> bool {
    token.chars().count() > 10 && token.chars().skip(1).take(5).all(|c| c == '-')
}

fn level_from_columns(level: &mut Level, offset: usize, token: &str) -> Result<bool, String> {
    match offset {
        0 => level.configuration = token.replace('?', ""),
        1 => {
            level.term = token.to_string();
            level.parity = if token.contains('*') {
                Parity::Odd
            } else {
                Parity::Even
            };
        }
        _ => {
            level.j = parse_fraction(token).ok_or_else(|| "bad J".to_string())?;
            level.name = format!("{}_{}", level.configuration, level.term);
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn parse_row(raw: &str) -> RowOutcome {
    let mut row = RowBuilder::default();

    for (column, text) in raw.split('|').enumerate() {
        for token in text.split_whitespace() {
            if is_separator(token) {
                return RowOutcome::Ignored;
            }

            match column {
                WAVELENGTH_COLUMN | G_A_COLUMN | LOG_GF_COLUMN => {
                    let Some(value) = parse_leading_f64(token) else {
                        return RowOutcome::Rejected(format!("bad line (column {column})"));
                    };
                    let slot = match column {
                        WAVELENGTH_COLUMN => &mut row.wavelength,
                        G_A_COLUMN => &mut row.g_a,
                        _ => &mut row.log_gf,
                    };
                    *slot = Some(value);
                }
                ENERGY_COLUMN => {
                    if let Some(energy) = parse_leading_f64(token) {
                        if row.energies.len() == 2 {
                            return RowOutcome::Rejected(format!(
                                "unexpected third energy (column {column})"
                            ));
                        }
                        row.energies.push(energy);
                    }
                }
                LOWER_COLUMNS..=11 => {
                    if let Err(reason) =
                        level_from_columns(&mut row.lower, column - LOWER_COLUMNS, token)
                    {
                        return RowOutcome::Rejected(format!("{reason} (column {column})"));
                    }
                }
                UPPER_COLUMNS..=14 => {
                    match level_from_columns(&mut row.upper, column - UPPER_COLUMNS, token) {
                        Ok(true) => return row.finish(),
                        Ok(false) => {}
                        Err(reason) => {
                            return RowOutcome::Rejected(format!("{reason} (column {column})"));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    RowOutcome::Ignored
}

impl RowBuilder {
    fn finish(mut self) -> RowOutcome {
        let (Some(wavelength), Some(g_a), Some(log_gf)) = (self.wavelength, self.g_a, self.log_gf)
        else {
            return RowOutcome::Rejected("missing wavelength, gA or log gf".to_string());
        };
        let &[lower_energy, upper_energy] = self.energies.as_slice() else {
            return RowOutcome::Rejected("missing level energies".to_string());
        };
        self.lower.energy = lower_energy;
        self.upper.energy = upper_energy;

        RowOutcome::Complete(NistRow {
            wavelength,
            g_a,
            log_gf,
            lower: self.lower,
            upper: self.upper,
        })
    }
}
