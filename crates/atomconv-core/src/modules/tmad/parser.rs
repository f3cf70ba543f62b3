use crate::common::constants::{
    ANGSTROM_PER_CM, OSCILLATOR_RATE_FACTOR, SPEED_OF_LIGHT_CM_PER_S,
};
use crate::domain::{Level, Parity, TermLevel, TermSymbol, Transition};
use crate::modules::filter::LevelFilter;
use crate::modules::report::{Diagnostics, SkipKind};
use crate::parser::{SourceLine, field_from, fixed_field, parse_leading_f64, parse_leading_i32};
use tracing::{debug, warn};

const NAME_WIDTH: usize = 10;
const CONFIGURATION_END: usize = 7;
const TERM_START: usize = 7;
const TERM_WIDTH: usize = 3;
const DATA_START: usize = 20;
const TWO_LETTER_CODE_WIDTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderState {
    SearchAtom,
    ReadAtom,
    SearchContent,
    ReadLevels,
    ReadRbb,
}

/// What one line contributes to the model.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TmadRecord {
    ElementCode { width: usize },
    Level {
        level: TermLevel,
        ionization_limit: f64,
    },
    Transition {
        transition: Transition,
        swapped: bool,
    },
    Skipped {
        kind: SkipKind,
        reason: String,
    },
}

impl TmadRecord {
    fn skipped(kind: SkipKind, reason: impl Into<String>) -> Self {
        Self::Skipped {
            kind,
            reason: reason.into(),
        }
    }
}

/// Levels and bound-bound transitions read from one TMAD model atom.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TmadModel {
    pub levels: Vec<TermLevel>,
    pub transitions: Vec<Transition>,
    pub ionization_limit: f64,
    pub filtered_levels: usize,
    pub swapped_transitions: usize,
    pub diagnostics: Diagnostics,
}

pub(crate) struct TmadReader<'f> {
    filter: &'f LevelFilter,
    state: ReaderState,
    code_width: usize,
    model: TmadModel,
}

impl<'f> TmadReader<'f> {
    pub(crate) fn new(filter: &'f LevelFilter) -> Self {
        Self {
            filter,
            state: ReaderState::SearchAtom,
            code_width: TWO_LETTER_CODE_WIDTH,
            model: TmadModel {
                levels: Vec::new(),
                transitions: Vec::new(),
                ionization_limit: 0.0,
                filtered_levels: 0,
                swapped_transitions: 0,
                diagnostics: Diagnostics::new(),
            },
        }
    }

    pub(crate) fn read(mut self, source: &str) -> TmadModel {
        for line in crate::parser::source_lines(source) {
            let (next, record) = self.step(&line);
            self.state = next;
            if let Some(record) = record {
                self.apply(&line, record);
            }
        }
        self.model
    }

    /// Reads one line without touching the model; returns the state for the
    /// next line and the record this line yields, if any.
    pub(crate) fn step(&self, line: &SourceLine<'_>) -> (ReaderState, Option<TmadRecord>) {
        if line.raw.starts_with('.') {
            return (self.state, None);
        }
        let marker = line.raw.trim_end();

        match self.state {
            ReaderState::SearchAtom if line.raw.starts_with("ATOM") => {
                (ReaderState::ReadAtom, None)
            }
            ReaderState::SearchAtom => (ReaderState::SearchAtom, None),
            ReaderState::ReadAtom => (ReaderState::SearchContent, Some(self.read_atom(line))),
            ReaderState::SearchContent => match marker {
                "L" | "LTE" => (ReaderState::ReadLevels, None),
                "RBB" => (ReaderState::ReadRbb, None),
                _ => (ReaderState::SearchContent, None),
            },
            ReaderState::ReadLevels | ReaderState::ReadRbb if marker == "0" => {
                (ReaderState::SearchContent, None)
            }
            ReaderState::ReadLevels => (ReaderState::ReadLevels, Some(self.read_level(line))),
            ReaderState::ReadRbb => (ReaderState::ReadRbb, Some(self.read_rbb(line))),
        }
    }

    fn apply(&mut self, line: &SourceLine<'_>, record: TmadRecord) {
        match record {
            TmadRecord::ElementCode { width } => self.code_width = width,
            TmadRecord::Level {
                level,
                ionization_limit,
            } => {
                self.model.ionization_limit = ionization_limit;
                if self.filter.excludes(&level) {
                    debug!(line = line.number, level = %level.level.name, "level filtered");
                    self.model.filtered_levels += 1;
                } else {
                    self.model.levels.push(level);
                }
            }
            TmadRecord::Transition {
                transition,
                swapped,
            } => {
                if swapped {
                    warn!(
                        line = line.number,
                        "upper level lies below lower level, endpoints swapped"
                    );
                    self.model.swapped_transitions += 1;
                }
                self.model.transitions.push(transition);
            }
            TmadRecord::Skipped { kind, reason } => {
                self.model.diagnostics.skip(kind, line, reason);
            }
        }
    }

    fn read_atom(&self, line: &SourceLine<'_>) -> TmadRecord {
        let tokens = line.tokens();
        let symbol = tokens.first().copied().unwrap_or_default();
        let width = if symbol.chars().count() == 2 {
            TWO_LETTER_CODE_WIDTH
        } else {
            let charge = tokens
                .get(1)
                .and_then(|token| parse_leading_i32(token))
                .unwrap_or_else(|| {
                    warn!(line = line.number, "no ion charge after element symbol, assuming 0");
                    0
                });
            format!("{}{}", symbol, charge.saturating_add(1)).chars().count()
        };
        debug!(symbol, width, "element code");
        TmadRecord::ElementCode { width }
    }

    fn read_level(&self, line: &SourceLine<'_>) -> TmadRecord {
        let raw = line.raw;
        let name = fixed_field(raw, 0, NAME_WIDTH).to_string();

        let configuration = fixed_field(
            raw,
            self.code_width,
            CONFIGURATION_END.saturating_sub(self.code_width),
        )
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
        let n = parse_leading_i32(fixed_field(&configuration, 0, 2)).unwrap_or(0);

        let term_field = fixed_field(raw, TERM_START, TERM_WIDTH)
            .split_whitespace()
            .next()
            .unwrap_or_default();
        let (term, parity) = match term_field.chars().count() {
            2 => (term_field.to_string(), Parity::Even),
            3 => (fixed_field(term_field, 0, 2).to_string(), Parity::Odd),
            _ => return TmadRecord::skipped(SkipKind::Level, "error with level parity"),
        };

        let symbol = match TermSymbol::parse(&term) {
            Ok(symbol) => symbol,
            Err(error) => return TmadRecord::skipped(SkipKind::Level, error.to_string()),
        };

        let data: Vec<&str> = field_from(raw, DATA_START).split_whitespace().collect();
        let (Some(frequency), Some(weight)) = (
            data.first().and_then(|token| parse_leading_f64(token)),
            data.get(1).and_then(|token| parse_leading_f64(token)),
        ) else {
            return TmadRecord::skipped(
                SkipKind::Level,
                "missing frequency or statistical weight",
            );
        };

        let wavenumber = frequency / SPEED_OF_LIGHT_CM_PER_S;
        let ionization_limit = if self.model.levels.is_empty() {
            wavenumber
        } else {
            self.model.ionization_limit
        };

        TmadRecord::Level {
            level: TermLevel {
                level: Level {
                    name,
                    configuration,
                    term,
                    parity,
                    energy: ionization_limit - wavenumber,
                    j: (weight - 1.0) * 0.5,
                },
                symbol,
                n,
            },
            ionization_limit,
        }
    }

    fn read_rbb(&self, line: &SourceLine<'_>) -> TmadRecord {
        let raw = line.raw;
        let (Some(first), Some(second)) = (
            self.find_level(fixed_field(raw, 0, NAME_WIDTH)),
            self.find_level(fixed_field(raw, NAME_WIDTH, NAME_WIDTH)),
        ) else {
            return TmadRecord::skipped(SkipKind::Transition, "levels not found");
        };

        let Some(f_ik) = field_from(raw, DATA_START)
            .split_whitespace()
            .nth(2)
            .and_then(parse_leading_f64)
        else {
            return TmadRecord::skipped(SkipKind::Transition, "missing oscillator strength");
        };

        let levels = &self.model.levels;
        let resolved =
            Transition::between(|index| levels[index].energy(), first, second, 0.0, 0.0, 0.0);
        let mut transition = resolved.transition;
        let lower = &levels[transition.lower].level;
        let upper = &levels[transition.upper].level;

        let wavelength = ANGSTROM_PER_CM / (upper.energy - lower.energy);
        if !wavelength.is_finite() {
            return TmadRecord::skipped(SkipKind::Transition, "levels have equal energy");
        }

        transition.gf = lower.statistical_weight() * f_ik;
        transition.wavelength = wavelength;
        transition.g_a = transition.gf / OSCILLATOR_RATE_FACTOR / wavelength / wavelength;

        TmadRecord::Transition {
            transition,
            swapped: resolved.swapped,
        }
    }

    fn find_level(&self, name: &str) -> Option<usize> {
        self.model
            .levels
            .iter()
            .position(|level| level.level.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ReaderState, TmadReader, TmadRecord};
    use crate::common::constants::SPEED_OF_LIGHT_CM_PER_S;
    use crate::domain::Parity;
    use crate::modules::filter::LevelFilter;
    use crate::modules::report::SkipKind;
    use crate::parser::SourceLine;

    const C: f64 = SPEED_OF_LIGHT_CM_PER_S;

    fn level_line(name: &str, frequency: f64, weight: f64) -> String {
        format!("{:<10}{:<10}{:.9e} {:.1}", name, "", frequency, weight)
    }

    fn sample_source() -> String {
        [
            ". model atom".to_string(),
            "ATOM".to_string(),
            "C 3".to_string(),
            "L".to_string(),
            level_line("C4 2S  2S", 100_000.0 * C, 2.0),
            level_line("C4 2P  2PO", 90_000.0 * C, 6.0),
            level_line("C4 3D  2D", 50_000.0 * C, 10.0),
            "0".to_string(),
            "RBB".to_string(),
            format!("{:<10}{:<10} 1 2 0.25", "C4 2S  2S", "C4 2P  2PO"),
            format!("{:<10}{:<10} 1 2 0.50", "C4 3D  2D", "C4 2P  2PO"),
            format!("{:<10}{:<10} 1 2 0.50", "C4 9Z  2S", "C4 2P  2PO"),
            "0".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn state_machine_follows_section_markers() {
        let filter = LevelFilter::default();
        let mut reader = TmadReader::new(&filter);
        let lines = [". comment", "ATOM", "C 3", "RBB", "0", "LTE", "0"];
        let expected = [
            ReaderState::SearchAtom,
            ReaderState::ReadAtom,
            ReaderState::SearchContent,
            ReaderState::ReadRbb,
            ReaderState::SearchContent,
            ReaderState::ReadLevels,
            ReaderState::SearchContent,
        ];

        for (number, (raw, state)) in lines.into_iter().zip(expected).enumerate() {
            let (next, _) = reader.step(&SourceLine { number: number + 1, raw });
            reader.state = next;
            assert_eq!(reader.state, state, "after line {raw:?}");
        }
    }

    #[test]
    fn huge_ion_charge_does_not_overflow() {
        let filter = LevelFilter::default();
        let mut reader = TmadReader::new(&filter);
        reader.state = ReaderState::ReadAtom;

        let (next, record) = reader.step(&SourceLine {
            number: 2,
            raw: "C 2147483647",
        });
        assert_eq!(next, ReaderState::SearchContent);
        assert_eq!(record, Some(TmadRecord::ElementCode { width: 11 }));
    }

    #[test]
    fn levels_convert_frequencies_to_energies() {
        let filter = LevelFilter::default();
        let model = TmadReader::new(&filter).read(&sample_source());

        assert_eq!(model.levels.len(), 3);
        assert!((model.ionization_limit - 100_000.0).abs() < 1.0e-3);

        let ground = &model.levels[0];
        assert_eq!(ground.level.name, "C4 2S  2S ");
        assert_eq!(ground.level.configuration, "2s");
        assert_eq!(ground.level.term, "2S");
        assert_eq!(ground.level.parity, Parity::Even);
        assert_eq!(ground.n, 2);
        assert!(ground.energy().abs() < 1.0e-3);
        assert!((ground.level.j - 0.5).abs() < 1.0e-12);

        let odd = &model.levels[1];
        assert_eq!(odd.level.term, "2P");
        assert_eq!(odd.level.parity, Parity::Odd);
        assert!((odd.energy() - 10_000.0).abs() < 1.0e-3);
        assert!((odd.level.j - 2.5).abs() < 1.0e-12);
    }

    #[test]
    fn rbb_lines_build_transitions_in_file_order() {
        let filter = LevelFilter::default();
        let model = TmadReader::new(&filter).read(&sample_source());

        assert_eq!(model.transitions.len(), 2);
        let first = &model.transitions[0];
        assert_eq!((first.lower, first.upper), (0, 1));
        assert!((first.wavelength - 10_000.0).abs() < 1.0e-3);
        assert!((first.gf - 0.5).abs() < 1.0e-9);
        let expected_g_a = 0.5 / 1.499_19e-16 / 1.0e8;
        assert!((first.g_a / expected_g_a - 1.0).abs() < 1.0e-6);

        let second = &model.transitions[1];
        assert_eq!((second.lower, second.upper), (1, 2));
        assert!((second.gf - 6.0 * 0.5).abs() < 1.0e-9);
        assert_eq!(model.swapped_transitions, 1);

        assert_eq!(model.diagnostics.count(SkipKind::Transition), 1);
    }

    #[test]
    fn filtered_levels_drop_their_transitions() {
        let filter = LevelFilter {
            max_energy: 20_000.0,
            ..LevelFilter::default()
        };
        let model = TmadReader::new(&filter).read(&sample_source());

        assert_eq!(model.levels.len(), 2);
        assert_eq!(model.filtered_levels, 1);
        assert_eq!(model.transitions.len(), 1);
        assert_eq!(model.diagnostics.count(SkipKind::Transition), 2);
    }

    #[test]
    fn single_letter_symbols_widen_the_element_code() {
        let source = [
            "ATOM".to_string(),
            "O 4".to_string(),
            "L".to_string(),
            level_line("O5 2S1  1S", 0.0, 1.0),
            level_line("O510P1 1PO", 0.0, 3.0),
            "0".to_string(),
        ]
        .join("\n");

        let filter = LevelFilter::default();
        let model = TmadReader::new(&filter).read(&source);
        assert_eq!(model.levels.len(), 2);
        assert_eq!(model.levels[0].level.configuration, "2s1");
        assert_eq!(model.levels[1].level.configuration, "10p1");
        assert_eq!(model.levels[1].n, 10);
    }

    #[test]
    fn malformed_terms_are_reported() {
        let source = [
            "ATOM".to_string(),
            "C 3".to_string(),
            "L".to_string(),
            level_line("C4 2S  2S", 100_000.0 * C, 2.0),
            level_line("C4 2J  2J", 90_000.0 * C, 2.0),
            level_line("C4 2S  0S", 90_000.0 * C, 2.0),
            level_line("C4 2S  2", 90_000.0 * C, 2.0),
            "0".to_string(),
        ]
        .join("\n");

        let filter = LevelFilter::default();
        let model = TmadReader::new(&filter).read(&source);
        assert_eq!(model.levels.len(), 1);
        assert_eq!(model.diagnostics.count(SkipKind::Level), 3);
        assert_eq!(
            model.diagnostics.skipped()[2].reason,
            "error with level parity"
        );
    }
}
