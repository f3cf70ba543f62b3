use crate::domain::{ConvertError, ConvertResult, Transition};
use crate::modules::report::{Diagnostics, SkipKind};
use crate::parser::{parse_leading_f64, parse_leading_i32, source_lines};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AdamantLevel {
    pub id: i32,
    pub energy: f64,
    pub j: f64,
    /// Parity marker exactly as written in the level file.
    pub parity: String,
    pub configuration: String,
}

/// Reads `id energy J parity config [config]` rows; with six tokens the
/// last one is the configuration.
pub(crate) fn parse_levels(source: &str, diagnostics: &mut Diagnostics) -> Vec<AdamantLevel> {
    let mut levels = Vec::new();

    for line in source_lines(source) {
        if line.is_blank() {
            continue;
        }
        let tokens = line.tokens();
        let (Some(id), Some(energy), Some(j), Some(parity)) = (
            tokens.first().and_then(|token| parse_leading_i32(token)),
            tokens.get(1).and_then(|token| parse_leading_f64(token)),
            tokens.get(2).and_then(|token| parse_leading_f64(token)),
            tokens.get(3),
        ) else {
            diagnostics.skip(SkipKind::Level, &line, "malformed level row");
            continue;
        };

        let configuration = tokens
            .get(5)
            .or_else(|| tokens.get(4))
            .copied()
            .unwrap_or_default();

        levels.push(AdamantLevel {
            id,
            energy,
            j,
            parity: parity.to_string(),
            configuration: configuration.to_string(),
        });
    }

    levels
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AdamantLines {
    pub transitions: Vec<Transition>,
    pub swapped: usize,
}

/// Resolves line rows against `levels`. A row must name two distinct known
/// levels, otherwise the run aborts.
pub(crate) fn parse_lines(
    source: &str,
    levels: &[AdamantLevel],
    diagnostics: &mut Diagnostics,
) -> ConvertResult<AdamantLines> {
    let mut parsed = AdamantLines {
        transitions: Vec::new(),
        swapped: 0,
    };
    let find = |id: i32| levels.iter().position(|level| level.id == id);

    for line in source_lines(source) {
        if line.is_blank() {
            continue;
        }
        let tokens = line.tokens();
        let integer = |index: usize| tokens.get(index).and_then(|token| parse_leading_i32(token));
        let number = |index: usize| tokens.get(index).and_then(|token| parse_leading_f64(token));

        let (Some(lower_id), Some(upper_id), Some(wavelength), Some(rate), Some(gf)) =
            (integer(0), integer(2), number(5), number(6), number(7))
        else {
            diagnostics.skip(SkipKind::Transition, &line, "malformed line row");
            continue;
        };

        let upper = find(upper_id).filter(|_| upper_id != lower_id);
        let (Some(lower), Some(upper)) = (find(lower_id), upper) else {
            return Err(ConvertError::input_validation(
                "INPUT.ADAMANT_UNRESOLVED_LEVEL",
                format!(
                    "couldn't find corresponding levels to line {}: {}",
                    line.number, line.raw
                ),
            ));
        };

        let (first, second) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let resolved =
            Transition::between(|index| levels[index].energy, first, second, wavelength, gf, 0.0);
        let mut transition = resolved.transition;
        transition.g_a = rate * (2.0 * levels[transition.upper].j + 1.0);

        if resolved.swapped {
            warn!(
                "line {}: upper level lies below lower level, endpoints swapped",
                line.number
            );
            parsed.swapped += 1;
        }
        parsed.transitions.push(transition);
    }

    Ok(parsed)
}
