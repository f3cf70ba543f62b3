//! Grotrian diagram engine shared by the TMAD and TOSS converters.
//!
//! Levels are grouped by multiplicity and placed in one column per
//! `(l, parity)` pair; [`GrotrianLayout`] computes the geometry and
//! [`draw`] serializes it as a WRPLOT multiplot script.

mod diagram;
mod layout;

pub use diagram::{GrotrianDiagram, axis_steps};
pub use layout::{GrotrianLayout, MultiplicityGroup};

use crate::domain::{Dialect, TermLevel, Transition};

/// Per-dialect rendering differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramStyle {
    pub title: &'static str,
    pub level_pen: u8,
    pub label_color: u8,
    pub label_size: &'static str,
    pub sort_connectors: bool,
}

impl DiagramStyle {
    pub const TMAD: Self = Self {
        title: "TMAD",
        level_pen: 1,
        label_color: 3,
        label_size: "0.10",
        sort_connectors: false,
    };

    pub const TOSS: Self = Self {
        title: "TOSS",
        level_pen: 2,
        label_color: 2,
        label_size: "0.17",
        sort_connectors: true,
    };

    pub fn for_dialect(dialect: Dialect) -> Option<Self> {
        match dialect {
            Dialect::Tmad => Some(Self::TMAD),
            Dialect::Toss => Some(Self::TOSS),
            _ => None,
        }
    }
}

/// Everything the diagram needs; transition endpoints index `levels`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrotrianInput {
    pub source_label: String,
    pub ionization_limit: f64,
    pub column_offset: f64,
    pub levels: Vec<TermLevel>,
    pub transitions: Vec<Transition>,
}

/// Lays out and renders the diagram; `None` when there are no levels.
pub fn draw(input: &GrotrianInput, style: &DiagramStyle) -> Option<GrotrianDiagram> {
    let layout = GrotrianLayout::compute(&input.levels)?;
    Some(diagram::render(input, &layout, style))
}
