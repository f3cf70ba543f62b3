use super::layout::GrotrianLayout;
use super::{DiagramStyle, GrotrianInput};
use crate::common::quantum::orbital_letter;
use crate::domain::{Transition, compare_by_wavelength};

const PLOT_PREAMBLE: [&str; 6] = [
    "\\OFS 2.0 2.0",
    "\\INBOX",
    "\\PEN 1",
    "\\FONT=HELVET",
    "\\LETTERSIZE=0.25",
    "\\NOCOPYRIGHT",
];
const AXIS_TABLE_HEADER: &str =
    "    MASSTAB       MINIMUM       MAXIMUM    TEILUNGEN     BESCHRIFT.    DARUNTER";
const XY_TABLE_LINE: &str = "N=  ?  PLOTSYMBOL 9 SYMBOLSIZE 0.1 PEN 1 XYTABLE SELECT 1 2 COLOR=1";

/// Rendered WRPLOT script plus the counts it reports in its comment lines.
#[derive(Debug, Clone, PartialEq)]
pub struct GrotrianDiagram {
    pub text: String,
    pub levels: usize,
    pub transitions: usize,
    pub top_labels: usize,
}

/// Tick and label spacing of the energy axis in the label plot, in 1000 cm^-1.
pub fn axis_steps(ionization_limit: f64) -> (u32, u32) {
    if ionization_limit < 1.0e6 {
        (10, 100)
    } else if ionization_limit < 8.0e6 {
        (50, 500)
    } else if ionization_limit < 16.0e6 {
        (100, 1000)
    } else {
        (200, 2000)
    }
}

pub(super) fn render(
    input: &GrotrianInput,
    layout: &GrotrianLayout,
    style: &DiagramStyle,
) -> GrotrianDiagram {
    let levels = &input.levels;
    let unit = layout.unit;
    let ionlimit = input.ionization_limit;
    let yoffset = ionlimit * 0.02;
    let column_shift = input.column_offset * unit;

    let mut out = vec![
        String::new(),
        "PAPERFORMAT A3Q".to_string(),
        "MULTIPLOT START".to_string(),
        format!(
            "** y min/max: {:.2}/{:.2}",
            levels[layout.lowest()].energy(),
            levels[layout.highest()].energy()
        ),
        format!("** y offset: {:.2}", yoffset),
        String::new(),
    ];

    let (tick_step, label_step) = axis_steps(ionlimit);
    out.push("PLOT: labels".to_string());
    out.extend(PLOT_PREAMBLE.iter().map(|line| line.to_string()));
    out.push(format!(
        "\\LUN 50.0 {:.2} -2.9 0.0 0.30 Grotrian diagram of {}",
        (ionlimit + 2.0 * yoffset) / 1000.0 * 1.03,
        input.source_label
    ));
    out.push("HEADER :\\CENTER\\".to_string());
    out.push("X-ACHSE:\\CENTER\\".to_string());
    out.push("Y-ACHSE:\\CENTER\\ energy / 1000 cm&H-1&M".to_string());
    out.push(AXIS_TABLE_HEADER.to_string());
    out.push(
        "X: 38.00CM              0.0         100.0         10.0          10            0.0 NOLAB NOTICK-BOTH"
            .to_string(),
    );
    out.push(format!(
        "Y: 25.70CM            {:.2}        {:.2}         {}           {}            0.0",
        -yoffset / 1000.0,
        (ionlimit + 2.0 * yoffset) / 1000.0,
        tick_step,
        label_step
    ));
    out.push(XY_TABLE_LINE.to_string());
    out.push("FINISH".to_string());
    out.push("END".to_string());
    out.push(String::new());

    out.push(format!(
        "PLOT: Grotrian Diagram of {} File: {}",
        style.title, input.source_label
    ));
    out.extend(PLOT_PREAMBLE.iter().map(|line| line.to_string()));
    out.push("HEADER :\\CENTER\\".to_string());
    out.push("X-ACHSE:\\CENTER\\".to_string());
    out.push("Y-ACHSE:\\CENTER\\".to_string());
    out.push(AXIS_TABLE_HEADER.to_string());
    out.push(
        "X: 38.00CM              0.0         100.0         10.0          10            0.0 NOTICK-BOTH"
            .to_string(),
    );
    out.push(format!(
        "Y: 25.70CM         {:.2}      {:.2}      10000        100000            0.0 NOTICK-BOTH",
        -yoffset,
        ionlimit + 2.0 * yoffset
    ));
    out.push(XY_TABLE_LINE.to_string());
    out.push(format!("0 {:.2}", ionlimit));
    out.push(format!("100 {:.2}", ionlimit));
    out.push("FINISH".to_string());
    out.push(format!("** ionization limit: {:.2}", ionlimit));
    out.push(String::new());

    let mut ticks = Vec::with_capacity(levels.len());
    let mut inside_labels = Vec::with_capacity(levels.len());
    let mut top_labels = Vec::with_capacity(layout.top_label_count());
    let mut separators = Vec::with_capacity(layout.groups.len() * 2);

    for group in &layout.groups {
        let before = group.first_slot as f64;
        let width = group.width() as f64;

        let separator_x = unit * (before + width + 1.0);
        if separator_x < 100.0 {
            separators.push(format!(
                "\\LINUN {:.1} YMIN {:.1} YMAX 0.0 0.0 SIZE=0.1 SYMBOL=9",
                separator_x, separator_x
            ));
        }
        separators.push(format!(
            "\\LUN {:.1} {:.1} -0.2 0.0 0.20 S={:.1}",
            unit * before + unit * width * 0.5 + unit * 0.5,
            ionlimit + yoffset * 0.4,
            (f64::from(group.multiplicity) - 1.0) * 0.5
        ));

        for (offset, column) in group.columns.iter().enumerate() {
            top_labels.push(format!(
                "\\LUN {:.2} YMAX 0.000 0.080 0.2 &H{}&M{}{}",
                unit * (before + offset as f64 + 0.9),
                group.multiplicity,
                orbital_letter(column.l),
                if column.parity.is_odd() { "&Ho&M" } else { "" }
            ));
        }

        for index in &group.members {
            let level = &levels[*index];
            let x = unit * (layout.slot(*index) as f64 + 1.0) + column_shift;
            ticks.push(format!(
                "\\LINUN {:.2} {:.2} {:.2} {:.2} 0.0 0.0",
                x - unit * 0.3,
                level.energy(),
                x,
                level.energy()
            ));
            inside_labels.push(format!(
                "\\LUN {:.3} {:.3} -0.0 -0.05 {} {}",
                x + unit * 0.1,
                level.energy(),
                style.label_size,
                level.level.configuration
            ));
        }
    }

    if input.transitions.is_empty() {
        out.push("** found no lines **".to_string());
    } else {
        let mut transitions: Vec<&Transition> = input.transitions.iter().collect();
        if style.sort_connectors {
            transitions.sort_by(|lhs, rhs| compare_by_wavelength(lhs, rhs));
        }

        out.push("** connecting lines: **".to_string());
        out.push("\\DEFINECOLOR 9 0.6 0.6 0.6".to_string());
        out.push("\\PEN=1".to_string());
        out.push("\\COLOR=9".to_string());
        for transition in &transitions {
            let lower = &levels[transition.lower];
            let upper = &levels[transition.upper];
            out.push(format!(
                "\\LINUN {:.2} {:.2} {:.2} {:.2} 0.0 0.0",
                unit * (layout.slot(transition.lower) as f64 + 0.85) + column_shift,
                lower.energy(),
                unit * (layout.slot(transition.upper) as f64 + 0.85) + column_shift,
                upper.energy()
            ));
        }
        out.push("\\COLOR=1".to_string());
        out.push(format!("** total # lines: {} ", transitions.len()));
        out.push("** end connecting lines **".to_string());
        out.push(String::new());
    }

    out.push("** start levels **".to_string());
    out.push(format!("\\PEN={}", style.level_pen));
    out.push("\\COLOR=1".to_string());
    out.extend(ticks);
    out.push(format!("** total # levels: {} ", levels.len()));
    out.push("** end levels **".to_string());
    out.push(String::new());

    out.push("** start inside labels **".to_string());
    out.push(format!("\\COLOR={}", style.label_color));
    out.extend(inside_labels);
    out.push("\\COLOR=1".to_string());
    out.push(format!("** total # inside labels: {} ", levels.len()));
    out.push("** end inside labels **".to_string());
    out.push(String::new());

    let top_label_count = top_labels.len();
    out.push("** start top labels **".to_string());
    out.push("\\PEN=5".to_string());
    out.push("\\COLOR=1".to_string());
    out.extend(top_labels);
    out.push("\\PEN=1".to_string());
    out.push(format!("** total # top labels: {} ", top_label_count));
    out.push("** end top labels **".to_string());
    out.push(String::new());

    out.push("** start separators ** ".to_string());
    out.extend(separators);
    out.push("** end separators ** ".to_string());
    out.push(String::new());

    out.push("END".to_string());
    out.push("MULTIPLOT END".to_string());
    out.push(String::new());

    let mut text = out.join("\n");
    text.push('\n');

    GrotrianDiagram {
        text,
        levels: levels.len(),
        transitions: input.transitions.len(),
        top_labels: top_label_count,
    }
}
