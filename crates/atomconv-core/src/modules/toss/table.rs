use crate::modules::serialization::{format_fixed_f64, format_scientific_f64};

pub const TABLE_BANNER: &str =
    "  Wavelength         Lower Level         Upper Level   log gf        gA";
pub const CF_COLUMN_HEADER: &str = "       CF";
/// Placeholder configuration-fraction column appended to NIST rows.
pub const CF_PLACEHOLDER: &str = "    0.000";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableEndpoint<'a> {
    pub energy: f64,
    pub parity: &'a str,
    pub j: f64,
}

/// One transition row in TOSS input layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow<'a> {
    pub wavelength: f64,
    pub lower: TableEndpoint<'a>,
    pub upper: TableEndpoint<'a>,
    pub log_gf: f64,
    pub g_a: f64,
}

impl TableRow<'_> {
    pub fn render(&self) -> String {
        format!(
            "{} {} ({}) {} {} ({}) {}  {} {}",
            format_fixed_f64(self.wavelength, 12, 3),
            format_fixed_f64(self.lower.energy, 10, 1),
            self.lower.parity,
            format_fixed_f64(self.lower.j, 4, 1),
            format_fixed_f64(self.upper.energy, 10, 1),
            self.upper.parity,
            format_fixed_f64(self.upper.j, 4, 1),
            format_fixed_f64(self.log_gf, 7, 3),
            format_scientific_f64(self.g_a, 5, 3)
        )
    }
}

/// Blank line, banner, blank line, then one line per row.
pub fn render_table<'a>(rows: impl IntoIterator<Item = TableRow<'a>>, with_cf: bool) -> String {
    let mut table = String::from("\n");
    table.push_str(TABLE_BANNER);
    if with_cf {
        table.push_str(CF_COLUMN_HEADER);
    }
    table.push_str("\n\n");

    for row in rows {
        table.push_str(&row.render());
        if with_cf {
            table.push_str(CF_PLACEHOLDER);
        }
        table.push('\n');
    }
    table
}

#[cfg(test)]
mod tests {
    use super::{TableEndpoint, TableRow, render_table};
    use crate::modules::toss::TossRow;

    fn row() -> TableRow<'static> {
        TableRow {
            wavelength: 5000.0,
            lower: TableEndpoint {
                energy: 0.0,
                parity: "e",
                j: 0.5,
            },
            upper: TableEndpoint {
                energy: 1000.0,
                parity: "o",
                j: 1.5,
            },
            log_gf: -1.0,
            g_a: 4.0e7,
        }
    }

    #[test]
    fn rows_use_fixed_columns() {
        assert_eq!(
            row().render(),
            "    5000.000        0.0 (e)  0.5     1000.0 (o)  1.5   -1.000 4.000e+07"
        );
    }

    #[test]
    fn cf_tables_extend_banner_and_rows() {
        let table = render_table([row()], true);
        assert_eq!(
            table,
            "\n  Wavelength         Lower Level         Upper Level   log gf        gA       CF\n\n    5000.000        0.0 (e)  0.5     1000.0 (o)  1.5   -1.000 4.000e+07    0.000\n"
        );
    }

    #[test]
    fn rendered_rows_read_back_as_toss_rows() {
        let parsed = TossRow::parse(&row().render()).expect("row should parse");
        assert!((parsed.wavelength - 5000.0).abs() < 1.0e-9);
        assert!((parsed.upper_j - 1.5).abs() < 1.0e-12);
        assert!((parsed.g_a - 4.0e7).abs() < 1.0e-3);
    }
}
