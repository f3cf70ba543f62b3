//! Field extraction shared by the dialect readers.
//!
//! The legacy tables mix whitespace-delimited tokens with fixed character
//! offsets, and numeric fields are read with prefix semantics: `1234.5+`
//! yields `1234.5` and the trailing marker is ignored.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub raw: &'a str,
}

impl<'a> SourceLine<'a> {
    pub fn tokens(&self) -> Vec<&'a str> {
        self.raw.split_whitespace().collect()
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Numbers every line from 1 and strips a trailing carriage return.
pub fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source.lines().enumerate().map(|(index, raw)| SourceLine {
        number: index + 1,
        raw: raw.strip_suffix('\r').unwrap_or(raw),
    })
}

/// Character-based substring that clamps out-of-range bounds to the line end.
pub fn fixed_field(line: &str, start: usize, len: usize) -> &str {
    let mut indices = line.char_indices().map(|(index, _)| index);
    let Some(begin) = indices.nth(start) else {
        return "";
    };
    let end = line[begin..]
        .char_indices()
        .nth(len)
        .map(|(offset, _)| begin + offset)
        .unwrap_or(line.len());
    &line[begin..end]
}

/// Everything from character `start` onwards.
pub fn field_from(line: &str, start: usize) -> &str {
    match line.char_indices().nth(start) {
        Some((begin, _)) => &line[begin..],
        None => "",
    }
}

/// Parses the longest numeric prefix of `token` after leading whitespace.
///
/// Accepts an optional sign, digits with an optional decimal point, and an
/// exponent introduced by `e`, `E`, `d` or `D`. At least one mantissa digit
/// is required.
pub fn parse_leading_f64(token: &str) -> Option<f64> {
    let trimmed = token.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    let mut literal = trimmed[..end].to_string();
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E' | b'd' | b'D') {
        let mut exponent_end = end + 1;
        if exponent_end < bytes.len() && matches!(bytes[exponent_end], b'+' | b'-') {
            exponent_end += 1;
        }
        let digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > digits_start {
            literal.push('e');
            literal.push_str(&trimmed[end + 1..exponent_end]);
        }
    }

    literal.parse::<f64>().ok()
}

/// Parses the leading integer of `token`, e.g. `2` from `2s2` or `10` from `10p`.
pub fn parse_leading_i32(token: &str) -> Option<i32> {
    let trimmed = token.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse::<i32>().ok()
}

/// Reads a total angular momentum that may be written as a fraction `a/b`.
pub fn parse_fraction(token: &str) -> Option<f64> {
    match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = parse_leading_f64(numerator)?;
            let denominator = parse_leading_f64(denominator)?;
            Some(numerator / denominator)
        }
        None => parse_leading_f64(token),
    }
}
