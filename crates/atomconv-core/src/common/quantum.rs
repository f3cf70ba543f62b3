//! Orbital angular momentum letters of spectroscopic notation.
//!
//! The sequence runs S, P, D, F, G, H, I and then continues alphabetically,
//! leaving out J as well as the letters already used for S and P.

use tracing::warn;

pub const MAX_ORBITAL_CODE: u8 = 20;

const ORBITAL_LETTERS: [&str; MAX_ORBITAL_CODE as usize + 1] = [
    "S", "P", "D", "F", "G", "H", "I", "K", "L", "M", "N", "O", "Q", "R", "T", "U", "V", "W", "X",
    "Y", "Z",
];

/// Placeholder emitted for codes outside `0..=20`.
pub const UNKNOWN_ORBITAL_LETTER: &str = "?";

/// Decodes a case-insensitive orbital letter into its `l` code.
///
/// Returns `None` for letters outside the sequence, including `J`.
pub fn orbital_code(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    ORBITAL_LETTERS
        .iter()
        .position(|candidate| candidate.starts_with(upper))
        .map(|index| index as u8)
}

/// Encodes an `l` code as its upper-case letter, or `?` when out of range.
pub fn orbital_letter(l: u8) -> &'static str {
    match ORBITAL_LETTERS.get(usize::from(l)) {
        Some(letter) => letter,
        None => {
            warn!(l, "problem converting l");
            UNKNOWN_ORBITAL_LETTER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_ORBITAL_CODE, UNKNOWN_ORBITAL_LETTER, orbital_code, orbital_letter};

    const SEQUENCE: &str = "SPDFGHIKLMNOQRTUVWXYZ";

    #[test]
    fn letters_decode_to_consecutive_codes() {
        let codes: Vec<u8> = SEQUENCE
            .chars()
            .map(|letter| orbital_code(letter).expect("letter should decode"))
            .collect();
        let expected: Vec<u8> = (0..=MAX_ORBITAL_CODE).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn decode_is_case_insensitive_and_encode_is_canonical() {
        for letter in SEQUENCE.chars() {
            let lower = letter.to_ascii_lowercase();
            let code = orbital_code(lower).expect("lower-case letter should decode");
            assert_eq!(orbital_code(letter), Some(code));
            assert_eq!(orbital_letter(code), letter.to_string());
        }
    }

    #[test]
    fn d_decodes_to_two_and_j_is_rejected() {
        assert_eq!(orbital_code('d'), Some(2));
        assert_eq!(orbital_code('D'), Some(2));
        assert_eq!(orbital_code('j'), None);
        assert_eq!(orbital_code('J'), None);
        assert_eq!(orbital_code('E'), None);
        assert_eq!(orbital_code('3'), None);
    }

    #[test]
    fn out_of_range_codes_encode_as_placeholder() {
        assert_eq!(orbital_letter(MAX_ORBITAL_CODE + 1), UNKNOWN_ORBITAL_LETTER);
        assert_eq!(orbital_letter(u8::MAX), UNKNOWN_ORBITAL_LETTER);
    }
}
