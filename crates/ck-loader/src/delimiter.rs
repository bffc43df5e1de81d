//! Field delimiter detection.

use crate::fields::split_fields;

/// Lines inspected by [`Delimiter::detect`].
pub const DETECT_LINES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
    Space,
}

impl Delimiter {
    /// Candidates in tie-break order.
    pub const ALL: [Delimiter; 5] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Semicolon,
        Delimiter::Pipe,
        Delimiter::Space,
    ];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
            Delimiter::Space => ' ',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }

    /// Pick the delimiter that splits the most of the first
    /// [`DETECT_LINES`] non-blank, non-comment lines into more than one field.
    pub fn detect<'a>(lines: impl IntoIterator<Item = &'a str>) -> Delimiter {
        let sample: Vec<&str> = lines
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('!') && !l.starts_with('#'))
            .take(DETECT_LINES)
            .collect();

        let mut best = Delimiter::Comma;
        let mut best_score = 0;
        for candidate in Self::ALL {
            let score = sample
                .iter()
                .filter(|l| split_fields(l, candidate).len() > 1)
                .count();
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_delimiters() {
        assert_eq!(Delimiter::detect(["1,2", "3,4"]), Delimiter::Comma);
        assert_eq!(Delimiter::detect(["1\t2", "3\t4"]), Delimiter::Tab);
        assert_eq!(Delimiter::detect(["1;2", "3;4"]), Delimiter::Semicolon);
        assert_eq!(Delimiter::detect(["1|2", "3|4"]), Delimiter::Pipe);
        assert_eq!(Delimiter::detect(["1  2", "3 4"]), Delimiter::Space);
    }

    #[test]
    fn ties_prefer_earlier_candidates() {
        // Both comma and space split every line.
        assert_eq!(Delimiter::detect(["1, 2", "3, 4"]), Delimiter::Comma);
        assert_eq!(Delimiter::detect(Vec::<&str>::new()), Delimiter::Comma);
    }

    #[test]
    fn only_first_ten_non_blank_lines_count() {
        let mut lines = vec![""; 5];
        lines.extend(std::iter::repeat_n("1;2", 10));
        lines.extend(std::iter::repeat_n("1,2", 20));
        assert_eq!(Delimiter::detect(lines), Delimiter::Semicolon);
    }

    #[test]
    fn comment_lines_do_not_vote() {
        let lines = ["! written by a b c", "! more words here", "1\t2", "3\t4"];
        assert_eq!(Delimiter::detect(lines), Delimiter::Tab);
    }

    #[test]
    fn quoted_commas_do_not_vote() {
        let lines = [r#""a,b,c";"d""#, "1;2", r#""x,y";3"#];
        assert_eq!(Delimiter::detect(lines), Delimiter::Semicolon);
    }
}
