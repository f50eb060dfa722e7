use std::fmt;
use std::str::FromStr;
use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterKind {
    Summer,
    Winter,
}

impl SemesterKind {
    /// Numeric code used by the term select box.
    pub fn code(self) -> u8 {
        match self {
            SemesterKind::Summer => 1,
            SemesterKind::Winter => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SemesterKind::Summer => "Sommersemester",
            SemesterKind::Winter => "Wintersemester",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semester {
    pub kind: SemesterKind,
    pub year: u32,
}

impl Semester {
    /// Value of the term select field, e.g. `eq|2|2020`.
    pub fn fmt_select(&self) -> String {
        format!("eq|{}|{}", self.kind.code(), self.year)
    }

    /// Display text the browser mirrors into the term input field.
    pub fn fmt_select_input(&self) -> String {
        format!("{}+{}", self.kind.name(), self.year)
    }
}

impl FromStr for Semester {
    type Err = SearchError;

    /// Accepts `YYYY` followed by `s` or `w` in either case, e.g. `2020W`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SearchError::Input(format!("malformed semester argument: {}", s));

        if s.len() != 5 || !s.is_char_boundary(4) {
            return Err(malformed());
        }
        let (year_part, kind_part) = s.split_at(4);
        if !year_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let year: u32 = year_part.parse().map_err(|_| malformed())?;
        if year == 0 {
            return Err(malformed());
        }

        let kind = match kind_part.to_ascii_lowercase().as_str() {
            "s" => SemesterKind::Summer,
            "w" => SemesterKind::Winter,
            _ => return Err(malformed()),
        };

        Ok(Semester { kind, year })
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.year)
    }
}

/// What the user asked for. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub pattern: String,
    pub semester: Semester,
}

impl Query {
    pub fn new(pattern: impl Into<String>, semester: Semester) -> Self {
        Query { pattern: pattern.into(), semester }
    }

    pub fn parse(pattern: &str, semester: &str) -> Result<Self, SearchError> {
        Ok(Query::new(pattern, semester.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_kinds_in_any_case() {
        let cases = [
            ("2020W", SemesterKind::Winter, 2020),
            ("2020w", SemesterKind::Winter, 2020),
            ("1999S", SemesterKind::Summer, 1999),
            ("2031s", SemesterKind::Summer, 2031),
        ];
        for (input, kind, year) in cases {
            let sem: Semester = input.parse().unwrap();
            assert_eq!(sem, Semester { kind, year }, "input {}", input);
        }
    }

    #[test]
    fn rejects_other_forms() {
        for input in ["", "2020", "W2020", "20W", "2020X", "2020WS", "2020 W", "20a0W", "0000W", "２020W", "-020W"] {
            let err = input.parse::<Semester>().unwrap_err();
            assert!(matches!(err, SearchError::Input(_)), "input {:?}", input);
        }
    }

    #[test]
    fn wire_formats() {
        let sem: Semester = "2020W".parse().unwrap();
        assert_eq!(sem.fmt_select(), "eq|2|2020");
        assert_eq!(sem.fmt_select_input(), "Wintersemester+2020");

        let sem: Semester = "2021s".parse().unwrap();
        assert_eq!(sem.fmt_select(), "eq|1|2021");
        assert_eq!(sem.fmt_select_input(), "Sommersemester+2021");
        assert_eq!(sem.to_string(), "Sommersemester 2021");
    }

    #[test]
    fn query_keeps_pattern_verbatim() {
        let q = Query::parse("  Algorithmen *", "2020W").unwrap();
        assert_eq!(q.pattern, "  Algorithmen *");
        assert_eq!(q.semester.year, 2020);
    }
}
