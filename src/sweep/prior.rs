/// Prior-knowledge amounts: how many relevant and irrelevant records the
/// simulation labels up front.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::errors::SweepError;

/// A parsed `INCLUDED,EXCLUDED` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Prior {
    /// Number of prelabelled relevant records.
    pub included: u32,
    /// Number of prelabelled irrelevant records.
    pub excluded: u32,
}

impl Prior {
    #[must_use]
    pub const fn new(included: u32, excluded: u32) -> Self {
        Self { included, excluded }
    }
}

/// Priors used when neither the CLI nor a preset gives any.
pub const DEFAULT_PRIORS: &[Prior] = &[Prior::new(1, 1), Prior::new(5, 5), Prior::new(5, 10)];

impl FromStr for Prior {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| SweepError::InvalidPrior {
            value: s.to_owned(),
            reason,
        };

        let (inc, exc) = s.split_once(',').ok_or_else(|| invalid("missing comma"))?;
        if exc.contains(',') {
            return Err(invalid("too many fields"));
        }
        let included =
            parse_count(inc).ok_or_else(|| invalid("included count is not a non-negative integer"))?;
        let excluded =
            parse_count(exc).ok_or_else(|| invalid("excluded count is not a non-negative integer"))?;

        Ok(Self { included, excluded })
    }
}

/// Plain decimal digits only; `u32::from_str` would also take a leading `+`.
fn parse_count(field: &str) -> Option<u32> {
    let digits = field.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl TryFrom<String> for Prior {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.included, self.excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!("5,10".parse::<Prior>().unwrap(), Prior::new(5, 10));
        assert_eq!("0,0".parse::<Prior>().unwrap(), Prior::new(0, 0));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(" 1 , 2 ".parse::<Prior>().unwrap(), Prior::new(1, 2));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "5",
            "5;5",
            "5,",
            ",5",
            "a,b",
            "-1,2",
            "1,2,3",
            "1.5,2",
            "+5,5",
            "5,+5",
            "5,99999999999",
        ] {
            assert!(bad.parse::<Prior>().is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn test_error_names_reason() {
        let err = "1,2,3".parse::<Prior>().unwrap_err();
        assert!(err.to_string().contains("too many fields"));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(" 5 ,10".parse::<Prior>().unwrap().to_string(), "5,10");
    }
}
