//! Parsing of numeric form input.
//!
//! Empty, non-numeric or non-finite text is an [`Error::InvalidNumber`]; a
//! number outside the field's [`Domain`] is an [`Error::OutOfRange`].

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
	/// `[0, 1]`
	Probability,
	/// `>= 0`
	NonNegative,
	/// `> 0`
	Positive,
}

impl Domain {
	pub fn admits(self, value: f64) -> bool {
		match self {
			Domain::Probability => (0.0..=1.0).contains(&value),
			Domain::NonNegative => value >= 0.0,
			Domain::Positive => value > 0.0,
		}
	}
}

pub fn parse_finite(raw: &str) -> Option<f64> {
	raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_in(field: &'static str, raw: &str, domain: Domain) -> Result<f64> {
	let value = parse_finite(raw).ok_or_else(|| Error::InvalidNumber {
		field,
		input: raw.to_string(),
	})?;
	if !domain.admits(value) {
		return Err(Error::OutOfRange { field, value });
	}
	Ok(value)
}

/// Largest float below which every whole number is exact (2^53).
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Whole number of at least `min`.
///
/// Plain digits are parsed as integers. Other spellings such as `1e4` go
/// through `f64` and must stay within the range it represents exactly.
pub fn parse_count(field: &'static str, raw: &str, min: u64) -> Result<u64> {
	let count = match raw.trim().parse::<u64>() {
		Ok(count) => count,
		Err(_) => {
			let value = parse_in(field, raw, Domain::NonNegative)?;
			if value.fract() != 0.0 || value > EXACT_INTEGER_LIMIT {
				return Err(Error::OutOfRange { field, value });
			}
			value as u64
		}
	};
	if count < min {
		return Err(Error::OutOfRange {
			field,
			value: count as f64,
		});
	}
	Ok(count)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn domains() {
		assert!(Domain::Probability.admits(0.0) && Domain::Probability.admits(1.0));
		assert!(!Domain::Probability.admits(1.01));
		assert!(Domain::NonNegative.admits(0.0));
		assert!(!Domain::Positive.admits(0.0));
	}

	#[test]
	fn counts() {
		assert_eq!(parse_count("n", "0", 0).unwrap(), 0);
		assert!(parse_count("n", "0", 1).is_err());
		assert!(parse_count("n", "2.5", 0).is_err());
		assert!(matches!(parse_count("n", "", 0), Err(Error::InvalidNumber { .. })));
		assert!(parse_count("n", "-3", 0).is_err());
	}

	#[test]
	fn large_counts_are_exact_or_rejected() {
		assert_eq!(parse_count("n", "9007199254740993", 1).unwrap(), 9_007_199_254_740_993);
		assert_eq!(parse_count("n", "18446744073709551615", 1).unwrap(), u64::MAX);
		assert!(matches!(
			parse_count("n", "18446744073709551616", 1),
			Err(Error::OutOfRange { .. })
		));
		assert!(parse_count("n", "1e19", 1).is_err());
		assert_eq!(parse_count("n", "1e4", 1).unwrap(), 10_000);
	}
}
