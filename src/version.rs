use crate::util::ser_display_deser_fromstr;
use regex::Regex;
use std::{fmt::Display, str::FromStr};

/// The pattern used when none is configured. Strips an optional leading `v`
pub const DEFAULT_VERSION_PATTERN: &str = r"^v?(.*)$";

/// A pattern deriving a version from a tag or release name
///
/// The pattern must have exactly one capture group. Whatever that group captures is the
/// version.
#[derive(Debug, Clone)]
pub struct VersionPattern(Regex);
ser_display_deser_fromstr!(VersionPattern);

impl VersionPattern {
	/// Compiles a version pattern, checking it has exactly one capture group
	pub fn new(pattern: &str) -> Result<Self, errors::VersionPatternError> {
		let regex = Regex::new(pattern)?;

		// group 0 is the whole match
		let groups = regex.captures_len() - 1;
		if groups != 1 {
			return Err(errors::VersionPatternError::CaptureGroups {
				pattern: pattern.to_string(),
				groups,
			});
		}

		Ok(Self(regex))
	}

	/// Extracts a version from `raw_name`
	///
	/// Returns `None` if the pattern does not match, or if the capture group did not take part
	/// in the match. A group that matched the empty string gives `Some("")`.
	#[must_use]
	pub fn extract(&self, raw_name: &str) -> Option<String> {
		self.0
			.captures(raw_name)
			.and_then(|captures| captures.get(1))
			.map(|m| m.as_str().to_string())
	}

	/// The source text of the pattern
	#[must_use]
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}

impl Default for VersionPattern {
	fn default() -> Self {
		Self(Regex::new(DEFAULT_VERSION_PATTERN).expect("default version pattern is valid"))
	}
}

impl PartialEq for VersionPattern {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Eq for VersionPattern {}

impl FromStr for VersionPattern {
	type Err = errors::VersionPatternError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl Display for VersionPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Errors that can occur when working with version patterns
pub mod errors {
	use thiserror::Error;

	/// Errors that can occur when compiling a version pattern
	#[derive(Debug, Error)]
	#[non_exhaustive]
	pub enum VersionPatternError {
		/// The pattern is not a valid regular expression
		#[error("invalid version pattern")]
		Regex(#[from] regex::Error),

		/// The pattern does not have exactly one capture group
		#[error("version pattern `{pattern}` must have exactly one capture group, found {groups}")]
		CaptureGroups {
			/// The offending pattern
			pattern: String,
			/// The number of capture groups found
			groups: usize,
		},
	}
}
