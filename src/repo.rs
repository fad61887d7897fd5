use crate::util::ser_display_deser_fromstr;
use std::{fmt::Display, str::FromStr};

/// The repository a listing is fetched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoIdentity {
	owner: Box<str>,
	name: Box<str>,
}
ser_display_deser_fromstr!(RepoIdentity);

impl RepoIdentity {
	/// Creates a new repository identity. Both parts must be non-empty
	pub fn new<O: AsRef<str>, N: AsRef<str>>(
		owner: O,
		name: N,
	) -> Result<Self, errors::RepoIdentityError> {
		let owner = owner.as_ref().trim();
		let name = name.as_ref().trim();

		if owner.is_empty() {
			return Err(errors::RepoIdentityError::MissingOwner);
		}
		if name.is_empty() {
			return Err(errors::RepoIdentityError::MissingName);
		}

		Ok(Self {
			owner: owner.into(),
			name: name.into(),
		})
	}

	/// The user or organization owning the repository
	#[must_use]
	pub fn owner(&self) -> &str {
		&self.owner
	}

	/// The name of the repository
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl FromStr for RepoIdentity {
	type Err = errors::RepoIdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (owner, name) = s
			.split_once('/')
			.ok_or_else(|| Self::Err::InvalidFormat(s.to_string()))?;

		if name.contains('/') {
			return Err(Self::Err::InvalidFormat(s.to_string()));
		}

		Self::new(owner, name)
	}
}

impl Display for RepoIdentity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// Errors that can occur when working with repository identities
pub mod errors {
	use thiserror::Error;

	/// Errors that can occur when creating a repository identity
	#[derive(Debug, Error, PartialEq, Eq)]
	#[non_exhaustive]
	pub enum RepoIdentityError {
		/// The owner is missing
		#[error("repository owner is required")]
		MissingOwner,

		/// The name is missing
		#[error("repository name is required")]
		MissingName,

		/// The string is not in the `owner/name` format
		#[error("`{0}` is not in the owner/name format")]
		InvalidFormat(String),
	}
}
