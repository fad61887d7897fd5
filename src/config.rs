use crate::{
	assets::AssetPolicy,
	repo::RepoIdentity,
	source::{GitHubSource, SourceOptions},
	version::VersionPattern,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;
use url::Url;

/// A listing source as written in a configuration file
///
/// ```toml
/// owner = "libarchive"
/// repo = "libarchive"
/// include_assets = '\.tar\.xz$'
/// version = '^v(\d+\.\d+\.\d+)$'
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
	/// The owner of the repository
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	/// The name of the repository
	#[serde(skip_serializing_if = "Option::is_none")]
	pub repo: Option<String>,

	/// `true` for all assets, `false` for none, or a pattern assets' names must match
	pub include_assets: AssetPolicy,
	/// Query tags instead of releases
	pub tags_only: bool,
	/// The version pattern. Must have exactly one capture group
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Leave ordering to the host's ranking stage instead of keeping upstream order
	pub prefer: bool,

	/// The API base URL
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_base: Option<Url>,
	/// The page size to ask the forge for
	#[serde(skip_serializing_if = "Option::is_none")]
	pub per_page: Option<u8>,
	/// A start URL set by the host
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_url: Option<Url>,
}

impl ReleaseConfig {
	/// Parses a configuration from TOML
	pub fn from_toml_str(s: &str) -> Result<Self, errors::ConfigurationError> {
		Ok(toml::from_str(s)?)
	}

	/// Reads a configuration file
	#[instrument(level = "trace")]
	pub fn load(path: &Path) -> Result<Self, errors::ConfigurationError> {
		let contents = fs_err::read_to_string(path)?;
		Self::from_toml_str(&contents)
	}

	/// Validates the configuration and builds the source it describes
	pub fn into_source(self) -> Result<GitHubSource, errors::ConfigurationError> {
		let repo = RepoIdentity::new(
			self.owner.unwrap_or_default(),
			self.repo.unwrap_or_default(),
		)?;

		let version = match self.version {
			Some(pattern) => VersionPattern::new(&pattern)?,
			None => VersionPattern::default(),
		};

		GitHubSource::new(
			repo,
			SourceOptions {
				include_assets: self.include_assets,
				tags_only: self.tags_only,
				version,
				prefer: self.prefer.into(),
				api_base: self.api_base,
				per_page: self.per_page,
				start_url: self.start_url,
			},
		)
	}
}

/// Errors that can occur when working with configuration
pub mod errors {
	use thiserror::Error;

	/// The configuration is invalid
	#[derive(Debug, Error)]
	#[non_exhaustive]
	pub enum ConfigurationError {
		/// The repository identity is missing or invalid
		#[error("invalid repository")]
		Repo(#[from] crate::repo::errors::RepoIdentityError),

		/// The version pattern is invalid
		#[error("invalid version pattern")]
		VersionPattern(#[from] crate::version::errors::VersionPatternError),

		/// The start URL set by the host conflicts with the listing endpoint
		#[error("start url {start_url} conflicts with listing endpoint {endpoint}")]
		StartUrlConflict {
			/// The start URL set by the host
			start_url: url::Url,
			/// The listing endpoint
			endpoint: url::Url,
		},

		/// The API base URL could not be joined into an endpoint URL
		#[error("invalid api base url")]
		ApiBase(#[from] url::ParseError),

		/// The API base URL carries a query or fragment, or cannot hold a path
		#[error("api base url {0} must be a plain base url without query or fragment")]
		UnsupportedApiBase(url::Url),

		/// The configuration file could not be parsed
		#[error("failed to parse configuration")]
		Parse(#[from] toml::de::Error),

		/// The configuration file could not be read
		#[error("failed to read configuration")]
		Read(#[from] std::io::Error),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{repo::errors::RepoIdentityError, EndpointKind};

	#[test]
	fn minimal_config_uses_defaults() {
		let config = ReleaseConfig::from_toml_str(
			r#"
			owner = "owner"
			repo = "repo"
			"#,
		)
		.unwrap();
		assert_eq!(config.include_assets, AssetPolicy::Disabled);
		assert!(!config.tags_only);
		assert!(!config.prefer);

		let source = config.into_source().unwrap();
		assert_eq!(source.kind(), EndpointKind::Releases);
		assert_eq!(source.repo().to_string(), "owner/repo");
		assert!(source.ranker().is_some());
	}

	#[test]
	fn full_config() {
		let config = ReleaseConfig::from_toml_str(
			r#"
			owner = "owner"
			repo = "repo"
			include_assets = '\.tar\.xz$'
			tags_only = true
			version = '^release-(.*)$'
			prefer = true
			api_base = "https://forge.example/api/v3"
			per_page = 50
			"#,
		)
		.unwrap();
		assert_eq!(
			config.include_assets,
			AssetPolicy::matching(r"\.tar\.xz$").unwrap()
		);

		let source = config.into_source().unwrap();
		assert_eq!(source.kind(), EndpointKind::Tags);
		assert!(source.ranker().is_none());
		assert_eq!(
			source.endpoint().as_str(),
			"https://forge.example/api/v3/repos/owner/repo/tags?per_page=50"
		);
	}

	#[test]
	fn missing_identity_is_a_configuration_error() {
		let err = ReleaseConfig::from_toml_str(r#"repo = "repo""#)
			.unwrap()
			.into_source()
			.unwrap_err();
		assert!(matches!(
			err,
			errors::ConfigurationError::Repo(RepoIdentityError::MissingOwner)
		));

		let err = ReleaseConfig::from_toml_str(r#"owner = "owner""#)
			.unwrap()
			.into_source()
			.unwrap_err();
		assert!(matches!(
			err,
			errors::ConfigurationError::Repo(RepoIdentityError::MissingName)
		));
	}

	#[test]
	fn invalid_values_are_rejected() {
		let err = ReleaseConfig {
			owner: Some("owner".into()),
			repo: Some("repo".into()),
			version: Some("^v.*$".into()),
			..Default::default()
		}
		.into_source()
		.unwrap_err();
		assert!(matches!(err, errors::ConfigurationError::VersionPattern(_)));

		let err = ReleaseConfig::from_toml_str(
			r#"
			owner = "owner"
			repo = "repo"
			api_base = "https://forge.example/api?x=1"
			"#,
		)
		.unwrap()
		.into_source()
		.unwrap_err();
		assert!(matches!(err, errors::ConfigurationError::UnsupportedApiBase(_)));

		assert!(matches!(
			ReleaseConfig::from_toml_str("unknown_option = 1"),
			Err(errors::ConfigurationError::Parse(_))
		));
	}

	#[test]
	fn loads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("release.toml");
		fs_err::write(&path, "owner = \"o\"\nrepo = \"r\"\ninclude_assets = true\n").unwrap();

		let config = ReleaseConfig::load(&path).unwrap();
		assert_eq!(config.include_assets, AssetPolicy::IncludeAll);

		assert!(matches!(
			ReleaseConfig::load(&dir.path().join("missing.toml")),
			Err(errors::ConfigurationError::Read(_))
		));
	}
}
