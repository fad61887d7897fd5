#![deny(missing_docs)]
//! Release discovery for source distributions hosted on a code forge.
//!
//! relfetch queries a forge's release (or tag) listing, and turns the JSON it gets back into a
//! flat list of [`Candidate`]s: one for each release archive, plus one for every asset the
//! configured [`AssetPolicy`] lets through. Versions are derived from tag names with a
//! user-supplied [`VersionPattern`].
//!
//! The network transport, archive extraction, and generic version ranking are left to the host.
//! The host plugs its transport in through [`fetch::Transport`] (or uses
//! [`fetch::ReqwestTransport`]) and composes [`GitHubSource::maybe_normalize`] into its own
//! fetch pipeline.

use std::collections::HashMap;

/// Asset inclusion policies
pub mod assets;
/// Download candidates
pub mod candidate;
/// Configuration files
pub mod config;
/// Fetch results and transports
pub mod fetch;
/// Ranking policies
pub mod prefer;
/// Repository identities
pub mod repo;
/// Listing sources
pub mod source;
pub(crate) mod util;
/// Version extraction
pub mod version;

pub use assets::AssetPolicy;
pub use candidate::Candidate;
pub use config::{errors::ConfigurationError, ReleaseConfig};
pub use fetch::FetchResult;
pub use prefer::Prefer;
pub use repo::RepoIdentity;
pub use source::{errors::MalformedResponse, EndpointKind, GitHubSource, SourceOptions};
pub use version::VersionPattern;

/// The API base used when none is configured
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Struct containing the authentication configuration
///
/// Tokens are keyed by host name, so a single configuration can serve both the public forge
/// and a self-hosted instance.
#[derive(Debug, Default, Clone)]
pub struct AuthConfig {
	tokens: HashMap<String, String>,
}

impl AuthConfig {
	/// Create a new `AuthConfig`
	pub fn new() -> Self {
		AuthConfig::default()
	}

	/// Set the tokens
	pub fn with_tokens<I: IntoIterator<Item = (H, S)>, H: AsRef<str>, S: AsRef<str>>(
		mut self,
		tokens: I,
	) -> Self {
		self.tokens = tokens
			.into_iter()
			.map(|(host, s)| (host.as_ref().to_ascii_lowercase(), s.as_ref().to_string()))
			.collect();
		self
	}

	/// Get the tokens
	pub fn tokens(&self) -> &HashMap<String, String> {
		&self.tokens
	}

	/// Get the token for the host of the given URL, if any
	pub fn token_for(&self, url: &url::Url) -> Option<&str> {
		let host = url.host_str()?.to_ascii_lowercase();
		self.tokens.get(&host).map(String::as_str)
	}
}
