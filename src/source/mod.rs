use crate::{
	assets::AssetPolicy,
	candidate::Candidate,
	config::errors::ConfigurationError,
	fetch::{FetchResult, FetchedFile, Transport},
	prefer::{Prefer, Ranker},
	repo::RepoIdentity,
	version::VersionPattern,
	DEFAULT_API_BASE,
};
use std::fmt::Display;
use tracing::instrument;
use url::Url;

/// Raw listing entries
pub mod entry;
/// Turning listings into candidates
pub mod normalize;

/// The listing endpoint queried for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum EndpointKind {
	/// Releases, which may carry assets
	#[default]
	Releases,
	/// Plain tags
	Tags,
}

impl EndpointKind {
	/// The name of the endpoint, which is also the last segment of its URL
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			EndpointKind::Releases => "releases",
			EndpointKind::Tags => "tags",
		}
	}
}

impl Display for EndpointKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Options for a [`GitHubSource`]
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
	/// Which assets to surface as candidates
	pub include_assets: AssetPolicy,
	/// Query tags instead of releases
	pub tags_only: bool,
	/// The pattern deriving versions from release or tag names
	pub version: VersionPattern,
	/// How candidates should be ordered
	pub prefer: Prefer,
	/// The API base URL. Defaults to [`DEFAULT_API_BASE`]
	pub api_base: Option<Url>,
	/// The page size to ask the forge for
	pub per_page: Option<u8>,
	/// A start URL set by the host. It must match the listing endpoint if set
	pub start_url: Option<Url>,
}

/// A release listing source for a single repository
///
/// The source knows which endpoint to query, and intercepts the transport's response for that
/// endpoint to turn it into candidates. Everything else the transport fetches passes through.
#[derive(Debug, Clone)]
pub struct GitHubSource {
	repo: RepoIdentity,
	kind: EndpointKind,
	version: VersionPattern,
	include_assets: AssetPolicy,
	prefer: Prefer,
	endpoint: Url,
}

impl GitHubSource {
	/// Creates a new source, validating the options
	pub fn new(repo: RepoIdentity, options: SourceOptions) -> Result<Self, ConfigurationError> {
		let SourceOptions {
			include_assets,
			tags_only,
			version,
			prefer,
			api_base,
			per_page,
			start_url,
		} = options;

		let kind = if tags_only {
			EndpointKind::Tags
		} else {
			EndpointKind::Releases
		};

		let api_base = match api_base {
			Some(api_base) => api_base,
			None => DEFAULT_API_BASE.parse()?,
		};
		if api_base.cannot_be_a_base() || api_base.query().is_some() || api_base.fragment().is_some()
		{
			return Err(ConfigurationError::UnsupportedApiBase(api_base));
		}
		let endpoint = endpoint_url(&api_base, &repo, kind, per_page)?;

		if let Some(start_url) = start_url {
			if start_url != endpoint {
				return Err(ConfigurationError::StartUrlConflict {
					start_url,
					endpoint,
				});
			}
		}

		Ok(Self {
			repo,
			kind,
			version,
			include_assets,
			prefer,
			endpoint,
		})
	}

	/// The repository of this source
	#[must_use]
	pub fn repo(&self) -> &RepoIdentity {
		&self.repo
	}

	/// The endpoint kind in effect
	#[must_use]
	pub fn kind(&self) -> EndpointKind {
		self.kind
	}

	/// The listing endpoint URL
	#[must_use]
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// The ranker to apply to candidates, if this source should rank them
	#[must_use]
	pub fn ranker(&self) -> Option<Ranker> {
		self.prefer.ranker()
	}

	/// Returns whether the file is the response of the listing endpoint
	#[must_use]
	pub fn is_listing(&self, file: &FetchedFile) -> bool {
		file.filename == self.kind.as_str()
	}

	/// Replaces the listing response with the candidates it contains
	///
	/// Anything other than the listing response is returned unchanged.
	#[instrument(skip_all, fields(repo = %self.repo), level = "debug")]
	pub fn maybe_normalize(
		&self,
		result: FetchResult,
	) -> Result<FetchResult, errors::MalformedResponse> {
		let file = match result {
			FetchResult::File(file) if self.is_listing(&file) => file,
			result => {
				tracing::debug!("passing fetch result through");
				return Ok(result);
			}
		};

		tracing::debug!("intercepted {} listing", self.kind);

		normalize::normalize_json(
			self.kind,
			&file.read_content()?,
			&self.version,
			&self.include_assets,
		)
		.map(FetchResult::List)
	}

	/// Fetches the listing and returns its candidates, ranked if this source ranks them
	#[instrument(skip_all, fields(repo = %self.repo), level = "debug")]
	pub async fn resolve<T: Transport + Sync>(
		&self,
		transport: &T,
	) -> Result<Vec<Candidate>, errors::ResolveError> {
		let result = transport
			.fetch(&self.endpoint)
			.await
			.map_err(|e| errors::ResolveError::Transport(Box::new(e)))?;

		let candidates = match self.maybe_normalize(result)? {
			FetchResult::List(candidates) => candidates,
			FetchResult::File(file) => {
				return Err(errors::ResolveError::UnexpectedResponse(file.filename))
			}
		};

		Ok(match self.ranker() {
			Some(ranker) => ranker.rank(candidates),
			None => candidates,
		})
	}
}

fn endpoint_url(
	api_base: &Url,
	repo: &RepoIdentity,
	kind: EndpointKind,
	per_page: Option<u8>,
) -> Result<Url, url::ParseError> {
	let mut url: Url = format!(
		"{}/repos/{}/{}/{kind}",
		api_base.as_str().trim_end_matches('/'),
		urlencoding::encode(repo.owner()),
		urlencoding::encode(repo.name()),
	)
	.parse()?;

	if let Some(per_page) = per_page {
		url.query_pairs_mut()
			.append_pair("per_page", &per_page.to_string());
	}

	Ok(url)
}

/// Errors that can occur when working with listing sources
pub mod errors {
	use std::path::PathBuf;
	use thiserror::Error;

	/// The listing response could not be turned into candidates
	#[derive(Debug, Error)]
	#[non_exhaustive]
	pub enum MalformedResponse {
		/// The payload is not valid JSON
		#[error("listing is not valid json")]
		Json(#[from] serde_json::Error),

		/// The payload is not a list
		#[error("listing should be an array, found {0}")]
		NotAList(&'static str),

		/// An entry is missing required fields or has fields of the wrong type
		#[error("listing entry {index} is malformed")]
		Entry {
			/// The position of the entry in the listing
			index: usize,
			/// The decoding error
			#[source]
			source: serde_json::Error,
		},

		/// The response has neither inline content nor a path
		#[error("response {0} has no content")]
		MissingContent(String),

		/// The stored response could not be read
		#[error("failed to read response stored at {}", path.display())]
		ReadContent {
			/// The path the response was stored at
			path: PathBuf,
			/// The error reading it
			#[source]
			source: std::io::Error,
		},
	}

	/// Errors that can occur when resolving candidates
	#[derive(Debug, Error)]
	#[non_exhaustive]
	pub enum ResolveError {
		/// The transport failed to fetch the listing
		#[error("failed to fetch listing")]
		Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

		/// The listing was malformed
		#[error("malformed listing")]
		Malformed(#[from] MalformedResponse),

		/// The transport returned a file other than the listing
		#[error("expected a listing, got file {0}")]
		UnexpectedResponse(String),
	}
}
