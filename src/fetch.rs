use crate::{candidate::Candidate, source::errors::MalformedResponse, AuthConfig};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use std::{borrow::Cow, future::Future, path::PathBuf};
use url::Url;

/// The result of fetching a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
	/// A single file
	File(FetchedFile),
	/// A list of candidates
	List(Vec<Candidate>),
}

/// A fetched file, either held in memory or stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedFile {
	/// The name of the file. For URLs, the last path segment
	pub filename: String,
	/// The content of the file, if held in memory
	pub content: Option<Vec<u8>>,
	/// The path the file was stored at, if stored on disk
	pub path: Option<PathBuf>,
}

impl FetchedFile {
	/// Creates a file held in memory
	pub fn inline<N: Into<String>>(filename: N, content: Vec<u8>) -> Self {
		Self {
			filename: filename.into(),
			content: Some(content),
			path: None,
		}
	}

	/// Creates a file stored on disk
	pub fn stored<N: Into<String>, P: Into<PathBuf>>(filename: N, path: P) -> Self {
		Self {
			filename: filename.into(),
			content: None,
			path: Some(path.into()),
		}
	}

	/// Returns the content of the file, reading it from disk if needed
	///
	/// Inline content wins over the stored path unless it is empty.
	pub fn read_content(&self) -> Result<Cow<'_, [u8]>, MalformedResponse> {
		if let Some(content) = self
			.content
			.as_deref()
			.filter(|content| !content.is_empty() || self.path.is_none())
		{
			return Ok(Cow::Borrowed(content));
		}

		if let Some(path) = &self.path {
			return fs_err::read(path)
				.map(Cow::Owned)
				.map_err(|source| MalformedResponse::ReadContent {
					path: path.clone(),
					source,
				});
		}

		Err(MalformedResponse::MissingContent(self.filename.clone()))
	}
}

/// Something able to fetch URLs
pub trait Transport {
	/// The error type for fetching
	type Error: std::error::Error + Send + Sync + 'static;

	/// Fetches a URL
	fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchResult, Self::Error>> + Send;
}

/// A transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	reqwest: reqwest::Client,
	auth_config: AuthConfig,
}

impl ReqwestTransport {
	/// Creates a new transport
	pub fn new(reqwest: reqwest::Client, auth_config: AuthConfig) -> Self {
		Self {
			reqwest,
			auth_config,
		}
	}
}

impl Transport for ReqwestTransport {
	type Error = errors::TransportError;

	async fn fetch(&self, url: &Url) -> Result<FetchResult, Self::Error> {
		let filename = url
			.path_segments()
			.and_then(|mut segments| segments.next_back())
			.filter(|segment| !segment.is_empty())
			.ok_or_else(|| errors::TransportError::NoFileName(url.clone()))?
			.to_string();

		let mut request = self
			.reqwest
			.get(url.clone())
			.header(ACCEPT, "application/vnd.github+json")
			.header(
				USER_AGENT,
				concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
			);

		if let Some(token) = self.auth_config.token_for(url) {
			tracing::debug!("using token for {}", url.host_str().unwrap_or_default());
			request = request.header(AUTHORIZATION, format!("Bearer {token}"));
		}

		let content = request.send().await?.error_for_status()?.bytes().await?;

		Ok(FetchResult::File(FetchedFile::inline(
			filename,
			content.to_vec(),
		)))
	}
}

/// Errors that can occur when fetching
pub mod errors {
	use thiserror::Error;

	/// Errors that can occur when fetching through reqwest
	#[derive(Debug, Error)]
	#[non_exhaustive]
	pub enum TransportError {
		/// Handling the request failed
		#[error("failed to handle forge API request")]
		Request(#[from] reqwest::Error),

		/// The URL has no file name to report the response under
		#[error("url {0} has no file name")]
		NoFileName(url::Url),
	}
}
