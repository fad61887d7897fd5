use crate::source::entry::RawAsset;
use serde::{Deserialize, Serialize};

/// A single downloadable option handed to the selection stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
	/// The release tag or name, or the asset's display name
	pub filename: String,
	/// The tarball URL, or the asset's direct download URL
	pub url: String,
	/// The version derived from the release's name, if the pattern matched
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// The API URL of the asset, if this candidate is an asset
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_url: Option<String>,
}

impl Candidate {
	/// Creates the candidate for a release or tag's own source archive
	pub fn archive<N: Into<String>, U: Into<String>>(
		name: N,
		tarball_url: U,
		version: Option<String>,
	) -> Self {
		Self {
			filename: name.into(),
			url: tarball_url.into(),
			version,
			asset_url: None,
		}
	}

	/// Creates the candidate for an asset. The version is the one of the release it belongs to
	pub fn asset(asset: &RawAsset, version: Option<String>) -> Self {
		Self {
			filename: asset.name.clone(),
			url: asset.browser_download_url.clone(),
			version,
			asset_url: Some(asset.url.clone()),
		}
	}

	/// Returns whether this candidate is an asset rather than a source archive
	#[must_use]
	pub fn is_asset(&self) -> bool {
		self.asset_url.is_some()
	}

	/// The kind of archive this candidate downloads as, if it can be told
	///
	/// Source archives are always gzip-compressed tarballs. Assets are judged by their name.
	#[must_use]
	pub fn archive_kind(&self) -> Option<ArchiveKind> {
		if self.is_asset() {
			self.filename.parse().ok()
		} else {
			Some(ArchiveKind::Tar(Some(EncodingKind::Gzip)))
		}
	}
}

/// The kind of compression applied to a tarball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingKind {
	/// Gzip
	Gzip,
	/// Xz
	Xz,
	/// Bzip2
	Bzip2,
	/// Zstandard
	Zstd,
}

/// The kind of archive a candidate downloads as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
	/// A tarball, possibly compressed
	Tar(Option<EncodingKind>),
	/// A zip archive
	Zip,
}

impl ArchiveKind {
	/// The conventional file extension of this kind of archive
	#[must_use]
	pub fn extension(self) -> &'static str {
		match self {
			ArchiveKind::Tar(None) => "tar",
			ArchiveKind::Tar(Some(EncodingKind::Gzip)) => "tar.gz",
			ArchiveKind::Tar(Some(EncodingKind::Xz)) => "tar.xz",
			ArchiveKind::Tar(Some(EncodingKind::Bzip2)) => "tar.bz2",
			ArchiveKind::Tar(Some(EncodingKind::Zstd)) => "tar.zst",
			ArchiveKind::Zip => "zip",
		}
	}
}

impl std::str::FromStr for ArchiveKind {
	type Err = errors::ArchiveKindFromStrError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lower = s.to_ascii_lowercase();
		let parts = lower.split('.').collect::<Vec<_>>();

		Ok(match &*parts {
			[_, .., "tar", "gz"] | [_, .., "tgz"] => ArchiveKind::Tar(Some(EncodingKind::Gzip)),
			[_, .., "tar", "xz"] | [_, .., "txz"] => ArchiveKind::Tar(Some(EncodingKind::Xz)),
			[_, .., "tar", "bz2"] | [_, .., "tbz2"] => ArchiveKind::Tar(Some(EncodingKind::Bzip2)),
			[_, .., "tar", "zst"] | [_, .., "tzst"] => ArchiveKind::Tar(Some(EncodingKind::Zstd)),
			[_, .., "tar"] => ArchiveKind::Tar(None),
			[_, .., "zip"] => ArchiveKind::Zip,
			_ => return Err(errors::ArchiveKindFromStrError(s.to_string())),
		})
	}
}

/// Errors that can occur when working with candidates
pub mod errors {
	use thiserror::Error;

	/// The file name does not look like a known archive
	#[derive(Debug, Error)]
	#[error("`{0}` is not a recognized archive name")]
	pub struct ArchiveKindFromStrError(pub String);
}
