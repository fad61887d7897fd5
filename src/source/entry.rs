use serde::Deserialize;
use serde_json::Value;

/// A release, as listed by the releases endpoint
#[derive(Debug, Eq, PartialEq, Clone, Deserialize)]
pub struct RawRelease {
	/// The tag name of the release
	pub tag_name: String,
	/// The URL of the source tarball
	pub tarball_url: String,
	/// The assets of the release, left undecoded until they are asked for.
	/// `null` and a missing field both mean no assets
	#[serde(default)]
	pub assets: Option<Value>,
}

impl RawRelease {
	/// Decodes the assets of the release, empty if there are none
	pub fn decode_assets(&self) -> Result<Vec<RawAsset>, serde_json::Error> {
		match &self.assets {
			None | Some(Value::Null) => Ok(vec![]),
			Some(assets) => Vec::<RawAsset>::deserialize(assets),
		}
	}
}

/// A tag, as listed by the tags endpoint
#[derive(Debug, Eq, PartialEq, Hash, Clone, Deserialize)]
pub struct RawTag {
	/// The name of the tag
	pub name: String,
	/// The URL of the source tarball
	pub tarball_url: String,
}

/// An asset of a release
#[derive(Debug, Eq, PartialEq, Hash, Clone, Deserialize)]
pub struct RawAsset {
	/// The display name of the asset
	pub name: String,
	/// The API URL identifying the asset
	pub url: String,
	/// The direct download URL of the asset
	pub browser_download_url: String,
}
