use crate::source::entry::RawAsset;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which assets of a release are surfaced as candidates of their own
#[derive(Debug, Clone, Default)]
pub enum AssetPolicy {
	/// No assets are surfaced
	#[default]
	Disabled,
	/// Every asset is surfaced
	IncludeAll,
	/// Assets whose name matches the pattern are surfaced
	IncludeMatching(Regex),
}

impl AssetPolicy {
	/// Creates a policy surfacing assets whose name matches `pattern`
	pub fn matching(pattern: &str) -> Result<Self, regex::Error> {
		Regex::new(pattern).map(AssetPolicy::IncludeMatching)
	}

	/// Returns whether any asset can pass this policy
	#[must_use]
	pub fn is_enabled(&self) -> bool {
		!matches!(self, AssetPolicy::Disabled)
	}

	/// Returns whether a single asset passes this policy
	#[must_use]
	pub fn includes(&self, asset: &RawAsset) -> bool {
		match self {
			AssetPolicy::Disabled => false,
			AssetPolicy::IncludeAll => true,
			AssetPolicy::IncludeMatching(pattern) => pattern.is_match(&asset.name),
		}
	}

	/// Returns the assets passing this policy, in their original order
	#[must_use]
	pub fn filter_assets<'a>(&self, assets: &'a [RawAsset]) -> Vec<&'a RawAsset> {
		if !self.is_enabled() {
			return vec![];
		}

		assets.iter().filter(|asset| self.includes(asset)).collect()
	}
}

impl PartialEq for AssetPolicy {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(AssetPolicy::Disabled, AssetPolicy::Disabled)
			| (AssetPolicy::IncludeAll, AssetPolicy::IncludeAll) => true,
			(AssetPolicy::IncludeMatching(a), AssetPolicy::IncludeMatching(b)) => {
				a.as_str() == b.as_str()
			}
			_ => false,
		}
	}
}

impl Eq for AssetPolicy {}

/// On disk, a policy is either a boolean or a pattern string
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AssetPolicyRepr {
	Enabled(bool),
	Matching(String),
}

impl Serialize for AssetPolicy {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let repr = match self {
			AssetPolicy::Disabled => AssetPolicyRepr::Enabled(false),
			AssetPolicy::IncludeAll => AssetPolicyRepr::Enabled(true),
			AssetPolicy::IncludeMatching(pattern) => {
				AssetPolicyRepr::Matching(pattern.as_str().to_string())
			}
		};

		repr.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for AssetPolicy {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		match AssetPolicyRepr::deserialize(deserializer)? {
			AssetPolicyRepr::Enabled(false) => Ok(AssetPolicy::Disabled),
			AssetPolicyRepr::Enabled(true) => Ok(AssetPolicy::IncludeAll),
			AssetPolicyRepr::Matching(pattern) => {
				AssetPolicy::matching(&pattern).map_err(serde::de::Error::custom)
			}
		}
	}
}
