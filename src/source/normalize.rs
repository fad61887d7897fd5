use crate::{
	assets::AssetPolicy,
	candidate::Candidate,
	source::{
		entry::{RawRelease, RawTag},
		errors::MalformedResponse,
		EndpointKind,
	},
	util::json_kind,
	version::VersionPattern,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// Decodes a listing payload into its entries
///
/// The payload must be a JSON array, and every element must decode as `T`. The first bad
/// element aborts decoding.
pub fn decode_entries<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, MalformedResponse> {
	let Value::Array(entries) = payload else {
		return Err(MalformedResponse::NotAList(json_kind(&payload)));
	};

	entries
		.into_iter()
		.enumerate()
		.map(|(index, entry)| {
			serde_json::from_value(entry)
				.map_err(|source| MalformedResponse::Entry { index, source })
		})
		.collect()
}

/// Extracts the version of a release or tag, tracing names without one
fn extract_version(pattern: &VersionPattern, what: &str, name: &str) -> Option<String> {
	let version = pattern.extract(name);
	if version.is_none() {
		tracing::trace!("no version found in {what} {name}");
	}

	version
}

/// Flattens releases into candidates
///
/// Each release yields its own archive candidate, followed by one candidate per asset passing
/// `policy`. Asset candidates inherit the release's version. Assets are only decoded when
/// `policy` is enabled, so their shape does not matter otherwise.
pub fn normalize_releases(
	releases: &[RawRelease],
	pattern: &VersionPattern,
	policy: &AssetPolicy,
) -> Result<Vec<Candidate>, MalformedResponse> {
	let mut candidates = Vec::with_capacity(releases.len());

	for (index, release) in releases.iter().enumerate() {
		let version = extract_version(pattern, "release", &release.tag_name);

		candidates.push(Candidate::archive(
			&release.tag_name,
			&release.tarball_url,
			version.clone(),
		));

		if !policy.is_enabled() {
			continue;
		}

		let assets = release
			.decode_assets()
			.map_err(|source| MalformedResponse::Entry { index, source })?;

		candidates.extend(
			policy
				.filter_assets(&assets)
				.into_iter()
				.map(|asset| Candidate::asset(asset, version.clone())),
		);
	}

	Ok(candidates)
}

/// Turns tags into candidates, one per tag
pub fn normalize_tags(tags: &[RawTag], pattern: &VersionPattern) -> Vec<Candidate> {
	tags.iter()
		.map(|tag| {
			Candidate::archive(
				&tag.name,
				&tag.tarball_url,
				extract_version(pattern, "tag", &tag.name),
			)
		})
		.collect()
}

/// Normalizes a decoded listing payload into candidates
#[instrument(skip(payload, pattern, policy), level = "debug")]
pub fn normalize(
	kind: EndpointKind,
	payload: Value,
	pattern: &VersionPattern,
	policy: &AssetPolicy,
) -> Result<Vec<Candidate>, MalformedResponse> {
	let candidates = match kind {
		EndpointKind::Releases => {
			normalize_releases(&decode_entries::<RawRelease>(payload)?, pattern, policy)?
		}
		EndpointKind::Tags => normalize_tags(&decode_entries::<RawTag>(payload)?, pattern),
	};

	tracing::debug!("normalized {kind} listing into {} candidates", candidates.len());

	Ok(candidates)
}

/// Normalizes a raw listing payload into candidates
pub fn normalize_json(
	kind: EndpointKind,
	payload: &[u8],
	pattern: &VersionPattern,
	policy: &AssetPolicy,
) -> Result<Vec<Candidate>, MalformedResponse> {
	let payload = serde_json::from_slice(payload)?;
	normalize(kind, payload, pattern, policy)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn release_payload() -> Value {
		json!([{
			"tag_name": "v1.2.3",
			"tarball_url": "U1",
			"assets": [{
				"name": "lib-linux.so",
				"url": "A1",
				"browser_download_url": "D1",
			}],
		}])
	}

	fn release_candidate() -> Candidate {
		Candidate {
			filename: "v1.2.3".into(),
			url: "U1".into(),
			version: Some("1.2.3".into()),
			asset_url: None,
		}
	}

	#[test]
	fn release_with_all_assets() {
		let candidates = normalize(
			EndpointKind::Releases,
			release_payload(),
			&VersionPattern::default(),
			&AssetPolicy::IncludeAll,
		)
		.unwrap();

		assert_eq!(
			candidates,
			[
				release_candidate(),
				Candidate {
					filename: "lib-linux.so".into(),
					url: "D1".into(),
					version: Some("1.2.3".into()),
					asset_url: Some("A1".into()),
				},
			]
		);
	}

	#[test]
	fn release_without_assets() {
		let candidates = normalize(
			EndpointKind::Releases,
			release_payload(),
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		)
		.unwrap();

		assert_eq!(candidates, [release_candidate()]);
	}

	#[test]
	fn tag_uses_name_field() {
		let candidates = normalize(
			EndpointKind::Tags,
			json!([{ "name": "2.0", "tarball_url": "U2" }]),
			&VersionPattern::default(),
			&AssetPolicy::IncludeAll,
		)
		.unwrap();

		assert_eq!(
			candidates,
			[Candidate {
				filename: "2.0".into(),
				url: "U2".into(),
				version: Some("2.0".into()),
				asset_url: None,
			}]
		);
	}

	#[test]
	fn tags_never_read_assets() {
		// a malformed assets field must not matter for tags
		let candidates = normalize(
			EndpointKind::Tags,
			json!([{ "name": "v3", "tarball_url": "U3", "assets": "not a list" }]),
			&VersionPattern::default(),
			&AssetPolicy::IncludeAll,
		)
		.unwrap();

		assert_eq!(candidates.len(), 1);
		assert!(!candidates[0].is_asset());
	}

	#[test]
	fn disabled_assets_are_never_decoded() {
		let payload = json!([{ "tag_name": "v1", "tarball_url": "U", "assets": [{ "name": "x" }] }]);

		let candidates = normalize(
			EndpointKind::Releases,
			payload.clone(),
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		)
		.unwrap();
		assert_eq!(
			candidates,
			[Candidate {
				filename: "v1".into(),
				url: "U".into(),
				version: Some("1".into()),
				asset_url: None,
			}]
		);

		// once assets are asked for, their shape matters
		let result = normalize(
			EndpointKind::Releases,
			payload,
			&VersionPattern::default(),
			&AssetPolicy::IncludeAll,
		);
		assert!(matches!(result, Err(MalformedResponse::Entry { index: 0, .. })));
	}

	#[test]
	fn tags_without_version_are_kept() {
		let candidates = normalize_tags(
			&[
				RawTag {
					name: "latest".into(),
					tarball_url: "TL".into(),
				},
				RawTag {
					name: "v4.1".into(),
					tarball_url: "T4".into(),
				},
			],
			&VersionPattern::new(r"^v(\d+\.\d+)$").unwrap(),
		);

		assert_eq!(
			candidates
				.iter()
				.map(|c| (c.filename.as_str(), c.version.as_deref()))
				.collect::<Vec<_>>(),
			[("latest", None), ("v4.1", Some("4.1"))]
		);
	}

	#[test]
	fn object_payload_is_malformed() {
		let err = normalize(
			EndpointKind::Releases,
			json!({ "message": "Not Found" }),
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		)
		.unwrap_err();

		assert!(matches!(err, MalformedResponse::NotAList("an object")));
	}

	#[test]
	fn missing_fields_abort_without_partial_output() {
		let payload = json!([
			{ "tag_name": "v1", "tarball_url": "U1" },
			{ "tag_name": "v2" },
		]);
		let result = normalize(
			EndpointKind::Releases,
			payload,
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		);

		assert!(matches!(result, Err(MalformedResponse::Entry { index: 1, .. })));

		// releases are keyed by tag_name, tags by name
		let result = normalize(
			EndpointKind::Releases,
			json!([{ "name": "v1", "tarball_url": "U1" }]),
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		);
		assert!(matches!(result, Err(MalformedResponse::Entry { index: 0, .. })));
	}

	#[test]
	fn undecodable_json_is_malformed() {
		let result = normalize_json(
			EndpointKind::Tags,
			b"[{\"name\": ",
			&VersionPattern::default(),
			&AssetPolicy::Disabled,
		);
		assert!(matches!(result, Err(MalformedResponse::Json(_))));
	}

	#[test]
	fn empty_listing_is_empty() {
		let candidates = normalize_json(
			EndpointKind::Releases,
			b"[]",
			&VersionPattern::default(),
			&AssetPolicy::IncludeAll,
		)
		.unwrap();
		assert!(candidates.is_empty());
	}

	#[test]
	fn order_and_version_presence() {
		let payload = json!([
			{
				"tag_name": "v2.0.0",
				"tarball_url": "T2",
				"assets": [
					{ "name": "b.tar.gz", "url": "A2b", "browser_download_url": "D2b" },
					{ "name": "a.zip", "url": "A2a", "browser_download_url": "D2a" },
					{ "name": "c.tar.gz", "url": "A2c", "browser_download_url": "D2c" },
				],
			},
			{ "tag_name": "nightly", "tarball_url": "TN", "assets": null },
			{
				"tag_name": "v1.0.0",
				"tarball_url": "T1",
				"assets": [
					{ "name": "d.tar.gz", "url": "A1d", "browser_download_url": "D1d" },
				],
			},
		]);
		let pattern = VersionPattern::new(r"^v(\d+\.\d+\.\d+)$").unwrap();
		let policy = AssetPolicy::matching(r"\.tar\.gz$").unwrap();

		let candidates = normalize(EndpointKind::Releases, payload.clone(), &pattern, &policy)
			.unwrap();

		let filenames = candidates
			.iter()
			.map(|c| c.filename.as_str())
			.collect::<Vec<_>>();
		assert_eq!(
			filenames,
			["v2.0.0", "b.tar.gz", "c.tar.gz", "nightly", "v1.0.0", "d.tar.gz"]
		);

		let versions = candidates
			.iter()
			.map(|c| c.version.as_deref())
			.collect::<Vec<_>>();
		assert_eq!(
			versions,
			[
				Some("2.0.0"),
				Some("2.0.0"),
				Some("2.0.0"),
				None,
				Some("1.0.0"),
				Some("1.0.0"),
			]
		);

		// normalizing twice gives the same list
		assert_eq!(
			normalize(EndpointKind::Releases, payload, &pattern, &policy).unwrap(),
			candidates
		);
	}
}
