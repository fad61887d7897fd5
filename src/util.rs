/// Implements `Serialize` through `Display` and `Deserialize` through `FromStr`
macro_rules! ser_display_deser_fromstr {
	($struct_name:ident) => {
		impl serde::Serialize for $struct_name {
			fn serialize<S: serde::ser::Serializer>(
				&self,
				serializer: S,
			) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> serde::Deserialize<'de> for $struct_name {
			fn deserialize<D: serde::de::Deserializer<'de>>(
				deserializer: D,
			) -> Result<Self, D::Error> {
				let s = <String as serde::Deserialize>::deserialize(deserializer)?;
				<Self as std::str::FromStr>::from_str(&s).map_err(serde::de::Error::custom)
			}
		}
	};
}

pub(crate) use ser_display_deser_fromstr;

/// Describes the shape of a JSON value for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "an object",
	}
}
