//! Canonical parameter serialization and request signing.
//!
//! The signature scheme is fixed by the server-side verifier: SHA-256 over
//! `secret + METHOD + path + sorted key=value pairs + body`, base64-encoded, truncated to 43
//! characters, then form-escaped. Every step is byte-exact; reordering parameters must never
//! change the result, which is why [`ParamSet`] keeps its entries sorted at all times.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use sha2::{Digest, Sha256};
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::SecretKey, config::ROUND_UP_TIME};

/// Base64 characters kept from the digest.
///
/// A 32-byte digest encodes to 44 characters ending in one `=` pad; the verifier expects the
/// literal first 43, so the truncation is pinned rather than derived from padding rules.
const SIGNATURE_LEN: usize = 43;

/// Canonically keyed query parameter set.
///
/// Keys are plain strings and entries always iterate in lexicographic key order (byte-wise
/// comparison), which is the order both the signature and the query string serialize in.
/// Insertion order can therefore never leak into a signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSet(BTreeMap<String, String>);
impl ParamSet {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a parameter, replacing any existing entry for the same key.
	pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
		self.0.insert(key.into(), value.to_string());
	}

	/// Inserts a parameter only when the key is absent; existing entries always win.
	///
	/// This is the first-write-wins injection used for `expires`, `api_key`, and `signature`.
	pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl FnOnce() -> String) {
		self.0.entry(key.into()).or_insert_with(value);
	}

	/// Checks whether a key is present.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Returns the value stored for a key, if any.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Iterates entries in canonical (lexicographic key) order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Checks whether the set holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns a copy with every value form-escaped.
	///
	/// The caller-supplied set is left untouched; the escaped copy is what the built URL
	/// carries, while signatures cover the raw values.
	pub fn encoded(&self) -> Self {
		Self(self.0.iter().map(|(key, value)| (key.clone(), form_escape(value))).collect())
	}

	/// Returns a copy with `other`'s entries layered over this set's.
	pub fn merged_with(&self, other: &Self) -> Self {
		let mut merged = self.clone();

		for (key, value) in other.iter() {
			merged.insert(key, value);
		}

		merged
	}

	/// Serializes as `key=value` pairs joined by `&`, in canonical order.
	pub fn to_query_string(&self) -> String {
		self.join_pairs("&")
	}

	/// Serializes as `key=value` pairs with no separator—the form the signature covers.
	pub fn to_signing_string(&self) -> String {
		self.join_pairs("")
	}

	fn join_pairs(&self, separator: &str) -> String {
		self.0
			.iter()
			.map(|(key, value)| format!("{key}={value}"))
			.collect::<Vec<_>>()
			.join(separator)
	}
}
impl<K, V> FromIterator<(K, V)> for ParamSet
where
	K: Into<String>,
	V: ToString,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.to_string())).collect())
	}
}

/// Escapes a value per `application/x-www-form-urlencoded` rules.
///
/// Space becomes `+` and everything outside `A-Za-z0-9*-._` is percent-encoded, matching the
/// encoding the server-side verifier decodes with.
pub fn form_escape(raw: &str) -> String {
	form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Rounds a raw expiry timestamp up to the next [`ROUND_UP_TIME`] boundary.
///
/// A raw value already sitting on a boundary still advances by a full interval. The verifier
/// recomputes this exact formula, so the boundary behavior is preserved bit-for-bit.
pub fn round_up_expiry(raw: i64) -> i64 {
	let interval = ROUND_UP_TIME.whole_seconds();

	raw + interval - raw % interval
}

/// Computes the canonical signature for a request.
///
/// The accumulator starts with the secret key, then the uppercased verb, the path exactly as
/// given, the sorted `key=value` pairs with no separator, and finally the raw body text. The
/// SHA-256 digest of that string is base64-encoded, truncated to 43 characters, and
/// form-escaped. Identical inputs always produce identical output regardless of how `params`
/// was populated.
pub fn generate_signature(
	secret: &SecretKey,
	method: &str,
	path: &str,
	params: &ParamSet,
	body: &str,
) -> String {
	let mut to_sign = String::with_capacity(
		secret.expose().len() + method.len() + path.len() + body.len() + 16 * params.len(),
	);

	to_sign.push_str(secret.expose());
	to_sign.push_str(&method.to_uppercase());
	to_sign.push_str(path);
	to_sign.push_str(&params.to_signing_string());
	to_sign.push_str(body);

	let digest = Sha256::digest(to_sign.as_bytes());
	let encoded = BASE64_STANDARD.encode(digest);

	form_escape(&encoded[..SIGNATURE_LEN])
}
