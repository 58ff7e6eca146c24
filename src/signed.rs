//! Signed response envelopes.
//!
//! SPID can answer with
//! `{"name":..,"version":..,"api":2,"data":"<base64>","algorithm":"HMAC-SHA256","sig":"<base64url>"}`
//! instead of raw JSON. The signature is an HMAC-SHA256 keyed by the client's signing secret over
//! the `data` string exactly as transmitted, and `data` carries the payload under that signature.
//! Verification always completes (in constant time) before `data` is decoded, so a forged or
//! corrupted envelope never yields any payload bytes.

// crates.io
use base64::{
	Engine as _,
	engine::{
		DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig,
		general_purpose::{STANDARD, URL_SAFE_NO_PAD},
	},
};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::TokenSecret};

type HmacSha256 = Hmac<Sha256>;

/// Only supported signature algorithm.
pub const SIGNATURE_ALGORITHM: &str = "HMAC-SHA256";
/// Only supported envelope schema version.
pub const ENVELOPE_API_VERSION: u32 = 2;

const LENIENT: GeneralPurposeConfig =
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&base64::alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&base64::alphabet::URL_SAFE, LENIENT);

/// Failures for envelopes that are present but unusable.
///
/// A signature that does not match is reported separately as
/// [`Error::SignatureMismatch`](crate::error::Error::SignatureMismatch).
#[derive(Debug, ThisError)]
pub enum EnvelopeError {
	/// Body is not a signed envelope.
	#[error("Response body is not a signed envelope.")]
	Malformed {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// Envelope declares an algorithm other than `HMAC-SHA256`.
	#[error("Signed envelope uses unsupported algorithm `{algorithm}`.")]
	UnsupportedAlgorithm {
		/// Declared algorithm.
		algorithm: String,
	},
	/// Envelope declares a schema version other than 2.
	#[error("Signed envelope uses unsupported api version {api}.")]
	UnsupportedApiVersion {
		/// Declared version.
		api: u64,
	},
	/// Verified payload is not valid base64.
	#[error("Signed envelope payload is not valid base64.")]
	InvalidPayloadEncoding {
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// Verified payload is not UTF-8 text.
	#[error("Signed envelope payload is not UTF-8 text.")]
	InvalidPayloadText {
		/// Underlying conversion failure.
		#[source]
		source: std::string::FromUtf8Error,
	},
}

/// Signed response envelope as transmitted by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
	/// Container name (e.g. `SPP Container`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Container version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Envelope schema version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api: Option<u64>,
	/// Base64 payload covered by the signature.
	pub data: String,
	/// Signature algorithm.
	pub algorithm: String,
	/// Base64url signature over `data`.
	pub sig: String,
}
impl SignedEnvelope {
	/// Parses an envelope from a response body.
	pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
		serde_json::from_str(body).map_err(|source| EnvelopeError::Malformed { source })
	}

	/// Builds an envelope over `payload` signed with `secret`.
	pub fn seal(
		name: impl Into<String>,
		version: impl Into<String>,
		payload: &[u8],
		secret: &TokenSecret,
	) -> Self {
		let data = STANDARD.encode(payload);
		let sig = URL_SAFE_NO_PAD.encode(sign(secret, &data));

		Self {
			name: Some(name.into()),
			version: Some(version.into()),
			api: Some(ENVELOPE_API_VERSION.into()),
			data,
			algorithm: SIGNATURE_ALGORITHM.into(),
			sig,
		}
	}

	/// Checks the declared algorithm and version, then the signature.
	pub fn verify(&self, secret: &TokenSecret) -> Result<()> {
		if self.algorithm != SIGNATURE_ALGORITHM {
			return Err(EnvelopeError::UnsupportedAlgorithm { algorithm: self.algorithm.clone() }
				.into());
		}
		if let Some(api) = self.api.filter(|api| *api != u64::from(ENVELOPE_API_VERSION)) {
			return Err(EnvelopeError::UnsupportedApiVersion { api }.into());
		}

		let expected =
			URL_SAFE_LENIENT.decode(self.sig.trim()).map_err(|_| Error::SignatureMismatch)?;
		let mut mac = keyed_mac(secret);

		mac.update(self.data.as_bytes());
		// `verify_slice` compares in constant time.
		mac.verify_slice(&expected).map_err(|_| Error::SignatureMismatch)
	}

	/// Verifies the envelope and returns the decoded payload bytes.
	pub fn open(&self, secret: &TokenSecret) -> Result<Vec<u8>> {
		self.verify(secret)?;

		decode_payload(&self.data)
			.map_err(|source| EnvelopeError::InvalidPayloadEncoding { source }.into())
	}

	/// Verifies the envelope and returns the payload as UTF-8 text.
	pub fn open_text(&self, secret: &TokenSecret) -> Result<String> {
		let bytes = self.open(secret)?;

		String::from_utf8(bytes)
			.map_err(|source| EnvelopeError::InvalidPayloadText { source }.into())
	}
}

/// Returns `true` when `body` is a JSON object with string `algorithm`, `sig`, and `data`.
pub fn is_signed_envelope(body: &str) -> bool {
	let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
		return false;
	};

	["algorithm", "sig", "data"].iter().all(|field| map.get(*field).is_some_and(Value::is_string))
}

/// Verifies a signed envelope body and returns its payload as text.
pub fn unwrap(body: &str, secret: &TokenSecret) -> Result<String> {
	SignedEnvelope::parse(body)?.open_text(secret)
}

fn keyed_mac(secret: &TokenSecret) -> HmacSha256 {
	<HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
		.unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"))
}

fn sign(secret: &TokenSecret, data: &str) -> Vec<u8> {
	let mut mac = keyed_mac(secret);

	mac.update(data.as_bytes());

	mac.finalize().into_bytes().to_vec()
}

fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
	let data = data.trim();

	STANDARD_LENIENT.decode(data).or_else(|_| URL_SAFE_LENIENT.decode(data))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SIGNED_RESPONSE: &str = "{\"name\":\"SPP Container\",\"version\":\"0.2\",\"api\":2,\"data\":\"VGhpcyBkYXRhIHdhcyBlbmNyeXB0ZWQh\",\"algorithm\":\"HMAC-SHA256\",\"sig\":\"9epFW_MQKbRUPSmKLY_tShahRxtddL9JY-vGVEOf_IA\"}";

	fn secret() -> TokenSecret {
		TokenSecret::new("SIGNSECRET")
	}

	fn flip_char(value: &str, index: usize) -> String {
		value
			.char_indices()
			.map(|(idx, ch)| match (idx == index, ch) {
				(true, 'A') => 'B',
				(true, _) => 'A',
				(false, other) => other,
			})
			.collect()
	}

	#[test]
	fn unwraps_provider_fixture() {
		assert!(is_signed_envelope(SIGNED_RESPONSE));
		assert_eq!(
			unwrap(SIGNED_RESPONSE, &secret()).expect("Provider fixture should verify."),
			"This data was encrypted!"
		);
	}

	#[test]
	fn detection_requires_all_signature_fields() {
		assert!(!is_signed_envelope("{\"VALUE\":\"NOT IMPORTANT\"}"));
		assert!(!is_signed_envelope("{\"data\":\"eA==\",\"algorithm\":\"HMAC-SHA256\"}"));
		assert!(!is_signed_envelope("{\"data\":1,\"algorithm\":\"HMAC-SHA256\",\"sig\":\"x\"}"));
		assert!(!is_signed_envelope("[\"data\",\"algorithm\",\"sig\"]"));
		assert!(!is_signed_envelope("NOT IMPORTANT"));
	}

	#[test]
	fn any_altered_signature_character_is_rejected() {
		let envelope = SignedEnvelope::parse(SIGNED_RESPONSE).expect("Fixture should parse.");

		for index in 0..envelope.sig.len() {
			let tampered =
				SignedEnvelope { sig: flip_char(&envelope.sig, index), ..envelope.clone() };
			let err = tampered.open_text(&secret()).expect_err("Tampered signature must fail.");

			assert!(matches!(err, Error::SignatureMismatch), "index {index}: {err:?}");
		}
	}

	#[test]
	fn any_altered_payload_character_is_rejected() {
		let envelope = SignedEnvelope::parse(SIGNED_RESPONSE).expect("Fixture should parse.");

		for index in 0..envelope.data.len() {
			let tampered =
				SignedEnvelope { data: flip_char(&envelope.data, index), ..envelope.clone() };
			let err = tampered.open(&secret()).expect_err("Tampered payload must fail.");

			assert!(matches!(err, Error::SignatureMismatch), "index {index}: {err:?}");
		}
	}

	#[test]
	fn wrong_secret_is_rejected() {
		let err = unwrap(SIGNED_RESPONSE, &TokenSecret::new("OTHERSECRET"))
			.expect_err("Foreign secret must fail.");

		assert!(matches!(err, Error::SignatureMismatch));
	}

	#[test]
	fn undecodable_signature_is_a_mismatch() {
		let envelope = SignedEnvelope {
			sig: "***".into(),
			..SignedEnvelope::parse(SIGNED_RESPONSE).expect("Fixture should parse.")
		};

		assert!(matches!(envelope.verify(&secret()), Err(Error::SignatureMismatch)));
	}

	#[test]
	fn unsupported_algorithm_is_rejected_before_verification() {
		let body = SIGNED_RESPONSE.replace("HMAC-SHA256", "HMAC-SHA1");
		let err = unwrap(&body, &secret()).expect_err("Foreign algorithm must fail.");

		assert!(matches!(
			err,
			Error::Envelope(EnvelopeError::UnsupportedAlgorithm { ref algorithm })
				if algorithm == "HMAC-SHA1"
		));
	}

	#[test]
	fn unsupported_api_version_is_rejected() {
		let body = SIGNED_RESPONSE.replace("\"api\":2", "\"api\":1");
		let err = unwrap(&body, &secret()).expect_err("Foreign schema version must fail.");

		assert!(matches!(err, Error::Envelope(EnvelopeError::UnsupportedApiVersion { api: 1 })));
	}

	#[test]
	fn sealed_envelopes_open_with_the_same_secret() {
		let payload = "{\"userId\":1,\"email\":\"ola@example.com\"}";
		let envelope = SignedEnvelope::seal("SPP Container", "0.2", payload.as_bytes(), &secret());
		let body = serde_json::to_string(&envelope).expect("Envelope should serialize.");

		assert!(is_signed_envelope(&body));
		assert_eq!(unwrap(&body, &secret()).expect("Sealed envelope should verify."), payload);
	}

	#[test]
	fn verified_non_text_payload_is_reported() {
		let envelope = SignedEnvelope::seal("SPP Container", "0.2", &[0xff, 0xfe], &secret());

		assert_eq!(envelope.open(&secret()).expect("Bytes should decode."), vec![0xff, 0xfe]);
		assert!(matches!(
			envelope.open_text(&secret()),
			Err(Error::Envelope(EnvelopeError::InvalidPayloadText { .. }))
		));
	}
}
