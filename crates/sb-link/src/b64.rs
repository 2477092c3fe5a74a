//! Lenient base64 decoding for share links and subscription blobs.
//!
//! Share links come from many generators: padded or not, standard or URL-safe alphabet,
//! sometimes with non-canonical trailing bits. All of those are accepted here.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

pub const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
pub const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode with either alphabet, padding optional.
pub fn decode_lenient(input: &str) -> Option<Vec<u8>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    STANDARD_LENIENT
        .decode(input)
        .or_else(|_| URL_SAFE_LENIENT.decode(input))
        .ok()
}

/// Decode into UTF-8 text; invalid UTF-8 is a failure.
pub fn decode_utf8(input: &str) -> Option<String> {
    decode_lenient(input).and_then(|b| String::from_utf8(b).ok())
}

/// Try the raw text with 0..=3 `=` appended and yield every successful decode.
///
/// Invalid UTF-8 sequences are dropped.
pub fn decode_padding_variants(input: &str) -> impl Iterator<Item = String> + '_ {
    ["", "=", "==", "==="].into_iter().filter_map(move |pad| {
        let candidate = format!("{input}{pad}");
        decode_lenient(&candidate).map(|bytes| utf8_dropping_invalid(&bytes))
    })
}

/// Keep the valid UTF-8 runs of `bytes`, skipping malformed sequences.
pub fn utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // valid_up_to marks a clean boundary
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(n) => bytes = &rest[n..],
                    None => return out,
                }
            }
        }
    }
}
