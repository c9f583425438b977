use ::base64::alphabet;
use ::base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use ::base64::engine::DecodePaddingMode;
use ::base64::Engine;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

fn is_alphabet(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'+' || c == b'/'
}

/// Decode base64, skipping every byte outside the standard alphabet.
///
/// Padding is optional and a dangling sextet at the end is dropped.
pub fn decode_lenient(input: &[u8]) -> Vec<u8> {
    let mut filtered = input
        .iter()
        .copied()
        .filter(|c| is_alphabet(*c))
        .collect::<Vec<_>>();
    if filtered.len() % 4 == 1 {
        filtered.pop();
    }
    match LENIENT.decode(&filtered) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(err=?e, "base64 body left undecoded");
            input.to_vec()
        }
    }
}
