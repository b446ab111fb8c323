//! Request URL construction.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Form-encoding set with `%20` for spaces.
///
/// Alphanumerics and `-`, `_`, `.`, `*` pass through; every other byte is
/// percent-encoded. Spaces must become `%20` rather than `+`: the encoded
/// value lands in path or query segments where a literal `+` is not a
/// space.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// Build a request URL by substituting the encoded value into the template.
///
/// Only the first `{}` occurrence is replaced. A template without the
/// placeholder is returned unchanged; that situation is a configuration
/// mistake surfaced at step construction, not an extraction-time failure.
pub fn build_url(template: &str, raw_value: &str) -> String {
    let encoded = utf8_percent_encode(raw_value, FORM_ENCODE_SET).to_string();
    template.replacen("{}", &encoded, 1)
}
