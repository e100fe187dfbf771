use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    error::PlaceRequestError,
    request::{Params, PlaceRequest},
};

pub const PARAM_SEPARATOR: char = ';';
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn decode(raw: &str) -> Result<PlaceRequest, PlaceRequestError> {
    let (token, rest) = raw.split_once(PARAM_SEPARATOR).unwrap_or((raw, ""));

    let mut params = Params::new();
    for segment in rest.split(PARAM_SEPARATOR).filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once(KEY_VALUE_SEPARATOR).ok_or_else(|| {
            PlaceRequestError::Malformed {
                segment: segment.to_string(),
            }
        })?;
        let value = percent_decode_str(value).decode_utf8().map_err(|_| {
            PlaceRequestError::InvalidEncoding {
                key: key.to_string(),
            }
        })?;
        params.insert(key.to_string(), value.into_owned());
    }

    PlaceRequest::try_with_params(token, params)
}

/// Writes `token[;key=value]*`. Values are escaped like `encodeURIComponent`,
/// the token and keys are written verbatim.
pub fn encode(place: &PlaceRequest) -> String {
    let mut out = String::from(place.token());
    for (key, value) in place.params() {
        out.push(PARAM_SEPARATOR);
        out.push_str(key);
        out.push(KEY_VALUE_SEPARATOR);
        out.extend(utf8_percent_encode(value, URI_COMPONENT));
    }
    out
}

pub fn token_of(raw: &str) -> &str {
    raw.split_once(PARAM_SEPARATOR)
        .map_or(raw, |(token, _)| token)
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
