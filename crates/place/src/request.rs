use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    codec::{self, KEY_VALUE_SEPARATOR, PARAM_SEPARATOR},
    error::PlaceRequestError,
};

pub type Params = IndexMap<String, String>;

/// The token never contains `;` and keys never contain `;` or `=`. The
/// `try_*` constructors report a violation, the others panic on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPlaceRequest")]
pub struct PlaceRequest {
    token: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    params: Params,
}

#[derive(Deserialize)]
struct RawPlaceRequest {
    token: String,
    #[serde(default)]
    params: Params,
}

impl TryFrom<RawPlaceRequest> for PlaceRequest {
    type Error = PlaceRequestError;

    fn try_from(raw: RawPlaceRequest) -> Result<Self, Self::Error> {
        Self::try_with_params(raw.token, raw.params)
    }
}

impl PlaceRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_params(token, Params::new())
    }

    pub fn try_new(token: impl Into<String>) -> Result<Self, PlaceRequestError> {
        Self::try_with_params(token, Params::new())
    }

    pub fn with_params<K, V>(
        token: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        match Self::try_with_params(token, params) {
            Ok(place) => place,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_params<K, V>(
        token: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, PlaceRequestError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let token = token.into();
        if token.contains(PARAM_SEPARATOR) {
            return Err(PlaceRequestError::InvalidToken { token });
        }
        params
            .into_iter()
            .try_fold(Self { token, params: Params::new() }, |place, (key, value)| {
                place.try_with_param(key, value)
            })
    }

    /// Adds or replaces a parameter. A replaced key keeps its position.
    pub fn with_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self.try_with_param(key, value) {
            Ok(place) => place,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, PlaceRequestError> {
        let key = key.into();
        if key.contains([PARAM_SEPARATOR, KEY_VALUE_SEPARATOR]) {
            return Err(PlaceRequestError::InvalidKey { key });
        }
        self.params.insert(key, value.into());
        Ok(self)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The location hash for this request, e.g. `#users;page=2`.
    pub fn hash(&self) -> String {
        format!("#{}", codec::encode(self))
    }
}

impl fmt::Display for PlaceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(self))
    }
}

impl FromStr for PlaceRequest {
    type Err = PlaceRequestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        codec::decode(raw)
    }
}

/// Builds a [`PlaceRequest`] from a token and `key => value` pairs.
///
/// ```
/// let users = place::place!("users", "page" => "2");
/// assert_eq!(users.to_string(), "users;page=2");
/// ```
#[macro_export]
macro_rules! place {
    ($token:expr) => {
        $crate::PlaceRequest::new($token)
    };
    ($token:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::PlaceRequest::new($token)$(.with_param($key, $value))+
    };
}

#[cfg(test)]
#[path = "tests/request_tests.rs"]
mod tests;
