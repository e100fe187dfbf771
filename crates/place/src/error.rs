use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceRequestError {
    #[error("malformed place request segment '{segment}': expected key=value")]
    Malformed { segment: String },
    #[error("parameter '{key}' is not valid percent-encoded UTF-8")]
    InvalidEncoding { key: String },
    #[error("place token '{token}' contains ';'")]
    InvalidToken { token: String },
    #[error("parameter key '{key}' contains ';' or '='")]
    InvalidKey { key: String },
}
