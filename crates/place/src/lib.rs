pub mod codec;
pub mod error;
pub mod request;

pub use codec::{decode, encode};
pub use error::PlaceRequestError;
pub use request::{Params, PlaceRequest};
