pub mod location;
mod place_manager;
pub mod presenter;
pub mod registry;
pub mod surface;

pub use location::{HistoryLocation, Location, Navigator};
pub use place::{PlaceRequest, PlaceRequestError};
pub use place_manager::{default_not_found, NotFoundRenderer, PlaceManager, Transition};
pub use presenter::{Content, Presenter, View, WithPresenter};
pub use registry::{LookupError, PresenterHandle, PresenterRegistry};
pub use surface::{MemorySurface, Surface};
