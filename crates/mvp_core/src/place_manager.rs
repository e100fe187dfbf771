use std::sync::Arc;

use futures::{Stream, StreamExt};
use place::{codec::token_of, decode, PlaceRequest};
use tracing::{debug, error, info, warn};

use crate::{
    location::{HistoryLocation, Location, Navigator},
    presenter::{Content, Presenter},
    registry::PresenterRegistry,
    surface::Surface,
};

pub type NotFoundRenderer = Box<dyn Fn(&PlaceRequest) -> Content + Send + Sync>;

pub fn default_not_found(place: &PlaceRequest) -> Content {
    Content::from_blocks(["404".to_string(), format!("{} not found", place.token())])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Presented {
        place: PlaceRequest,
        presenter_changed: bool,
    },
    NotFound {
        place: PlaceRequest,
    },
}

#[derive(Default)]
struct NavigationState {
    presenter: Option<Arc<dyn Presenter>>,
    place: Option<PlaceRequest>,
    error: bool,
}

pub struct PlaceManager<S: Surface> {
    default_place: PlaceRequest,
    not_found: NotFoundRenderer,
    registry: PresenterRegistry,
    surface: S,
    location: Arc<dyn Location>,
    state: NavigationState,
}

impl<S: Surface> PlaceManager<S> {
    pub fn new(default_place: PlaceRequest, registry: PresenterRegistry, surface: S) -> Self {
        Self::new_with_dependencies(
            default_place,
            registry,
            surface,
            Arc::new(HistoryLocation::default()),
            Box::new(default_not_found),
        )
    }

    pub fn new_with_dependencies(
        default_place: PlaceRequest,
        registry: PresenterRegistry,
        surface: S,
        location: Arc<dyn Location>,
        not_found: NotFoundRenderer,
    ) -> Self {
        Self {
            default_place,
            not_found,
            registry,
            surface,
            location,
            state: NavigationState::default(),
        }
    }

    pub fn with_not_found<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&PlaceRequest) -> Content + Send + Sync + 'static,
    {
        self.not_found = Box::new(renderer);
        self
    }

    pub fn current_presenter(&self) -> Option<Arc<dyn Presenter>> {
        self.state.presenter.clone()
    }

    /// The last successfully presented place, or the default place before
    /// any navigation has completed.
    pub fn current_place_request(&self) -> &PlaceRequest {
        self.state.place.as_ref().unwrap_or(&self.default_place)
    }

    pub fn default_place(&self) -> &PlaceRequest {
        &self.default_place
    }

    pub fn has_error(&self) -> bool {
        self.state.error
    }

    pub fn registry(&self) -> &PresenterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PresenterRegistry {
        &mut self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(Arc::clone(&self.location))
    }

    /// Updates the location. The transition itself runs once the new
    /// fragment comes back through [`manage`](Self::manage).
    pub fn navigate_to(&self, place: &PlaceRequest) {
        self.navigator().navigate_to(place);
    }

    pub async fn manage(&mut self) {
        let changes = self.location.changes();
        self.run(changes).await;
    }

    /// Handles fragments strictly in stream order; each transition finishes
    /// before the next fragment is polled.
    pub async fn run<L>(&mut self, locations: L)
    where
        L: Stream<Item = String>,
    {
        futures::pin_mut!(locations);
        while let Some(raw) = locations.next().await {
            self.handle_location(&raw);
        }
        debug!("location stream ended");
    }

    pub fn handle_location(&mut self, raw: &str) -> Transition {
        let (place, malformed) = match decode(raw) {
            Ok(place) => (place, None),
            Err(err) => (PlaceRequest::new(token_of(raw)), Some(err)),
        };
        let effective = if place.token().is_empty() {
            self.default_place.clone()
        } else {
            place
        };

        self.state.error = false;

        if let Some(err) = malformed {
            warn!(location = raw, error = %err, "malformed place request");
            return self.render_not_found(effective);
        }

        match self.registry.resolve(effective.token()) {
            Some(presenter) => self.present(presenter, effective),
            None => {
                error!(place = %effective, "no presenter found");
                self.render_not_found(effective)
            }
        }
    }

    fn present(&mut self, presenter: Arc<dyn Presenter>, place: PlaceRequest) -> Transition {
        let presenter_changed = match &self.state.presenter {
            Some(previous) if !Arc::ptr_eq(previous, &presenter) => {
                previous.hide();
                true
            }
            Some(_) => false,
            None => true,
        };

        self.state.presenter = Some(Arc::clone(&presenter));
        self.state.place = Some(place.clone());

        presenter.prepare_from_request(&place);
        self.surface.clear();
        self.surface.attach(presenter.view().content());
        presenter.show();

        info!(place = %place, presenter_changed, "presented place");
        Transition::Presented {
            place,
            presenter_changed,
        }
    }

    fn render_not_found(&mut self, place: PlaceRequest) -> Transition {
        self.state.error = true;
        self.surface.clear();
        self.surface.attach((self.not_found)(&place));
        Transition::NotFound { place }
    }
}

#[cfg(test)]
#[path = "tests/place_manager_tests.rs"]
mod tests;
