use super::*;
use crate::{
    presenter::View,
    registry::PresenterHandle,
    surface::MemorySurface,
};
use futures::stream;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Bind,
    PrepareFromRequest,
    Show,
    Hide,
}

use Hook::{Bind, Hide, PrepareFromRequest, Show};

struct FruitView(&'static str);

impl View for FruitView {
    fn content(&self) -> Content {
        Content::text(self.0)
    }
}

struct FruitPresenter {
    view: FruitView,
    hooks: Mutex<Vec<Hook>>,
    places: Mutex<Vec<PlaceRequest>>,
}

impl FruitPresenter {
    fn new(glyph: &'static str) -> Self {
        Self {
            view: FruitView(glyph),
            hooks: Mutex::new(Vec::new()),
            places: Mutex::new(Vec::new()),
        }
    }

    fn hooks(&self) -> Vec<Hook> {
        self.hooks.lock().expect("hooks").clone()
    }

    fn places(&self) -> Vec<PlaceRequest> {
        self.places.lock().expect("places").clone()
    }

    fn record(&self, hook: Hook) {
        self.hooks.lock().expect("hooks").push(hook);
    }
}

impl Presenter for FruitPresenter {
    fn view(&self) -> &dyn View {
        &self.view
    }

    fn bind(&self) {
        self.record(Bind);
    }

    fn prepare_from_request(&self, place: &PlaceRequest) {
        self.places.lock().expect("places").push(place.clone());
        self.record(PrepareFromRequest);
    }

    fn show(&self) {
        self.record(Show);
    }

    fn hide(&self) {
        self.record(Hide);
    }
}

struct Fruits {
    apple: PresenterHandle<FruitPresenter>,
    banana: PresenterHandle<FruitPresenter>,
}

fn fruit_manager() -> (PlaceManager<MemorySurface>, Fruits) {
    let mut registry = PresenterRegistry::new();
    let apple = registry.register("apple", || FruitPresenter::new("🍎"));
    let banana = registry.register("banana", || FruitPresenter::new("🍌"));
    registry.register("pineapple", || FruitPresenter::new("🍍"));

    let manager = PlaceManager::new(PlaceRequest::new("apple"), registry, MemorySurface::new())
        .with_not_found(|_| Content::text("💣"));
    (manager, Fruits { apple, banana })
}

fn presenter(
    manager: &mut PlaceManager<MemorySurface>,
    handle: &PresenterHandle<FruitPresenter>,
) -> Arc<FruitPresenter> {
    handle.get(manager.registry_mut()).expect("fruit presenter")
}

#[test]
fn empty_token_presents_default_place() {
    let (mut manager, fruits) = fruit_manager();

    let transition = manager.handle_location("");
    assert_eq!(
        transition,
        Transition::Presented {
            place: PlaceRequest::new("apple"),
            presenter_changed: true,
        }
    );
    assert_eq!(manager.surface().rendered(), "🍎");
    assert_eq!(manager.current_place_request(), &PlaceRequest::new("apple"));
    assert!(!manager.has_error());

    let apple = presenter(&mut manager, &fruits.apple);
    assert_eq!(apple.places(), vec![PlaceRequest::new("apple")]);
}

#[test]
fn current_place_request_defaults_before_first_navigation() {
    let (manager, _) = fruit_manager();
    assert!(manager.current_presenter().is_none());
    assert_eq!(manager.current_place_request(), &PlaceRequest::new("apple"));
}

#[test]
fn same_presenter_with_new_params_is_prepared_again_without_hide() {
    let (mut manager, fruits) = fruit_manager();

    manager.handle_location("apple");
    let transition = manager.handle_location("apple;type=gala");
    assert_eq!(
        transition,
        Transition::Presented {
            place: PlaceRequest::new("apple").with_param("type", "gala"),
            presenter_changed: false,
        }
    );

    let apple = presenter(&mut manager, &fruits.apple);
    assert_eq!(
        apple.hooks(),
        vec![Bind, PrepareFromRequest, Show, PrepareFromRequest, Show]
    );
    assert_eq!(
        apple.places(),
        vec![
            PlaceRequest::new("apple"),
            PlaceRequest::new("apple").with_param("type", "gala"),
        ]
    );
    assert_eq!(
        manager.current_place_request(),
        &PlaceRequest::new("apple").with_param("type", "gala")
    );
}

#[test]
fn switching_presenters_hides_the_previous_one() {
    let (mut manager, fruits) = fruit_manager();

    manager.handle_location("apple");
    manager.handle_location("banana");
    assert_eq!(manager.surface().rendered(), "🍌");

    let banana = presenter(&mut manager, &fruits.banana);
    assert_eq!(banana.hooks(), vec![Bind, PrepareFromRequest, Show]);

    manager.handle_location("apple");
    assert_eq!(manager.surface().rendered(), "🍎");

    let apple = presenter(&mut manager, &fruits.apple);
    assert_eq!(
        apple.hooks(),
        vec![Bind, PrepareFromRequest, Show, Hide, PrepareFromRequest, Show]
    );
    assert_eq!(banana.hooks(), vec![Bind, PrepareFromRequest, Show, Hide]);
}

#[test]
fn unknown_token_renders_fallback_and_keeps_state() {
    let (mut manager, fruits) = fruit_manager();

    manager.handle_location("apple;type=gala");
    let before = manager.current_presenter().expect("apple is current");

    let transition = manager.handle_location("mystery");
    assert_eq!(
        transition,
        Transition::NotFound {
            place: PlaceRequest::new("mystery"),
        }
    );
    assert!(manager.has_error());
    assert_eq!(manager.surface().rendered(), "💣");
    assert!(Arc::ptr_eq(
        &before,
        &manager.current_presenter().expect("still current")
    ));
    assert_eq!(
        manager.current_place_request(),
        &PlaceRequest::new("apple").with_param("type", "gala")
    );
    assert!(!manager.registry().is_instantiated("mystery"));

    let apple = presenter(&mut manager, &fruits.apple);
    assert_eq!(apple.hooks(), vec![Bind, PrepareFromRequest, Show]);

    manager.handle_location("apple");
    assert!(!manager.has_error());
    assert_eq!(
        apple.hooks(),
        vec![Bind, PrepareFromRequest, Show, PrepareFromRequest, Show]
    );
}

#[test]
fn default_fallback_names_the_missing_token() {
    let mut manager = PlaceManager::new(
        PlaceRequest::new("home"),
        PresenterRegistry::new(),
        MemorySurface::new(),
    );

    let transition = manager.handle_location("");
    assert_eq!(
        transition,
        Transition::NotFound {
            place: PlaceRequest::new("home"),
        }
    );
    assert_eq!(manager.surface().rendered(), "404\nhome not found");
    assert!(manager.current_presenter().is_none());
}

#[test]
fn malformed_location_falls_back_for_its_token() {
    let (mut manager, _) = fruit_manager();

    manager.handle_location("banana");
    let transition = manager.handle_location("apple;broken");
    assert_eq!(
        transition,
        Transition::NotFound {
            place: PlaceRequest::new("apple"),
        }
    );
    assert!(manager.has_error());
    assert!(!manager.registry().is_instantiated("apple"));
    assert_eq!(manager.current_place_request(), &PlaceRequest::new("banana"));
}

#[test]
fn every_transition_clears_the_surface_once() {
    let (mut manager, _) = fruit_manager();

    manager.handle_location("apple");
    manager.handle_location("mystery");
    manager.handle_location("pineapple");
    assert_eq!(manager.surface().clear_count(), 3);
    assert_eq!(manager.surface().attached().len(), 1);
    assert_eq!(manager.surface().rendered(), "🍍");
}

#[tokio::test]
async fn run_processes_locations_in_order() {
    let (mut manager, fruits) = fruit_manager();

    let locations = stream::iter(["", "banana", "apple;type=gala"].map(String::from));
    manager.run(locations).await;

    assert_eq!(
        manager.current_place_request(),
        &PlaceRequest::new("apple").with_param("type", "gala")
    );
    let apple = presenter(&mut manager, &fruits.apple);
    let banana = presenter(&mut manager, &fruits.banana);
    assert_eq!(
        apple.hooks(),
        vec![Bind, PrepareFromRequest, Show, Hide, PrepareFromRequest, Show]
    );
    assert_eq!(banana.hooks(), vec![Bind, PrepareFromRequest, Show, Hide]);
}
