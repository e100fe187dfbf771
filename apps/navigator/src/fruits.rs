use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError, Weak,
};

use mvp_core::{Content, PlaceRequest, Presenter, PresenterRegistry, View, WithPresenter};
use tracing::{debug, info};

pub const FRUITS: [(&str, &str); 3] = [("apple", "🍎"), ("banana", "🍌"), ("pineapple", "🍍")];

pub fn register_all(registry: &mut PresenterRegistry) {
    for (token, glyph) in FRUITS {
        registry.register_cyclic(token, move |me: &Weak<FruitPresenter>| {
            FruitPresenter::new(token, glyph, me.clone())
        });
    }
}

pub struct FruitView {
    name: &'static str,
    glyph: &'static str,
    presenter: Weak<FruitPresenter>,
}

impl WithPresenter<FruitPresenter> for FruitView {
    fn presenter(&self) -> Option<Arc<FruitPresenter>> {
        self.presenter.upgrade()
    }
}

impl View for FruitView {
    fn content(&self) -> Content {
        let mut content = Content::text(format!("{} {}", self.glyph, self.name));
        if let Some(presenter) = self.presenter() {
            for detail in presenter.details() {
                content.push(detail);
            }
        }
        content
    }
}

pub struct FruitPresenter {
    view: FruitView,
    details: Mutex<Vec<String>>,
    visits: AtomicUsize,
}

impl FruitPresenter {
    pub fn new(name: &'static str, glyph: &'static str, me: Weak<FruitPresenter>) -> Self {
        Self {
            view: FruitView {
                name,
                glyph,
                presenter: me,
            },
            details: Mutex::new(Vec::new()),
            visits: AtomicUsize::new(0),
        }
    }

    /// Parameters of the last prepared request, formatted as `  key: value`.
    pub fn details(&self) -> Vec<String> {
        self.details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Presenter for FruitPresenter {
    fn view(&self) -> &dyn View {
        &self.view
    }

    fn bind(&self) {
        info!(fruit = self.view.name, "bound presenter");
    }

    fn prepare_from_request(&self, place: &PlaceRequest) {
        let details = place
            .params()
            .iter()
            .map(|(key, value)| format!("  {key}: {value}"))
            .collect();
        *self.details.lock().unwrap_or_else(PoisonError::into_inner) = details;
    }

    fn show(&self) {
        let visits = self.visits.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(fruit = self.view.name, visits, "shown");
    }

    fn hide(&self) {
        debug!(fruit = self.view.name, "hidden");
    }
}
