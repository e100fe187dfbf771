use std::{fmt, sync::Arc};

use place::PlaceRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    blocks: Vec<String>,
}

impl Content {
    pub fn text(block: impl Into<String>) -> Self {
        Self {
            blocks: vec![block.into()],
        }
    }

    pub fn from_blocks<I, B>(blocks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<String>,
    {
        Self {
            blocks: blocks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, block: impl Into<String>) {
        self.blocks.push(block.into());
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blocks.join("\n"))
    }
}

pub trait View: Send + Sync {
    fn content(&self) -> Content;
}

/// A view that reads back from its presenter. Presenters own their views,
/// so implementors hold a `Weak<P>` handed out by
/// [`PresenterRegistry::register_cyclic`](crate::registry::PresenterRegistry::register_cyclic).
pub trait WithPresenter<P: Presenter> {
    /// `None` once the presenter has been dropped.
    fn presenter(&self) -> Option<Arc<P>>;
}

/// Hooks take `&self`; presenters that track state keep it behind their own
/// interior mutability.
pub trait Presenter: Send + Sync + 'static {
    fn view(&self) -> &dyn View;

    /// Called once, right after construction and before any other hook.
    fn bind(&self) {}

    /// Called on every navigation to this presenter, before [`show`](Presenter::show).
    fn prepare_from_request(&self, _place: &PlaceRequest) {}

    /// Called after the view content has been attached to the surface.
    fn show(&self) {}

    /// Called before the view content is removed because another presenter takes over.
    fn hide(&self) {}
}
