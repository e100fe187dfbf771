use std::{
    any::Any,
    collections::HashMap,
    marker::PhantomData,
    sync::{Arc, Weak},
};

use thiserror::Error;
use tracing::debug;

use crate::presenter::Presenter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no presenter registered for token '{token}'")]
    NotFound { token: String },
    #[error("presenter for token '{token}' is not a {expected}")]
    TypeMismatch {
        token: String,
        expected: &'static str,
    },
}

#[derive(Clone)]
struct Instance {
    presenter: Arc<dyn Presenter>,
    any: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    fn new<P: Presenter>(presenter: Arc<P>) -> Self {
        Self {
            presenter: presenter.clone(),
            any: presenter,
        }
    }

    fn downcast<P: Presenter>(&self) -> Option<Arc<P>> {
        Arc::clone(&self.any).downcast::<P>().ok()
    }
}

type Factory = Box<dyn Fn() -> Instance + Send + Sync>;

/// Only [`resolve`](Self::resolve) and [`lookup`](Self::lookup) create
/// instances, and both need `&mut self`, so one token is never built twice.
#[derive(Default)]
pub struct PresenterRegistry {
    factories: HashMap<String, Factory>,
    instances: HashMap<String, Instance>,
}

impl PresenterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the factory for `token`, replacing any previous one. Instances
    /// already built for `token` stay cached.
    pub fn register<P, F>(&mut self, token: impl Into<String>, factory: F) -> PresenterHandle<P>
    where
        P: Presenter,
        F: Fn() -> P + Send + Sync + 'static,
    {
        self.register_cyclic(token, move |_: &Weak<P>| factory())
    }

    /// Like [`register`](Self::register), but the factory receives a weak
    /// reference to the instance it builds, for views that implement
    /// [`WithPresenter`](crate::presenter::WithPresenter).
    pub fn register_cyclic<P, F>(
        &mut self,
        token: impl Into<String>,
        factory: F,
    ) -> PresenterHandle<P>
    where
        P: Presenter,
        F: Fn(&Weak<P>) -> P + Send + Sync + 'static,
    {
        let token = token.into();
        let replaced = self
            .factories
            .insert(
                token.clone(),
                Box::new(move || Instance::new(Arc::new_cyclic(&factory))),
            )
            .is_some();
        debug!(token = %token, replaced, "registered presenter factory");
        PresenterHandle::new(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    pub fn is_instantiated(&self, token: &str) -> bool {
        self.instances.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn resolve(&mut self, token: &str) -> Option<Arc<dyn Presenter>> {
        if let Some(instance) = self.instances.get(token) {
            return Some(Arc::clone(&instance.presenter));
        }

        let instance = (self.factories.get(token)?)();
        Some(self.store_and_bind(token, instance).presenter)
    }

    /// Typed variant of [`resolve`](Self::resolve). A freshly built instance
    /// of the wrong type is dropped without being cached or bound.
    pub fn lookup<P: Presenter>(&mut self, token: &str) -> Result<Arc<P>, LookupError> {
        let mismatch = || LookupError::TypeMismatch {
            token: token.to_string(),
            expected: std::any::type_name::<P>(),
        };

        if let Some(instance) = self.instances.get(token) {
            return instance.downcast::<P>().ok_or_else(mismatch);
        }

        let factory = self
            .factories
            .get(token)
            .ok_or_else(|| LookupError::NotFound {
                token: token.to_string(),
            })?;
        let instance = factory();
        let typed = instance.downcast::<P>().ok_or_else(mismatch)?;
        self.store_and_bind(token, instance);
        Ok(typed)
    }

    pub fn clear_instances(&mut self) {
        self.instances.clear();
    }

    fn store_and_bind(&mut self, token: &str, instance: Instance) -> Instance {
        self.instances.insert(token.to_string(), instance.clone());
        instance.presenter.bind();
        debug!(token, "created and bound presenter");
        instance
    }
}

pub struct PresenterHandle<P> {
    token: String,
    _presenter: PhantomData<fn() -> P>,
}

impl<P: Presenter> PresenterHandle<P> {
    fn new(token: String) -> Self {
        Self {
            token,
            _presenter: PhantomData,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn get(&self, registry: &mut PresenterRegistry) -> Option<Arc<P>> {
        registry.lookup::<P>(&self.token).ok()
    }
}

impl<P> Clone for PresenterHandle<P> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            _presenter: PhantomData,
        }
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
