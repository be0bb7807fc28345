//! Interfaces of the application services the helpers delegate to.
//!
//! The view never owns routing, request handling or translation. The host
//! application implements these traits and hands them to [`Services`].

use crate::constants::attributes;
use crate::error::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Route arguments and query parameters, in insertion order.
pub type Params = IndexMap<String, String>;

/// The resolved target of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: String,
    pub arguments: Params,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), arguments: Params::new() }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// A request attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Route(Route),
    Text(String),
}

/// Resolves route names to URLs.
pub trait Router: Send + Sync {
    /// Path prefix the application is mounted under, e.g. `""` or `"/app"`.
    fn base_path(&self) -> String;

    /// Builds the URL of a named route.
    ///
    /// Unknown routes and missing required arguments are reported by the
    /// implementation; the helpers pass those errors through untouched.
    fn url_for(&self, name: &str, arguments: &Params, query: &Params) -> Result<String>;
}

/// Read-only view of the current request.
pub trait Request: Send + Sync {
    /// Looks up a request attribute such as `"route"` or `"language"`.
    fn attribute(&self, key: &str) -> Option<Attribute>;

    /// The raw request URI.
    fn uri(&self) -> String;

    fn route(&self) -> Option<Route> {
        match self.attribute(attributes::ROUTE) {
            Some(Attribute::Route(route)) => Some(route),
            _ => None,
        }
    }

    fn language(&self) -> Option<String> {
        match self.attribute(attributes::LANGUAGE) {
            Some(Attribute::Text(code)) => Some(code),
            _ => None,
        }
    }
}

/// Looks up localized messages.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        namespace: &str,
        key: &str,
        parameters: &Params,
        locale: Option<&str>,
    ) -> Result<String>;

    /// Like [`Translator::translate`], with `count` selecting the plural form.
    fn plural_translate(
        &self,
        namespace: &str,
        key: &str,
        count: i64,
        parameters: &Params,
        locale: Option<&str>,
    ) -> Result<String>;
}

/// The collaborators handed to the built-in helpers.
#[derive(Clone)]
pub struct Services {
    pub router: Arc<dyn Router>,
    pub request: Arc<dyn Request>,
    pub translator: Option<Arc<dyn Translator>>,
}

impl Services {
    pub fn new(router: Arc<dyn Router>, request: Arc<dyn Request>) -> Self {
        Self { router, request, translator: None }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("translator", &self.translator.is_some())
            .finish_non_exhaustive()
    }
}
