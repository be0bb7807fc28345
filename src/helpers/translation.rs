use super::CoreHelpers;
use crate::constants::attributes;
use crate::error::{Error, Result};
use crate::services::{Params, Translator};
use std::sync::Arc;

/// Derives the translation namespace from a route name.
///
/// Every `-` becomes a `/` path separator, then every `_` becomes `-`.
///
/// # Examples
/// ```
/// use vista::helpers::namespace_from_route;
///
/// assert_eq!(namespace_from_route("user-profile"), "user/profile");
/// assert_eq!(namespace_from_route("password_reset-form"), "password-reset/form");
/// ```
pub fn namespace_from_route(route_name: &str) -> String {
    route_name.replace('-', "/").replace('_', "-")
}

impl CoreHelpers {
    fn translator(&self) -> Result<&Arc<dyn Translator>> {
        self.services
            .translator
            .as_ref()
            .ok_or_else(|| Error::ServiceNotFound("Translator".into()))
    }

    fn namespace(&self, namespace_override: Option<&str>) -> Result<String> {
        if let Some(namespace) = namespace_override {
            return Ok(namespace.to_string());
        }
        let route = self
            .services
            .request
            .route()
            .ok_or_else(|| Error::MissingRequestAttribute(attributes::ROUTE.into()))?;
        Ok(namespace_from_route(&route.name))
    }

    /// Translates `key` in the current route's namespace, or in
    /// `namespace_override` when given.
    pub fn translate(
        &self,
        key: &str,
        parameters: &Params,
        namespace_override: Option<&str>,
    ) -> Result<String> {
        let translator = self.translator()?;
        let namespace = self.namespace(namespace_override)?;
        let locale = self.services.request.language();
        translator.translate(&namespace, key, parameters, locale.as_deref())
    }

    /// Plural-aware variant of [`CoreHelpers::translate`].
    pub fn plural_translate(
        &self,
        key: &str,
        count: i64,
        parameters: &Params,
        namespace_override: Option<&str>,
    ) -> Result<String> {
        let translator = self.translator()?;
        let namespace = self.namespace(namespace_override)?;
        let locale = self.services.request.language();
        translator.plural_translate(&namespace, key, count, parameters, locale.as_deref())
    }
}
