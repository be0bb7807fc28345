//! Helper bundles: groups of functions and filters registered into the
//! template environment.
//!
//! [`CoreHelpers`] is always registered. Applications add their own bundles
//! by implementing [`HelperBundle`].
//!
//! | name | kind | delegates to |
//! | --- | --- | --- |
//! | `base_url(path="/")` | function | router base path |
//! | `url_for(route, args={})` | function | router |
//! | `uri_for(route, args={}, query={})` | function | router |
//! | `current_url()` | function | request route, router |
//! | `current_uri()` | function | request |
//! | `mail_to(email)` | function | |
//! | `lpad(pad, length)`, `rpad(pad, length)` | filter | |
//! | `price(digits, dot=".")` | filter | |
//! | `trans(params={}, namespace=none)` | filter | translator |
//! | `ptrans(count, params={}, namespace=none)` | filter | translator |
//! | `etrans`, `eptrans`, `gtrans`, `gptrans` | filter | translator, fixed namespace |

mod format;
mod translation;
mod url;

pub use format::{format_price, left_pad, mail_to, right_pad};
pub use translation::namespace_from_route;
pub use url::normalize_path;

use crate::constants::{namespaces, CORE_BUNDLE};
use crate::services::{Params, Services};
use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, ErrorKind};
use std::sync::Arc;

/// A named set of functions and filters that can be registered into the
/// template environment.
pub trait HelperBundle: Send + Sync {
    /// Name used to select the bundle from settings files.
    fn name(&self) -> &str;

    /// Adds the bundle's functions, filters and globals to `env`.
    fn register(&self, env: &mut Environment<'static>);
}

/// The built-in helpers: URL building, formatting and translation.
#[derive(Debug, Clone)]
pub struct CoreHelpers {
    services: Services,
}

impl CoreHelpers {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

/// Converts a template mapping into string parameters.
///
/// Missing, undefined and `none` values yield an empty map.
fn to_params(value: Option<Value>) -> Result<Params, minijinja::Error> {
    let mut params = Params::new();
    let Some(value) = value else {
        return Ok(params);
    };
    if value.is_undefined() || value.is_none() {
        return Ok(params);
    }
    if value.kind() != ValueKind::Map {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("expected a mapping of parameters, got {}", value.kind()),
        ));
    }
    for key in value.try_iter()? {
        let item = value.get_item(&key)?;
        params.insert(key.to_string(), item.to_string());
    }
    Ok(params)
}

impl HelperBundle for CoreHelpers {
    fn name(&self) -> &str {
        CORE_BUNDLE
    }

    fn register(&self, env: &mut Environment<'static>) {
        let helpers = Arc::new(self.clone());

        env.add_filter("lpad", |text: Value, pad: String, length: usize| {
            Ok::<_, minijinja::Error>(left_pad(&text.to_string(), &pad, length)?)
        });
        env.add_filter("rpad", |text: Value, pad: String, length: usize| {
            Ok::<_, minijinja::Error>(right_pad(&text.to_string(), &pad, length)?)
        });
        env.add_filter("price", |value: Value, digits: usize, dot: Option<String>| {
            format_price(&value.to_string(), digits, dot.as_deref().unwrap_or("."))
        });
        env.add_function("mail_to", |email: String| mail_to(&email));

        let h = helpers.clone();
        env.add_function("base_url", move |path: Option<String>| {
            h.base_url(path.as_deref().unwrap_or("/"))
        });
        let h = helpers.clone();
        env.add_function("url_for", move |route: String, arguments: Option<Value>| {
            Ok::<_, minijinja::Error>(h.url_for(&route, &to_params(arguments)?)?)
        });
        let h = helpers.clone();
        env.add_function(
            "uri_for",
            move |route: String, arguments: Option<Value>, query: Option<Value>| {
                Ok::<_, minijinja::Error>(h.uri_for(
                    &route,
                    &to_params(arguments)?,
                    &to_params(query)?,
                )?)
            },
        );
        let h = helpers.clone();
        env.add_function("current_url", move || Ok::<_, minijinja::Error>(h.current_url()?));
        let h = helpers.clone();
        env.add_function("current_uri", move || h.current_uri());

        register_translation(env, "trans", "ptrans", &helpers);
        register_fixed_translation(env, "etrans", "eptrans", namespaces::ERRORS, &helpers);
        register_fixed_translation(env, "gtrans", "gptrans", namespaces::GENERAL, &helpers);
    }
}

/// Registers a `translate`/`plural_translate` filter pair whose last
/// argument selects the namespace.
fn register_translation(
    env: &mut Environment<'static>,
    name: &'static str,
    plural_name: &'static str,
    helpers: &Arc<CoreHelpers>,
) {
    let h = helpers.clone();
    env.add_filter(
        name,
        move |key: String, parameters: Option<Value>, namespace: Option<String>| {
            Ok::<_, minijinja::Error>(h.translate(
                &key,
                &to_params(parameters)?,
                namespace.as_deref(),
            )?)
        },
    );
    let h = helpers.clone();
    env.add_filter(
        plural_name,
        move |key: String, count: i64, parameters: Option<Value>, namespace: Option<String>| {
            Ok::<_, minijinja::Error>(h.plural_translate(
                &key,
                count,
                &to_params(parameters)?,
                namespace.as_deref(),
            )?)
        },
    );
}

/// Registers a filter pair bound to `namespace`. They take no namespace
/// argument.
fn register_fixed_translation(
    env: &mut Environment<'static>,
    name: &'static str,
    plural_name: &'static str,
    namespace: &'static str,
    helpers: &Arc<CoreHelpers>,
) {
    let h = helpers.clone();
    env.add_filter(name, move |key: String, parameters: Option<Value>| {
        Ok::<_, minijinja::Error>(h.translate(&key, &to_params(parameters)?, Some(namespace))?)
    });
    let h = helpers.clone();
    env.add_filter(
        plural_name,
        move |key: String, count: i64, parameters: Option<Value>| {
            Ok::<_, minijinja::Error>(h.plural_translate(
                &key,
                count,
                &to_params(parameters)?,
                Some(namespace),
            )?)
        },
    );
}
