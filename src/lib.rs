/// Defines custom error types.
pub mod error;

/// Constants shared across the crate.
pub mod constants;

/// Settings access and the `view` configuration section.
pub mod settings;

/// Collaborator interfaces: router, request and translator.
pub mod services;

/// File-system template loader with namespaced search paths.
pub mod loader;

/// Helper bundles registered into the template engine.
pub mod helpers;

/// The view and the lazily built view service.
pub mod view;

pub use error::{Error, Result};
pub use helpers::{CoreHelpers, HelperBundle};
pub use services::{Request, Route, Router, Services, Translator};
pub use settings::{EngineOptions, Settings, TemplatePaths, ViewConfig, ViewSettings};
pub use view::{View, ViewService};
