//! Settings access and the `view` section.

mod types;

pub use types::{Autoescape, EngineOptions, TemplatePaths, ViewConfig};

use crate::constants::{SETTINGS_FILENAMES, VIEW_SECTION};
use crate::error::{Error, Result};
use crate::helpers::HelperBundle;
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Application settings: a nested configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    root: serde_json::Value,
}

impl Settings {
    pub fn new(root: serde_json::Value) -> Self {
        Self { root }
    }

    /// Looks up a value by dotted key, e.g. `"view.options.debug"`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        key.split('.').try_fold(&self.root, |value, segment| value.get(segment))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.root
    }

    /// Deserializes the `view` section. A missing section yields an empty
    /// config, which later fails validation for lack of `paths`.
    pub fn view(&self) -> Result<ViewConfig> {
        match self.get(VIEW_SECTION) {
            Some(section) => Ok(ViewConfig::deserialize_from(section)?),
            None => Ok(ViewConfig::default()),
        }
    }

    /// Parses a JSON or YAML settings file, picking the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let root: serde_json::Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "unsupported settings file format '{}'",
                    path.display()
                )))
            }
        };
        debug!("Loaded settings from {}", path.display());
        Ok(Self { root })
    }

    /// Loads the first settings file found in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        for file_name in SETTINGS_FILENAMES.iter() {
            let path = dir.join(file_name);
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Err(Error::SettingsNotFound {
            dir: dir.display().to_string(),
            files: SETTINGS_FILENAMES.join(", "),
        })
    }
}

impl From<serde_json::Value> for Settings {
    fn from(root: serde_json::Value) -> Self {
        Self::new(root)
    }
}

impl ViewConfig {
    fn deserialize_from(section: &serde_json::Value) -> serde_json::Result<Self> {
        serde::Deserialize::deserialize(section)
    }
}

/// Everything the view needs to build its engine.
#[derive(Clone, Default)]
pub struct ViewSettings {
    pub paths: Option<TemplatePaths>,
    pub options: EngineOptions,
    pub extensions: Vec<Arc<dyn HelperBundle>>,
    /// Exposed as `app.settings` when `options.app_globals` is set.
    pub app_settings: serde_json::Value,
}

impl ViewSettings {
    pub fn new(paths: impl Into<TemplatePaths>) -> Self {
        Self { paths: Some(paths.into()), ..Default::default() }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_extension(mut self, bundle: Arc<dyn HelperBundle>) -> Self {
        self.extensions.push(bundle);
        self
    }

    pub fn with_app_settings(mut self, settings: serde_json::Value) -> Self {
        self.app_settings = settings;
        self
    }

    /// Builds view settings from a file-form config, resolving extension
    /// names against the bundles the application makes available.
    pub fn from_config(
        config: ViewConfig,
        available: &[Arc<dyn HelperBundle>],
    ) -> Result<Self> {
        let extensions = config
            .extensions
            .iter()
            .map(|name| {
                available.iter().find(|bundle| bundle.name() == name.as_str()).cloned().ok_or_else(
                    || {
                        Error::ConfigurationError(format!(
                            "the view option \"extensions\" must name registered HelperBundle implementations, \"{name}\" is not one"
                        ))
                    },
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            paths: config.paths,
            options: config.options,
            extensions,
            app_settings: serde_json::Value::Null,
        })
    }

    /// Reads the `view` section of `settings`. The whole settings tree is
    /// kept for the `app` global.
    pub fn from_settings(
        settings: &Settings,
        available: &[Arc<dyn HelperBundle>],
    ) -> Result<Self> {
        let view = Self::from_config(settings.view()?, available)?;
        Ok(view.with_app_settings(settings.as_value().clone()))
    }

    /// Returns the template paths, failing when they are absent or empty.
    pub fn validate(&self) -> Result<&TemplatePaths> {
        match &self.paths {
            Some(paths) if !paths.is_empty() => Ok(paths),
            Some(_) => Err(Error::ConfigurationError(
                "view settings option \"paths\" must not be empty".into(),
            )),
            None => Err(Error::ConfigurationError(
                "view settings must contain the \"paths\" option".into(),
            )),
        }
    }
}

impl std::fmt::Debug for ViewSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSettings")
            .field("paths", &self.paths)
            .field("options", &self.options)
            .field(
                "extensions",
                &self.extensions.iter().map(|bundle| bundle.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
