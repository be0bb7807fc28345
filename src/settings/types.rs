//! Deserializable shapes of the `view` settings section.

use crate::constants::MAIN_NAMESPACE;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

/// Template search directories grouped by namespace.
///
/// Accepts a single directory, a list of directories, or a mapping of
/// namespace to one or more directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PathsRepr")]
pub struct TemplatePaths {
    namespaces: IndexMap<String, Vec<PathBuf>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl From<OneOrMany> for Vec<PathBuf> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(path) => vec![path],
            OneOrMany::Many(paths) => paths,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathsRepr {
    Plain(OneOrMany),
    Namespaced(IndexMap<String, OneOrMany>),
}

impl From<PathsRepr> for TemplatePaths {
    fn from(value: PathsRepr) -> Self {
        let mut paths = TemplatePaths::new();
        match value {
            PathsRepr::Plain(dirs) => {
                for dir in Vec::from(dirs) {
                    paths.add(dir);
                }
            }
            PathsRepr::Namespaced(map) => {
                for (namespace, dirs) in map {
                    for dir in Vec::from(dirs) {
                        paths.add_namespaced(&namespace, dir);
                    }
                }
            }
        }
        paths
    }
}

impl TemplatePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directory to the main namespace.
    pub fn add(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.add_namespaced(MAIN_NAMESPACE, dir)
    }

    /// Appends a directory to `namespace`.
    pub fn add_namespaced(&mut self, namespace: &str, dir: impl Into<PathBuf>) -> &mut Self {
        self.namespaces.entry(namespace.to_string()).or_default().push(dir.into());
        self
    }

    pub fn get(&self, namespace: &str) -> &[PathBuf] {
        self.namespaces.get(namespace).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.namespaces.iter().map(|(ns, dirs)| (ns.as_str(), dirs.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(Vec::is_empty)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for TemplatePaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut paths = TemplatePaths::new();
        for dir in iter {
            paths.add(dir);
        }
        paths
    }
}

impl From<&str> for TemplatePaths {
    fn from(dir: &str) -> Self {
        std::iter::once(dir).collect()
    }
}

impl From<PathBuf> for TemplatePaths {
    fn from(dir: PathBuf) -> Self {
        std::iter::once(dir).collect()
    }
}

impl From<Vec<PathBuf>> for TemplatePaths {
    fn from(dirs: Vec<PathBuf>) -> Self {
        dirs.into_iter().collect()
    }
}

/// Escaping strategy applied to template output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AutoescapeRepr")]
pub enum Autoescape {
    /// Chosen from the template's file extension.
    #[default]
    ByName,
    Html,
    Json,
    None,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AutoescapeRepr {
    Flag(bool),
    Strategy(String),
}

impl TryFrom<AutoescapeRepr> for Autoescape {
    type Error = String;

    fn try_from(value: AutoescapeRepr) -> Result<Self, Self::Error> {
        match value {
            AutoescapeRepr::Flag(true) => Ok(Autoescape::Html),
            AutoescapeRepr::Flag(false) => Ok(Autoescape::None),
            AutoescapeRepr::Strategy(strategy) => match strategy.as_str() {
                "name" => Ok(Autoescape::ByName),
                "html" => Ok(Autoescape::Html),
                "json" => Ok(Autoescape::Json),
                "none" => Ok(Autoescape::None),
                other => Err(format!(
                    "unknown autoescape strategy '{other}', expected one of: name, html, json, none"
                )),
            },
        }
    }
}

/// Options applied to the template environment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub debug: bool,
    /// Undefined variables fail the render instead of printing nothing.
    pub strict_variables: bool,
    pub autoescape: Autoescape,
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
    /// Extra globals visible to every template.
    pub globals: IndexMap<String, serde_json::Value>,
    /// Inject the `app` global (settings, request and route) on every render.
    pub app_globals: bool,
    /// Keys this engine does not understand. Logged and ignored.
    #[serde(flatten)]
    pub unrecognized: IndexMap<String, serde_json::Value>,
}

/// The `view` section as it appears in a settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub paths: Option<TemplatePaths>,
    #[serde(default)]
    pub options: EngineOptions,
    /// Names of helper bundles to register in addition to the core bundle.
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn paths(value: serde_json::Value) -> TemplatePaths {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_path() {
        let paths = paths(json!("templates"));
        assert_eq!(paths.get(MAIN_NAMESPACE), &[PathBuf::from("templates")]);
    }

    #[test]
    fn test_path_list_keeps_order() {
        let paths = paths(json!(["a", "b"]));
        assert_eq!(paths.get(MAIN_NAMESPACE), &[PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_namespaced_paths() {
        let paths = paths(json!({ "__main__": "templates", "admin": ["admin", "shared"] }));
        assert_eq!(paths.get(MAIN_NAMESPACE), &[PathBuf::from("templates")]);
        assert_eq!(paths.get("admin").len(), 2);
        assert_eq!(paths.get("admin")[1], Path::new("shared"));
        assert!(paths.get("missing").is_empty());
    }

    #[test]
    fn test_empty_paths() {
        assert!(paths(json!([])).is_empty());
        assert!(paths(json!({ "admin": [] })).is_empty());
        assert!(!TemplatePaths::from("templates").is_empty());
    }

    #[test]
    fn test_autoescape_values() {
        let parse = |v| serde_json::from_value::<Autoescape>(v);
        assert_eq!(parse(json!(false)).unwrap(), Autoescape::None);
        assert_eq!(parse(json!(true)).unwrap(), Autoescape::Html);
        assert_eq!(parse(json!("json")).unwrap(), Autoescape::Json);
        assert_eq!(parse(json!("name")).unwrap(), Autoescape::ByName);
        assert!(parse(json!("css")).is_err());
    }

    #[test]
    fn test_engine_options_collect_unrecognized_keys() {
        let options: EngineOptions = serde_json::from_value(json!({
            "debug": true,
            "strict_variables": true,
            "cache": "/tmp/cache",
            "charset": "utf-8",
        }))
        .unwrap();
        assert!(options.debug);
        assert!(options.strict_variables);
        assert!(!options.app_globals);
        assert_eq!(options.autoescape, Autoescape::ByName);
        assert_eq!(
            options.unrecognized.keys().collect::<Vec<_>>(),
            vec!["cache", "charset"]
        );
    }

    #[test]
    fn test_view_config_defaults() {
        let config: ViewConfig = serde_json::from_value(json!({})).unwrap();
        assert!(config.paths.is_none());
        assert!(config.extensions.is_empty());
        assert_eq!(config.options, EngineOptions::default());
    }
}
