use crate::constants::MAIN_NAMESPACE;
use crate::error::{Error, Result};
use crate::settings::TemplatePaths;
use indexmap::IndexMap;
use log::debug;
use minijinja::path_loader;

type DirLoader =
    Box<dyn Fn(&str) -> std::result::Result<Option<String>, minijinja::Error> + Send + Sync>;

/// Resolves template names against namespaced search directories.
///
/// `"page.html"` is looked up in the main namespace, `"@admin/page.html"`
/// in the `admin` namespace. Each directory is served by MiniJinja's
/// `path_loader`; directories are searched in order and the first hit wins.
pub struct FilesystemLoader {
    paths: TemplatePaths,
    namespaces: IndexMap<String, Vec<DirLoader>>,
}

impl FilesystemLoader {
    /// Creates a loader, failing if any configured directory is missing.
    pub fn new(paths: TemplatePaths) -> Result<Self> {
        let mut namespaces: IndexMap<String, Vec<DirLoader>> = IndexMap::new();
        for (namespace, dirs) in paths.namespaces() {
            for dir in dirs {
                if !dir.is_dir() {
                    return Err(Error::ConfigurationError(format!(
                        "the \"{}\" directory of namespace \"{namespace}\" does not exist",
                        dir.display()
                    )));
                }
                debug!("Template path [{namespace}]: {}", dir.display());
                namespaces
                    .entry(namespace.to_string())
                    .or_default()
                    .push(Box::new(path_loader(dir)));
            }
        }
        Ok(Self { paths, namespaces })
    }

    /// Loader callback for the template environment. Unknown names yield
    /// `None`, which the environment reports as "template not found".
    pub fn load(&self, name: &str) -> std::result::Result<Option<String>, minijinja::Error> {
        let Some((namespace, relative)) = split_name(name) else {
            return Ok(None);
        };
        let Some(loaders) = self.namespaces.get(namespace) else {
            return Ok(None);
        };
        for loader in loaders {
            if let Some(source) = loader(relative)? {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for FilesystemLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemLoader").field("paths", &self.paths).finish()
    }
}

fn split_name(name: &str) -> Option<(&str, &str)> {
    match name.strip_prefix('@') {
        Some(rest) => rest.split_once('/'),
        None => Some((MAIN_NAMESPACE, name)),
    }
}
