//! Constants used throughout vista

/// Settings file names in order of preference
pub const SETTINGS_FILENAMES: &[&str] = &["settings.json", "settings.yaml", "settings.yml"];

/// Settings section read by the view
pub const VIEW_SECTION: &str = "view";

/// Namespace for templates addressed without an `@namespace/` prefix
pub const MAIN_NAMESPACE: &str = "__main__";

/// Name of the bundle that is always registered
pub const CORE_BUNDLE: &str = "core";

/// Name of the global injected when `app_globals` is enabled
pub const APP_GLOBAL: &str = "app";

/// Request attribute keys
pub mod attributes {
    pub const ROUTE: &str = "route";
    pub const LANGUAGE: &str = "language";
}

/// Translation namespaces bound by the shortcut filters
pub mod namespaces {
    pub const ERRORS: &str = "errors";
    pub const GENERAL: &str = "general";
}
