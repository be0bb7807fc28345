use super::CoreHelpers;
use crate::constants::attributes;
use crate::error::{Error, Result};
use crate::services::Params;

/// Normalizes `path` to exactly one leading slash.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim().trim_start_matches('/'))
}

impl CoreHelpers {
    /// The router's base path joined with `path`.
    pub fn base_url(&self, path: &str) -> String {
        self.services.router.base_path() + &normalize_path(path)
    }

    pub fn url_for(&self, route_name: &str, arguments: &Params) -> Result<String> {
        self.uri_for(route_name, arguments, &Params::new())
    }

    pub fn uri_for(&self, route_name: &str, arguments: &Params, query: &Params) -> Result<String> {
        self.services.router.url_for(route_name, arguments, query)
    }

    /// Re-resolves the current route through the router.
    pub fn current_url(&self) -> Result<String> {
        let route = self
            .services
            .request
            .route()
            .ok_or_else(|| Error::MissingRequestAttribute(attributes::ROUTE.into()))?;
        self.services.router.url_for(&route.name, &route.arguments, &Params::new())
    }

    pub fn current_uri(&self) -> String {
        self.services.request.uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/foo"), "/foo");
        assert_eq!(normalize_path("foo"), "/foo");
        assert_eq!(normalize_path("  ///foo/bar "), "/foo/bar");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }
}
