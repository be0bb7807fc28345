use anyhow::anyhow;
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vista::services::{Attribute, Params};
use vista::{Request, Result, Route, Router, Services, Translator};

/// Writes `(name, content)` pairs below `dir`, creating parent directories.
pub fn write_templates(dir: &Path, templates: &[(&str, &str)]) {
    for (name, content) in templates {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        debug!("Wrote template {}", path.display());
    }
}

/// Router with `{placeholder}` patterns, e.g. `/users/{id}`.
pub struct PatternRouter {
    base_path: String,
    routes: IndexMap<String, String>,
    pub calls: AtomicUsize,
}

impl PatternRouter {
    pub fn new(base_path: &str) -> Self {
        Self { base_path: base_path.to_string(), routes: IndexMap::new(), calls: AtomicUsize::new(0) }
    }

    pub fn route(mut self, name: &str, pattern: &str) -> Self {
        self.routes.insert(name.to_string(), pattern.to_string());
        self
    }
}

impl Router for PatternRouter {
    fn base_path(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.base_path.clone()
    }

    fn url_for(&self, name: &str, arguments: &Params, query: &Params) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pattern =
            self.routes.get(name).ok_or_else(|| anyhow!("Named route does not exist for name: {name}"))?;
        let mut path = pattern.clone();
        while let Some(start) = path.find('{') {
            let end = path[start..].find('}').map(|i| start + i).unwrap();
            let key = &path[start + 1..end];
            let value = arguments
                .get(key)
                .ok_or_else(|| anyhow!("Missing data for URL segment: {key}"))?;
            path.replace_range(start..=end, value);
        }
        let mut url = format!("{}{path}", self.base_path);
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        Ok(url)
    }
}

/// Request with a fixed route, language and URI. Counts attribute lookups.
pub struct StaticRequest {
    pub route: Option<Route>,
    pub language: Option<String>,
    pub uri: String,
    pub lookups: AtomicUsize,
}

impl StaticRequest {
    pub fn new(route: Option<Route>, language: Option<&str>, uri: &str) -> Self {
        Self {
            route,
            language: language.map(str::to_string),
            uri: uri.to_string(),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl Request for StaticRequest {
    fn attribute(&self, key: &str) -> Option<Attribute> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match key {
            "route" => self.route.clone().map(Attribute::Route),
            "language" => self.language.clone().map(Attribute::Text),
            _ => None,
        }
    }

    fn uri(&self) -> String {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.uri.clone()
    }
}

/// Translator backed by `(locale, namespace, key)` entries. Plural keys are
/// stored as `key.one` / `key.other`; `{name}` placeholders are filled from
/// the parameters.
#[derive(Default)]
pub struct DictTranslator {
    entries: IndexMap<(String, String, String), String>,
}

impl DictTranslator {
    pub fn entry(mut self, locale: &str, namespace: &str, key: &str, text: &str) -> Self {
        self.entries
            .insert((locale.to_string(), namespace.to_string(), key.to_string()), text.to_string());
        self
    }

    fn lookup(&self, namespace: &str, key: &str, locale: Option<&str>) -> Result<&String> {
        let locale = locale.unwrap_or("en");
        self.entries
            .get(&(locale.to_string(), namespace.to_string(), key.to_string()))
            .ok_or_else(|| anyhow!("Missing translation {locale}/{namespace}: {key}").into())
    }
}

fn fill(text: &str, parameters: &Params) -> String {
    parameters
        .iter()
        .fold(text.to_string(), |text, (name, value)| text.replace(&format!("{{{name}}}"), value))
}

impl Translator for DictTranslator {
    fn translate(
        &self,
        namespace: &str,
        key: &str,
        parameters: &Params,
        locale: Option<&str>,
    ) -> Result<String> {
        Ok(fill(self.lookup(namespace, key, locale)?, parameters))
    }

    fn plural_translate(
        &self,
        namespace: &str,
        key: &str,
        count: i64,
        parameters: &Params,
        locale: Option<&str>,
    ) -> Result<String> {
        let form = if count == 1 { "one" } else { "other" };
        let text = self.lookup(namespace, &format!("{key}.{form}"), locale)?;
        Ok(fill(text, parameters).replace("{count}", &count.to_string()))
    }
}

pub fn services(
    router: Arc<PatternRouter>,
    request: Arc<StaticRequest>,
    translator: Option<Arc<DictTranslator>>,
) -> Services {
    let services = Services::new(router, request);
    match translator {
        Some(translator) => services.with_translator(translator),
        None => services,
    }
}

pub fn default_router() -> PatternRouter {
    PatternRouter::new("/shop")
        .route("home", "/")
        .route("user-profile", "/users/{id}")
        .route("product", "/products/{slug}")
}
