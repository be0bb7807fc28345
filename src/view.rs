use crate::constants::APP_GLOBAL;
use crate::error::Result;
use crate::helpers::{CoreHelpers, HelperBundle};
use crate::loader::FilesystemLoader;
use crate::services::Services;
use crate::settings::{Autoescape, EngineOptions, ViewSettings};
use log::{debug, warn};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use serde_json::json;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A template environment wired to the application's services.
pub struct View {
    env: Environment<'static>,
    services: Services,
    app_globals: bool,
    app_settings: serde_json::Value,
}

impl View {
    /// Builds the environment: loader over `settings.paths`, engine options,
    /// the core helpers and every extension bundle.
    pub fn new(settings: &ViewSettings, services: Services) -> Result<Self> {
        let paths = settings.validate()?;
        let loader = FilesystemLoader::new(paths.clone())?;

        let mut env = Environment::new();
        env.set_loader(move |name| loader.load(name));
        apply_options(&mut env, &settings.options);

        let core = CoreHelpers::new(services.clone());
        core.register(&mut env);
        debug!("Registered helper bundle '{}'", core.name());
        register_extensions(&mut env, &settings.extensions);

        Ok(Self {
            env,
            services,
            app_globals: settings.options.app_globals,
            app_settings: settings.app_settings.clone(),
        })
    }

    /// Renders the named template with `context`.
    ///
    /// # Arguments
    /// * `name` - Template name, optionally prefixed with `@namespace/`
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let tmpl = self.env.get_template(name)?;
        if !self.app_globals {
            return Ok(tmpl.render(context)?);
        }

        // Merge the app global with the provided context
        let merged_context = match context.as_object() {
            Some(context_obj) => {
                let mut result = serde_json::Map::new();
                result.insert(APP_GLOBAL.to_string(), self.app_global());
                for (key, value) in context_obj {
                    result.insert(key.clone(), value.clone());
                }
                serde_json::Value::Object(result)
            }
            // If the context isn't an object, just use the provided context
            None => context.clone(),
        };
        Ok(tmpl.render(merged_context)?)
    }

    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    fn app_global(&self) -> serde_json::Value {
        let request = &self.services.request;
        json!({
            "settings": self.app_settings,
            "request": {
                "uri": request.uri(),
                "language": request.language(),
            },
            "route": request.route(),
        })
    }
}

/// Registers every extension in order. The same bundle instance listed
/// twice is registered once; distinct bundles sharing a name all register.
fn register_extensions(env: &mut Environment<'static>, extensions: &[Arc<dyn HelperBundle>]) {
    let mut registered: Vec<&Arc<dyn HelperBundle>> = Vec::new();
    for bundle in extensions {
        if registered.iter().any(|seen| same_bundle(seen, bundle)) {
            warn!("Helper bundle '{}' is listed twice, skipping", bundle.name());
            continue;
        }
        bundle.register(env);
        debug!("Registered helper bundle '{}'", bundle.name());
        registered.push(bundle);
    }
}

fn same_bundle(a: &Arc<dyn HelperBundle>, b: &Arc<dyn HelperBundle>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn apply_options(env: &mut Environment<'static>, options: &EngineOptions) {
    env.set_debug(options.debug);
    env.set_undefined_behavior(if options.strict_variables {
        UndefinedBehavior::Strict
    } else {
        UndefinedBehavior::Lenient
    });
    match options.autoescape {
        Autoescape::ByName => env.set_auto_escape_callback(minijinja::default_auto_escape_callback),
        Autoescape::Html => env.set_auto_escape_callback(|_| AutoEscape::Html),
        Autoescape::Json => env.set_auto_escape_callback(|_| AutoEscape::Json),
        Autoescape::None => env.set_auto_escape_callback(|_| AutoEscape::None),
    }
    env.set_trim_blocks(options.trim_blocks);
    env.set_lstrip_blocks(options.lstrip_blocks);
    env.set_keep_trailing_newline(options.keep_trailing_newline);

    for (name, value) in &options.globals {
        env.add_global(name.clone(), Value::from_serialize(value));
    }
    for key in options.unrecognized.keys() {
        warn!("Ignoring unsupported view option '{key}'");
    }
    debug!("Applied view options: {options:?}");
}

/// Builds the [`View`] on first use and hands out the same instance after.
///
/// Construction is guarded so concurrent first callers build it once. A
/// failed construction is not memoized; the next call tries again and
/// reports the same error.
pub struct ViewService {
    settings: ViewSettings,
    services: Services,
    view: OnceLock<View>,
    init: Mutex<()>,
}

impl ViewService {
    pub fn new(settings: ViewSettings, services: Services) -> Self {
        Self { settings, services, view: OnceLock::new(), init: Mutex::new(()) }
    }

    pub fn view(&self) -> Result<&View> {
        if let Some(view) = self.view.get() {
            return Ok(view);
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(view) = self.view.get() {
            return Ok(view);
        }
        let view = View::new(&self.settings, self.services.clone())?;
        debug!("View initialized");
        Ok(self.view.get_or_init(|| view))
    }

    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        self.view()?.render(name, context)
    }

    pub fn is_initialized(&self) -> bool {
        self.view.get().is_some()
    }
}
