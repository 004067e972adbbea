use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use exposer_model::{
    InstanceCall, InstanceMethod, MethodError, MethodFuture, MethodOutput, Model, StaticCall,
    StaticMethod,
};

use super::pagination::{DEFAULT_ITEMS_PER_PAGE, MIN_ITEMS_PER_PAGE};

pub const DEFAULT_API_BASE: &str = "/api/v1";
pub const DEFAULT_OWNER_FIELD: &str = "owner";

/// How one model is exposed: where it is mounted and which methods are callable.
///
/// The registered method names are the allow-list; nothing else can be invoked.
pub struct ExposedModel<M: Model> {
    mount_point: String,
    owner_field: String,
    default_items_per_page: u64,
    instance_methods: BTreeMap<String, InstanceMethod<M>>,
    static_methods: BTreeMap<String, StaticMethod<M>>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ExposedModel<M> {
    /// Mounted at `/api/v1/<lower-case model name>`.
    pub fn new() -> Self {
        Self::under(DEFAULT_API_BASE)
    }

    /// Mounted at `<base>/<lower-case model name>`.
    pub fn under(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            mount_point: normalize_mount(&format!("{base}/{}", M::NAME.to_lowercase())),
            owner_field: DEFAULT_OWNER_FIELD.to_string(),
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            instance_methods: BTreeMap::new(),
            static_methods: BTreeMap::new(),
            _model: PhantomData,
        }
    }

    pub fn with_mount_point(mut self, path: &str) -> Self {
        self.mount_point = normalize_mount(path);
        self
    }

    /// Schema field stamped with the creator's id on create.
    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = field.into();
        self
    }

    pub fn with_items_per_page(mut self, n: u64) -> Self {
        self.default_items_per_page = n.max(MIN_ITEMS_PER_PAGE);
        self
    }

    pub fn instance_method<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(InstanceCall<M>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<MethodOutput<M>, MethodError>> + Send + 'static,
    {
        let method: InstanceMethod<M> = Arc::new(move |call: InstanceCall<M>| -> MethodFuture<M> {
            Box::pin(method(call))
        });
        self.instance_methods.insert(name.into(), method);
        self
    }

    pub fn static_method<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(StaticCall<M>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<MethodOutput<M>, MethodError>> + Send + 'static,
    {
        let method: StaticMethod<M> = Arc::new(move |call: StaticCall<M>| -> MethodFuture<M> {
            Box::pin(method(call))
        });
        self.static_methods.insert(name.into(), method);
        self
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    pub fn owner_field(&self) -> &str {
        &self.owner_field
    }

    pub fn default_items_per_page(&self) -> u64 {
        self.default_items_per_page
    }

    pub fn find_instance_method(&self, name: &str) -> Option<&InstanceMethod<M>> {
        self.instance_methods.get(name)
    }

    pub fn find_static_method(&self, name: &str) -> Option<&StaticMethod<M>> {
        self.static_methods.get(name)
    }

    pub fn instance_method_names(&self) -> impl Iterator<Item = &str> {
        self.instance_methods.keys().map(String::as_str)
    }

    pub fn static_method_names(&self) -> impl Iterator<Item = &str> {
        self.static_methods.keys().map(String::as_str)
    }
}

impl<M: Model> Default for ExposedModel<M> {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_mount(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
