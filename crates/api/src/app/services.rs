use std::sync::Arc;

use axum::Router;

use exposer_articles::{Article, count_published, publish, search};
use exposer_infra::InMemoryStore;

use crate::config::ApiConfig;
use crate::exposure::{self, ExposedModel};

/// Backing stores of every exposed model.
#[derive(Clone, Default)]
pub struct AppServices {
    pub articles: Arc<InMemoryStore<Article>>,
}

pub fn build_services() -> AppServices {
    AppServices::default()
}

impl AppServices {
    /// Mount every exposed model onto `router`.
    pub fn mount(&self, router: Router, config: &ApiConfig) -> Router {
        exposure::mount(router, article_exposure(config), self.articles.clone())
    }
}

pub fn article_exposure(config: &ApiConfig) -> ExposedModel<Article> {
    ExposedModel::<Article>::under(&config.api_base)
        .with_items_per_page(config.default_items_per_page)
        .instance_method("publish", publish)
        .static_method("countPublished", count_published)
        .static_method("search", search)
}
