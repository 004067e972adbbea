use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query as QueryParams, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use exposer_auth::User;
use exposer_core::Document;
use exposer_model::{Filter, Model, Query, Schema, Sort, Store, to_document};

use crate::context::CurrentUser;
use crate::exposure::dto::{Envelope, ListMetadata};
use crate::exposure::formatter::format_page;
use crate::exposure::{ApiError, Exposure, Pagination};

const RESERVED_PARAMS: [&str; 3] = ["page", "itemsPerPage", "sort"];

pub async fn list<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    params: Result<QueryParams<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let QueryParams(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let schema = M::schema();
    let pagination = Pagination::from_params(&params, exposure.descriptor().default_items_per_page());
    let filter = filter_from_params(&schema, &params);
    let sort = params
        .get("sort")
        .and_then(|raw| Sort::parse(raw))
        .filter(|s| schema.has_field(&s.field));

    let store = exposure.store();
    let (count, items) = if filter.is_empty() && sort.is_none() {
        let count = store.count(&filter).await?;
        let items = store
            .find_all(&Query {
                filter: filter.clone(),
                skip: pagination.skip(),
                limit: Some(pagination.items_per_page),
                ..Query::default()
            })
            .await?;
        (count, items)
    } else {
        readable_window(store, &filter, sort.as_ref(), user.user(), &pagination).await?
    };

    let (data, fields_readable) = format_page(&items, user.user())?;
    let metadata = ListMetadata {
        model_name: M::NAME.to_string(),
        fields_readable,
        page: pagination.page,
        items_per_page: pagination.items_per_page,
        number_of_pages: pagination.number_of_pages(count),
        count,
        filter,
    };

    Ok(Envelope::ok(StatusCode::OK, data).with_metadata(metadata).into_response())
}

/// Filter and sort using only what each item lets `user` read.
///
/// An item whose read decision hides a filtered field does not match; a
/// hidden sort field orders like a missing value. Counting and paging happen
/// after that, so neither reveals hidden values.
async fn readable_window<M: Model>(
    store: &Arc<dyn Store<M>>,
    filter: &Filter,
    sort: Option<&Sort>,
    user: Option<&User>,
    pagination: &Pagination,
) -> Result<(u64, Vec<M>), ApiError> {
    let candidates = store.find_all(&Query::filtered(filter.clone())).await?;

    let mut visible = Vec::with_capacity(candidates.len());
    for item in candidates {
        let decision = item.can_read(user);
        if !filter.conditions().keys().all(|field| decision.permits(field)) {
            continue;
        }
        let mut sort_key = Document::new();
        if let Some(sort) = sort.filter(|s| decision.permits(&s.field)) {
            if let Some(value) = to_document(&item)?.remove(&sort.field) {
                sort_key.insert(sort.field.clone(), value);
            }
        }
        visible.push((sort_key, item));
    }

    if let Some(sort) = sort {
        visible.sort_by(|(a, _), (b, _)| sort.compare(a, b));
    }

    let count = visible.len() as u64;
    let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.items_per_page).unwrap_or(usize::MAX);
    let items = visible
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|(_, item)| item)
        .collect();

    Ok((count, items))
}

/// Equality conditions for every query parameter naming a schema field.
fn filter_from_params(schema: &Schema, params: &HashMap<String, String>) -> Filter {
    params
        .iter()
        .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
        .filter_map(|(key, raw)| schema.get(key).map(|spec| (key, spec.kind.coerce(raw))))
        .fold(Filter::new(), |filter, (key, value)| filter.eq(key.clone(), value))
}
