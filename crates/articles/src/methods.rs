//! Methods exposed on the `Article` model.

use serde_json::{Value, json};

use exposer_model::{
    Filter, InstanceCall, MethodError, MethodOutput, Model, Query, StaticCall, WriteDecision,
    to_document,
};

use crate::Article;

/// Mark an article as published. Requires the caller to be allowed to set `published`.
pub async fn publish(call: InstanceCall<Article>) -> Result<MethodOutput<Article>, MethodError> {
    let user = call.user.as_ref();
    match call.item.can_update(user).await? {
        WriteDecision::Allowed(fields) if fields.iter().any(|f| f == "published") => {}
        WriteDecision::Allowed(_) => return Err(MethodError::Forbidden),
        WriteDecision::Denied => return Err(MethodError::denied(user)),
    }

    let mut document = to_document(&call.item)?;
    Article::set_field(&mut document, "published", Value::Bool(true));
    let saved = call.store.save(call.item.id(), document).await?;

    tracing::info!(article = %saved.id, "article published");
    Ok(MethodOutput::Item(saved))
}

/// Number of published articles.
pub async fn count_published(call: StaticCall<Article>) -> Result<MethodOutput<Article>, MethodError> {
    let count = call.store.count(&Filter::new().eq("published", true)).await?;
    Ok(MethodOutput::Value(json!(count)))
}

/// Articles whose title contains `args.q` (case-insensitive).
pub async fn search(call: StaticCall<Article>) -> Result<MethodOutput<Article>, MethodError> {
    let needle = call
        .args
        .get("q")
        .and_then(Value::as_str)
        .ok_or_else(|| MethodError::invalid_arguments("expected {\"q\": <string>}"))?
        .to_lowercase();

    let matches = call
        .store
        .find_all(&Query::default())
        .await?
        .into_iter()
        .filter(|a| a.title.to_lowercase().contains(&needle))
        .collect();
    Ok(MethodOutput::Items(matches))
}
