use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use exposer_auth::User;
use exposer_model::{InstanceCall, MethodOutput, Model, StaticCall};

use crate::context::CurrentUser;
use crate::exposure::dto::{Envelope, MethodRequest};
use crate::exposure::extract::{ItemId, JsonBody};
use crate::exposure::formatter::format_for;
use crate::exposure::{ApiError, Exposure};

pub async fn invoke_static<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<MethodRequest>,
) -> Result<Response, ApiError> {
    let Some(method) = exposure.descriptor().find_static_method(&request.method).cloned() else {
        tracing::warn!(model = M::NAME, method = %request.method, "static method not exposed");
        return Err(ApiError::MethodNotExposed(request.method));
    };

    let user = user.into_inner();
    let output = (*method)(StaticCall {
        user: user.clone(),
        args: request.args,
        store: exposure.store().clone(),
    })
    .await?;

    tracing::debug!(model = M::NAME, method = %request.method, "static method invoked");
    respond(output, user.as_ref())
}

pub async fn invoke_instance<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    ItemId(id): ItemId,
    JsonBody(request): JsonBody<MethodRequest>,
) -> Result<Response, ApiError> {
    // The allow-list is consulted before anything is fetched.
    let Some(method) = exposure.descriptor().find_instance_method(&request.method).cloned() else {
        tracing::warn!(model = M::NAME, method = %request.method, "instance method not exposed");
        return Err(ApiError::MethodNotExposed(request.method));
    };

    let Some(item) = exposure.store().find_by_id(&id).await? else {
        return Err(ApiError::NotFound);
    };

    let user = user.into_inner();
    let output = (*method)(InstanceCall {
        item,
        user: user.clone(),
        args: request.args,
        store: exposure.store().clone(),
    })
    .await?;

    tracing::debug!(model = M::NAME, %id, method = %request.method, "instance method invoked");
    respond(output, user.as_ref())
}

fn respond<M: Model>(output: MethodOutput<M>, user: Option<&User>) -> Result<Response, ApiError> {
    let data = match output {
        MethodOutput::Item(item) => format_for(&item, user)?,
        MethodOutput::Items(items) => Value::Array(
            items
                .iter()
                .map(|item| format_for(item, user))
                .collect::<Result<_, _>>()?,
        ),
        MethodOutput::Value(value) => value,
    };
    Ok(Envelope::ok(StatusCode::OK, data).into_response())
}
