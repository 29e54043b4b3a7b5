use crate::api::ApiContext;
use crate::api::document::{self, CollectionDocument, Resource};
use crate::api::http::HttpResponse;
use crate::error::ApiError;

pub(in crate::api) fn list(context: &ApiContext) -> Result<HttpResponse, ApiError> {
    let data = context
        .engine
        .metrics()
        .into_iter()
        .map(|metric| Resource {
            kind: "metrics".to_owned(),
            id: metric.name.clone(),
            attributes: metric,
        })
        .collect();
    document::encode(200, &CollectionDocument { data }, "metrics collection")
}

pub(in crate::api) fn detail(context: &ApiContext, id: &str) -> Result<HttpResponse, ApiError> {
    let metric = context.engine.metric(id).ok_or(ApiError::MetricNotFound)?;
    document::resource("metrics", id, &metric, "metric document")
}
