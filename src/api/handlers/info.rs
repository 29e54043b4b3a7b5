use crate::api::ApiContext;
use crate::api::document;
use crate::api::http::HttpResponse;
use crate::error::ApiError;

pub(in crate::api) fn get(context: &ApiContext) -> Result<HttpResponse, ApiError> {
    document::resource("info", "default", &context.info, "info document")
}
