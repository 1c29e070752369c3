use actix_web::{HttpRequest, HttpResponse, http::header, post, web};

use crate::{error::ApiError, model::AppState, model::response::SuccessResult};

fn header_value<'a>(req: &'a HttpRequest, name: header::HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Webhook target of the page builder's form action
#[post("/submit")]
async fn submit(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    data.webhook
        .handle(
            header_value(&req, header::CONTENT_TYPE),
            &body,
            header_value(&req, header::AUTHORIZATION),
        )
        .await?;

    Ok(SuccessResult::http_success())
}
