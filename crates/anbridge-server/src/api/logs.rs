use actix_web::{
    HttpRequest, HttpResponse, delete, get,
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
    web,
};

use crate::{
    error::{AccessError, ApiError},
    model::{AppState, response::SuccessResult},
    service::log_store::LogQuery,
};

fn require_admin(req: &HttpRequest, data: &AppState) -> Result<(), AccessError> {
    let Some(expected) = data.admin_token.as_deref() else {
        return Err(AccessError::Disabled);
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(AccessError::Denied),
    }
}

#[get("/logs")]
async fn search(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &data)?;

    let page = data.log_store.query(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[delete("/logs")]
async fn clear(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &data)?;

    data.log_store.clear().await?;
    tracing::info!(path = %data.log_store.path().display(), "Submission log cleared");
    Ok(SuccessResult::http_success())
}

#[get("/logs/download")]
async fn download(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &data)?;

    let file = data.log_store.download().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.content))
}
