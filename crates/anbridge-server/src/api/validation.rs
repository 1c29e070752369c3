use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, get, web};

use anbridge_validation::ValidationSettings;

use crate::{model::AppState, model::response::ErrorResult};

/// Validation settings of every form that has at least one active rule
#[get("/validation")]
async fn all(data: web::Data<AppState>) -> impl Responder {
    let settings: BTreeMap<String, ValidationSettings> = data
        .forms
        .all()
        .into_iter()
        .map(|form| (form.form_id.to_string(), form.validation_settings()))
        .filter(|(_, settings)| !settings.is_empty())
        .collect();

    HttpResponse::Ok().json(settings)
}

#[get("/validation/{form_id}")]
async fn one(data: web::Data<AppState>, form_id: web::Path<u64>) -> impl Responder {
    let form_id = form_id.into_inner();
    let settings = data
        .forms
        .get(form_id)
        .map(|form| form.validation_settings())
        .filter(|settings| !settings.is_empty());

    match settings {
        Some(settings) => HttpResponse::Ok().json(settings),
        None => ErrorResult::http_response(
            404,
            "no_validation",
            format!("No validation rules configured for form {}", form_id),
        ),
    }
}
