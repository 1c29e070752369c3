use actix_web::{Scope, web};

/// All endpoints under `/<namespace>`
pub fn routes(namespace: &str) -> Scope {
    web::scope(&format!("/{}", namespace.trim_matches('/')))
        .service(super::submit::submit)
        .service(super::logs::search)
        .service(super::logs::clear)
        .service(super::logs::download)
        .service(super::validation::all)
        .service(super::validation::one)
}
