//! HTTP server setup.

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api::route::routes, model::AppState};

/// Creates and binds the public HTTP server.
///
/// Every endpoint lives under `/<namespace>`, e.g. `/anbridge/v1/submit`.
pub fn main_server(
    app_state: Arc<AppState>,
    namespace: String,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .service(routes(&namespace))
    })
    .bind((address, port))?
    .run())
}
