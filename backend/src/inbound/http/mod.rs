//! HTTP inbound adapter exposing the `/api/v1` REST endpoints.

pub mod auth;
pub mod departments;
pub mod error;
pub mod health;
pub mod imports;
pub mod kudos;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler and the JSON/query rejection handlers.
///
/// Mounted under `/api/v1` by the server; tests mount it the same way.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(users::login)
        .service(users::logout)
        .service(users::register)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::add_user)
        .service(kudos::dashboard)
        .service(kudos::compose_options)
        .service(kudos::create_kudo)
        .service(departments::list_departments)
        .service(departments::add_department)
        .service(departments::department_details)
        .service(departments::edit_department)
        .service(imports::upload_users)
        .service(imports::confirm_users);
}
