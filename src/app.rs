use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App};

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Largest accepted JSON body. Leaves room for a maximal signup avatar plus the other
/// fields.
pub const JSON_BODY_LIMIT: usize = 256 * 1024;

// name, email, password and JSON punctuation on top of the largest avatar
const _: () = assert!(crate::auth::MAX_AVATAR_LEN + 4 * 1024 <= JSON_BODY_LIMIT);

/// Builds the application: CORS, access log, the access guard and every route.
///
/// `main` calls this once per worker; the tests call it directly.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid JSON body: {}", err)).into());

    App::new()
        .app_data(json_config)
        .app_data(state.clone())
        .wrap(AuthMiddleware::new(state.tokens.clone()))
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .configure(routes::config)
}

