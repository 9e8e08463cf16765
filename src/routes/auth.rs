use crate::{
    auth::{LoginRequest, LoginResponse, SessionClaim, SignupRequest, SignupResponse},
    error::AppError,
    models::UserSummary,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates an account. Fails with 400 if the email is already registered.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    let SignupRequest {
        name,
        email,
        password,
        image,
    } = signup_data.into_inner();
    let user_id = state
        .credentials
        .register(name, email, password, image)
        .await?;

    log::info!("Registered user {}", user_id);
    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User registered successfully".into(),
        user_id,
    }))
}

/// Login user
///
/// Checks the credentials and returns a bearer token plus the user's profile.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .credentials
        .verify(&login_data.email, &login_data.password)
        .await?;
    let token = state.tokens.issue(&SessionClaim {
        user_id: user.id,
        email: user.email.clone(),
    })?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".into(),
        token,
        user: UserSummary::from(&user),
    }))
}
