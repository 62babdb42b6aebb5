/// User endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - List all users
/// - `POST /api/users/signup` - Register a new user (multipart with image)
/// - `POST /api/users/login` - Verify credentials
///
/// Password hashes never appear in responses; the model excludes the field
/// from serialization. Login reports unknown email and wrong password with
/// the same status and message so the two are indistinguishable to a
/// client.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    upload::{collect_multipart, remove_stored_image, ParsedUpload},
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use placehub_shared::auth::password;
use placehub_shared::models::user::{CreateUser, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Shared message for both login failure modes
const INVALID_CREDENTIALS: &str = "Invalid credentials, could not log in.";

/// Text fields of the signup form
#[derive(Debug, Validate)]
struct SignupForm {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    name: String,

    #[validate(email(message = "Invalid email format"))]
    email: String,

    password: String,
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Response wrapping a single user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Response wrapping a list of users
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// List all users
///
/// # Endpoint
///
/// ```text
/// GET /api/users
/// ```
///
/// Password hashes are excluded from the response.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = User::list(&state.db).await?;

    Ok(Json(UsersResponse { users }))
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users/signup
/// Content-Type: multipart/form-data
///
/// name=...&email=...&password=...&image=<file>
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed, missing image, or the
///   email is already registered
pub async fn signup(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let parsed = collect_multipart(multipart, &state.config.uploads.dir).await?;

    match signup_inner(&state, &parsed).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserResponse { user }))),
        Err(err) => {
            // The request failed after the image was stored; don't keep it.
            if let Some(path) = parsed.image_url {
                remove_stored_image(path);
            }
            Err(err)
        }
    }
}

async fn signup_inner(state: &AppState, parsed: &ParsedUpload) -> Result<User, ApiError> {
    let form = SignupForm {
        name: parsed.text("name"),
        email: parsed.text("email").trim().to_lowercase(),
        password: parsed.text("password"),
    };
    form.validate().map_err(ApiError::from_validation)?;

    password::validate_password(&form.password)
        .map_err(|msg| ApiError::invalid_field("password", msg))?;

    let image_url = parsed
        .image_url
        .clone()
        .ok_or_else(|| ApiError::invalid_field("image", "An image file is required"))?;

    if User::find_by_email(&state.db, &form.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User exists already, please login instead.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&form.password)?;

    // A concurrent signup with the same email loses the race on the unique
    // index and comes back as the same Conflict.
    let user = User::create(
        &state.db,
        CreateUser {
            name: form.name,
            email: form.email,
            password_hash,
            image_url: Some(image_url),
        },
    )
    .await?;

    Ok(user)
}

/// Verify credentials
///
/// # Endpoint
///
/// ```text
/// POST /api/users/login
/// Content-Type: application/json
///
/// { "email": "...", "password": "..." }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password; both cases carry
///   the same status and message
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}
