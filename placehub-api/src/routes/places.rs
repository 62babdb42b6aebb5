/// Place endpoints
///
/// # Endpoints
///
/// - `GET /api/places/:id` - Fetch one place
/// - `GET /api/places/user/:id` - Fetch all places owned by a user
/// - `POST /api/places` - Create a place (multipart with image)
/// - `PATCH /api/places/:id` - Update title and description
/// - `DELETE /api/places/:id` - Delete a place
///
/// Creation geocodes the submitted address, checks the creator exists, and
/// then runs the insert together with the creator's place-list update in
/// one transaction. Deletion mirrors that, and removes the stored image
/// only after the transaction has committed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    upload::{collect_multipart, remove_stored_image, ParsedUpload},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use placehub_shared::models::{
    place::{CreatePlace, Place, UpdatePlace},
    user::User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Text fields of the place creation form
#[derive(Debug, Validate)]
struct CreatePlaceForm {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    title: String,

    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    description: String,

    #[validate(length(min = 1, message = "Address must not be empty"))]
    address: String,
}

/// Update request body
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
}

/// Response wrapping a single place
#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub place: Place,
}

/// Response wrapping a list of places
#[derive(Debug, Serialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

/// Confirmation response for deletions
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Fetch one place by id
///
/// # Endpoint
///
/// ```text
/// GET /api/places/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No place with that id
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlaceResponse>> {
    let place = Place::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Could not find place for the provided id.".to_string())
        })?;

    Ok(Json(PlaceResponse { place }))
}

/// Fetch all places owned by a user
///
/// # Endpoint
///
/// ```text
/// GET /api/places/user/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown user, or the user owns zero places. Owning
///   nothing is deliberately reported the same way as not existing.
pub async fn get_places_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<PlacesResponse>> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        ApiError::NotFound("Could not find places for the provided user id.".to_string())
    })?;

    let places = Place::list_by_creator(&state.db, user.id).await?;

    if places.is_empty() {
        return Err(ApiError::NotFound(
            "Could not find places for the provided user id.".to_string(),
        ));
    }

    Ok(Json(PlacesResponse { places }))
}

/// Create a place
///
/// # Endpoint
///
/// ```text
/// POST /api/places
/// Content-Type: multipart/form-data
///
/// title=...&description=...&address=...&creator=<user uuid>&image=<file>
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed, missing image, or bad
///   creator id
/// - `404 Not Found`: Creator does not exist
/// - `500 Internal Server Error`: Address could not be geocoded, or the
///   transaction failed (nothing is persisted in that case)
pub async fn create_place(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PlaceResponse>)> {
    let parsed = collect_multipart(multipart, &state.config.uploads.dir).await?;

    match create_place_inner(&state, &parsed).await {
        Ok(place) => Ok((StatusCode::CREATED, Json(PlaceResponse { place }))),
        Err(err) => {
            // The request failed after the image was stored; don't keep it.
            if let Some(path) = parsed.image_url {
                remove_stored_image(path);
            }
            Err(err)
        }
    }
}

async fn create_place_inner(state: &AppState, parsed: &ParsedUpload) -> Result<Place, ApiError> {
    let form = CreatePlaceForm {
        title: parsed.text("title"),
        description: parsed.text("description"),
        address: parsed.text("address"),
    };
    form.validate().map_err(ApiError::from_validation)?;

    let creator_id = Uuid::parse_str(parsed.text("creator").trim())
        .map_err(|_| ApiError::invalid_field("creator", "Invalid creator id"))?;

    let image_url = parsed
        .image_url
        .clone()
        .ok_or_else(|| ApiError::invalid_field("image", "An image file is required"))?;

    let coordinates = state.geocoder.geocode(&form.address).await?;

    if User::find_by_id(&state.db, creator_id).await?.is_none() {
        return Err(ApiError::NotFound(
            "Could not find user for provided id.".to_string(),
        ));
    }

    let place = Place::create_with_owner(
        &state.db,
        CreatePlace {
            title: form.title,
            description: form.description,
            address: form.address,
            lat: coordinates.lat,
            lng: coordinates.lng,
            image_url,
            creator_id,
        },
    )
    .await?;

    Ok(place)
}

/// Update a place's title and description
///
/// # Endpoint
///
/// ```text
/// PATCH /api/places/:id
/// Content-Type: application/json
///
/// { "title": "...", "description": "..." }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `404 Not Found`: No place with that id
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlaceRequest>,
) -> ApiResult<Json<PlaceResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let place = Place::update(
        &state.db,
        id,
        UpdatePlace {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Could not find place for the provided id.".to_string()))?;

    Ok(Json(PlaceResponse { place }))
}

/// Delete a place
///
/// The place row and the creator's place list change together in one
/// transaction; the stored image is removed best-effort after the commit.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/places/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No place with that id
/// - `500 Internal Server Error`: Transaction failed (the place and the
///   creator's list are left untouched)
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let place = Place::delete_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Could not find place for this id.".to_string()))?;

    remove_stored_image(place.image_url);

    Ok(Json(MessageResponse {
        message: "Deleted place.".to_string(),
    }))
}
