use axum::{
    extract::{FromRequestParts, Path, Query},
    response::IntoResponse,
    routing::get,
    Json,
};
use http::StatusCode;
use movies_dal::{CreateMovie, MovieRepository, UpdateMovie};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    repository_from_request,
    state::AppState,
    validate::Validated,
};

repository_from_request!(MovieRepository);

#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct MovieFilter {
    genre: Option<String>,
}

pub async fn list(
    repository: MovieRepository,
    filter: MovieFilter,
) -> ApiResult<impl IntoResponse> {
    let movies = repository.list(filter.genre.as_deref());
    Ok((StatusCode::OK, Json(movies)))
}

pub async fn get_movie(
    Path(id): Path<String>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository.get(&id)?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn create(
    repository: MovieRepository,
    Validated(payload): Validated<CreateMovie>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.create(payload);
    info!("Added movie {} ({})", record.title, record.id);

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    Path(id): Path<String>,
    repository: MovieRepository,
    Validated(payload): Validated<UpdateMovie>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.update(&id, payload)?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete(
    Path(id): Path<String>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(&id)?;
    info!("Removed movie {id}");

    Ok((StatusCode::OK, Json(json!({ "message": "Movie Deleted" }))))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_movie).patch(update).delete(delete))
}
