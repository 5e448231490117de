//! Doctor endpoint handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    api::{
        dto::{CreateDoctorRequest, DoctorDetails, DoctorList, EditDoctorRequest, ListQuery},
        extractors::{EntityId, ListParams, ValidJson},
    },
    state::AppState,
    Result,
};

#[utoipa::path(
    get,
    path = "/doctors",
    tag = "doctors",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of doctors", body = DoctorList),
        (status = 400, description = "Missing or invalid count/page")
    )
)]
pub async fn list_doctors(
    State(state): State<AppState>,
    ListParams(query): ListParams<ListQuery>,
) -> Result<Json<DoctorList>> {
    let page = state
        .doctors
        .list(query.order_by.as_deref(), query.count, query.page)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/doctors",
    tag = "doctors",
    request_body = CreateDoctorRequest,
    responses(
        (status = 201, description = "Doctor created; Location names the new resource"),
        (status = 400, description = "Invalid body"),
        (status = 409, description = "A referenced key was created concurrently")
    )
)]
pub async fn create_doctor(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateDoctorRequest>,
) -> Result<impl IntoResponse> {
    let id = state.doctors.create(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/doctors/{id}"))],
    ))
}

#[utoipa::path(
    get,
    path = "/doctors/{id}",
    tag = "doctors",
    params(("id" = uuid::Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor with reference ids", body = DoctorDetails),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<DoctorDetails>> {
    let doctor = state.doctors.get(id).await?;
    Ok(Json(doctor.into()))
}

#[utoipa::path(
    patch,
    path = "/doctors/{id}",
    tag = "doctors",
    params(("id" = uuid::Uuid, Path, description = "Doctor id")),
    request_body = EditDoctorRequest,
    responses(
        (status = 204, description = "Doctor updated"),
        (status = 400, description = "Invalid body"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn edit_doctor(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(body): ValidJson<EditDoctorRequest>,
) -> Result<StatusCode> {
    state.doctors.edit(id, body.into_changes()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/doctors/{id}",
    tag = "doctors",
    params(("id" = uuid::Uuid, Path, description = "Doctor id")),
    responses(
        (status = 204, description = "Doctor deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_doctor(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode> {
    state.doctors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
