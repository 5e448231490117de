//! Patient endpoint handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    api::{
        dto::{CreatePatientRequest, EditPatientRequest, ListQuery, PatientDetails, PatientList},
        extractors::{EntityId, ListParams, ValidJson},
    },
    state::AppState,
    Result,
};

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of patients", body = PatientList),
        (status = 400, description = "Missing or invalid count/page")
    )
)]
pub async fn list_patients(
    State(state): State<AppState>,
    ListParams(query): ListParams<ListQuery>,
) -> Result<Json<PatientList>> {
    let page = state
        .patients
        .list(query.order_by.as_deref(), query.count, query.page)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created; Location names the new resource"),
        (status = 400, description = "Invalid body"),
        (status = 409, description = "The district was created concurrently")
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreatePatientRequest>,
) -> Result<impl IntoResponse> {
    let id = state.patients.create(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/patients/{id}"))],
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    tag = "patients",
    params(("id" = uuid::Uuid, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient with district id", body = PatientDetails),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<PatientDetails>> {
    let patient = state.patients.get(id).await?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    patch,
    path = "/patients/{id}",
    tag = "patients",
    params(("id" = uuid::Uuid, Path, description = "Patient id")),
    request_body = EditPatientRequest,
    responses(
        (status = 204, description = "Patient updated"),
        (status = 400, description = "Invalid body"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn edit_patient(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(body): ValidJson<EditPatientRequest>,
) -> Result<StatusCode> {
    state.patients.edit(id, body.into_changes()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    tag = "patients",
    params(("id" = uuid::Uuid, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode> {
    state.patients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
