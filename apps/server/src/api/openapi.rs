use utoipa::OpenApi;

use super::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic API",
        description = "Doctors, patients and their districts, rooms and specializations"
    ),
    paths(
        handlers::system::health_check,
        handlers::doctors::list_doctors,
        handlers::doctors::create_doctor,
        handlers::doctors::get_doctor,
        handlers::doctors::edit_doctor,
        handlers::doctors::delete_doctor,
        handlers::patients::list_patients,
        handlers::patients::create_patient,
        handlers::patients::get_patient,
        handlers::patients::edit_patient,
        handlers::patients::delete_patient,
    ),
    components(schemas(
        dto::CreateDoctorRequest,
        dto::EditDoctorRequest,
        dto::DoctorListItem,
        dto::DoctorList,
        dto::DoctorDetails,
        dto::CreatePatientRequest,
        dto::EditPatientRequest,
        dto::PatientListItem,
        dto::PatientList,
        dto::PatientDetails,
    )),
    tags(
        (name = "doctors", description = "Doctor records"),
        (name = "patients", description = "Patient records"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;
