//! Request and response bodies of the REST API (camelCase JSON)

use chrono::NaiveDate;
use clinic_paging::Page;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    models::{Doctor, Patch, Patient, PatientFields},
    services::{DoctorChanges, NewDoctor, NewPatient, PatientChanges},
};

pub const NAME_MAX: usize = 100;
pub const ADDRESS_MAX: usize = 255;
pub const GENDER_MAX: usize = 10;
pub const SPECIALIZATION_MAX: usize = 100;

/// Query string of the list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Field to sort ascending by. Unknown names list in storage order.
    pub order_by: Option<String>,
    /// Page size, at least 1.
    pub count: i64,
    /// 1-based page number.
    pub page: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    pub room: i32,
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub specialization: String,
    pub district: Option<i32>,
}

impl From<CreateDoctorRequest> for NewDoctor {
    fn from(req: CreateDoctorRequest) -> Self {
        Self {
            full_name: req.full_name,
            room: req.room,
            specialization: req.specialization,
            district: req.district,
        }
    }
}

/// Partial update of a doctor. Absent fields are left as stored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditDoctorRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub full_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub room: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub specialization: Patch<String>,
    /// `true` applies `district` (absent or null clears it). Omitted means `false`,
    /// and `district` is ignored.
    #[serde(default)]
    pub is_district_updated: bool,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub district: Patch<i32>,
}

impl EditDoctorRequest {
    pub fn into_changes(self) -> DoctorChanges {
        let district = self
            .is_district_updated
            .then(|| self.district.into_value());

        DoctorChanges {
            full_name: self.full_name.into_value(),
            room: self.room.into_value(),
            specialization: self.specialization.into_value(),
            district,
        }
    }
}

impl Validate for EditDoctorRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "full_name", &self.full_name, 1, None);
        check_length(
            &mut errors,
            "specialization",
            &self.specialization,
            1,
            Some(SPECIALIZATION_MAX),
        );
        into_result(errors)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub surname: String,
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub patronymic: String,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub address: String,
    pub birth_date: NaiveDate,
    #[validate(length(max = 10, message = "must be at most 10 characters"))]
    pub gender: String,
    pub district: i32,
}

impl From<CreatePatientRequest> for NewPatient {
    fn from(req: CreatePatientRequest) -> Self {
        Self {
            fields: PatientFields {
                name: req.name,
                surname: req.surname,
                patronymic: req.patronymic,
                address: req.address,
                date_of_birth: req.birth_date,
                gender: req.gender,
            },
            district: req.district,
        }
    }
}

/// Partial update of a patient. Absent and null fields are left as stored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPatientRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub surname: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub patronymic: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub address: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub birth_date: Patch<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub gender: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub district: Patch<i32>,
}

impl EditPatientRequest {
    pub fn into_changes(self) -> PatientChanges {
        PatientChanges {
            name: self.name.into_value(),
            surname: self.surname.into_value(),
            patronymic: self.patronymic.into_value(),
            address: self.address.into_value(),
            date_of_birth: self.birth_date.into_value(),
            gender: self.gender.into_value(),
            district: self.district.into_value(),
        }
    }
}

impl Validate for EditPatientRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "name", &self.name, 1, Some(NAME_MAX));
        check_length(&mut errors, "surname", &self.surname, 1, Some(NAME_MAX));
        check_length(&mut errors, "patronymic", &self.patronymic, 1, Some(NAME_MAX));
        check_length(&mut errors, "address", &self.address, 0, Some(ADDRESS_MAX));
        check_length(&mut errors, "gender", &self.gender, 0, Some(GENDER_MAX));
        into_result(errors)
    }
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Patch<String>,
    min: usize,
    max: Option<usize>,
) {
    let Some(value) = value.value() else {
        return;
    };
    let len = value.chars().count();
    let message = if len < min {
        "must not be empty".to_string()
    } else if let Some(max) = max.filter(|max| len > *max) {
        format!("must be at most {max} characters")
    } else {
        return;
    };

    let mut error = ValidationError::new("length");
    error.message = Some(Cow::Owned(message));
    errors.add(field, error);
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorListItem {
    pub id: Uuid,
    pub full_name: String,
    pub room: i32,
    pub specialization: String,
    pub district: Option<i32>,
}

impl From<Doctor> for DoctorListItem {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            full_name: doctor.full_name,
            room: doctor.room.number,
            specialization: doctor.specialization.name,
            district: doctor.district.map(|d| d.number),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorList {
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub doctors: Vec<DoctorListItem>,
}

impl From<Page<Doctor>> for DoctorList {
    fn from(page: Page<Doctor>) -> Self {
        Self {
            total_count: page.total_count(),
            total_pages: page.total_pages(),
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            doctors: page.into_items().into_iter().map(Into::into).collect(),
        }
    }
}

/// A doctor with its references as ids.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetails {
    pub id: Uuid,
    pub room_id: Uuid,
    pub specialization_id: Uuid,
    pub district_id: Option<Uuid>,
}

impl From<Doctor> for DoctorDetails {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            room_id: doctor.room.id,
            specialization_id: doctor.specialization.id,
            district_id: doctor.district.map(|d| d.id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientListItem {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub district: i32,
}

impl From<Patient> for PatientListItem {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            surname: patient.surname,
            patronymic: patient.patronymic,
            address: patient.address,
            birth_date: patient.date_of_birth,
            gender: patient.gender,
            district: patient.district.number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientList {
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub patients: Vec<PatientListItem>,
}

impl From<Page<Patient>> for PatientList {
    fn from(page: Page<Patient>) -> Self {
        Self {
            total_count: page.total_count(),
            total_pages: page.total_pages(),
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            patients: page.into_items().into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub id: Uuid,
    pub district_id: Uuid,
}

impl From<Patient> for PatientDetails {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            district_id: patient.district.id,
        }
    }
}
