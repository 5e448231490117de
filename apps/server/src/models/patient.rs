use chrono::NaiveDate;
use clinic_paging::SortField;
use std::cmp::Ordering;
use uuid::Uuid;

use super::reference::District;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub district: District,
}

/// Owned field values of a patient, without identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientFields {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
}

impl Patient {
    pub fn new(fields: PatientFields, district: District) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            surname: fields.surname,
            patronymic: fields.patronymic,
            address: fields.address,
            date_of_birth: fields.date_of_birth,
            gender: fields.gender,
            district,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientOrder {
    Name,
    Surname,
    Patronymic,
    Address,
    BirthDate,
    Gender,
    District,
}

impl PatientOrder {
    pub fn sql_column(&self) -> &'static str {
        match self {
            PatientOrder::Name => "p.name",
            PatientOrder::Surname => "p.surname",
            PatientOrder::Patronymic => "p.patronymic",
            PatientOrder::Address => "p.address",
            PatientOrder::BirthDate => "p.date_of_birth",
            PatientOrder::Gender => "p.gender",
            PatientOrder::District => "di.number",
        }
    }
}

impl SortField<Patient> for PatientOrder {
    const FIELDS: &'static [(&'static str, Self)] = &[
        ("name", PatientOrder::Name),
        ("surname", PatientOrder::Surname),
        ("patronymic", PatientOrder::Patronymic),
        ("address", PatientOrder::Address),
        ("birthdate", PatientOrder::BirthDate),
        ("gender", PatientOrder::Gender),
        ("district", PatientOrder::District),
    ];

    fn compare(&self, a: &Patient, b: &Patient) -> Ordering {
        match self {
            PatientOrder::Name => a.name.cmp(&b.name),
            PatientOrder::Surname => a.surname.cmp(&b.surname),
            PatientOrder::Patronymic => a.patronymic.cmp(&b.patronymic),
            PatientOrder::Address => a.address.cmp(&b.address),
            PatientOrder::BirthDate => a.date_of_birth.cmp(&b.date_of_birth),
            PatientOrder::Gender => a.gender.cmp(&b.gender),
            PatientOrder::District => a.district.number.cmp(&b.district.number),
        }
    }
}
