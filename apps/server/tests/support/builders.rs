use axum::body::Bytes;
use serde_json::{json, Value};

/// Converts a JSON value to request body bytes
pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Builder for doctor create bodies
pub struct DoctorBuilder {
    full_name: String,
    room: i32,
    specialization: String,
    district: Option<i32>,
}

impl DoctorBuilder {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            room: 101,
            specialization: "Therapist".to_string(),
            district: None,
        }
    }

    pub fn room(mut self, room: i32) -> Self {
        self.room = room;
        self
    }

    pub fn specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    pub fn district(mut self, district: i32) -> Self {
        self.district = Some(district);
        self
    }

    pub fn build(self) -> Value {
        let mut body = json!({
            "fullName": self.full_name,
            "room": self.room,
            "specialization": self.specialization,
        });
        if let Some(district) = self.district {
            body["district"] = json!(district);
        }
        body
    }
}

/// Builder for patient create bodies
pub struct PatientBuilder {
    name: String,
    surname: String,
    patronymic: String,
    address: String,
    birth_date: String,
    gender: String,
    district: i32,
}

impl PatientBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: "Ivanov".to_string(),
            patronymic: "Petrovich".to_string(),
            address: "1 Main Street".to_string(),
            birth_date: "1980-05-17".to_string(),
            gender: "male".to_string(),
            district: 1,
        }
    }

    pub fn surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = surname.into();
        self
    }

    pub fn birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = birth_date.into();
        self
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    pub fn district(mut self, district: i32) -> Self {
        self.district = district;
        self
    }

    pub fn build(self) -> Value {
        json!({
            "name": self.name,
            "surname": self.surname,
            "patronymic": self.patronymic,
            "address": self.address,
            "birthDate": self.birth_date,
            "gender": self.gender,
            "district": self.district,
        })
    }
}

pub fn doctor(full_name: &str) -> Value {
    DoctorBuilder::new(full_name).build()
}

pub fn patient(name: &str) -> Value {
    PatientBuilder::new(name).build()
}
