use clinic_paging::SortField;
use std::cmp::Ordering;
use uuid::Uuid;

use super::reference::{District, Room, Specialization};

/// A doctor joined with the reference rows it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub room: Room,
    pub specialization: Specialization,
    pub district: Option<District>,
}

impl Doctor {
    pub fn new(
        full_name: String,
        room: Room,
        specialization: Specialization,
        district: Option<District>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            room,
            specialization,
            district,
        }
    }
}

/// Fields a doctor listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorOrder {
    FullName,
    Room,
    Specialization,
    District,
}

impl DoctorOrder {
    /// Column expression in the joined listing query.
    pub fn sql_column(&self) -> &'static str {
        match self {
            DoctorOrder::FullName => "d.full_name",
            DoctorOrder::Room => "r.number",
            DoctorOrder::Specialization => "s.name",
            DoctorOrder::District => "di.number",
        }
    }
}

impl SortField<Doctor> for DoctorOrder {
    const FIELDS: &'static [(&'static str, Self)] = &[
        ("fullname", DoctorOrder::FullName),
        ("room", DoctorOrder::Room),
        ("specialization", DoctorOrder::Specialization),
        ("district", DoctorOrder::District),
    ];

    fn compare(&self, a: &Doctor, b: &Doctor) -> Ordering {
        match self {
            DoctorOrder::FullName => a.full_name.cmp(&b.full_name),
            DoctorOrder::Room => a.room.number.cmp(&b.room.number),
            DoctorOrder::Specialization => a.specialization.name.cmp(&b.specialization.name),
            // `None < Some(_)`, so doctors without a district come first
            DoctorOrder::District => a
                .district
                .as_ref()
                .map(|d| d.number)
                .cmp(&b.district.as_ref().map(|d| d.number)),
        }
    }
}
