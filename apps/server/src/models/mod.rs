//! Domain models for the clinic server

pub mod doctor;
pub mod patch;
pub mod patient;
pub mod reference;

pub use doctor::{Doctor, DoctorOrder};
pub use patch::Patch;
pub use patient::{Patient, PatientFields, PatientOrder};
pub use reference::{
    District, NaturalKey, ReferenceEntity, ReferenceKind, ReferenceRow, Room, Specialization,
};
