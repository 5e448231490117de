//! Business logic layer

pub mod doctors;
pub mod lookup;
pub mod patients;

pub use doctors::{DoctorChanges, DoctorService, NewDoctor};
pub use lookup::get_or_create;
pub use patients::{NewPatient, PatientChanges, PatientService};
