//! Storage traits the services are written against

use async_trait::async_trait;
use clinic_paging::{Page, PageRequest};
use uuid::Uuid;

use crate::{
    models::{Doctor, DoctorOrder, NaturalKey, Patient, PatientOrder, ReferenceKind, ReferenceRow},
    Result,
};

/// A storage backend that hands out request-scoped units of work.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// Start a unit of work. Nothing it writes is visible to others until
    /// [`UnitOfWork::commit`].
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

/// One transactional scope over the clinic tables.
///
/// Writes are pending until `commit`. Dropping the unit of work without
/// committing discards them.
#[async_trait]
pub trait UnitOfWork: Send {
    /// All reference rows of `kind` whose natural key equals `key`.
    ///
    /// Sees rows inserted earlier in this unit of work. More than one row means
    /// the uniqueness of natural keys was broken.
    async fn find_references(
        &mut self,
        kind: ReferenceKind,
        key: &NaturalKey,
    ) -> Result<Vec<ReferenceRow>>;

    /// Stage a new reference row.
    ///
    /// # Errors
    /// * `DuplicateKeyRace` - another unit of work already committed the key
    async fn insert_reference(&mut self, kind: ReferenceKind, row: &ReferenceRow) -> Result<()>;

    async fn doctor(&mut self, id: Uuid) -> Result<Option<Doctor>>;

    async fn insert_doctor(&mut self, doctor: &Doctor) -> Result<()>;

    /// Overwrite every column of an existing doctor.
    async fn update_doctor(&mut self, doctor: &Doctor) -> Result<()>;

    /// Returns `false` when no doctor has this id.
    async fn delete_doctor(&mut self, id: Uuid) -> Result<bool>;

    /// One page of doctors, ascending by `order` (ties and the unordered case
    /// fall back to insertion order).
    async fn doctors_page(
        &mut self,
        order: Option<DoctorOrder>,
        request: PageRequest,
    ) -> Result<Page<Doctor>>;

    async fn patient(&mut self, id: Uuid) -> Result<Option<Patient>>;

    async fn insert_patient(&mut self, patient: &Patient) -> Result<()>;

    async fn update_patient(&mut self, patient: &Patient) -> Result<()>;

    async fn delete_patient(&mut self, id: Uuid) -> Result<bool>;

    async fn patients_page(
        &mut self,
        order: Option<PatientOrder>,
        request: PageRequest,
    ) -> Result<Page<Patient>>;

    /// Make every staged write visible atomically.
    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
