//! Process-local storage backend
//!
//! Committed tables live behind a shared lock. A unit of work records its writes in
//! a journal; reads see the committed tables with the journal replayed on top, and
//! `commit` replays the journal onto the shared tables under the write lock. The
//! natural-key uniqueness of reference tables is checked on every replay, so a unit
//! of work that lost a get-or-create race fails with `DuplicateKeyRace`.
//!
//! Every read and every staged write clones the committed tables and replays the
//! journal, so each call costs time proportional to the table sizes. Fine for
//! tests and local demos. Use the Postgres backend for real data volumes.

use async_trait::async_trait;
use clinic_paging::{paginate_ordered, Page, PageRequest};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{ClinicStore, UnitOfWork};
use crate::{
    models::{
        District, Doctor, DoctorOrder, NaturalKey, Patient, PatientOrder, ReferenceEntity,
        ReferenceKind, ReferenceRow, Room, Specialization,
    },
    Error, Result,
};

#[derive(Debug, Clone)]
struct DoctorRow {
    id: Uuid,
    full_name: String,
    room_id: Uuid,
    specialization_id: Uuid,
    district_id: Option<Uuid>,
}

impl From<&Doctor> for DoctorRow {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            full_name: doctor.full_name.clone(),
            room_id: doctor.room.id,
            specialization_id: doctor.specialization.id,
            district_id: doctor.district.as_ref().map(|d| d.id),
        }
    }
}

#[derive(Debug, Clone)]
struct PatientRow {
    id: Uuid,
    name: String,
    surname: String,
    patronymic: String,
    address: String,
    date_of_birth: chrono::NaiveDate,
    gender: String,
    district_id: Uuid,
}

impl From<&Patient> for PatientRow {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            surname: patient.surname.clone(),
            patronymic: patient.patronymic.clone(),
            address: patient.address.clone(),
            date_of_birth: patient.date_of_birth,
            gender: patient.gender.clone(),
            district_id: patient.district.id,
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    InsertReference(ReferenceKind, ReferenceRow),
    InsertDoctor(DoctorRow),
    UpdateDoctor(DoctorRow),
    DeleteDoctor(Uuid),
    InsertPatient(PatientRow),
    UpdatePatient(PatientRow),
    DeletePatient(Uuid),
}

/// Rows in insertion order.
#[derive(Debug, Clone, Default)]
struct Tables {
    districts: Vec<ReferenceRow>,
    rooms: Vec<ReferenceRow>,
    specializations: Vec<ReferenceRow>,
    doctors: Vec<DoctorRow>,
    patients: Vec<PatientRow>,
}

impl Tables {
    fn references(&self, kind: ReferenceKind) -> &Vec<ReferenceRow> {
        match kind {
            ReferenceKind::District => &self.districts,
            ReferenceKind::Room => &self.rooms,
            ReferenceKind::Specialization => &self.specializations,
        }
    }

    fn references_mut(&mut self, kind: ReferenceKind) -> &mut Vec<ReferenceRow> {
        match kind {
            ReferenceKind::District => &mut self.districts,
            ReferenceKind::Room => &mut self.rooms,
            ReferenceKind::Specialization => &mut self.specializations,
        }
    }

    fn apply(&mut self, op: &Op) -> Result<()> {
        match op {
            Op::InsertReference(kind, row) => {
                let table = self.references_mut(*kind);
                if table.iter().any(|existing| existing.key == row.key) {
                    return Err(Error::DuplicateKeyRace {
                        entity: kind.entity_name(),
                        key: row.key.to_string(),
                    });
                }
                table.push(row.clone());
            }
            Op::InsertDoctor(row) => self.doctors.push(row.clone()),
            Op::UpdateDoctor(row) => {
                if let Some(existing) = self.doctors.iter_mut().find(|d| d.id == row.id) {
                    *existing = row.clone();
                }
            }
            Op::DeleteDoctor(id) => self.doctors.retain(|d| d.id != *id),
            Op::InsertPatient(row) => self.patients.push(row.clone()),
            Op::UpdatePatient(row) => {
                if let Some(existing) = self.patients.iter_mut().find(|p| p.id == row.id) {
                    *existing = row.clone();
                }
            }
            Op::DeletePatient(id) => self.patients.retain(|p| p.id != *id),
        }
        Ok(())
    }

    fn reference<E: ReferenceEntity>(&self, id: Uuid) -> Result<E> {
        let row = self
            .references(E::KIND)
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| {
                Error::Internal(format!(
                    "dangling {} reference {id}",
                    E::KIND.entity_name()
                ))
            })?;
        E::from_row(row)
    }

    fn join_doctor(&self, row: &DoctorRow) -> Result<Doctor> {
        Ok(Doctor {
            id: row.id,
            full_name: row.full_name.clone(),
            room: self.reference::<Room>(row.room_id)?,
            specialization: self.reference::<Specialization>(row.specialization_id)?,
            district: row
                .district_id
                .map(|id| self.reference::<District>(id))
                .transpose()?,
        })
    }

    fn join_patient(&self, row: &PatientRow) -> Result<Patient> {
        Ok(Patient {
            id: row.id,
            name: row.name.clone(),
            surname: row.surname.clone(),
            patronymic: row.patronymic.clone(),
            address: row.address.clone(),
            date_of_birth: row.date_of_birth,
            gender: row.gender.clone(),
            district: self.reference::<District>(row.district_id)?,
        })
    }
}

/// In-memory [`ClinicStore`]. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            journal: Vec::new(),
        }))
    }
}

pub struct MemoryUnitOfWork {
    tables: Arc<RwLock<Tables>>,
    journal: Vec<Op>,
}

impl MemoryUnitOfWork {
    /// Committed tables with this unit of work's journal applied.
    async fn view(&self) -> Result<Tables> {
        let mut tables = self.tables.read().await.clone();
        for op in &self.journal {
            tables.apply(op)?;
        }
        Ok(tables)
    }

    async fn stage(&mut self, op: Op) -> Result<()> {
        self.journal.push(op);
        if let Err(err) = self.view().await {
            self.journal.pop();
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_references(
        &mut self,
        kind: ReferenceKind,
        key: &NaturalKey,
    ) -> Result<Vec<ReferenceRow>> {
        let tables = self.view().await?;
        Ok(tables
            .references(kind)
            .iter()
            .filter(|row| &row.key == key)
            .cloned()
            .collect())
    }

    async fn insert_reference(&mut self, kind: ReferenceKind, row: &ReferenceRow) -> Result<()> {
        self.stage(Op::InsertReference(kind, row.clone())).await
    }

    async fn doctor(&mut self, id: Uuid) -> Result<Option<Doctor>> {
        let tables = self.view().await?;
        tables
            .doctors
            .iter()
            .find(|d| d.id == id)
            .map(|row| tables.join_doctor(row))
            .transpose()
    }

    async fn insert_doctor(&mut self, doctor: &Doctor) -> Result<()> {
        self.stage(Op::InsertDoctor(doctor.into())).await
    }

    async fn update_doctor(&mut self, doctor: &Doctor) -> Result<()> {
        self.stage(Op::UpdateDoctor(doctor.into())).await
    }

    async fn delete_doctor(&mut self, id: Uuid) -> Result<bool> {
        let exists = self.view().await?.doctors.iter().any(|d| d.id == id);
        if exists {
            self.stage(Op::DeleteDoctor(id)).await?;
        }
        Ok(exists)
    }

    async fn doctors_page(
        &mut self,
        order: Option<DoctorOrder>,
        request: PageRequest,
    ) -> Result<Page<Doctor>> {
        let tables = self.view().await?;
        let doctors = tables
            .doctors
            .iter()
            .map(|row| tables.join_doctor(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(paginate_ordered(doctors, request, order))
    }

    async fn patient(&mut self, id: Uuid) -> Result<Option<Patient>> {
        let tables = self.view().await?;
        tables
            .patients
            .iter()
            .find(|p| p.id == id)
            .map(|row| tables.join_patient(row))
            .transpose()
    }

    async fn insert_patient(&mut self, patient: &Patient) -> Result<()> {
        self.stage(Op::InsertPatient(patient.into())).await
    }

    async fn update_patient(&mut self, patient: &Patient) -> Result<()> {
        self.stage(Op::UpdatePatient(patient.into())).await
    }

    async fn delete_patient(&mut self, id: Uuid) -> Result<bool> {
        let exists = self.view().await?.patients.iter().any(|p| p.id == id);
        if exists {
            self.stage(Op::DeletePatient(id)).await?;
        }
        Ok(exists)
    }

    async fn patients_page(
        &mut self,
        order: Option<PatientOrder>,
        request: PageRequest,
    ) -> Result<Page<Patient>> {
        let tables = self.view().await?;
        let patients = tables
            .patients
            .iter()
            .map(|row| tables.join_patient(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(paginate_ordered(patients, request, order))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut committed = self.tables.write().await;
        let mut next = committed.clone();
        for op in &self.journal {
            next.apply(op)?;
        }
        *committed = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
