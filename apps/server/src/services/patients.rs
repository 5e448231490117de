//! Patient use cases

use chrono::NaiveDate;
use clinic_paging::{Page, PageRequest, SortField};
use std::sync::Arc;
use uuid::Uuid;

use super::lookup::get_or_create;
use crate::{
    db::ClinicStore,
    models::{District, Patient, PatientFields, PatientOrder},
    Error, Result,
};

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub fields: PatientFields,
    pub district: i32,
}

/// Changes to apply to a stored patient. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub district: Option<i32>,
}

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn ClinicStore>,
    max_page_size: Option<u64>,
}

impl PatientService {
    pub fn new(store: Arc<dyn ClinicStore>, max_page_size: Option<u64>) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        order_by: Option<&str>,
        count: i64,
        page: i64,
    ) -> Result<Page<Patient>> {
        let mut request = PageRequest::new(count, page)?;
        if let Some(max) = self.max_page_size {
            request = request.with_max_size(max)?;
        }
        let order = PatientOrder::resolve(order_by);

        let mut uow = self.store.begin().await?;
        let page = uow.patients_page(order, request).await?;
        uow.rollback().await?;

        Ok(page)
    }

    #[tracing::instrument(skip(self, new), fields(district = new.district))]
    pub async fn create(&self, new: NewPatient) -> Result<Uuid> {
        let mut uow = self.store.begin().await?;

        let district = get_or_create::<District>(uow.as_mut(), new.district).await?;
        let patient = Patient::new(new.fields, district);
        uow.insert_patient(&patient).await?;
        uow.commit().await?;

        tracing::info!(patient_id = %patient.id, "Patient created");
        Ok(patient.id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Patient> {
        let mut uow = self.store.begin().await?;
        let patient = uow.patient(id).await?.ok_or(Error::NotFound {
            entity: "Patient",
            id,
        })?;
        uow.rollback().await?;

        Ok(patient)
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn edit(&self, id: Uuid, changes: PatientChanges) -> Result<()> {
        let mut uow = self.store.begin().await?;
        let mut patient = uow.patient(id).await?.ok_or(Error::NotFound {
            entity: "Patient",
            id,
        })?;

        let PatientChanges {
            name,
            surname,
            patronymic,
            address,
            date_of_birth,
            gender,
            district,
        } = changes;

        if let Some(name) = name {
            patient.name = name;
        }
        if let Some(surname) = surname {
            patient.surname = surname;
        }
        if let Some(patronymic) = patronymic {
            patient.patronymic = patronymic;
        }
        if let Some(address) = address {
            patient.address = address;
        }
        if let Some(date_of_birth) = date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(gender) = gender {
            patient.gender = gender;
        }
        if let Some(number) = district {
            patient.district = get_or_create::<District>(uow.as_mut(), number).await?;
        }

        uow.update_patient(&patient).await?;
        uow.commit().await?;

        tracing::info!(patient_id = %id, "Patient updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut uow = self.store.begin().await?;
        if !uow.delete_patient(id).await? {
            return Err(Error::NotFound {
                entity: "Patient",
                id,
            });
        }
        uow.commit().await?;

        tracing::info!(patient_id = %id, "Patient deleted");
        Ok(())
    }
}
