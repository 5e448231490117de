//! Doctor use cases

use clinic_paging::{Page, PageRequest, SortField};
use std::sync::Arc;
use uuid::Uuid;

use super::lookup::get_or_create;
use crate::{
    db::ClinicStore,
    models::{District, Doctor, DoctorOrder, Room, Specialization},
    Error, Result,
};

/// Fields of a doctor to create, with references given by natural key.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub full_name: String,
    pub room: i32,
    pub specialization: String,
    pub district: Option<i32>,
}

/// Changes to apply to a stored doctor. `None` leaves a field untouched;
/// `district: Some(None)` clears the district.
#[derive(Debug, Clone, Default)]
pub struct DoctorChanges {
    pub full_name: Option<String>,
    pub room: Option<i32>,
    pub specialization: Option<String>,
    pub district: Option<Option<i32>>,
}

#[derive(Clone)]
pub struct DoctorService {
    store: Arc<dyn ClinicStore>,
    max_page_size: Option<u64>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn ClinicStore>, max_page_size: Option<u64>) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    /// One page of doctors. Unknown `order_by` names list in storage order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, order_by: Option<&str>, count: i64, page: i64) -> Result<Page<Doctor>> {
        let mut request = PageRequest::new(count, page)?;
        if let Some(max) = self.max_page_size {
            request = request.with_max_size(max)?;
        }
        let order = DoctorOrder::resolve(order_by);

        let mut uow = self.store.begin().await?;
        let page = uow.doctors_page(order, request).await?;
        uow.rollback().await?;

        Ok(page)
    }

    #[tracing::instrument(skip(self, new), fields(full_name = %new.full_name))]
    pub async fn create(&self, new: NewDoctor) -> Result<Uuid> {
        let mut uow = self.store.begin().await?;

        let room = get_or_create::<Room>(uow.as_mut(), new.room).await?;
        let specialization =
            get_or_create::<Specialization>(uow.as_mut(), new.specialization).await?;
        let district = match new.district {
            Some(number) => Some(get_or_create::<District>(uow.as_mut(), number).await?),
            None => None,
        };

        let doctor = Doctor::new(new.full_name, room, specialization, district);
        uow.insert_doctor(&doctor).await?;
        uow.commit().await?;

        tracing::info!(doctor_id = %doctor.id, "Doctor created");
        Ok(doctor.id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Doctor> {
        let mut uow = self.store.begin().await?;
        let doctor = uow.doctor(id).await?.ok_or(Error::NotFound {
            entity: "Doctor",
            id,
        })?;
        uow.rollback().await?;

        Ok(doctor)
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn edit(&self, id: Uuid, changes: DoctorChanges) -> Result<()> {
        let mut uow = self.store.begin().await?;
        let mut doctor = uow.doctor(id).await?.ok_or(Error::NotFound {
            entity: "Doctor",
            id,
        })?;

        if let Some(full_name) = changes.full_name {
            doctor.full_name = full_name;
        }
        if let Some(number) = changes.room {
            doctor.room = get_or_create::<Room>(uow.as_mut(), number).await?;
        }
        if let Some(name) = changes.specialization {
            doctor.specialization = get_or_create::<Specialization>(uow.as_mut(), name).await?;
        }
        if let Some(district) = changes.district {
            doctor.district = match district {
                Some(number) => Some(get_or_create::<District>(uow.as_mut(), number).await?),
                None => None,
            };
        }

        uow.update_doctor(&doctor).await?;
        uow.commit().await?;

        tracing::info!(doctor_id = %id, "Doctor updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut uow = self.store.begin().await?;
        if !uow.delete_doctor(id).await? {
            return Err(Error::NotFound {
                entity: "Doctor",
                id,
            });
        }
        uow.commit().await?;

        tracing::info!(doctor_id = %id, "Doctor deleted");
        Ok(())
    }
}
