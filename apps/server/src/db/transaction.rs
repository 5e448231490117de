//! PostgreSQL unit of work

use async_trait::async_trait;
use clinic_paging::{Page, PageRequest};
use sqlx::{postgres::PgRow, Postgres, Row, Transaction};
use uuid::Uuid;

use super::traits::UnitOfWork;
use crate::{
    models::{
        District, Doctor, DoctorOrder, NaturalKey, Patient, PatientOrder, ReferenceKind,
        ReferenceRow, Room, Specialization,
    },
    Error, Result,
};

const DOCTOR_SELECT: &str = "SELECT d.id, d.full_name,
        r.id AS room_id, r.number AS room_number,
        s.id AS specialization_id, s.name AS specialization_name,
        di.id AS district_id, di.number AS district_number
     FROM doctors d
     JOIN rooms r ON r.id = d.room_id
     JOIN specializations s ON s.id = d.specialization_id
     LEFT JOIN districts di ON di.id = d.district_id";

const PATIENT_SELECT: &str = "SELECT p.id, p.name, p.surname, p.patronymic, p.address,
        p.date_of_birth, p.gender,
        di.id AS district_id, di.number AS district_number
     FROM patients p
     JOIN districts di ON di.id = p.district_id";

/// Request-scoped transaction over the clinic tables
pub struct PostgresUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx: Some(tx) }
    }

    fn tx_mut(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        self.tx.as_mut().ok_or_else(|| {
            Error::Internal("Transaction already committed or rolled back".to_string())
        })
    }

    async fn count(&mut self, table: &str) -> Result<u64> {
        let tx = self.tx_mut()?;
        let row = sqlx::query(&format!("SELECT COUNT(*) AS total FROM {table}"))
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;
        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

fn doctor_from_row(row: &PgRow) -> Result<Doctor> {
    let district_id: Option<Uuid> = row.try_get("district_id")?;
    let district_number: Option<i32> = row.try_get("district_number")?;

    Ok(Doctor {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        room: Room {
            id: row.try_get("room_id")?,
            number: row.try_get("room_number")?,
        },
        specialization: Specialization {
            id: row.try_get("specialization_id")?,
            name: row.try_get("specialization_name")?,
        },
        district: district_id
            .zip(district_number)
            .map(|(id, number)| District { id, number }),
    })
}

fn patient_from_row(row: &PgRow) -> Result<Patient> {
    Ok(Patient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        patronymic: row.try_get("patronymic")?,
        address: row.try_get("address")?,
        date_of_birth: row.try_get("date_of_birth")?,
        gender: row.try_get("gender")?,
        district: District {
            id: row.try_get("district_id")?,
            number: row.try_get("district_number")?,
        },
    })
}

/// `ORDER BY` clause: the chosen column ascending with NULLs first, then insertion order.
fn order_clause(column: Option<&str>, seq: &str) -> String {
    match column {
        Some(column) => format!("ORDER BY {column} ASC NULLS FIRST, {seq} ASC"),
        None => format!("ORDER BY {seq} ASC"),
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn find_references(
        &mut self,
        kind: ReferenceKind,
        key: &NaturalKey,
    ) -> Result<Vec<ReferenceRow>> {
        let column = kind.key_column();
        let sql = format!(
            "SELECT id, {column} FROM {table} WHERE {column} = $1",
            table = kind.table()
        );

        let query = sqlx::query(&sql);
        let query = match key {
            NaturalKey::Number(n) => query.bind(*n),
            NaturalKey::Name(name) => query.bind(name.as_str()),
        };

        let tx = self.tx_mut()?;
        let rows = query.fetch_all(&mut **tx).await.map_err(Error::Database)?;

        rows.iter()
            .map(|row| {
                Ok(ReferenceRow {
                    id: row.try_get("id")?,
                    key: match key {
                        NaturalKey::Number(_) => NaturalKey::Number(row.try_get(column)?),
                        NaturalKey::Name(_) => NaturalKey::Name(row.try_get(column)?),
                    },
                })
            })
            .collect()
    }

    async fn insert_reference(&mut self, kind: ReferenceKind, row: &ReferenceRow) -> Result<()> {
        let sql = format!(
            "INSERT INTO {table} (id, {column}) VALUES ($1, $2)",
            table = kind.table(),
            column = kind.key_column()
        );

        let query = sqlx::query(&sql).bind(row.id);
        let query = match &row.key {
            NaturalKey::Number(n) => query.bind(*n),
            NaturalKey::Name(name) => query.bind(name.as_str()),
        };

        let tx = self.tx_mut()?;
        query.execute(&mut **tx).await.map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return Error::DuplicateKeyRace {
                        entity: kind.entity_name(),
                        key: row.key.to_string(),
                    };
                }
            }
            Error::Database(err)
        })?;

        Ok(())
    }

    async fn doctor(&mut self, id: Uuid) -> Result<Option<Doctor>> {
        let tx = self.tx_mut()?;
        let row = sqlx::query(&format!("{DOCTOR_SELECT} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(doctor_from_row).transpose()
    }

    async fn insert_doctor(&mut self, doctor: &Doctor) -> Result<()> {
        let tx = self.tx_mut()?;
        sqlx::query(
            "INSERT INTO doctors (id, full_name, room_id, specialization_id, district_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(doctor.id)
        .bind(&doctor.full_name)
        .bind(doctor.room.id)
        .bind(doctor.specialization.id)
        .bind(doctor.district.as_ref().map(|d| d.id))
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn update_doctor(&mut self, doctor: &Doctor) -> Result<()> {
        let tx = self.tx_mut()?;
        sqlx::query(
            "UPDATE doctors
             SET full_name = $2, room_id = $3, specialization_id = $4, district_id = $5
             WHERE id = $1",
        )
        .bind(doctor.id)
        .bind(&doctor.full_name)
        .bind(doctor.room.id)
        .bind(doctor.specialization.id)
        .bind(doctor.district.as_ref().map(|d| d.id))
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn delete_doctor(&mut self, id: Uuid) -> Result<bool> {
        let tx = self.tx_mut()?;
        let deleted = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn doctors_page(
        &mut self,
        order: Option<DoctorOrder>,
        request: PageRequest,
    ) -> Result<Page<Doctor>> {
        let total_count = self.count("doctors").await?;

        let sql = format!(
            "{DOCTOR_SELECT} {} LIMIT $1 OFFSET $2",
            order_clause(order.map(|o| o.sql_column()), "d.seq")
        );
        let tx = self.tx_mut()?;
        let rows = sqlx::query(&sql)
            .bind(to_i64(request.limit()))
            .bind(to_i64(request.offset()))
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let doctors = rows.iter().map(doctor_from_row).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(doctors, request, total_count))
    }

    async fn patient(&mut self, id: Uuid) -> Result<Option<Patient>> {
        let tx = self.tx_mut()?;
        let row = sqlx::query(&format!("{PATIENT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(patient_from_row).transpose()
    }

    async fn insert_patient(&mut self, patient: &Patient) -> Result<()> {
        let tx = self.tx_mut()?;
        sqlx::query(
            "INSERT INTO patients (id, name, surname, patronymic, address, date_of_birth, gender, district_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(&patient.surname)
        .bind(&patient.patronymic)
        .bind(&patient.address)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(patient.district.id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn update_patient(&mut self, patient: &Patient) -> Result<()> {
        let tx = self.tx_mut()?;
        sqlx::query(
            "UPDATE patients
             SET name = $2, surname = $3, patronymic = $4, address = $5,
                 date_of_birth = $6, gender = $7, district_id = $8
             WHERE id = $1",
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(&patient.surname)
        .bind(&patient.patronymic)
        .bind(&patient.address)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(patient.district.id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn delete_patient(&mut self, id: Uuid) -> Result<bool> {
        let tx = self.tx_mut()?;
        let deleted = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn patients_page(
        &mut self,
        order: Option<PatientOrder>,
        request: PageRequest,
    ) -> Result<Page<Patient>> {
        let total_count = self.count("patients").await?;

        let sql = format!(
            "{PATIENT_SELECT} {} LIMIT $1 OFFSET $2",
            order_clause(order.map(|o| o.sql_column()), "p.seq")
        );
        let tx = self.tx_mut()?;
        let rows = sqlx::query(&sql)
            .bind(to_i64(request.limit()))
            .bind(to_i64(request.offset()))
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let patients = rows.iter().map(patient_from_row).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(patients, request, total_count))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let PostgresUnitOfWork { tx } = *self;
        let tx = tx.ok_or_else(|| Error::Internal("Transaction already committed".to_string()))?;

        tx.commit().await.map_err(Error::Database)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let PostgresUnitOfWork { tx } = *self;
        let tx = tx.ok_or_else(|| Error::Internal("Transaction already rolled back".to_string()))?;

        tx.rollback().await.map_err(Error::Database)
    }
}
