//! Get-or-create resolution of reference entities by natural key
//!
//! The existence check and the insert are two separate statements inside the
//! caller's unit of work, so two concurrent units of work can both decide to
//! create the same key. The storage uniqueness constraint rejects the second one
//! and the caller sees `DuplicateKeyRace`. There is no retry.

use crate::{db::UnitOfWork, models::ReferenceEntity, Error, Result};

/// Return the entity of type `E` whose natural key is `key`, staging a new one
/// in `uow` when none exists yet.
pub async fn get_or_create<E: ReferenceEntity>(
    uow: &mut dyn UnitOfWork,
    key: E::Key,
) -> Result<E> {
    let natural_key = E::natural_key(&key);
    let mut rows = uow.find_references(E::KIND, &natural_key).await?;

    match rows.len() {
        0 => {
            let entity = E::new(key);
            uow.insert_reference(E::KIND, &entity.to_row()).await?;
            tracing::debug!(
                entity = E::KIND.entity_name(),
                key = %natural_key,
                id = %entity.id(),
                "Created reference entity"
            );
            Ok(entity)
        }
        1 => E::from_row(rows.remove(0)),
        n => Err(Error::InvariantViolation(format!(
            "{n} {} rows share the key {natural_key}",
            E::KIND.entity_name()
        ))),
    }
}
