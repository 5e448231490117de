//! Reference (lookup) entities identified by a natural key

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{Error, Result};

/// The three lookup tables doctors and patients point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    District,
    Room,
    Specialization,
}

impl ReferenceKind {
    pub fn entity_name(&self) -> &'static str {
        match self {
            ReferenceKind::District => "District",
            ReferenceKind::Room => "Room",
            ReferenceKind::Specialization => "Specialization",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::District => "districts",
            ReferenceKind::Room => "rooms",
            ReferenceKind::Specialization => "specializations",
        }
    }

    pub fn key_column(&self) -> &'static str {
        match self {
            ReferenceKind::District | ReferenceKind::Room => "number",
            ReferenceKind::Specialization => "name",
        }
    }
}

/// A natural key value as stored: a number or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    Number(i32),
    Name(String),
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::Number(n) => write!(f, "{n}"),
            NaturalKey::Name(s) => write!(f, "{s}"),
        }
    }
}

/// Storage shape shared by every reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub id: Uuid,
    pub key: NaturalKey,
}

/// A lookup entity that is found or created by its natural key.
pub trait ReferenceEntity: Clone + Send + Sync + Sized + 'static {
    type Key: Clone + Eq + fmt::Display + Send + Sync;

    const KIND: ReferenceKind;

    fn new(key: Self::Key) -> Self;

    fn id(&self) -> Uuid;

    fn key(&self) -> &Self::Key;

    fn natural_key(key: &Self::Key) -> NaturalKey;

    fn from_row(row: ReferenceRow) -> Result<Self>;

    fn to_row(&self) -> ReferenceRow {
        ReferenceRow {
            id: self.id(),
            key: Self::natural_key(self.key()),
        }
    }
}

fn key_mismatch(kind: ReferenceKind, key: &NaturalKey) -> Error {
    Error::Internal(format!(
        "{} row carries a key of the wrong type: {key:?}",
        kind.entity_name()
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: Uuid,
    pub number: i32,
}

impl ReferenceEntity for District {
    type Key = i32;

    const KIND: ReferenceKind = ReferenceKind::District;

    fn new(number: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> &i32 {
        &self.number
    }

    fn natural_key(key: &i32) -> NaturalKey {
        NaturalKey::Number(*key)
    }

    fn from_row(row: ReferenceRow) -> Result<Self> {
        match row.key {
            NaturalKey::Number(number) => Ok(Self { id: row.id, number }),
            other => Err(key_mismatch(Self::KIND, &other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub number: i32,
}

impl ReferenceEntity for Room {
    type Key = i32;

    const KIND: ReferenceKind = ReferenceKind::Room;

    fn new(number: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> &i32 {
        &self.number
    }

    fn natural_key(key: &i32) -> NaturalKey {
        NaturalKey::Number(*key)
    }

    fn from_row(row: ReferenceRow) -> Result<Self> {
        match row.key {
            NaturalKey::Number(number) => Ok(Self { id: row.id, number }),
            other => Err(key_mismatch(Self::KIND, &other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: Uuid,
    pub name: String,
}

impl ReferenceEntity for Specialization {
    type Key = String;

    const KIND: ReferenceKind = ReferenceKind::Specialization;

    fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> &String {
        &self.name
    }

    fn natural_key(key: &String) -> NaturalKey {
        NaturalKey::Name(key.clone())
    }

    fn from_row(row: ReferenceRow) -> Result<Self> {
        match row.key {
            NaturalKey::Name(name) => Ok(Self { id: row.id, name }),
            other => Err(key_mismatch(Self::KIND, &other)),
        }
    }
}
