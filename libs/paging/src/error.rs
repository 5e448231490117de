use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid page size {0}: expected a positive integer")]
    InvalidPageSize(i64),

    #[error("invalid page number {0}: expected a positive integer")]
    InvalidPageNumber(i64),

    #[error("page size {size} exceeds the maximum of {max}")]
    PageSizeTooLarge { size: u64, max: u64 },
}
