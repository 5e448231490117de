//! Page-number pagination for record collections.
//!
//! A [`PageRequest`] selects the window `[size * (number - 1), size * number)` of a
//! collection. A [`Page`] carries that window together with the metadata list
//! endpoints report: total count, total pages, and previous/next flags.
//!
//! Two producers share these types:
//! - [`paginate`] / [`paginate_ordered`] slice an in-memory `Vec<T>`
//! - storage backends that run `LIMIT`/`OFFSET` themselves build the result with
//!   [`Page::new`] from the fetched window and a separate count
//!
//! Ordering is resolved from a fixed, per-entity allow-list through [`SortField`].

#![forbid(unsafe_code)]

mod error;
mod page;
mod sort;

pub use error::{Error, Result};
pub use page::{paginate, paginate_ordered, total_pages, Page, PageRequest};
pub use sort::SortField;
