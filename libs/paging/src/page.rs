use crate::{Error, Result, SortField};

/// A validated page size and 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    size: u64,
    number: u64,
}

impl PageRequest {
    /// Build a request from raw query values. Both must be positive.
    pub fn new(size: i64, number: i64) -> Result<Self> {
        let size = u64::try_from(size)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or(Error::InvalidPageSize(size))?;
        let number = u64::try_from(number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(Error::InvalidPageNumber(number))?;

        Ok(Self { size, number })
    }

    /// Reject page sizes above `max`.
    pub fn with_max_size(self, max: u64) -> Result<Self> {
        if self.size > max {
            return Err(Error::PageSizeTooLarge {
                size: self.size,
                max,
            });
        }
        Ok(self)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Number of records preceding the window. Saturates for pages far past the end.
    pub fn offset(&self) -> u64 {
        self.size.saturating_mul(self.number - 1)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }
}

/// `ceil(total_count / page_size)`.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size)
}

/// One window of a collection plus the metadata describing the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    current_page: u64,
    total_count: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from an already-sliced window and the unsliced count.
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            current_page: request.number(),
            total_count,
            total_pages: total_pages(total_count, request.size()),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page != 1
    }

    /// True unless the current page is exactly the last one. Pages past the end
    /// (and page 1 of an empty collection) report `true`.
    pub fn has_next_page(&self) -> bool {
        self.current_page != self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Slice `items` in their current order.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);

    let window = items.into_iter().skip(offset).take(limit).collect();
    Page::new(window, request, total_count)
}

/// Stable-sort `items` ascending by `order` (when given), then slice.
pub fn paginate_ordered<T, F>(mut items: Vec<T>, request: PageRequest, order: Option<F>) -> Page<T>
where
    F: SortField<T>,
{
    if let Some(field) = order {
        items.sort_by(|a, b| field.compare(a, b));
    }
    paginate(items, request)
}
