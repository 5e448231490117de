use std::cmp::Ordering;

/// A sortable field of `T`, chosen by name from a fixed allow-list.
///
/// Implementors list their accepted names in [`SortField::FIELDS`] (lowercase) and
/// define the ascending comparison in [`SortField::compare`]. Names are matched
/// case-insensitively; anything not in the list resolves to `None`, which callers
/// treat as "no ordering".
pub trait SortField<T>: Copy + Sized + 'static {
    const FIELDS: &'static [(&'static str, Self)];

    /// Ascending comparison of two records by this field.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn resolve(name: Option<&str>) -> Option<Self> {
        let name = name?.to_lowercase();
        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }
}
