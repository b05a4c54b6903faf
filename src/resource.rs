//! Ownership tag for wrapped paint resources.

use std::fmt;
use std::ops::Deref;

/// A paint resource that is either owned by the holder or borrowed from a
/// process-wide stock table.
///
/// Dropping an `Owned` value releases it; dropping a `Stock` value never
/// touches the shared instance.
pub enum Resource<T: 'static> {
    Owned(T),
    Stock(&'static T),
}

impl<T: 'static> Resource<T> {
    pub fn is_owned(&self) -> bool {
        matches!(self, Resource::Owned(_))
    }

    pub fn is_stock(&self) -> bool {
        !self.is_owned()
    }
}

impl<T: 'static> Deref for Resource<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Resource::Owned(v) => v,
            Resource::Stock(v) => v,
        }
    }
}

impl<T: 'static> AsRef<T> for Resource<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Owned(v) => f.debug_tuple("Owned").field(v).finish(),
            Resource::Stock(v) => f.debug_tuple("Stock").field(v).finish(),
        }
    }
}
