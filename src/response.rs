//! Response bodies shared by every resource.

use serde::Serialize;

/// One page of a listing, with the offset/limit that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        })
    }
}

/// Confirmation returned by delete.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn deleted(kind: &str) -> Self {
        Message {
            message: format!("{} deleted successfully", kind),
        }
    }
}
