mod contacts;

pub use contacts::*;

use thiserror::Error;

/// Position of a row in a sectioned list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl std::fmt::Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// Returned for positions that do not designate a live row. Usually an
/// index captured before the data changed; callers show nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("section {0} is out of range")]
    SectionOutOfRange(usize),
    #[error("row {0} is out of range")]
    RowOutOfRange(IndexPath),
    #[error("section {0} is shrunk")]
    Shrunk(usize),
    #[error("row {0} is an action row")]
    ActionRow(IndexPath),
}
