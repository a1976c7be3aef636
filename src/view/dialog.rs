use crate::entities::RecordId;

/// Which form, if any, the screen has open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogMode {
    #[default]
    Closed,
    Creating,
    Editing(RecordId),
    BulkImporting,
}

impl DialogMode {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[must_use]
    pub fn editing(&self) -> Option<&RecordId> {
        match self {
            Self::Editing(id) => Some(id),
            _ => None,
        }
    }
}
