use crate::domain::entities::measurement::MeasurementValues;

/// Inline edit of a single measurement row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        row_id: String,
        buffer: MeasurementValues,
    },
}

impl EditState {
    pub fn is_editing(&self, id: &str) -> bool {
        matches!(self, EditState::Editing { row_id, .. } if row_id == id)
    }

    pub fn row_id(&self) -> Option<&str> {
        match self {
            EditState::Editing { row_id, .. } => Some(row_id.as_str()),
            EditState::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&MeasurementValues> {
        match self {
            EditState::Editing { buffer, .. } => Some(buffer),
            EditState::Idle => None,
        }
    }

    /// Leaves `Idle` behind and hands back what was being edited.
    pub fn take(&mut self) -> Option<(String, MeasurementValues)> {
        match std::mem::take(self) {
            EditState::Editing { row_id, buffer } => Some((row_id, buffer)),
            EditState::Idle => None,
        }
    }
}

/// A staged delete awaiting confirmation. Only one can be pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDelete(Option<String>);

impl PendingDelete {
    pub fn stage(&mut self, id: impl Into<String>) {
        self.0 = Some(id.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    /// Runs `on_delete` with the staged id, at most once per staging.
    pub fn confirm(&mut self, on_delete: impl FnOnce(&str)) -> bool {
        match self.0.take() {
            Some(id) => {
                on_delete(&id);
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self) -> bool {
        self.0.take().is_some()
    }
}
