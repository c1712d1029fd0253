//! Modal overlays.

mod agent_picker;

pub use agent_picker::{AgentPickerOutcome, AgentPickerState};

/// The active overlay, if any. Stored outside `TuiState` so overlay handlers
/// can take `&mut self` and `&mut TuiState` without borrow conflicts.
pub enum Overlay {
    AgentPicker(AgentPickerState),
}

impl Overlay {
    /// Stamp for the render gate; bumped on any visible overlay change.
    pub fn revision(&self) -> u64 {
        match self {
            Overlay::AgentPicker(picker) => picker.revision(),
        }
    }
}
