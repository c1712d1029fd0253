//! User input feature: buffer state, key handling, view.

mod state;
mod update;
mod view;

pub use state::InputState;
pub use update::{InputKeyResult, handle_key};
pub use view::{INPUT_HEIGHT, render_input};
