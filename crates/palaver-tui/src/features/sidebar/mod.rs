//! Sessions sidebar: grouped history list with filter and selection.

mod state;
mod view;

pub use state::{SidebarRow, SidebarState};
pub use view::{SIDEBAR_WIDTH, render_sidebar};
