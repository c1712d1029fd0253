//! Feature modules: vertical slices owning their state and views.

pub mod input;
pub mod sidebar;
pub mod transcript;
