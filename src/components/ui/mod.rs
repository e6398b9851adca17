pub mod collapsible;
pub mod input;
pub mod message;
pub mod placeholder;

// Re-export component symbols so callers can `use crate::components::ui::Input` etc.
pub use collapsible::*;
pub use input::*;
pub use message::*;
pub use placeholder::*;
