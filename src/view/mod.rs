pub mod drag;
pub mod sync;
pub mod target;
pub mod theme;

pub use drag::{DragState, DropOutcome};
pub use sync::ViewSynchronizer;
pub use target::{Aggregate, ListItem, RenderTarget};
pub use theme::ThemeController;
