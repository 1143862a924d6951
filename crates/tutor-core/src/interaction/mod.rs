//! Front-end collaborators: dialogs, rendering and navigation.

mod dialog;
mod navigation;
mod render;

pub use dialog::{ChannelDialogs, DialogPrimitives, DialogRequest, DialogResolver};
pub use navigation::{Destination, Navigator};
pub use render::{RenderProjector, RenderScope};
