//! Interactive QKD network topology editor.
//!
//! The graph model (store, undo history, selection, inspector fields and the
//! payload projection) is plain Rust; [`NetworkEditor`] ties it together per
//! user action. The canvas and sidebar components drive it from the browser.

mod component;
mod editor;
mod graph;
mod history;
mod inspector;
mod projection;
mod render;
mod selection;
mod state;
mod types;

pub use component::NetworkEditorPanel;
pub use editor::NetworkEditor;
pub use inspector::{ChannelField, NodeField};
pub use projection::NetworkPayload;
pub use selection::Selection;
pub use types::{NodeHandle, Protocol};
