#![forbid(unsafe_code)]

//! Bottom sheet widget built on `sheet-core`.
//!
//! [`BottomSheet`] is the lifecycle controller: it owns the open/closed state
//! and sequences the animation channels for open, close, drag, keyboard, and
//! geometry changes. Drawing stays with the host through
//! [`RenderDelegate`] implementations fed by [`SheetView`] snapshots.

pub mod sheet;

pub use sheet::{
    BackdropPosition, BackdropView, BottomSheet, DefaultBackdrop, DefaultHandleBar,
    HandleBarView, KeyboardCoordinator, KeyboardEvent, KeyboardHost, NoKeyboard,
    RenderDelegate, Rgba, SheetConfig, SheetEvent, SheetFrame, SheetLayer, SheetState,
    SheetView,
};
