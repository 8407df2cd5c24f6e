//! UI layer for the desktop GUI: app shell and the two pages.

pub mod app;

pub use app::{DesktopGuiApp, StartupConfig};
