//! UI layer for the desktop shell: renders the element tree and routes clicks to the dispatcher.

pub mod app;

pub use app::ShellApp;
