//! Host side of the desktop shell: the worker thread that drains the UI's
//! command queue and the checks it runs on user-supplied folders.

pub mod commands;
pub mod path_check;
pub mod runtime;
