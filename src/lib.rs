pub mod commands;
pub mod copy;
pub mod package;
pub mod runtime;
