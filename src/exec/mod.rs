// src/exec/mod.rs

//! Process execution: supervised process groups with live output relay.

pub mod process_group;
pub mod relay;
pub mod supervisor;

pub use supervisor::ProcessSupervisor;
