//! Progress indicators shown while the agent works

pub mod spinner;
