//! Rokto — backend core for a blood-donation coordination network.
//!
//! Two subsystems live here. The region subsystem maps raw coordinates
//! and free-text address hints onto Bangladesh's administrative
//! hierarchy (division → district → upazila). The registry subsystem
//! tracks connected users and fans notifications out to them.
//!
//! The `rokto` binary exposes both over HTTP and as a one-shot CLI.

pub mod region;
pub mod registry;
pub mod server;
