//! Stack API model types.

mod action;
mod backup;
mod deployment;
mod env_var;
mod firewall;
mod setting;
mod stack;

pub use action::*;
pub use backup::*;
pub use deployment::*;
pub use env_var::*;
pub use firewall::*;
pub use setting::*;
pub use stack::*;
