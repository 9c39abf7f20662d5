// Instructions module exports
pub mod initialize;
pub mod staking;
pub mod dividend;
pub mod admin;
pub mod wager;
pub mod oracle;
pub mod vault_ops;

pub use initialize::*;
pub use staking::*;
pub use dividend::*;
pub use admin::*;
pub use wager::*;
pub use oracle::*;
