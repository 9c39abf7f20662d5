// programs/unified-liquidity-pool/src/state/mod.rs
pub mod bet;
pub mod dividend_pool;
pub mod game;
pub mod oracle;
pub mod vault;

pub use bet::*;
pub use dividend_pool::*;
pub use game::*;
pub use oracle::*;
pub use vault::*;
