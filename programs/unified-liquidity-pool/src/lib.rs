use anchor_lang::prelude::*;

// Import modules
pub mod constants;
pub mod error;
pub mod events;
pub mod state;
pub mod instructions;
pub mod utils;

// Re-export for convenience
pub use constants::*;
pub use error::*;
pub use state::*;
pub use instructions::*;

declare_id!("EjJ72JYFyPfnCFnBrWKqdgJW8qNWtvPbD1Wj7Umium7t");

#[program]
pub mod unified_liquidity_pool {
    use super::*;

    // ------------------------------------------------------------------
    // Vault
    // ------------------------------------------------------------------

    /// Create the vault for a capital mint
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// One-time operator bootstrap, shares minted 1:1
    pub fn start_staking(ctx: Context<StartStaking>, amount: u64) -> Result<()> {
        instructions::staking::start_staking(ctx, amount)
    }

    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        instructions::staking::stake(ctx, amount)
    }

    pub fn exit_stake(ctx: Context<ExitStake>, share_amount: u64) -> Result<()> {
        instructions::staking::exit_stake(ctx, share_amount)
    }

    pub fn get_vault_stats(ctx: Context<GetVaultStats>) -> Result<VaultStats> {
        instructions::staking::get_vault_stats(ctx)
    }

    pub fn change_game_approval(ctx: Context<ChangeGameApproval>, game: Pubkey, approved: bool) -> Result<()> {
        instructions::admin::change_game_approval(ctx, game, approved)
    }

    // ------------------------------------------------------------------
    // Dividend pool
    // ------------------------------------------------------------------

    pub fn add_to_dividend_pool(ctx: Context<AddToDividendPool>, share_amount: u64) -> Result<()> {
        instructions::dividend::add_to_dividend_pool(ctx, share_amount)
    }

    pub fn remove_from_dividend_pool(ctx: Context<RemoveFromDividendPool>, share_amount: u64) -> Result<()> {
        instructions::dividend::remove_from_dividend_pool(ctx, share_amount)
    }

    pub fn get_balance_of_user_hold_in_dividend_pool(ctx: Context<DividendBalance>) -> Result<u64> {
        instructions::dividend::get_balance_of_user_hold_in_dividend_pool(ctx)
    }

    /// Pay the next batch of participants; remaining accounts are their
    /// capital token accounts in registry order
    pub fn distribute<'info>(ctx: Context<'_, '_, '_, 'info, Distribute<'info>>) -> Result<()> {
        instructions::dividend::distribute(ctx)
    }

    pub fn set_distribution_batch_size(ctx: Context<SetDistributionBatchSize>, batch_size: u8) -> Result<()> {
        instructions::admin::set_distribution_batch_size(ctx, batch_size)
    }

    // ------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------

    pub fn initialize_game(ctx: Context<InitializeGame>, game_id: u8, kind: u8) -> Result<()> {
        instructions::wager::initialize_game(ctx, game_id, kind)
    }

    pub fn bet(ctx: Context<Bet>, number: u8, amount: u64) -> Result<()> {
        instructions::wager::bet(ctx, number, amount)
    }

    pub fn play(ctx: Context<Play>) -> Result<()> {
        instructions::wager::play(ctx)
    }

    pub fn lock(ctx: Context<SetGameLock>) -> Result<()> {
        instructions::admin::lock(ctx)
    }

    pub fn unlock(ctx: Context<SetGameLock>) -> Result<()> {
        instructions::admin::unlock(ctx)
    }

    // ------------------------------------------------------------------
    // Randomness oracle
    // ------------------------------------------------------------------

    pub fn initialize_oracle(
        ctx: Context<InitializeOracle>,
        coordinator: Pubkey,
        key_hash: [u8; 32],
        fee: u64,
    ) -> Result<()> {
        instructions::oracle::initialize_oracle(ctx, coordinator, key_hash, fee)
    }

    /// Coordinator callback delivering the VRF output
    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: [u8; 32],
        randomness: [u8; 32],
    ) -> Result<()> {
        instructions::oracle::fulfill_randomness(ctx, request_id, randomness)
    }

    pub fn cancel_expired_request(ctx: Context<CancelExpiredRequest>) -> Result<()> {
        instructions::oracle::cancel_expired_request(ctx)
    }
}
