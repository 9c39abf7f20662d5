// instructions/admin.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::*;
use crate::events::*;
use crate::state::*;

/// Allow or revoke a game's access to `collect` / `payout`
pub fn change_game_approval(ctx: Context<ChangeGameApproval>, game: Pubkey, approved: bool) -> Result<()> {
    let vault = &mut ctx.accounts.vault;

    vault.set_game_approval(game, approved)?;

    msg!("✅ Game {} approval set to {}", game, approved);
    msg!("Approved games: {}", vault.approved_games.len());

    emit!(GameApproval { game, approved });

    Ok(())
}

pub fn set_distribution_batch_size(ctx: Context<SetDistributionBatchSize>, batch_size: u8) -> Result<()> {
    ctx.accounts.dividend_pool.set_batch_size(batch_size)?;

    msg!("Distribution batch size updated to: {}", batch_size);

    Ok(())
}

/// Stop new bets and plays on a game
pub fn lock(ctx: Context<SetGameLock>) -> Result<()> {
    set_game_lock(ctx, true)
}

pub fn unlock(ctx: Context<SetGameLock>) -> Result<()> {
    set_game_lock(ctx, false)
}

fn set_game_lock(ctx: Context<SetGameLock>, locked: bool) -> Result<()> {
    let game = &mut ctx.accounts.game;
    game.set_locked(locked);

    msg!("🔒 Game {} locked: {}", game.game_id, locked);

    emit!(GameLockChanged {
        game: game.key(),
        locked,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ChangeGameApproval<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ UlpError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,
}

#[derive(Accounts)]
pub struct SetDistributionBatchSize<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ UlpError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump = dividend_pool.bump,
        has_one = vault,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,
}

#[derive(Accounts)]
pub struct SetGameLock<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [GAME_SEED, game.vault.as_ref(), &[game.game_id]],
        bump = game.bump,
        has_one = authority @ UlpError::Unauthorized,
    )]
    pub game: Account<'info, Game>,
}
