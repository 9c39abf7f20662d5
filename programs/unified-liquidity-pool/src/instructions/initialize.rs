// instructions/initialize.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::constants::*;
use crate::events::VaultInitialized;
use crate::state::*;

/// Create the vault, its share mint, token accounts and dividend registry
pub fn handler(ctx: Context<InitializeVault>) -> Result<()> {
    let clock = Clock::get()?;
    let vault_key = ctx.accounts.vault.key();

    ctx.accounts.vault.set_inner(Vault::new(
        ctx.accounts.authority.key(),
        ctx.accounts.capital_mint.key(),
        ctx.accounts.share_mint.key(),
        ctx.accounts.capital_account.key(),
        clock.unix_timestamp,
        ctx.bumps.vault,
    ));

    ctx.accounts.dividend_pool.set_inner(DividendPool::new(
        vault_key,
        ctx.bumps.dividend_pool,
    ));

    msg!("🏦 Unified liquidity pool initialized");
    msg!("Authority: {}", ctx.accounts.authority.key());
    msg!("Capital mint: {}", ctx.accounts.capital_mint.key());
    msg!("Share mint: {}", ctx.accounts.share_mint.key());

    emit!(VaultInitialized {
        vault: vault_key,
        authority: ctx.accounts.authority.key(),
        capital_mint: ctx.accounts.capital_mint.key(),
        share_mint: ctx.accounts.share_mint.key(),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    /// Operator of the vault
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Capital token the vault pools
    pub capital_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        space = Vault::SIZE,
        seeds = [VAULT_SEED, capital_mint.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// Pool shares, minted and burned by the vault
    #[account(
        init,
        payer = authority,
        seeds = [SHARE_MINT_SEED, vault.key().as_ref()],
        bump,
        mint::decimals = capital_mint.decimals,
        mint::authority = vault,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [CAPITAL_SEED, vault.key().as_ref()],
        bump,
        token::mint = capital_mint,
        token::authority = vault,
    )]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    /// Receives the bootstrap shares; they are never exited
    #[account(
        init,
        payer = authority,
        seeds = [PROTOCOL_SHARES_SEED, vault.key().as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = vault,
    )]
    pub protocol_share_account: Box<Account<'info, TokenAccount>>,

    /// Holds shares locked in the dividend registry
    #[account(
        init,
        payer = authority,
        seeds = [LOCKED_SHARES_SEED, vault.key().as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = vault,
    )]
    pub locked_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        space = DividendPool::SIZE,
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
