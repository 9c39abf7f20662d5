// instructions/staking.rs
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount, Transfer};
use crate::constants::*;
use crate::error::*;
use crate::events::*;
use crate::state::*;
use crate::utils::*;

/// Operator seeds the vault; shares are minted 1:1 to the protocol account
pub fn start_staking(ctx: Context<StartStaking>, amount: u64) -> Result<()> {
    if ctx.accounts.authority_token_account.amount < amount {
        return Err(UlpError::InsufficientBalance.into());
    }

    let vault = &mut ctx.accounts.vault;
    let shares = vault.start_staking(amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.authority_token_account.to_account_info(),
                to: ctx.accounts.capital_account.to_account_info(),
                authority: ctx.accounts.authority.to_account_info(),
            },
        ),
        amount,
    )?;

    let seeds = vault.signer_seeds();
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.share_mint.to_account_info(),
                to: ctx.accounts.protocol_share_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            &[&seeds[..]],
        ),
        shares,
    )?;

    msg!("Staking started with {} capital, {} protocol shares", amount, shares);

    emit!(StakingStarted {
        vault: vault.key(),
        amount,
        shares,
    });

    Ok(())
}

/// Deposit capital at NAV minus the stake fee
pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
    ctx.accounts.vault.ensure_bootstrapped()?;
    validate_amount(amount)?;

    if ctx.accounts.user_token_account.amount < amount {
        return Err(UlpError::InsufficientBalance.into());
    }

    // NAV is read before the deposit lands
    let vault = &mut ctx.accounts.vault;
    let shares = vault.record_stake(amount, ctx.accounts.capital_account.amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_account.to_account_info(),
                to: ctx.accounts.capital_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
    )?;

    let seeds = vault.signer_seeds();
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.share_mint.to_account_info(),
                to: ctx.accounts.user_share_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            &[&seeds[..]],
        ),
        shares,
    )?;

    msg!("💰 Staked {} for {} shares", amount, shares);
    msg!("Total shares: {}", vault.total_shares);

    emit!(Staked {
        user: ctx.accounts.user.key(),
        amount,
        shares_minted: shares,
        total_shares: vault.total_shares,
    });

    Ok(())
}

/// Burn shares and withdraw capital at NAV minus the exit fee
pub fn exit_stake(ctx: Context<ExitStake>, share_amount: u64) -> Result<()> {
    ctx.accounts.vault.ensure_bootstrapped()?;
    validate_amount(share_amount)?;

    if ctx.accounts.user_share_account.amount < share_amount {
        return Err(UlpError::InsufficientBalance.into());
    }

    // Priced against capital before the burn, fee stays in the vault
    let vault = &mut ctx.accounts.vault;
    let payout = vault.record_exit(share_amount, ctx.accounts.capital_account.amount)?;

    token::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.share_mint.to_account_info(),
                from: ctx.accounts.user_share_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        share_amount,
    )?;

    let seeds = vault.signer_seeds();
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.capital_account.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            &[&seeds[..]],
        ),
        payout,
    )?;

    msg!("🔥 Exited {} shares for {}", share_amount, payout);

    emit!(StakeExited {
        user: ctx.accounts.user.key(),
        shares_burned: share_amount,
        amount_withdrawn: payout,
        total_shares: vault.total_shares,
    });

    Ok(())
}

pub fn get_vault_stats(ctx: Context<GetVaultStats>) -> Result<VaultStats> {
    let vault = &ctx.accounts.vault;
    let pool = &ctx.accounts.dividend_pool;
    let capital_balance = ctx.accounts.capital_account.amount;

    Ok(VaultStats {
        capital_balance,
        dividend_reserve: vault.dividend_reserve,
        net_assets: vault.net_assets(capital_balance)?,
        total_shares: vault.total_shares,
        total_locked: pool.total_locked,
        participants: pool.participants.len() as u32,
        cursor: pool.cursor,
        bootstrapped: vault.bootstrapped,
    })
}

#[derive(Accounts)]
pub struct StartStaking<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ UlpError::Unauthorized,
        has_one = share_mint,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        token::mint = vault.capital_mint,
        token::authority = authority,
    )]
    pub authority_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub share_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        seeds = [PROTOCOL_SHARES_SEED, vault.key().as_ref()],
        bump,
    )]
    pub protocol_share_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = share_mint,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        token::mint = vault.capital_mint,
        token::authority = user,
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Created on the first stake
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = share_mint,
        associated_token::authority = user,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ExitStake<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = share_mint,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        token::mint = share_mint,
        token::authority = user,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.capital_mint,
        token::authority = user,
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub share_mint: Box<Account<'info, Mint>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct GetVaultStats<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub capital_account: Box<Account<'info, TokenAccount>>,

    #[account(
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump = dividend_pool.bump,
        has_one = vault,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,
}
