// instructions/dividend.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::constants::*;
use crate::error::*;
use crate::events::*;
use crate::state::*;
use crate::utils::*;

/// Lock free shares into the dividend registry
pub fn add_to_dividend_pool(ctx: Context<AddToDividendPool>, share_amount: u64) -> Result<()> {
    validate_amount(share_amount)?;

    if ctx.accounts.user_share_account.amount < share_amount {
        return Err(UlpError::InsufficientBalance.into());
    }

    let user = ctx.accounts.user.key();
    let locked = ctx.accounts.dividend_pool.lock(user, share_amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_share_account.to_account_info(),
                to: ctx.accounts.locked_share_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        share_amount,
    )?;

    msg!("🔒 Locked {} shares, {} total for {}", share_amount, locked, user);

    emit!(DividendLocked {
        user,
        amount: share_amount,
        locked,
    });

    Ok(())
}

/// Unlock shares from the dividend registry, evicting the entry at zero
pub fn remove_from_dividend_pool(ctx: Context<RemoveFromDividendPool>, share_amount: u64) -> Result<()> {
    validate_amount(share_amount)?;

    let user = ctx.accounts.user.key();
    let remaining = ctx.accounts.dividend_pool.unlock(&user, share_amount)?;

    let seeds = ctx.accounts.vault.signer_seeds();
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.locked_share_account.to_account_info(),
                to: ctx.accounts.user_share_account.to_account_info(),
                authority: ctx.accounts.vault.to_account_info(),
            },
            &[&seeds[..]],
        ),
        share_amount,
    )?;

    let evicted = remaining == 0;
    msg!("🔓 Unlocked {} shares, {} left for {}", share_amount, remaining, user);
    if evicted {
        msg!("{} left the dividend pool", user);
    }

    emit!(DividendUnlocked {
        user,
        amount: share_amount,
        locked: remaining,
        evicted,
    });

    Ok(())
}

pub fn get_balance_of_user_hold_in_dividend_pool(ctx: Context<DividendBalance>) -> Result<u64> {
    ctx.accounts.dividend_pool.balance_of(&ctx.accounts.user.key())
}

/// Pay the next batch of registry participants out of the dividend reserve.
///
/// `remaining_accounts` must hold one capital token account per participant
/// the cursor will visit, in registry order starting at the cursor.
pub fn distribute<'info>(ctx: Context<'_, '_, '_, 'info, Distribute<'info>>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let pool = &mut ctx.accounts.dividend_pool;

    let payments = pool.plan_distribution(vault.dividend_reserve)?;
    if payments.is_empty() {
        msg!("ℹ️ Dividend pool is empty, nothing to distribute");
        return Ok(());
    }

    if ctx.remaining_accounts.len() < payments.len() {
        msg!(
            "❌ Expected {} participant token accounts, got {}",
            payments.len(),
            ctx.remaining_accounts.len()
        );
        return Err(ProgramError::NotEnoughAccountKeys.into());
    }

    let total_paid = payments
        .iter()
        .try_fold(0u64, |acc, p| acc.checked_add(p.amount))
        .ok_or(UlpError::MathOverflow)?;
    // Book the whole batch before any transfer
    vault.release_dividends(total_paid)?;

    let seeds = vault.signer_seeds();
    for (payment, payee) in payments.iter().zip(ctx.remaining_accounts.iter()) {
        verify_token_account(payee, payment.owner, vault.capital_mint)?;

        // Rounded down to nothing, account still checked
        if payment.amount == 0 {
            continue;
        }

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.capital_account.to_account_info(),
                    to: payee.clone(),
                    authority: vault.to_account_info(),
                },
                &[&seeds[..]],
            ),
            payment.amount,
        )?;

        msg!("💰 Dividend of {} paid to {}", payment.amount, payment.owner);

        emit!(DividendPaid {
            user: payment.owner,
            amount: payment.amount,
        });
    }

    msg!(
        "Distributed {} to {} participants, cursor at {}",
        total_paid,
        payments.len(),
        pool.cursor
    );

    emit!(DistributionRound {
        processed: payments.len() as u32,
        paid: total_paid,
        cursor: pool.cursor,
        reserve_left: vault.dividend_reserve,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct AddToDividendPool<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump = dividend_pool.bump,
        has_one = vault,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,

    #[account(
        mut,
        token::mint = vault.share_mint,
        token::authority = user,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [LOCKED_SHARES_SEED, vault.key().as_ref()],
        bump,
    )]
    pub locked_share_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct RemoveFromDividendPool<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump = dividend_pool.bump,
        has_one = vault,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,

    #[account(
        mut,
        token::mint = vault.share_mint,
        token::authority = user,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [LOCKED_SHARES_SEED, vault.key().as_ref()],
        bump,
    )]
    pub locked_share_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct DividendBalance<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [DIVIDEND_POOL_SEED, dividend_pool.vault.as_ref()],
        bump = dividend_pool.bump,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,
}

#[derive(Accounts)]
pub struct Distribute<'info> {
    /// Anyone may crank the distribution
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [DIVIDEND_POOL_SEED, vault.key().as_ref()],
        bump = dividend_pool.bump,
        has_one = vault,
    )]
    pub dividend_pool: Box<Account<'info, DividendPool>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
