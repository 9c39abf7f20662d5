// instructions/vault_ops.rs
//
// Capital movements games are allowed to request from the vault. Accounting
// is updated before the token CPI in both directions.
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::state::*;

/// Move `amount` of capital from the player into the vault
pub fn collect<'info>(
    vault: &mut Account<'info, Vault>,
    game: &Pubkey,
    player: &Signer<'info>,
    player_token_account: &Account<'info, TokenAccount>,
    capital_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    vault.record_collect(game, amount)?;

    token::transfer(
        CpiContext::new(
            token_program.to_account_info(),
            Transfer {
                from: player_token_account.to_account_info(),
                to: capital_account.to_account_info(),
                authority: player.to_account_info(),
            },
        ),
        amount,
    )
}

/// Move `amount` of capital from the vault to the player
pub fn payout<'info>(
    vault: &mut Account<'info, Vault>,
    game: &Pubkey,
    capital_account: &Account<'info, TokenAccount>,
    player_token_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    vault.record_payout(game, amount, capital_account.amount)?;
    transfer_out(vault, capital_account, player_token_account, token_program, amount)
}

/// Vault-signed transfer of capital already booked as paid out
pub fn transfer_out<'info>(
    vault: &Account<'info, Vault>,
    capital_account: &Account<'info, TokenAccount>,
    player_token_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    let seeds = vault.signer_seeds();
    let signer = &[&seeds[..]];

    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: capital_account.to_account_info(),
                to: player_token_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            signer,
        ),
        amount,
    )
}
