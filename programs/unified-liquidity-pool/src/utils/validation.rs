use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;
use crate::error::*;

/// Validate a token amount argument
pub fn validate_amount(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(UlpError::InvalidAmount.into());
    }
    Ok(())
}

/// Validate a bet number against a game's inclusive range
pub fn validate_number(number: u8, min_number: u8, max_number: u8) -> Result<()> {
    if number < min_number || number > max_number {
        return Err(UlpError::InvalidNumber.into());
    }
    Ok(())
}

/// Check a caller-supplied token account from `remaining_accounts`.
/// The account must be owned by the token program, belong to `expected_owner`
/// and hold `expected_mint`.
pub fn verify_token_account(
    token_account_info: &AccountInfo,
    expected_owner: Pubkey,
    expected_mint: Pubkey,
) -> Result<()> {
    if *token_account_info.owner != anchor_spl::token::ID {
        msg!("Token account {} is not owned by the token program", token_account_info.key);
        return Err(UlpError::InvalidTokenAccount.into());
    }

    let token_account = TokenAccount::try_deserialize(&mut token_account_info.data.borrow().as_ref())
        .map_err(|_| UlpError::InvalidTokenAccount)?;

    if token_account.owner != expected_owner || token_account.mint != expected_mint {
        msg!(
            "Token account {} belongs to {} (mint {}), expected {} (mint {})",
            token_account_info.key,
            token_account.owner,
            token_account.mint,
            expected_owner,
            expected_mint
        );
        return Err(UlpError::InvalidTokenAccount.into());
    }

    Ok(())
}
