// instructions/oracle.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use crate::constants::*;
use crate::error::*;
use crate::events::*;
use crate::instructions::{vault_ops, wager::settle};
use crate::state::*;

pub fn initialize_oracle(
    ctx: Context<InitializeOracle>,
    coordinator: Pubkey,
    key_hash: [u8; 32],
    fee: u64,
) -> Result<()> {
    ctx.accounts.oracle_config.set_inner(OracleConfig::new(
        ctx.accounts.authority.key(),
        ctx.accounts.vault.key(),
        coordinator,
        ctx.accounts.fee_mint.key(),
        ctx.accounts.fee_vault.key(),
        key_hash,
        fee,
        ctx.bumps.oracle_config,
    ));

    msg!("🎲 Oracle configured for vault {}", ctx.accounts.vault.key());
    msg!("Coordinator: {}", coordinator);
    msg!("Fee: {} per request", fee);

    Ok(())
}

/// Charge the oracle fee and open a pending request. Returns the request id.
pub(crate) fn request_randomness<'info>(
    oracle_config: &mut Account<'info, OracleConfig>,
    request: &mut Account<'info, RandomnessRequest>,
    fee_vault: &Account<'info, TokenAccount>,
    coordinator_fee_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    context: RequestContext,
    request_bump: u8,
) -> Result<[u8; 32]> {
    let fee = oracle_config.fee;
    if fee_vault.amount < fee {
        return Err(UlpError::InsufficientOracleFee.into());
    }

    let clock = Clock::get()?;
    let request_id = oracle_config.next_request_id(&context);

    request.set_inner(RandomnessRequest {
        request_id,
        oracle: oracle_config.key(),
        context,
        key_hash: oracle_config.key_hash,
        fee,
        nonce: oracle_config.request_nonce,
        request_slot: clock.slot,
        created_at: clock.unix_timestamp,
        bump: request_bump,
    });
    oracle_config.record_request()?;

    if fee > 0 {
        let seeds = oracle_config.signer_seeds();
        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: fee_vault.to_account_info(),
                    to: coordinator_fee_account.to_account_info(),
                    authority: oracle_config.to_account_info(),
                },
                &[&seeds[..]],
            ),
            fee,
        )?;
    }

    msg!("🎲 Randomness requested at slot {}", clock.slot);

    emit!(RandomnessRequested {
        request: request.key(),
        request_id,
        key_hash: oracle_config.key_hash,
        fee,
        game: context.game,
        player: context.player,
    });

    Ok(request_id)
}

/// Oracle callback: settle the bet the request was opened for
pub fn fulfill_randomness(
    mut ctx: Context<FulfillRandomness>,
    request_id: [u8; 32],
    randomness: [u8; 32],
) -> Result<()> {
    let request_key = ctx.accounts.request.key();
    ctx.accounts.request.ensure_id(&request_id)?;
    ctx.accounts.bet_record.ensure_awaiting(&request_key)?;

    let random_value = randomness_to_u64(&randomness);
    msg!("Fulfilling request {} with value {}", request_key, random_value);

    let accounts = &mut ctx.accounts;
    settle(
        &mut accounts.vault,
        &mut accounts.game,
        &mut accounts.bet_record,
        &accounts.capital_account,
        &accounts.player_token_account,
        &accounts.token_program,
        random_value,
    )?;

    accounts.oracle_config.record_completion();

    Ok(())
}

/// Refund a bet whose randomness never arrived
pub fn cancel_expired_request(mut ctx: Context<CancelExpiredRequest>) -> Result<()> {
    let clock = Clock::get()?;
    let request_key = ctx.accounts.request.key();

    ctx.accounts.request.ensure_expired(clock.slot)?;
    ctx.accounts.bet_record.ensure_awaiting(&request_key)?;

    let accounts = &mut ctx.accounts;
    let refund = accounts.bet_record.amount;
    let game_key = accounts.game.key();

    vault_ops::payout(
        &mut accounts.vault,
        &game_key,
        &accounts.capital_account,
        &accounts.player_token_account,
        &accounts.token_program,
        refund,
    )?;

    accounts.bet_record.clear();
    accounts.oracle_config.record_completion();

    msg!("⏰ Request {} expired, refunded {}", request_key, refund);

    emit!(RequestExpired {
        request: request_key,
        player: accounts.player.key(),
        refund,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeOracle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ UlpError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        init,
        payer = authority,
        space = OracleConfig::SIZE,
        seeds = [ORACLE_SEED, vault.key().as_ref()],
        bump
    )]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    pub fee_mint: Box<Account<'info, Mint>>,

    /// Pays request fees; anyone may top it up
    #[account(
        init,
        payer = authority,
        seeds = [ORACLE_FEE_VAULT_SEED, oracle_config.key().as_ref()],
        bump,
        token::mint = fee_mint,
        token::authority = oracle_config,
    )]
    pub fee_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    pub coordinator: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// Only the coordinator registered for this vault may deliver
    #[account(
        mut,
        seeds = [ORACLE_SEED, vault.key().as_ref()],
        bump = oracle_config.bump,
        has_one = vault,
        has_one = coordinator @ UlpError::Unauthorized,
    )]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    /// Consumed here; a second callback finds no account
    #[account(
        mut,
        seeds = [REQUEST_SEED, oracle_config.key().as_ref(), &request.nonce.to_le_bytes()],
        bump = request.bump,
        close = player,
    )]
    pub request: Box<Account<'info, RandomnessRequest>>,

    /// Receives the request rent back
    #[account(mut, address = request.context.player)]
    pub player: SystemAccount<'info>,

    #[account(
        mut,
        address = request.context.game,
        has_one = vault,
    )]
    pub game: Box<Account<'info, Game>>,

    #[account(mut, address = request.context.bet)]
    pub bet_record: Box<Account<'info, BetRecord>>,

    #[account(
        mut,
        token::mint = vault.capital_mint,
        token::authority = player,
    )]
    pub player_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct CancelExpiredRequest<'info> {
    /// Anyone may cancel once the request has expired
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
        seeds = [ORACLE_SEED, vault.key().as_ref()],
        bump = oracle_config.bump,
        has_one = vault,
    )]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    #[account(
        mut,
        seeds = [REQUEST_SEED, oracle_config.key().as_ref(), &request.nonce.to_le_bytes()],
        bump = request.bump,
        close = player,
    )]
    pub request: Box<Account<'info, RandomnessRequest>>,

    #[account(mut, address = request.context.player)]
    pub player: SystemAccount<'info>,

    #[account(
        address = request.context.game,
        has_one = vault,
    )]
    pub game: Box<Account<'info, Game>>,

    #[account(mut, address = request.context.bet)]
    pub bet_record: Box<Account<'info, BetRecord>>,

    #[account(
        mut,
        token::mint = vault.capital_mint,
        token::authority = player,
    )]
    pub player_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub capital_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
