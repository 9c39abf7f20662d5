// instructions/wager.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::constants::*;
use crate::error::*;
use crate::events::*;
use crate::instructions::{oracle::request_randomness, vault_ops};
use crate::state::*;
use crate::utils::*;

/// Operator registers a game backed by the vault
pub fn initialize_game(ctx: Context<InitializeGame>, game_id: u8, kind: u8) -> Result<()> {
    let clock = Clock::get()?;
    let kind = GameKind::from_index(kind).ok_or(UlpError::InvalidGameKind)?;

    ctx.accounts.game.set_inner(Game::new(
        ctx.accounts.authority.key(),
        ctx.accounts.vault.key(),
        game_id,
        kind,
        clock.unix_timestamp,
        ctx.bumps.game,
    ));

    msg!("🎮 Game {} created: {:?}", game_id, kind);
    msg!("Game account: {}", ctx.accounts.game.key());

    emit!(GameInitialized {
        game: ctx.accounts.game.key(),
        game_id,
        kind: kind.to_index(),
    });

    Ok(())
}

/// Place a wager on `number`; the stake is collected into the vault
pub fn bet(mut ctx: Context<Bet>, number: u8, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut ctx.accounts;
    let game_key = accounts.game.key();

    accounts.game.ensure_unlocked()?;
    accounts.game.validate_number(number)?;
    validate_amount(amount)?;

    if accounts.player_token_account.amount < amount {
        return Err(UlpError::InsufficientBalance.into());
    }

    accounts.bet_record.place(
        accounts.player.key(),
        game_key,
        number,
        amount,
        clock.unix_timestamp,
        ctx.bumps.bet_record,
    )?;

    // The vault must cover the best case once the wager has landed
    let max_payout = calculate_win_payout(amount, accounts.game.max_multiplier_bps())?;
    let coverage = accounts.vault
        .net_assets(accounts.capital_account.amount)?
        .checked_add(amount)
        .ok_or(UlpError::MathOverflow)?;
    if max_payout > coverage {
        return Err(UlpError::InsufficientVaultBalance.into());
    }

    vault_ops::collect(
        &mut accounts.vault,
        &game_key,
        &accounts.player,
        &accounts.player_token_account,
        &accounts.capital_account,
        &accounts.token_program,
        amount,
    )?;
    accounts.game.record_bet(amount)?;

    msg!("✅ Bet placed: {} on number {}", amount, number);

    emit!(BetPlaced {
        game: game_key,
        player: accounts.player.key(),
        number,
        amount,
    });

    Ok(())
}

/// Request randomness for the player's open bet
pub fn play(mut ctx: Context<Play>) -> Result<()> {
    ctx.accounts.game.ensure_unlocked()?;

    let accounts = &mut ctx.accounts;
    let request_key = accounts.request.key();

    // A player who never bet has no record yet
    let bet_info = accounts.bet_record.to_account_info();
    if bet_info.data_is_empty() || *bet_info.owner != crate::ID {
        return Err(UlpError::CannotPlayWithoutBetting.into());
    }
    let mut record = BetRecord::try_deserialize(&mut &bet_info.try_borrow_data()?[..])?;
    record.mark_played(request_key)?;
    {
        let mut data = bet_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        record.try_serialize(&mut writer)?;
    }

    let context = RequestContext {
        game: accounts.game.key(),
        player: accounts.player.key(),
        bet: bet_info.key(),
    };

    request_randomness(
        &mut accounts.oracle_config,
        &mut accounts.request,
        &accounts.fee_vault,
        &accounts.coordinator_fee_account,
        &accounts.token_program,
        context,
        ctx.bumps.request,
    )?;

    msg!("Playing number {} for {}", record.number, record.amount);

    Ok(())
}

/// Resolve an awaiting bet against an oracle value
pub(crate) fn settle<'info>(
    vault: &mut Account<'info, Vault>,
    game: &mut Account<'info, Game>,
    bet_record: &mut Account<'info, BetRecord>,
    capital_account: &Account<'info, TokenAccount>,
    player_token_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    random_value: u64,
) -> Result<()> {
    let game_key = game.key();
    let outcome = game.settle(
        &game_key,
        vault,
        bet_record,
        random_value,
        capital_account.amount,
    )?;

    if outcome.is_win {
        vault_ops::transfer_out(
            vault,
            capital_account,
            player_token_account,
            token_program,
            outcome.payout,
        )?;
        msg!("🎉 Player won {} on number {}", outcome.payout, outcome.number);
    } else {
        // half the lost stake is earmarked for dividend holders
        msg!("House gain {}, {} to dividend reserve", outcome.amount, outcome.dividend_share);
    }

    msg!("Bet settled: number {} result {}", outcome.number, outcome.result);

    emit!(BetSettled {
        game: game_key,
        player: bet_record.player,
        number: outcome.number,
        result: outcome.result,
        amount: outcome.amount,
        payout: outcome.payout,
        is_win: outcome.is_win,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(game_id: u8)]
pub struct InitializeGame<'info> {
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
        space = Game::SIZE,
        seeds = [GAME_SEED, vault.key().as_ref(), &[game_id]],
        bump
    )]
    pub game: Box<Account<'info, Game>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Bet<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.capital_mint.as_ref()],
        bump = vault.bump,
        has_one = capital_account,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [GAME_SEED, vault.key().as_ref(), &[game.game_id]],
        bump = game.bump,
        has_one = vault,
    )]
    pub game: Box<Account<'info, Game>>,

    /// One open bet per player and game
    #[account(
        init_if_needed,
        payer = player,
        space = BetRecord::SIZE,
        seeds = [BET_SEED, game.key().as_ref(), player.key().as_ref()],
        bump
    )]
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
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Play<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        seeds = [GAME_SEED, game.vault.as_ref(), &[game.game_id]],
        bump = game.bump,
    )]
    pub game: Box<Account<'info, Game>>,

    /// CHECK: deserialized in the handler so a missing record reports
    /// `CannotPlayWithoutBetting`
    #[account(
        mut,
        seeds = [BET_SEED, game.key().as_ref(), player.key().as_ref()],
        bump
    )]
    pub bet_record: UncheckedAccount<'info>,

    /// Oracle registered for the game's vault
    #[account(
        mut,
        seeds = [ORACLE_SEED, game.vault.as_ref()],
        bump = oracle_config.bump,
    )]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    #[account(mut, address = oracle_config.fee_vault)]
    pub fee_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = oracle_config.fee_mint,
        token::authority = oracle_config.coordinator,
    )]
    pub coordinator_fee_account: Box<Account<'info, TokenAccount>>,

    /// Player pays the rent and gets it back on settlement
    #[account(
        init,
        payer = player,
        space = RandomnessRequest::SIZE,
        seeds = [REQUEST_SEED, oracle_config.key().as_ref(), &oracle_config.request_nonce.to_le_bytes()],
        bump
    )]
    pub request: Box<Account<'info, RandomnessRequest>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
