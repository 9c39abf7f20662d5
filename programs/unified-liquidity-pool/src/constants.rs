// constants.rs

// ============================================================================
// FEES
// ============================================================================

/// Basis point denominator
pub const BASIS_POINTS: u64 = 10_000;

/// Deposit fee kept by the vault on `stake` (3%)
pub const STAKE_FEE_BPS: u64 = 300;

/// Exit fee kept by the vault on `exit_stake` (3%)
pub const EXIT_FEE_BPS: u64 = 300;

/// Share of every lost wager earmarked for the dividend reserve (50%).
/// The remainder raises NAV for all share holders.
pub const DIVIDEND_SHARE_BPS: u64 = 5_000;

// ============================================================================
// DIVIDEND POOL
// ============================================================================

/// Maximum number of accounts in the dividend registry
pub const MAX_DIVIDEND_PARTICIPANTS: usize = 64;

/// Smallest locked balance an entry may hold (one share at 9 decimals).
/// Keeps dust locks from filling the registry.
pub const MIN_DIVIDEND_LOCK: u64 = 1_000_000_000;

/// Participants paid per `distribute` call unless the operator changes it
pub const DEFAULT_DISTRIBUTION_BATCH: u8 = 1;

/// Upper bound for the configurable batch size
pub const MAX_DISTRIBUTION_BATCH: u8 = 8;

// ============================================================================
// GAMES
// ============================================================================

/// Maximum number of games the vault can approve at once
pub const MAX_APPROVED_GAMES: usize = 8;

/// NumberMatch: inclusive number range
pub const NUMBER_MATCH_MIN: u8 = 0;
pub const NUMBER_MATCH_MAX: u8 = 50;

/// NumberMatch: exact hit pays 24.5x, a result within 5 pays 2.45x
pub const NUMBER_MATCH_EXACT_MULTIPLIER_BPS: u64 = 245_000;
pub const NUMBER_MATCH_NEAR_MULTIPLIER_BPS: u64 = 24_500;
pub const NUMBER_MATCH_NEAR_DISTANCE: u8 = 5;

/// DiceRoll: one die, exact hit pays 5.7x
pub const DICE_ROLL_MIN: u8 = 1;
pub const DICE_ROLL_MAX: u8 = 6;
pub const DICE_ROLL_EXACT_MULTIPLIER_BPS: u64 = 57_000;

// ============================================================================
// ORACLE
// ============================================================================

/// Slots after which an unfulfilled randomness request may be cancelled
pub const REQUEST_EXPIRY_SLOTS: u64 = 300;

// ============================================================================
// PDA SEEDS
// ============================================================================

pub const VAULT_SEED: &[u8] = b"vault";
pub const SHARE_MINT_SEED: &[u8] = b"share_mint";
pub const CAPITAL_SEED: &[u8] = b"capital";
pub const PROTOCOL_SHARES_SEED: &[u8] = b"protocol_shares";
pub const LOCKED_SHARES_SEED: &[u8] = b"locked_shares";
pub const DIVIDEND_POOL_SEED: &[u8] = b"dividend_pool";
pub const GAME_SEED: &[u8] = b"game";
pub const BET_SEED: &[u8] = b"bet";
pub const ORACLE_SEED: &[u8] = b"oracle";
pub const ORACLE_FEE_VAULT_SEED: &[u8] = b"oracle_fee_vault";
pub const REQUEST_SEED: &[u8] = b"request";
