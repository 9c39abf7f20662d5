// error.rs
use anchor_lang::prelude::*;

#[error_code]
pub enum UlpError {
    // BALANCES
    #[msg("Caller has not enough balance")]
    InsufficientBalance,

    #[msg("Not enough shares")]
    NotEnoughShares,

    #[msg("Vault has not enough capital for this payout")]
    InsufficientVaultBalance,

    #[msg("Oracle fee vault cannot cover the request fee")]
    InsufficientOracleFee,

    // AUTHORIZATION
    #[msg("Caller is not allowed to perform this action")]
    Unauthorized,

    // VAULT STATE
    #[msg("Owner must initialize staking")]
    NotBootstrapped,

    #[msg("Staking is already initialized")]
    AlreadyBootstrapped,

    // GAME STATE
    #[msg("Game is locked")]
    Locked,

    #[msg("Already betted")]
    AlreadyBetted,

    #[msg("Cannot play without betting")]
    CannotPlayWithoutBetting,

    #[msg("Randomness already requested for this bet")]
    RandomnessPending,

    #[msg("Randomness request has not expired yet")]
    RequestNotExpired,

    // INPUT
    #[msg("Number out of range")]
    InvalidNumber,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Index out of bounds")]
    IndexOutOfBounds,

    #[msg("Unknown game kind")]
    InvalidGameKind,

    #[msg("Locked balance would fall below the dividend pool minimum")]
    LockBelowMinimum,

    #[msg("Invalid distribution batch size")]
    InvalidBatchSize,

    #[msg("Token account does not match the expected owner or mint")]
    InvalidTokenAccount,

    #[msg("Randomness request does not belong to this bet")]
    RequestMismatch,

    // LOOKUPS
    #[msg("Unknown randomness request")]
    UnknownRequest,

    #[msg("Caller is not in dividend pool")]
    NotInDividendPool,

    // CAPACITY
    #[msg("Dividend pool is full")]
    DividendPoolFull,

    #[msg("Too many approved games")]
    ApprovedGamesFull,

    // MATH
    #[msg("Deposit too small to mint shares")]
    ZeroShares,

    #[msg("Math overflow")]
    MathOverflow,
}
