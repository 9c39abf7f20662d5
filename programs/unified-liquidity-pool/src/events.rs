use anchor_lang::prelude::*;

// --- VAULT ---
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub capital_mint: Pubkey,
    pub share_mint: Pubkey,
}

#[event]
pub struct StakingStarted {
    pub vault: Pubkey,
    pub amount: u64,
    pub shares: u64,
}

#[event]
pub struct Staked {
    pub user: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
    pub total_shares: u64,
}

#[event]
pub struct StakeExited {
    pub user: Pubkey,
    pub shares_burned: u64,
    pub amount_withdrawn: u64,
    pub total_shares: u64,
}

#[event]
pub struct GameApproval {
    pub game: Pubkey,
    pub approved: bool,
}

// --- DIVIDEND POOL ---
#[event]
pub struct DividendLocked {
    pub user: Pubkey,
    pub amount: u64,
    pub locked: u64,
}

#[event]
pub struct DividendUnlocked {
    pub user: Pubkey,
    pub amount: u64,
    pub locked: u64,
    pub evicted: bool,
}

#[event]
pub struct DividendPaid {
    pub user: Pubkey,
    pub amount: u64,
}

#[event]
pub struct DistributionRound {
    pub processed: u32,
    pub paid: u64,
    pub cursor: u32,
    pub reserve_left: u64,
}

// --- GAMES ---
#[event]
pub struct GameInitialized {
    pub game: Pubkey,
    pub game_id: u8,
    pub kind: u8,
}

#[event]
pub struct GameLockChanged {
    pub game: Pubkey,
    pub locked: bool,
}

#[event]
pub struct BetPlaced {
    pub game: Pubkey,
    pub player: Pubkey,
    pub number: u8,
    pub amount: u64,
}

#[event]
pub struct BetSettled {
    pub game: Pubkey,
    pub player: Pubkey,
    pub number: u8,
    pub result: u8,
    pub amount: u64,
    pub payout: u64,
    pub is_win: bool,
}

// --- ORACLE ---
#[event]
pub struct RandomnessRequested {
    pub request: Pubkey,
    pub request_id: [u8; 32],
    pub key_hash: [u8; 32],
    pub fee: u64,
    pub game: Pubkey,
    pub player: Pubkey,
}

#[event]
pub struct RequestExpired {
    pub request: Pubkey,
    pub player: Pubkey,
    pub refund: u64,
}
