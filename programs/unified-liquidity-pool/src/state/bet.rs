use anchor_lang::prelude::*;
use crate::error::UlpError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetStatus {
    NoBet,
    Betted,
    /// Randomness requested, waiting for the oracle
    Awaiting,
}

/// A player's open bet on one game
#[account]
pub struct BetRecord {
    pub player: Pubkey,
    pub game: Pubkey,
    pub number: u8,
    pub amount: u64,
    pub has_bet: bool,
    pub has_played: bool,
    /// Pending `RandomnessRequest` while awaiting settlement
    pub request: Pubkey,
    pub placed_at: i64,
    pub rounds_played: u64,
    pub bump: u8,
}

impl BetRecord {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // player
        32 + // game
        1 + // number
        8 + // amount
        1 + // has_bet
        1 + // has_played
        32 + // request
        8 + // placed_at
        8 + // rounds_played
        1; // bump

    pub fn status(&self) -> BetStatus {
        match (self.has_bet, self.has_played) {
            (false, _) => BetStatus::NoBet,
            (true, false) => BetStatus::Betted,
            (true, true) => BetStatus::Awaiting,
        }
    }

    /// Open a bet. Fresh records get their identity on the first bet.
    pub fn place(
        &mut self,
        player: Pubkey,
        game: Pubkey,
        number: u8,
        amount: u64,
        placed_at: i64,
        bump: u8,
    ) -> Result<()> {
        require!(self.status() == BetStatus::NoBet, UlpError::AlreadyBetted);

        self.player = player;
        self.game = game;
        self.number = number;
        self.amount = amount;
        self.has_bet = true;
        self.has_played = false;
        self.request = Pubkey::default();
        self.placed_at = placed_at;
        self.bump = bump;
        Ok(())
    }

    /// Move to `Awaiting` once randomness has been requested
    pub fn mark_played(&mut self, request: Pubkey) -> Result<()> {
        match self.status() {
            BetStatus::NoBet => return Err(UlpError::CannotPlayWithoutBetting.into()),
            BetStatus::Awaiting => return Err(UlpError::RandomnessPending.into()),
            BetStatus::Betted => {}
        }
        self.has_played = true;
        self.request = request;
        Ok(())
    }

    /// The bet must be waiting on exactly this request
    pub fn ensure_awaiting(&self, request: &Pubkey) -> Result<()> {
        require!(
            self.status() == BetStatus::Awaiting && self.request == *request,
            UlpError::RequestMismatch
        );
        Ok(())
    }

    /// Reset after settlement or expiry so the player may bet again
    pub fn clear(&mut self) {
        self.number = 0;
        self.amount = 0;
        self.has_bet = false;
        self.has_played = false;
        self.request = Pubkey::default();
        self.rounds_played = self.rounds_played.saturating_add(1);
    }
}
