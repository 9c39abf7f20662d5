// state/vault.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::UlpError;
use crate::utils::calculations::*;

#[account]
pub struct Vault {
    /// Operator: bootstraps staking, approves games, tunes distribution
    pub authority: Pubkey,

    /// Capital token accepted by the vault
    pub capital_mint: Pubkey,

    /// Pool-share mint, authority is this PDA
    pub share_mint: Pubkey,

    /// Token account holding the pooled capital
    pub capital_account: Pubkey,

    /// Mirror of the share mint supply
    pub total_shares: u64,

    /// Capital earmarked for the dividend registry, excluded from NAV
    pub dividend_reserve: u64,

    pub total_collected: u64,
    pub total_paid_out: u64,
    pub total_dividends_paid: u64,

    pub bootstrapped: bool,

    /// Games allowed to call `collect` / `payout`
    pub approved_games: Vec<Pubkey>,

    pub created_at: i64,
    pub bump: u8,
}

impl Vault {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // capital_mint
        32 + // share_mint
        32 + // capital_account
        8 + // total_shares
        8 + // dividend_reserve
        8 + // total_collected
        8 + // total_paid_out
        8 + // total_dividends_paid
        1 + // bootstrapped
        4 + 32 * MAX_APPROVED_GAMES + // approved_games
        8 + // created_at
        1; // bump

    pub fn new(
        authority: Pubkey,
        capital_mint: Pubkey,
        share_mint: Pubkey,
        capital_account: Pubkey,
        created_at: i64,
        bump: u8,
    ) -> Self {
        Self {
            authority,
            capital_mint,
            share_mint,
            capital_account,
            total_shares: 0,
            dividend_reserve: 0,
            total_collected: 0,
            total_paid_out: 0,
            total_dividends_paid: 0,
            bootstrapped: false,
            approved_games: Vec::new(),
            created_at,
            bump,
        }
    }

    /// PDA signer seeds for CPIs where the vault is the authority
    pub fn signer_seeds(&self) -> [&[u8]; 3] {
        [
            VAULT_SEED,
            self.capital_mint.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }

    /// Capital backing the shares: balance minus the dividend reserve
    pub fn net_assets(&self, capital_balance: u64) -> Result<u64> {
        capital_balance
            .checked_sub(self.dividend_reserve)
            .ok_or(UlpError::InsufficientVaultBalance.into())
    }

    pub fn ensure_bootstrapped(&self) -> Result<()> {
        require!(self.bootstrapped, UlpError::NotBootstrapped);
        Ok(())
    }

    /// One-time 1:1 bootstrap. Returns the shares to mint.
    pub fn start_staking(&mut self, amount: u64) -> Result<u64> {
        require!(!self.bootstrapped, UlpError::AlreadyBootstrapped);
        require!(amount > 0, UlpError::InvalidAmount);

        self.total_shares = amount;
        self.bootstrapped = true;
        Ok(amount)
    }

    /// Account for a deposit of `amount`. `capital_balance` is read before
    /// the deposit lands. Returns the shares to mint.
    pub fn record_stake(&mut self, amount: u64, capital_balance: u64) -> Result<u64> {
        self.ensure_bootstrapped()?;
        require!(amount > 0, UlpError::InvalidAmount);

        let net_assets = self.net_assets(capital_balance)?;
        let shares = calculate_shares_to_mint(amount, net_assets, self.total_shares)?;

        self.total_shares = self.total_shares
            .checked_add(shares)
            .ok_or(UlpError::MathOverflow)?;
        Ok(shares)
    }

    /// Account for burning `shares`. Returns the capital to pay out.
    pub fn record_exit(&mut self, shares: u64, capital_balance: u64) -> Result<u64> {
        self.ensure_bootstrapped()?;
        require!(shares > 0, UlpError::InvalidAmount);
        require!(shares < self.total_shares, UlpError::InsufficientBalance);

        let net_assets = self.net_assets(capital_balance)?;
        let payout = calculate_exit_payout(shares, net_assets, self.total_shares)?;

        self.total_shares -= shares;
        Ok(payout)
    }

    pub fn is_game_approved(&self, game: &Pubkey) -> bool {
        self.approved_games.contains(game)
    }

    pub fn ensure_game_approved(&self, game: &Pubkey) -> Result<()> {
        require!(self.is_game_approved(game), UlpError::Unauthorized);
        Ok(())
    }

    pub fn set_game_approval(&mut self, game: Pubkey, approved: bool) -> Result<()> {
        let position = self.approved_games.iter().position(|g| *g == game);
        match (approved, position) {
            (true, None) => {
                if self.approved_games.len() >= MAX_APPROVED_GAMES {
                    return Err(UlpError::ApprovedGamesFull.into());
                }
                self.approved_games.push(game);
            }
            (false, Some(index)) => {
                self.approved_games.swap_remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    /// Settlement primitive: capital moves from a player into the vault
    pub fn record_collect(&mut self, game: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_game_approved(game)?;
        self.total_collected = self.total_collected
            .checked_add(amount)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }

    /// Settlement primitive: capital leaves the vault for a player.
    /// The dividend reserve is never used to pay games.
    pub fn record_payout(&mut self, game: &Pubkey, amount: u64, capital_balance: u64) -> Result<()> {
        self.ensure_game_approved(game)?;
        let net_assets = self.net_assets(capital_balance)?;
        require!(amount <= net_assets, UlpError::InsufficientVaultBalance);

        self.total_paid_out = self.total_paid_out
            .checked_add(amount)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }

    /// Move part of a lost wager into the dividend reserve.
    /// Returns the amount earmarked.
    pub fn accrue_house_gain(&mut self, game: &Pubkey, lost_amount: u64, capital_balance: u64) -> Result<u64> {
        self.ensure_game_approved(game)?;
        let share = calculate_dividend_share(lost_amount)?;
        let reserve = self.dividend_reserve
            .checked_add(share)
            .ok_or(UlpError::MathOverflow)?;
        require!(reserve <= capital_balance, UlpError::InsufficientVaultBalance);

        self.dividend_reserve = reserve;
        Ok(share)
    }

    /// Release capital from the dividend reserve after a payout
    pub fn release_dividends(&mut self, amount: u64) -> Result<()> {
        self.dividend_reserve = self.dividend_reserve
            .checked_sub(amount)
            .ok_or(UlpError::InsufficientVaultBalance)?;
        self.total_dividends_paid = self.total_dividends_paid
            .checked_add(amount)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }
}

/// Read-only snapshot returned by `get_vault_stats`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VaultStats {
    pub capital_balance: u64,
    pub dividend_reserve: u64,
    pub net_assets: u64,
    pub total_shares: u64,
    pub total_locked: u64,
    pub participants: u32,
    pub cursor: u32,
    pub bootstrapped: bool,
}
