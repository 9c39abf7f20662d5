use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::UlpError;
use crate::state::{BetRecord, Vault};
use crate::utils::calculations::calculate_win_payout;
use crate::utils::validation::validate_number;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameKind {
    /// Pick 0..=50; exact hit or a near miss pays
    NumberMatch = 0,
    /// Pick a die face 1..=6; exact hit pays
    DiceRoll = 1,
}

impl GameKind {
    pub fn to_index(&self) -> u8 {
        match self {
            GameKind::NumberMatch => 0,
            GameKind::DiceRoll => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(GameKind::NumberMatch),
            1 => Some(GameKind::DiceRoll),
            _ => None,
        }
    }
}

/// A wagering game backed by the vault
#[account]
pub struct Game {
    pub authority: Pubkey,
    pub vault: Pubkey,
    pub game_id: u8,
    pub kind: GameKind,

    /// Inclusive range of valid bet numbers
    pub min_number: u8,
    pub max_number: u8,

    /// Payout multipliers in basis points of the wager
    pub exact_multiplier_bps: u64,
    pub near_multiplier_bps: u64,
    pub near_distance: u8,

    /// Gates `bet` and `play`
    pub locked: bool,

    pub total_bets: u64,
    pub total_wagered: u64,
    pub total_paid_out: u64,
    pub total_settled: u64,
    pub created_at: i64,
    pub bump: u8,
}

impl Game {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // vault
        1 + // game_id
        1 + // kind
        1 + // min_number
        1 + // max_number
        8 + // exact_multiplier_bps
        8 + // near_multiplier_bps
        1 + // near_distance
        1 + // locked
        8 + // total_bets
        8 + // total_wagered
        8 + // total_paid_out
        8 + // total_settled
        8 + // created_at
        1; // bump

    /// Create a game from one of the built-in presets
    pub fn new(
        authority: Pubkey,
        vault: Pubkey,
        game_id: u8,
        kind: GameKind,
        created_at: i64,
        bump: u8,
    ) -> Self {
        let (min_number, max_number, exact_multiplier_bps, near_multiplier_bps, near_distance) =
            match kind {
                GameKind::NumberMatch => (
                    NUMBER_MATCH_MIN,
                    NUMBER_MATCH_MAX,
                    NUMBER_MATCH_EXACT_MULTIPLIER_BPS,
                    NUMBER_MATCH_NEAR_MULTIPLIER_BPS,
                    NUMBER_MATCH_NEAR_DISTANCE,
                ),
                GameKind::DiceRoll => (DICE_ROLL_MIN, DICE_ROLL_MAX, DICE_ROLL_EXACT_MULTIPLIER_BPS, 0, 0),
            };

        Self {
            authority,
            vault,
            game_id,
            kind,
            min_number,
            max_number,
            exact_multiplier_bps,
            near_multiplier_bps,
            near_distance,
            locked: false,
            total_bets: 0,
            total_wagered: 0,
            total_paid_out: 0,
            total_settled: 0,
            created_at,
            bump,
        }
    }

    pub fn ensure_unlocked(&self) -> Result<()> {
        require!(!self.locked, UlpError::Locked);
        Ok(())
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn validate_number(&self, number: u8) -> Result<()> {
        validate_number(number, self.min_number, self.max_number)
    }

    /// Number of distinct outcomes
    pub fn range_len(&self) -> u64 {
        (self.max_number - self.min_number) as u64 + 1
    }

    /// Map an oracle value onto the game's range
    pub fn result_from_randomness(&self, random_value: u64) -> u8 {
        self.min_number + (random_value % self.range_len()) as u8
    }

    /// Multiplier for a bet on `number` when `result` comes up, 0 on a loss
    pub fn multiplier_for(&self, number: u8, result: u8) -> u64 {
        let distance = number.abs_diff(result);
        if distance == 0 {
            self.exact_multiplier_bps
        } else if distance <= self.near_distance {
            self.near_multiplier_bps
        } else {
            0
        }
    }

    /// Best-case multiplier, used to check vault coverage at bet time
    pub fn max_multiplier_bps(&self) -> u64 {
        self.exact_multiplier_bps.max(self.near_multiplier_bps)
    }

    pub fn record_bet(&mut self, amount: u64) -> Result<()> {
        self.total_bets = self.total_bets
            .checked_add(1)
            .ok_or(UlpError::MathOverflow)?;
        self.total_wagered = self.total_wagered
            .checked_add(amount)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }

    pub fn record_settlement(&mut self, payout: u64) -> Result<()> {
        self.total_settled = self.total_settled
            .checked_add(1)
            .ok_or(UlpError::MathOverflow)?;
        self.total_paid_out = self.total_paid_out
            .checked_add(payout)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }

    /// Resolve an awaiting bet against an oracle value.
    ///
    /// A win books `amount * multiplier` as a vault payout; the caller moves
    /// the tokens. A loss stays in the vault with its dividend share moved
    /// into the reserve. The bet is cleared either way.
    pub fn settle(
        &mut self,
        game_key: &Pubkey,
        vault: &mut Vault,
        bet: &mut BetRecord,
        random_value: u64,
        capital_balance: u64,
    ) -> Result<Settlement> {
        let number = bet.number;
        let amount = bet.amount;
        let result = self.result_from_randomness(random_value);
        let multiplier = self.multiplier_for(number, result);

        let (payout, dividend_share) = if multiplier > 0 {
            let payout = calculate_win_payout(amount, multiplier)?;
            vault.record_payout(game_key, payout, capital_balance)?;
            (payout, 0)
        } else {
            (0, vault.accrue_house_gain(game_key, amount, capital_balance)?)
        };

        self.record_settlement(payout)?;
        bet.clear();

        Ok(Settlement {
            number,
            result,
            amount,
            payout,
            dividend_share,
            is_win: multiplier > 0,
        })
    }
}

/// Outcome of `Game::settle`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub number: u8,
    pub result: u8,
    pub amount: u64,
    /// Owed to the player, 0 on a loss
    pub payout: u64,
    /// Moved into the dividend reserve, 0 on a win
    pub dividend_share: u64,
    pub is_win: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BetStatus;

    fn game(kind: GameKind) -> Game {
        Game::new(Pubkey::new_unique(), Pubkey::new_unique(), 0, kind, 0, 255)
    }

    #[test]
    fn number_match_range() {
        let game = game(GameKind::NumberMatch);
        assert!(game.validate_number(0).is_ok());
        assert!(game.validate_number(50).is_ok());
        assert_eq!(game.validate_number(51).unwrap_err(), UlpError::InvalidNumber.into());
        assert_eq!(game.range_len(), 51);
    }

    #[test]
    fn results_stay_in_range() {
        for kind in [GameKind::NumberMatch, GameKind::DiceRoll] {
            let game = game(kind);
            for value in [0u64, 1, 5, 50, 51, 12_345, u64::MAX] {
                let result = game.result_from_randomness(value);
                assert!(result >= game.min_number && result <= game.max_number);
            }
        }
        assert_eq!(game(GameKind::DiceRoll).result_from_randomness(6), 1);
    }

    #[test]
    fn number_match_tiers() {
        let game = game(GameKind::NumberMatch);
        assert_eq!(game.multiplier_for(40, 40), NUMBER_MATCH_EXACT_MULTIPLIER_BPS);
        assert_eq!(game.multiplier_for(40, 35), NUMBER_MATCH_NEAR_MULTIPLIER_BPS);
        assert_eq!(game.multiplier_for(40, 45), NUMBER_MATCH_NEAR_MULTIPLIER_BPS);
        assert_eq!(game.multiplier_for(40, 34), 0);
        assert_eq!(game.multiplier_for(20, 0), 0);
    }

    #[test]
    fn dice_roll_pays_exact_only() {
        let game = game(GameKind::DiceRoll);
        assert_eq!(game.multiplier_for(3, 3), DICE_ROLL_EXACT_MULTIPLIER_BPS);
        assert_eq!(game.multiplier_for(3, 4), 0);
        assert_eq!(game.max_multiplier_bps(), DICE_ROLL_EXACT_MULTIPLIER_BPS);
    }

    #[test]
    fn house_keeps_an_edge() {
        for kind in [GameKind::NumberMatch, GameKind::DiceRoll] {
            let game = game(kind);
            // expected return for every pick, summed over all outcomes
            for number in game.min_number..=game.max_number {
                let total: u64 = (game.min_number..=game.max_number)
                    .map(|result| game.multiplier_for(number, result))
                    .sum();
                assert!(total < BASIS_POINTS * game.range_len());
            }
        }
    }

    #[test]
    fn lock_flag_gates_play() {
        let mut game = game(GameKind::NumberMatch);
        game.set_locked(true);
        assert_eq!(game.ensure_unlocked().unwrap_err(), UlpError::Locked.into());
        game.set_locked(false);
        assert!(game.ensure_unlocked().is_ok());
    }

    const TOKEN: u64 = 1_000_000_000;

    struct Table {
        key: Pubkey,
        game: Game,
        vault: Vault,
        bet: BetRecord,
    }

    /// NumberMatch with 100 tokens on 40, awaiting randomness
    fn table() -> Table {
        let key = Pubkey::new_unique();
        let game = game(GameKind::NumberMatch);
        let mut vault = Vault::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            0,
            255,
        );
        vault.set_game_approval(key, true).unwrap();

        let mut bet = BetRecord {
            player: Pubkey::default(),
            game: Pubkey::default(),
            number: 0,
            amount: 0,
            has_bet: false,
            has_played: false,
            request: Pubkey::default(),
            placed_at: 0,
            rounds_played: 0,
            bump: 0,
        };
        bet.place(Pubkey::new_unique(), key, 40, 100 * TOKEN, 0, 255).unwrap();
        bet.mark_played(Pubkey::new_unique()).unwrap();

        Table { key, game, vault, bet }
    }

    #[test]
    fn exact_hit_pays_full_multiplier() {
        let mut t = table();
        let outcome = t.game
            .settle(&t.key, &mut t.vault, &mut t.bet, 40, 10_000 * TOKEN)
            .unwrap();

        assert!(outcome.is_win);
        assert_eq!(outcome.result, 40);
        assert_eq!(outcome.payout, 2_450 * TOKEN);
        assert_eq!(outcome.dividend_share, 0);
        assert_eq!(t.vault.total_paid_out, 2_450 * TOKEN);
        assert_eq!(t.vault.dividend_reserve, 0);
        assert_eq!(t.game.total_paid_out, 2_450 * TOKEN);
        assert_eq!(t.game.total_settled, 1);
        assert_eq!(t.bet.status(), BetStatus::NoBet);
        assert_eq!(t.bet.amount, 0);
    }

    #[test]
    fn near_miss_pays_reduced_multiplier() {
        let mut t = table();
        // 96 % 51 == 45
        let outcome = t.game
            .settle(&t.key, &mut t.vault, &mut t.bet, 96, 10_000 * TOKEN)
            .unwrap();

        assert_eq!(outcome.result, 45);
        assert_eq!(outcome.payout, 245 * TOKEN);
        assert_eq!(t.bet.status(), BetStatus::NoBet);
    }

    #[test]
    fn loss_feeds_dividend_reserve() {
        let mut t = table();
        let outcome = t.game
            .settle(&t.key, &mut t.vault, &mut t.bet, 20, 10_000 * TOKEN)
            .unwrap();

        assert!(!outcome.is_win);
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.amount, 100 * TOKEN);
        assert_eq!(outcome.dividend_share, 50 * TOKEN);
        assert_eq!(t.vault.dividend_reserve, 50 * TOKEN);
        assert_eq!(t.vault.total_paid_out, 0);
        assert_eq!(t.game.total_settled, 1);
        assert_eq!(t.game.total_paid_out, 0);
        assert_eq!(t.bet.status(), BetStatus::NoBet);
        assert_eq!(t.bet.rounds_played, 1);
    }

    #[test]
    fn win_larger_than_net_assets_is_rejected() {
        let mut t = table();
        t.vault.dividend_reserve = 500 * TOKEN;
        // 2_500 capital minus 500 reserve cannot cover 2_450
        assert_eq!(
            t.game
                .settle(&t.key, &mut t.vault, &mut t.bet, 40, 2_500 * TOKEN)
                .unwrap_err(),
            UlpError::InsufficientVaultBalance.into()
        );
        assert_eq!(t.bet.status(), BetStatus::Awaiting);
        assert_eq!(t.game.total_settled, 0);
    }

    #[test]
    fn unapproved_game_cannot_settle() {
        let mut t = table();
        t.vault.set_game_approval(t.key, false).unwrap();
        assert_eq!(
            t.game
                .settle(&t.key, &mut t.vault, &mut t.bet, 20, 10_000 * TOKEN)
                .unwrap_err(),
            UlpError::Unauthorized.into()
        );
    }

    #[test]
    fn kind_index_round_trip() {
        assert_eq!(GameKind::from_index(GameKind::DiceRoll.to_index()), Some(GameKind::DiceRoll));
        assert_eq!(GameKind::from_index(9), None);
    }
}
