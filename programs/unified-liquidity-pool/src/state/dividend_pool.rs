// state/dividend_pool.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::UlpError;
use crate::utils::calculations::calculate_dividend;

/// One account's locked shares in the dividend registry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct DividendEntry {
    pub owner: Pubkey,
    pub locked: u64,
}

impl DividendEntry {
    pub const SIZE: usize = 32 + 8;
}

/// A payment computed by `plan_distribution`. Zero-amount entries are
/// participants the cursor walked past without paying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividendPayment {
    pub owner: Pubkey,
    pub amount: u64,
}

/// Registry of locked shares plus the resumable distribution cursor.
///
/// `participants` is an arena with swap-and-pop removal; indices below
/// `cursor` have been paid in the current round.
#[account]
pub struct DividendPool {
    pub vault: Pubkey,
    pub participants: Vec<DividendEntry>,
    pub total_locked: u64,
    pub cursor: u32,
    pub batch_size: u8,
    /// Reserve snapshot taken when the current round started
    pub round_pool: u64,
    pub rounds_completed: u64,
    pub bump: u8,
}

impl DividendPool {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // vault
        4 + DividendEntry::SIZE * MAX_DIVIDEND_PARTICIPANTS + // participants
        8 + // total_locked
        4 + // cursor
        1 + // batch_size
        8 + // round_pool
        8 + // rounds_completed
        1; // bump

    pub fn new(vault: Pubkey, bump: u8) -> Self {
        Self {
            vault,
            participants: Vec::new(),
            total_locked: 0,
            cursor: 0,
            batch_size: DEFAULT_DISTRIBUTION_BATCH,
            round_pool: 0,
            rounds_completed: 0,
            bump,
        }
    }

    pub fn position(&self, owner: &Pubkey) -> Option<usize> {
        self.participants.iter().position(|e| e.owner == *owner)
    }

    /// Locked shares of `owner`
    pub fn balance_of(&self, owner: &Pubkey) -> Result<u64> {
        self.position(owner)
            .map(|index| self.participants[index].locked)
            .ok_or(UlpError::NotInDividendPool.into())
    }

    /// Lock `amount` more shares for `owner`. Returns the new locked balance.
    pub fn lock(&mut self, owner: Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, UlpError::InvalidAmount);

        let total_locked = self.total_locked
            .checked_add(amount)
            .ok_or(UlpError::MathOverflow)?;

        let locked = match self.position(&owner) {
            Some(index) => {
                let entry = &mut self.participants[index];
                let locked = entry.locked
                    .checked_add(amount)
                    .ok_or(UlpError::MathOverflow)?;
                require!(locked >= MIN_DIVIDEND_LOCK, UlpError::LockBelowMinimum);
                entry.locked = locked;
                locked
            }
            None => {
                require!(amount >= MIN_DIVIDEND_LOCK, UlpError::LockBelowMinimum);
                if self.participants.len() >= MAX_DIVIDEND_PARTICIPANTS {
                    return Err(UlpError::DividendPoolFull.into());
                }
                self.participants.push(DividendEntry { owner, locked: amount });
                amount
            }
        };

        self.total_locked = total_locked;
        Ok(locked)
    }

    /// Unlock `amount` shares for `owner`, evicting the entry at zero.
    /// A partial unlock must leave at least `MIN_DIVIDEND_LOCK`.
    /// Returns the remaining locked balance.
    pub fn unlock(&mut self, owner: &Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, UlpError::InvalidAmount);

        let index = self.position(owner).ok_or(UlpError::IndexOutOfBounds)?;
        let entry = &mut self.participants[index];
        require!(amount <= entry.locked, UlpError::NotEnoughShares);

        let remaining = entry.locked - amount;
        require!(
            remaining == 0 || remaining >= MIN_DIVIDEND_LOCK,
            UlpError::LockBelowMinimum
        );
        entry.locked = remaining;
        self.total_locked = self.total_locked
            .checked_sub(amount)
            .ok_or(UlpError::MathOverflow)?;

        if remaining == 0 {
            self.evict(index);
        }
        Ok(remaining)
    }

    /// Swap-and-pop removal that keeps the paid/unpaid split around the
    /// cursor intact.
    fn evict(&mut self, index: usize) {
        let cursor = self.cursor as usize;
        if index < cursor {
            // The last paid entry fills the hole, the unpaid tail fills its slot
            let last_paid = cursor - 1;
            self.participants.swap(index, last_paid);
            self.participants.swap_remove(last_paid);
            self.cursor = last_paid as u32;
        } else {
            self.participants.swap_remove(index);
        }

        if self.cursor as usize >= self.participants.len() {
            self.cursor = 0;
        }
    }

    pub fn set_batch_size(&mut self, batch_size: u8) -> Result<()> {
        if batch_size == 0 || batch_size > MAX_DISTRIBUTION_BATCH {
            return Err(UlpError::InvalidBatchSize.into());
        }
        self.batch_size = batch_size;
        Ok(())
    }

    /// Advance the cursor over at most `batch_size` participants and compute
    /// what each is owed out of `reserve`.
    ///
    /// A round starts when the cursor is at zero: the reserve is snapshotted
    /// and every participant gets `round_pool * locked / total_locked`, capped
    /// by what is left of the reserve. The call ends early when the cursor
    /// wraps.
    pub fn plan_distribution(&mut self, reserve: u64) -> Result<Vec<DividendPayment>> {
        if self.participants.is_empty() {
            self.cursor = 0;
            return Ok(Vec::new());
        }

        if self.cursor == 0 {
            self.round_pool = reserve;
        }

        let mut remaining = reserve;
        let mut payments = Vec::with_capacity(self.batch_size as usize);

        for _ in 0..self.batch_size {
            let entry = self.participants[self.cursor as usize];
            let amount = calculate_dividend(self.round_pool, entry.locked, self.total_locked)?
                .min(remaining);
            remaining -= amount;
            payments.push(DividendPayment { owner: entry.owner, amount });

            self.cursor += 1;
            if self.cursor as usize >= self.participants.len() {
                self.cursor = 0;
                self.rounds_completed = self.rounds_completed.saturating_add(1);
                break;
            }
        }

        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: u64 = 1_000_000_000;

    fn pool_with(locks: &[u64]) -> (DividendPool, Vec<Pubkey>) {
        let mut pool = DividendPool::new(Pubkey::new_unique(), 255);
        let owners: Vec<Pubkey> = locks.iter().map(|_| Pubkey::new_unique()).collect();
        for (owner, amount) in owners.iter().zip(locks) {
            pool.lock(*owner, *amount).unwrap();
        }
        (pool, owners)
    }

    fn run_round(pool: &mut DividendPool, reserve: &mut u64) -> Vec<DividendPayment> {
        let mut paid = Vec::new();
        loop {
            let batch = pool.plan_distribution(*reserve).unwrap();
            for payment in &batch {
                *reserve -= payment.amount;
            }
            paid.extend(batch);
            if pool.cursor == 0 {
                return paid;
            }
        }
    }

    #[test]
    fn lock_then_unlock_restores_balances() {
        let (mut pool, owners) = pool_with(&[1_000 * TOKEN]);
        let owner = owners[0];

        assert_eq!(pool.lock(owner, 1_000 * TOKEN).unwrap(), 2_000 * TOKEN);
        assert_eq!(pool.unlock(&owner, 1_000 * TOKEN).unwrap(), 1_000 * TOKEN);
        assert_eq!(pool.balance_of(&owner).unwrap(), 1_000 * TOKEN);
        assert_eq!(pool.total_locked, 1_000 * TOKEN);
    }

    #[test]
    fn unknown_owner_cannot_query_or_unlock() {
        let (mut pool, _) = pool_with(&[1_000 * TOKEN]);
        let stranger = Pubkey::new_unique();
        assert_eq!(pool.balance_of(&stranger).unwrap_err(), UlpError::NotInDividendPool.into());
        assert_eq!(pool.unlock(&stranger, TOKEN).unwrap_err(), UlpError::IndexOutOfBounds.into());
    }

    #[test]
    fn unlocking_too_much_fails_without_change() {
        let (mut pool, owners) = pool_with(&[2_000 * TOKEN]);
        assert_eq!(
            pool.unlock(&owners[0], 4_000 * TOKEN).unwrap_err(),
            UlpError::NotEnoughShares.into()
        );
        assert_eq!(pool.balance_of(&owners[0]).unwrap(), 2_000 * TOKEN);
    }

    #[test]
    fn unlocking_everything_evicts() {
        let (mut pool, owners) = pool_with(&[TOKEN, 2 * TOKEN, 3 * TOKEN]);
        assert_eq!(pool.unlock(&owners[0], TOKEN).unwrap(), 0);

        assert_eq!(pool.participants.len(), 2);
        assert_eq!(pool.balance_of(&owners[0]).unwrap_err(), UlpError::NotInDividendPool.into());
        // swap-with-last moved the tail into slot 0
        assert_eq!(pool.participants[0].owner, owners[2]);
        assert_eq!(pool.total_locked, 5 * TOKEN);
    }

    #[test]
    fn registry_capacity_is_enforced() {
        let mut pool = DividendPool::new(Pubkey::new_unique(), 255);
        for _ in 0..MAX_DIVIDEND_PARTICIPANTS {
            pool.lock(Pubkey::new_unique(), MIN_DIVIDEND_LOCK).unwrap();
        }
        assert_eq!(
            pool.lock(Pubkey::new_unique(), MIN_DIVIDEND_LOCK).unwrap_err(),
            UlpError::DividendPoolFull.into()
        );
    }

    #[test]
    fn dust_locks_cannot_take_a_seat() {
        let mut pool = DividendPool::new(Pubkey::new_unique(), 255);
        assert_eq!(
            pool.lock(Pubkey::new_unique(), 1).unwrap_err(),
            UlpError::LockBelowMinimum.into()
        );
        assert!(pool.participants.is_empty());

        // a full registry of minimum locks still costs real shares
        for _ in 0..MAX_DIVIDEND_PARTICIPANTS {
            pool.lock(Pubkey::new_unique(), MIN_DIVIDEND_LOCK).unwrap();
        }
        assert_eq!(pool.total_locked, MIN_DIVIDEND_LOCK * MAX_DIVIDEND_PARTICIPANTS as u64);
    }

    #[test]
    fn partial_unlock_cannot_leave_dust() {
        let (mut pool, owners) = pool_with(&[2 * TOKEN]);
        let owner = owners[0];

        assert_eq!(
            pool.unlock(&owner, 2 * TOKEN - 1).unwrap_err(),
            UlpError::LockBelowMinimum.into()
        );
        assert_eq!(pool.balance_of(&owner).unwrap(), 2 * TOKEN);

        // topping up by less than the minimum is fine once seated
        assert_eq!(pool.lock(owner, 1).unwrap(), 2 * TOKEN + 1);
        assert_eq!(pool.unlock(&owner, TOKEN).unwrap(), TOKEN + 1);
        assert_eq!(pool.unlock(&owner, TOKEN + 1).unwrap(), 0);
        assert!(pool.participants.is_empty());
    }

    #[test]
    fn one_participant_per_call_by_default() {
        let (mut pool, owners) = pool_with(&[1_000 * TOKEN, 2_000 * TOKEN, 3_000 * TOKEN, 4_000 * TOKEN]);
        let mut reserve = 10_000 * TOKEN;

        for (call, owner) in owners.iter().enumerate() {
            let batch = pool.plan_distribution(reserve).unwrap();
            assert_eq!(batch.len(), 1);
            assert_eq!(batch[0].owner, *owner);
            reserve -= batch[0].amount;
            assert_eq!(pool.cursor as usize, (call + 1) % owners.len());
        }

        // 10%, 20%, 30%, 40% of the snapshot
        assert_eq!(reserve, 0);
        assert_eq!(pool.rounds_completed, 1);
    }

    #[test]
    fn round_needs_ceil_participants_over_batch_calls() {
        let (mut pool, _) = pool_with(&[TOKEN; 5]);
        pool.set_batch_size(2).unwrap();

        let mut calls = 0;
        loop {
            pool.plan_distribution(100).unwrap();
            calls += 1;
            if pool.cursor == 0 {
                break;
            }
        }
        assert_eq!(calls, 3);
    }

    #[test]
    fn evicted_participant_gets_nothing_and_others_share_the_rest() {
        let (mut pool, owners) = pool_with(&[1_000 * TOKEN, 2_000 * TOKEN, 3_000 * TOKEN, 4_000 * TOKEN]);
        let mut reserve = 7_000;

        // first participant is paid, then the third leaves before its turn
        let first = pool.plan_distribution(reserve).unwrap();
        reserve -= first[0].amount;
        assert_eq!(first[0].amount, 700);

        pool.unlock(&owners[2], 3_000 * TOKEN).unwrap();

        let rest = run_round(&mut pool, &mut reserve);
        let paid_to = |owner: &Pubkey| -> u64 {
            rest.iter().filter(|p| p.owner == *owner).map(|p| p.amount).sum()
        };

        assert_eq!(paid_to(&owners[2]), 0);
        // recomputed against the remaining 7000 locked
        assert_eq!(paid_to(&owners[1]), 2_000);
        assert_eq!(paid_to(&owners[3]), 4_000);
        assert_eq!(reserve, 300);
    }

    #[test]
    fn eviction_behind_cursor_keeps_unpaid_tail_in_round() {
        let (mut pool, owners) = pool_with(&[10 * TOKEN; 4]);
        pool.set_batch_size(2).unwrap();
        let mut reserve = 400;

        let paid = pool.plan_distribution(reserve).unwrap();
        for p in &paid {
            reserve -= p.amount;
        }
        assert_eq!(pool.cursor, 2);

        // owner 0 already paid this round and leaves
        pool.unlock(&owners[0], 10 * TOKEN).unwrap();
        assert_eq!(pool.cursor, 1);

        let rest = run_round(&mut pool, &mut reserve);
        let owners_paid: Vec<Pubkey> = rest.iter().map(|p| p.owner).collect();
        assert!(owners_paid.contains(&owners[2]));
        assert!(owners_paid.contains(&owners[3]));
        assert!(!owners_paid.contains(&owners[1]));
    }

    #[test]
    fn payouts_never_exceed_reserve() {
        let (mut pool, owners) = pool_with(&[5 * TOKEN, 5 * TOKEN]);
        let mut reserve = 100;

        let first = pool.plan_distribution(reserve).unwrap();
        reserve -= first[0].amount;
        assert_eq!(first[0].amount, 50);

        // the reserve shrinks mid-round; the cap holds
        reserve = 10;
        let second = pool.plan_distribution(reserve).unwrap();
        assert_eq!(second[0].owner, owners[1]);
        assert_eq!(second[0].amount, 10);
    }

    #[test]
    fn empty_registry_is_a_noop() {
        let mut pool = DividendPool::new(Pubkey::new_unique(), 255);
        assert!(pool.plan_distribution(1_000).unwrap().is_empty());
        assert_eq!(pool.cursor, 0);
    }

    #[test]
    fn batch_size_bounds() {
        let mut pool = DividendPool::new(Pubkey::new_unique(), 255);
        assert!(pool.set_batch_size(0).is_err());
        assert!(pool.set_batch_size(MAX_DISTRIBUTION_BATCH + 1).is_err());
        assert!(pool.set_batch_size(MAX_DISTRIBUTION_BATCH).is_ok());
    }
}
