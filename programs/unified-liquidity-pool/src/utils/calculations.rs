// utils/calculations.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::error::UlpError;

/// floor(a * b / c) computed in u128
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    if c == 0 {
        return Err(UlpError::MathOverflow.into());
    }
    let value = (a as u128)
        .checked_mul(b as u128)
        .ok_or(UlpError::MathOverflow)?
        / c as u128;
    u64::try_from(value).map_err(|_| UlpError::MathOverflow.into())
}

/// Amount left after a basis-point fee, rounded down
pub fn apply_fee(amount: u64, fee_bps: u64) -> Result<u64> {
    let keep_bps = BASIS_POINTS
        .checked_sub(fee_bps)
        .ok_or(UlpError::MathOverflow)?;
    mul_div(amount, keep_bps, BASIS_POINTS)
}

/// Shares minted for a deposit, priced at the pre-deposit NAV.
/// The deposit fee is deducted first and stays in the vault unshared.
pub fn calculate_shares_to_mint(
    amount: u64,
    net_assets: u64,
    total_shares: u64,
) -> Result<u64> {
    let net_deposit = apply_fee(amount, STAKE_FEE_BPS)?;
    let shares = mul_div(net_deposit, total_shares, net_assets)?;
    require!(shares > 0, UlpError::ZeroShares);
    Ok(shares)
}

/// Capital paid out for burning `shares`, priced at the pre-burn NAV
pub fn calculate_exit_payout(
    shares: u64,
    net_assets: u64,
    total_shares: u64,
) -> Result<u64> {
    let gross = mul_div(shares, net_assets, total_shares)?;
    apply_fee(gross, EXIT_FEE_BPS)
}

/// Pro-rata dividend for one participant of the current round
pub fn calculate_dividend(round_pool: u64, locked: u64, total_locked: u64) -> Result<u64> {
    if locked == 0 || total_locked == 0 {
        return Ok(0);
    }
    mul_div(round_pool, locked, total_locked)
}

/// Gross payout for a winning wager
pub fn calculate_win_payout(amount: u64, multiplier_bps: u64) -> Result<u64> {
    mul_div(amount, multiplier_bps, BASIS_POINTS)
}

/// Part of a lost wager that goes to the dividend reserve
pub fn calculate_dividend_share(lost_amount: u64) -> Result<u64> {
    mul_div(lost_amount, DIVIDEND_SHARE_BPS, BASIS_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: u64 = 1_000_000_000;

    #[test]
    fn second_staker_pays_deposit_fee() {
        let shares = calculate_shares_to_mint(1_000 * TOKEN, 1_000 * TOKEN, 1_000 * TOKEN).unwrap();
        assert_eq!(shares, 970 * TOKEN);
    }

    #[test]
    fn exit_pays_nav_minus_fee() {
        // capital 2000, shares 1970 -> NAV ~1.01523
        let payout = calculate_exit_payout(100 * TOKEN, 2_000 * TOKEN, 1_970 * TOKEN).unwrap();
        assert_eq!(payout, 98_477_157_359);
    }

    #[test]
    fn stake_after_exit_uses_raised_nav() {
        let net_assets = 2_000 * TOKEN - 98_477_157_359;
        let shares = calculate_shares_to_mint(10_000 * TOKEN, net_assets, 1_870 * TOKEN).unwrap();
        assert_eq!(shares, 9_539_196_476_234);
    }

    #[test]
    fn dust_deposit_is_rejected() {
        assert!(calculate_shares_to_mint(1, 1_000 * TOKEN, 10).is_err());
    }

    #[test]
    fn dividend_is_floor_of_ratio() {
        assert_eq!(calculate_dividend(100, 1, 3).unwrap(), 33);
        assert_eq!(calculate_dividend(100, 0, 3).unwrap(), 0);
        assert_eq!(calculate_dividend(100, 5, 0).unwrap(), 0);
    }

    #[test]
    fn win_payout_matches_multiplier() {
        assert_eq!(calculate_win_payout(100 * TOKEN, NUMBER_MATCH_NEAR_MULTIPLIER_BPS).unwrap(), 245 * TOKEN);
        assert_eq!(calculate_dividend_share(100 * TOKEN).unwrap(), 50 * TOKEN);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(mul_div(1, 1, 0).is_err());
        assert!(mul_div(u64::MAX, u64::MAX, 1).is_err());
    }
}
