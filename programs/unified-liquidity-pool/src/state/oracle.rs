// state/oracle.rs
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;
use crate::constants::*;
use crate::error::UlpError;

/// Randomness oracle client configuration, one per vault. Fixed at
/// initialization.
#[account]
pub struct OracleConfig {
    pub authority: Pubkey,
    /// Vault whose games this oracle settles; part of the PDA seeds
    pub vault: Pubkey,
    /// Only this key may deliver `fulfill_randomness`
    pub coordinator: Pubkey,
    /// Token the oracle charges its fee in
    pub fee_mint: Pubkey,
    /// Token account (owned by this PDA) that pays request fees
    pub fee_vault: Pubkey,
    pub key_hash: [u8; 32],
    pub fee: u64,
    pub request_nonce: u64,
    pub pending_requests: u64,
    pub bump: u8,
}

impl OracleConfig {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // vault
        32 + // coordinator
        32 + // fee_mint
        32 + // fee_vault
        32 + // key_hash
        8 + // fee
        8 + // request_nonce
        8 + // pending_requests
        1; // bump

    pub fn new(
        authority: Pubkey,
        vault: Pubkey,
        coordinator: Pubkey,
        fee_mint: Pubkey,
        fee_vault: Pubkey,
        key_hash: [u8; 32],
        fee: u64,
        bump: u8,
    ) -> Self {
        Self {
            authority,
            vault,
            coordinator,
            fee_mint,
            fee_vault,
            key_hash,
            fee,
            request_nonce: 0,
            pending_requests: 0,
            bump,
        }
    }

    /// Config PDA for `vault`
    pub fn address(vault: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[ORACLE_SEED, vault.as_ref()], &crate::ID)
    }

    pub fn signer_seeds(&self) -> [&[u8]; 3] {
        [
            ORACLE_SEED,
            self.vault.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }

    /// Opaque id for the next request: sha256(key_hash | game | player | nonce)
    pub fn next_request_id(&self, context: &RequestContext) -> [u8; 32] {
        hashv(&[
            &self.key_hash,
            context.game.as_ref(),
            context.player.as_ref(),
            &self.request_nonce.to_le_bytes(),
        ])
        .to_bytes()
    }

    pub fn record_request(&mut self) -> Result<()> {
        self.request_nonce = self.request_nonce
            .checked_add(1)
            .ok_or(UlpError::MathOverflow)?;
        self.pending_requests = self.pending_requests
            .checked_add(1)
            .ok_or(UlpError::MathOverflow)?;
        Ok(())
    }

    pub fn record_completion(&mut self) {
        self.pending_requests = self.pending_requests.saturating_sub(1);
    }
}

/// Who a randomness request settles
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct RequestContext {
    pub game: Pubkey,
    pub player: Pubkey,
    pub bet: Pubkey,
}

/// A randomness request awaiting its callback. Closed when consumed.
#[account]
pub struct RandomnessRequest {
    pub request_id: [u8; 32],
    pub oracle: Pubkey,
    pub context: RequestContext,
    pub key_hash: [u8; 32],
    pub fee: u64,
    pub nonce: u64,
    pub request_slot: u64,
    pub created_at: i64,
    pub bump: u8,
}

impl RandomnessRequest {
    /// Size for account allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // request_id
        32 + // oracle
        32 * 3 + // context
        32 + // key_hash
        8 + // fee
        8 + // nonce
        8 + // request_slot
        8 + // created_at
        1; // bump

    pub fn ensure_id(&self, request_id: &[u8; 32]) -> Result<()> {
        require!(self.request_id == *request_id, UlpError::UnknownRequest);
        Ok(())
    }

    pub fn is_expired(&self, current_slot: u64) -> bool {
        current_slot.saturating_sub(self.request_slot) >= REQUEST_EXPIRY_SLOTS
    }

    pub fn ensure_expired(&self, current_slot: u64) -> Result<()> {
        require!(self.is_expired(current_slot), UlpError::RequestNotExpired);
        Ok(())
    }
}

/// Fold a 32-byte VRF output into one unsigned integer
pub fn randomness_to_u64(randomness: &[u8; 32]) -> u64 {
    randomness
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .fold(0, |acc, word| acc ^ word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OracleConfig {
        OracleConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            [7u8; 32],
            1,
            255,
        )
    }

    fn context() -> RequestContext {
        RequestContext {
            game: Pubkey::new_unique(),
            player: Pubkey::new_unique(),
            bet: Pubkey::new_unique(),
        }
    }

    #[test]
    fn request_ids_are_deterministic_and_unique_per_nonce() {
        let mut config = config();
        let context = context();

        let first = config.next_request_id(&context);
        assert_eq!(first, config.next_request_id(&context));

        config.record_request().unwrap();
        assert_ne!(first, config.next_request_id(&context));
        assert_eq!(config.pending_requests, 1);

        config.record_completion();
        assert_eq!(config.pending_requests, 0);
    }

    #[test]
    fn each_vault_has_its_own_config() {
        let (vault_a, vault_b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (config_a, bump_a) = OracleConfig::address(&vault_a);
        let (config_b, _) = OracleConfig::address(&vault_b);
        assert_ne!(config_a, config_b);

        // the stored seeds sign for the derived address
        let mut config = config();
        config.vault = vault_a;
        config.bump = bump_a;
        let derived = Pubkey::create_program_address(&config.signer_seeds(), &crate::ID).unwrap();
        assert_eq!(derived, config_a);
    }

    #[test]
    fn request_id_depends_on_player() {
        let config = config();
        let a = context();
        let b = RequestContext { player: Pubkey::new_unique(), ..a };
        assert_ne!(config.next_request_id(&a), config.next_request_id(&b));
    }

    #[test]
    fn expiry_counts_slots() {
        let request = RandomnessRequest {
            request_id: [1u8; 32],
            oracle: Pubkey::new_unique(),
            context: context(),
            key_hash: [0u8; 32],
            fee: 0,
            nonce: 0,
            request_slot: 1_000,
            created_at: 0,
            bump: 255,
        };

        assert_eq!(
            request.ensure_expired(1_000 + REQUEST_EXPIRY_SLOTS - 1).unwrap_err(),
            UlpError::RequestNotExpired.into()
        );
        assert!(request.ensure_expired(1_000 + REQUEST_EXPIRY_SLOTS).is_ok());
        assert_eq!(request.ensure_id(&[2u8; 32]).unwrap_err(), UlpError::UnknownRequest.into());
        assert!(request.ensure_id(&[1u8; 32]).is_ok());
    }

    #[test]
    fn folding_uses_every_word() {
        let mut randomness = [0u8; 32];
        assert_eq!(randomness_to_u64(&randomness), 0);

        randomness[24] = 1;
        assert_eq!(randomness_to_u64(&randomness), 1);

        randomness[0] = 1;
        assert_eq!(randomness_to_u64(&randomness), 0);
    }
}
