use crate::types::*;
use alloy_primitives::U256;
use evo_common::BASIS_POINTS;

/// `floor(balance * share_bps / 10000)`.
///
/// Falls back to splitting the balance by the denominator when the product
/// would overflow, so any balance is accepted.
#[inline]
pub fn compute_share(balance: U256, share_bps: u16) -> U256 {
    let bps = U256::from(share_bps);
    let denom = U256::from(BASIS_POINTS);
    match balance.checked_mul(bps) {
        Some(product) => product / denom,
        // (q*d + r) * bps / d == q*bps + r*bps/d with r < d
        None => (balance / denom) * bps + (balance % denom) * bps / denom,
    }
}

/// Per-beneficiary amounts in table order, after applying the residue policy.
pub fn compute_shares(cfg: &SplitterConfig, balance: U256) -> Vec<U256> {
    let mut shares: Vec<U256> =
        cfg.beneficiaries.iter().map(|b| compute_share(balance, b.share_bps)).collect();

    if cfg.residue == ResiduePolicy::SweepToLast {
        if let Some((last, previous)) = shares.split_last_mut() {
            let paid = previous.iter().fold(U256::ZERO, |acc, share| acc + *share);
            *last = balance.saturating_sub(paid);
        }
    }
    shares
}
