use crate::{compute::compute_shares, types::*};
use alloy_primitives::U256;

/// Produce the transfers that split `balance` of `asset` across the table.
/// Zero amounts are skipped; the vault should be debited by `distributed`.
pub fn payout_plan(cfg: &SplitterConfig, asset: AssetKind, balance: U256) -> SplitPlan {
    let mut plan = SplitPlan { payouts: Vec::with_capacity(cfg.beneficiaries.len()), ..Default::default() };
    for (beneficiary, amount) in cfg.beneficiaries.iter().zip(compute_shares(cfg, balance)) {
        if amount.is_zero() {
            continue;
        }
        plan.distributed += amount;
        plan.payouts.push(Payout { asset, to: beneficiary.address, amount });
    }
    plan.residue = balance - plan.distributed;
    plan
}
