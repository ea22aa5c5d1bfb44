//! Collection-wide constants.

use alloy_primitives::{address, Address, U256};

/// Hard cap on the number of units the collection can ever issue.
pub const MAX_SUPPLY: u64 = 10_000;

/// Per-transaction mint ceiling, also applied as the per-wallet holding ceiling.
pub const MAX_BATCH_MINT: u64 = 20;

/// Units set aside for owner-directed allocation.
pub const RESERVED_SUPPLY: u64 = 400;

/// Public sale unit price: 0.4 ether.
pub const SALE_PRICE: U256 = U256::from_limbs([400_000_000_000_000_000, 0, 0, 0]);

/// Discounted unit price for pre-sale and early-access units: 0.2 ether.
pub const PRE_SALE_PRICE: U256 = U256::from_limbs([200_000_000_000_000_000, 0, 0, 0]);

/// Denominator for beneficiary shares.
pub const BASIS_POINTS: u16 = 10_000;

/// Base metadata location used until the owner publishes a new one.
pub const DEFAULT_BASE_URI: &str = "https://aaa-evolution-api-h5pd2zuvza-uc.a.run.app/";

/// Default payout address for the collection's primary beneficiary.
pub const DEFAULT_PRIMARY_BENEFICIARY: Address =
    address!("0x6ab71C2025442B694C8585aCe2fc06D877469D30");

/// Default payout address for the collection's partner beneficiary.
pub const DEFAULT_PARTNER_BENEFICIARY: Address =
    address!("0x901FC05c4a4bC027a8979089D716b6793052Cc16");

/// Default payout addresses for the remaining treasury team members.
pub const DEFAULT_TEAM_MEMBERS: [Address; 3] = [
    address!("0x45f14c6F6649D1D4Cb3dD501811Ab7263285eaa3"),
    address!("0x672A7EC8fC186f6C9aa32d98C896821182907b08"),
    address!("0x5FA988805E792B6cA0466B2dbb52693b2DEfF33F"),
];
