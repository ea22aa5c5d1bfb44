use crate::common::{test_accounts, MintFixture};
use alloy_primitives::{address, Address, U256};
use evo_common::DEFAULT_TEAM_MEMBERS;
use evo_mint::{CallContext, ErrorKind, SalePhase};
use evo_splitter::{
    treasury_split, AssetKind, ResiduePolicy, SplitterError, Treasury, TREASURY_SHARES,
};
use eyre::Result;

const TOKEN: Address = address!("0x7070707070707070707070707070707070707070");

#[test]
fn test_treasury_splits_native_and_token_balances() -> Result<()> {
    let owner = test_accounts(1)?[0].address();
    let mut treasury = Treasury::new(owner, treasury_split())?;

    treasury.deposit(AssetKind::Native, U256::from(1_000_000))?;
    treasury.deposit(AssetKind::Erc20(TOKEN), U256::from(10_000))?;

    let native = treasury.withdraw_all(owner, AssetKind::Native)?;
    let amounts: Vec<_> = native.iter().map(|p| p.amount).collect();
    let expected: Vec<_> =
        TREASURY_SHARES.iter().map(|bps| U256::from(100 * u64::from(*bps))).collect();
    assert_eq!(amounts, expected);
    assert_eq!(native[2].to, DEFAULT_TEAM_MEMBERS[0]);

    let token = treasury.withdraw_all(owner, AssetKind::Erc20(TOKEN))?;
    assert!(token.iter().all(|p| p.asset == AssetKind::Erc20(TOKEN)));
    assert_eq!(token.iter().fold(U256::ZERO, |acc, p| acc + p.amount), U256::from(10_000));
    assert!(treasury.balance(AssetKind::Erc20(TOKEN)).is_zero());
    Ok(())
}

#[test]
fn test_treasury_rejects_strangers_and_empty_balances() -> Result<()> {
    let accounts = test_accounts(2)?;
    let (owner, stranger) = (accounts[0].address(), accounts[1].address());
    let mut treasury = Treasury::new(owner, treasury_split())?;

    assert_eq!(
        treasury.withdraw_all(owner, AssetKind::Native).unwrap_err(),
        SplitterError::BalanceZero { asset: AssetKind::Native }
    );

    treasury.deposit(AssetKind::Native, U256::from(5))?;
    let err = treasury.withdraw_all(stranger, AssetKind::Native).unwrap_err();
    assert_eq!(err.to_string(), "Ownable: caller is not the owner");
    assert_eq!(err.rejected_caller(), Some(stranger));
    assert!(treasury.set_beneficiary(stranger, 0, stranger).is_err());

    // after a handover the old owner is a stranger
    treasury.transfer_ownership(owner, stranger)?;
    assert!(treasury.withdraw_all(owner, AssetKind::Native).is_err());
    assert_eq!(treasury.owner(), stranger);
    Ok(())
}

#[test]
fn test_residue_policy_controls_dust() -> Result<()> {
    let owner = Address::repeat_byte(0x01);

    let mut retain = Treasury::new(owner, treasury_split())?;
    retain.deposit(AssetKind::Native, U256::from(10_007))?;
    retain.withdraw_all(owner, AssetKind::Native)?;
    assert!(retain.balance(AssetKind::Native) < U256::from(TREASURY_SHARES.len()));
    assert!(!retain.balance(AssetKind::Native).is_zero());

    let mut config = treasury_split();
    config.residue = ResiduePolicy::SweepToLast;
    let mut sweep = Treasury::new(owner, config)?;
    sweep.deposit(AssetKind::Native, U256::from(10_007))?;
    let payouts = sweep.withdraw_all(owner, AssetKind::Native)?;
    assert_eq!(payouts.iter().fold(U256::ZERO, |acc, p| acc + p.amount), U256::from(10_007));
    assert!(sweep.balance(AssetKind::Native).is_zero());
    Ok(())
}

#[test]
fn test_engine_withdrawals_follow_redirected_beneficiary() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::Sale)?;
    fx.buy(fx.user1, 2)?;

    let err = fx.engine.set_beneficiary(CallContext::new(fx.user1), 1, fx.user1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    let partner = Address::repeat_byte(0x5a);
    fx.engine.set_beneficiary(fx.as_owner(), 1, partner)?;
    assert_eq!(fx.engine.withdrawal_config().beneficiaries[1].address, partner);

    let payouts = fx.engine.withdraw_all(fx.as_owner())?;
    assert_eq!(payouts[1].to, partner);

    // fungible tokens accumulated by the contract split the same way
    fx.engine.deposit_token(TOKEN, U256::from(1_000))?;
    let payouts = fx.engine.withdraw_erc20(fx.as_owner(), TOKEN)?;
    let amounts: Vec<_> = payouts.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![U256::from(700), U256::from(300)]);

    let err = fx.engine.withdraw_erc20(fx.as_owner(), TOKEN).unwrap_err();
    assert_eq!(err.to_string(), "Balance is zero");
    Ok(())
}
