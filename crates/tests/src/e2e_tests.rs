use crate::common::{sign_request, MintFixture, WhitelistTree};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use evo_common::{PRE_SALE_PRICE, SALE_PRICE};
use evo_mint::{
    CallContext, ErrorKind, MintConfig, MintEngine, MintError, MintEvent, SalePhase,
    SourceUnitFlags,
};
use evo_splitter::AssetKind;
use eyre::Result;

fn ether_tenths(n: u64) -> U256 {
    U256::from(n) * U256::from(100_000_000_000_000_000u64)
}

#[test]
fn test_full_sale_lifecycle() -> Result<()> {
    let mut fx = MintFixture::new()?;
    let tree = WhitelistTree::new(&[fx.user1, fx.outsider, fx.user2]);
    fx.engine.set_merkle_root(fx.as_owner(), tree.root().unwrap_or_default())?;

    // free mint: three free units plus two discounted ones
    fx.open_until(SalePhase::FreeMint)?;
    let (nonce, sig) = fx.authorize(fx.user1, 5)?;
    let value = PRE_SALE_PRICE * U256::from(2);
    let ids = fx.engine.free_mint(
        CallContext::with_value(fx.user1, value),
        &[0, 1, 2],
        &[0, 1],
        nonce,
        &sig,
    )?;
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    // pre-sale: one discounted unit for a whitelisted outsider
    fx.engine.start_pre_sale(fx.as_owner())?;
    let proof = tree.proof(fx.outsider).unwrap_or_default();
    let (nonce, sig) = fx.authorize(fx.outsider, 1)?;
    let ids = fx.engine.pre_sale_mint(
        CallContext::with_value(fx.outsider, PRE_SALE_PRICE),
        &proof,
        nonce,
        &sig,
    )?;
    assert_eq!(ids, vec![5]);

    // public sale
    fx.engine.start_sale(fx.as_owner())?;
    assert_eq!(fx.buy(fx.user2, 3)?, vec![6, 7, 8]);

    fx.engine.end_sale(fx.as_owner())?;
    let err = fx.buy(fx.user2, 1).unwrap_err();
    assert_eq!(err.to_string(), "Sale not active");

    assert_eq!(fx.engine.sale_state(), "ENDED");
    assert_eq!(fx.engine.total_minted(), 9);
    assert_eq!(fx.engine.balance_of(fx.user1), 5);
    assert_eq!(fx.engine.balance_of(fx.outsider), 1);
    assert_eq!(fx.engine.balance_of(fx.user2), 3);

    // 2 x 0.2 + 0.2 + 3 x 0.4
    let collected = ether_tenths(18);
    assert_eq!(fx.engine.balance(AssetKind::Native), collected);

    let payouts = fx.engine.withdraw_all(fx.as_owner())?;
    let amounts: Vec<_> = payouts.iter().map(|p| p.amount).collect();
    let tenth = collected / U256::from(10);
    assert_eq!(amounts, vec![tenth * U256::from(7), tenth * U256::from(3)]);
    assert!(fx.engine.balance(AssetKind::Native).is_zero());

    let phase_events: Vec<_> = fx
        .engine
        .events()
        .iter()
        .filter(|event| !matches!(event, MintEvent::Transfer { .. }))
        .cloned()
        .collect();
    assert_eq!(
        phase_events,
        vec![MintEvent::PreSaleBegins, MintEvent::SaleBegins, MintEvent::SaleEnds]
    );
    Ok(())
}

#[test]
fn test_checks_run_in_order() -> Result<()> {
    let mut fx = MintFixture::new()?;
    let forged = sign_request(&fx.signer, fx.outsider, 2, &Bytes::from_static(b"other"))?;

    // phase beats signature
    let err = fx
        .engine
        .mint(CallContext::new(fx.user1), 2, b"n1".to_vec().into(), &forged)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);

    // signature beats payment
    fx.open_until(SalePhase::Sale)?;
    let err = fx
        .engine
        .mint(CallContext::new(fx.user1), 2, b"n1".to_vec().into(), &forged)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(err.to_string(), "Signature does not correspond");

    // capacity beats payment
    let (nonce, sig) = fx.authorize(fx.user1, 21)?;
    let err = fx.engine.mint(CallContext::new(fx.user1), 21, nonce, &sig).unwrap_err();
    assert_eq!(err.to_string(), "Cannot mint more than MAX_BATCH_MINT per transaction");

    let (nonce, sig) = fx.authorize(fx.user1, 2)?;
    let err = fx.engine.mint(CallContext::with_value(fx.user1, SALE_PRICE), 2, nonce, &sig).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Payment);

    assert_eq!(fx.engine.total_minted(), 0);
    assert!(fx.engine.balance(AssetKind::Native).is_zero());
    Ok(())
}

#[test]
fn test_nonce_cannot_be_replayed() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::Sale)?;

    let (nonce, sig) = fx.authorize(fx.user1, 1)?;
    fx.engine.mint(CallContext::with_value(fx.user1, SALE_PRICE), 1, nonce.clone(), &sig)?;
    assert!(fx.engine.is_nonce_used(&nonce));

    let err = fx
        .engine
        .mint(CallContext::with_value(fx.user1, SALE_PRICE), 1, nonce.clone(), &sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Replay);
    assert_eq!(err.to_string(), "Nonce already used");

    // nonces are global, not per requester
    let sig = sign_request(&fx.signer, fx.user2, 1, &nonce)?;
    let err = fx
        .engine
        .mint(CallContext::with_value(fx.user2, SALE_PRICE), 1, nonce, &sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Replay);

    // quantity is part of the signed message
    let (nonce, sig) = fx.authorize(fx.user1, 1)?;
    let err = fx
        .engine
        .mint(CallContext::with_value(fx.user1, SALE_PRICE * U256::from(2)), 2, nonce, &sig)
        .unwrap_err();
    assert!(matches!(err, MintError::Auth(_)));
    Ok(())
}

#[test]
fn test_free_mint_source_unit_rules() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::FreeMint)?;
    let (nonce, sig) = fx.authorize(fx.user1, 1)?;

    // unit 150 belongs to user2
    let err = fx
        .engine
        .free_mint(CallContext::new(fx.user1), &[150], &[], nonce.clone(), &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Token not owned");
    assert!(!fx.engine.is_nonce_used(&nonce));

    // the rejected call left the nonce fresh
    fx.engine.free_mint(CallContext::new(fx.user1), &[7], &[], nonce, &sig)?;
    assert_eq!(fx.engine.used_token_id(7), SourceUnitFlags { free_mint_used: true, pre_sale_used: false });

    let (nonce, sig) = fx.authorize(fx.user1, 1)?;
    let err = fx
        .engine
        .free_mint(CallContext::new(fx.user1), &[7], &[], nonce.clone(), &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Token already used");

    // the discounted allowance of unit 7 is still open
    fx.engine.free_mint(CallContext::with_value(fx.user1, PRE_SALE_PRICE), &[], &[7], nonce, &sig)?;
    assert_eq!(fx.engine.used_token_id(7), SourceUnitFlags { free_mint_used: true, pre_sale_used: true });

    // duplicates inside one list
    let (nonce, sig) = fx.authorize(fx.user2, 2)?;
    let err = fx
        .engine
        .free_mint(CallContext::new(fx.user2), &[120, 120], &[], nonce, &sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Replay);
    Ok(())
}

#[test]
fn test_free_mint_mixed_lists() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::FreeMint)?;
    let free_ids = [1, 2, 6, 8, 10, 16, 18, 25, 30, 31, 32];
    let pre_sale_ids = [1, 3, 6, 9, 10, 16, 20];
    let value = PRE_SALE_PRICE * U256::from(pre_sale_ids.len());

    let (nonce, sig) = fx.authorize(fx.user1, 18)?;
    let ids = fx.engine.free_mint(
        CallContext::with_value(fx.user1, value),
        &free_ids,
        &pre_sale_ids,
        nonce,
        &sig,
    )?;
    assert_eq!(ids, (0..18).collect::<Vec<_>>());
    assert_eq!(fx.engine.balance_of(fx.user1), 18);

    let (nonce, sig) = fx.authorize(fx.user1, 18)?;
    let err = fx
        .engine
        .free_mint(CallContext::with_value(fx.user1, value), &free_ids, &pre_sale_ids, nonce, &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Token already used");
    Ok(())
}

#[test]
fn test_reserved_pool_drains_exactly() -> Result<()> {
    let mut fx = MintFixture::new()?;
    for _ in 0..20 {
        fx.engine.reserved_mint(fx.as_owner(), fx.user2, 20)?;
    }
    assert_eq!(fx.engine.reserved(), 0);
    assert_eq!(fx.engine.balance_of(fx.user2), 400);

    let err = fx.engine.reserved_mint(fx.as_owner(), fx.user2, 1).unwrap_err();
    assert_eq!(err.to_string(), "Not enough reserved supply");
    assert_eq!(err.kind(), ErrorKind::Capacity);
    Ok(())
}

#[test]
fn test_pre_sale_slot_is_single_use() -> Result<()> {
    let mut fx = MintFixture::new()?;
    let tree = WhitelistTree::new(&[fx.user1, fx.user2]);
    fx.engine.set_merkle_root(fx.as_owner(), tree.root().unwrap_or_default())?;
    fx.open_until(SalePhase::PreSale)?;

    let proof = tree.proof(fx.user2).unwrap_or_default();
    let (nonce, sig) = fx.authorize(fx.user2, 1)?;
    fx.engine.pre_sale_mint(CallContext::with_value(fx.user2, PRE_SALE_PRICE), &proof, nonce, &sig)?;

    let (nonce, sig) = fx.authorize(fx.user2, 1)?;
    let err = fx
        .engine
        .pre_sale_mint(CallContext::with_value(fx.user2, PRE_SALE_PRICE), &proof, nonce.clone(), &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Whitelist used");
    assert!(!fx.engine.is_nonce_used(&nonce));

    // a new root does not reset the slot
    let tree = WhitelistTree::new(&[fx.user2, fx.outsider, fx.user1]);
    fx.engine.set_merkle_root(fx.as_owner(), tree.root().unwrap_or_default())?;
    let proof = tree.proof(fx.user2).unwrap_or_default();
    let err = fx
        .engine
        .pre_sale_mint(CallContext::with_value(fx.user2, PRE_SALE_PRICE), &proof, nonce, &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Whitelist used");
    Ok(())
}

#[test]
fn test_wallet_cap_spans_paths() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::FreeMint)?;

    let ids: Vec<u64> = (0..15).collect();
    let (nonce, sig) = fx.authorize(fx.user1, 15)?;
    fx.engine.free_mint(CallContext::new(fx.user1), &ids, &[], nonce, &sig)?;

    fx.engine.start_pre_sale(fx.as_owner())?;
    fx.engine.start_sale(fx.as_owner())?;
    fx.buy(fx.user1, 5)?;

    let err = fx.buy(fx.user1, 1).unwrap_err();
    assert_eq!(err.to_string(), "Any one wallet cannot hold more than MAX_BATCH_MINT");

    // the reserved path is exempt
    fx.engine.reserved_mint(fx.as_owner(), fx.user1, 3)?;
    assert_eq!(fx.engine.balance_of(fx.user1), 23);
    Ok(())
}

#[test]
fn test_supply_ceiling_holds() -> Result<()> {
    let mut fx = MintFixture::with_config(|config| {
        config.max_supply = 30;
        config.reserved_supply = 5;
    })?;
    fx.open_until(SalePhase::Sale)?;

    fx.buy(fx.user1, 20)?;
    fx.buy(fx.user2, 10)?;
    let err = fx.buy(fx.outsider, 1).unwrap_err();
    assert_eq!(err.to_string(), "Not enough supply");
    assert_eq!(err.downcast_ref::<MintError>().map(MintError::kind), Some(ErrorKind::Capacity));

    let err = fx.engine.reserved_mint(fx.as_owner(), fx.outsider, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity);
    assert_eq!(fx.engine.reserved(), 5);
    assert_eq!(fx.engine.total_minted(), 30);
    Ok(())
}

#[test]
fn test_pause_blocks_mints_until_next_phase() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::FreeMint)?;
    fx.engine.pause(fx.as_owner())?;
    assert_eq!(fx.engine.sale_state(), "FREE_MINT_PAUSED");

    let (nonce, sig) = fx.authorize(fx.user1, 1)?;
    let err = fx
        .engine
        .free_mint(CallContext::new(fx.user1), &[0], &[], nonce, &sig)
        .unwrap_err();
    assert_eq!(err.to_string(), "Free mint not active");
    assert_eq!(fx.engine.pause(fx.as_owner()).unwrap_err().to_string(), "Sale is paused");

    // starting the next phase clears the pause
    fx.engine.start_pre_sale(fx.as_owner())?;
    assert_eq!(fx.engine.sale_state(), "PRE_SALE");
    assert_eq!(fx.engine.unpause(fx.as_owner()).unwrap_err().to_string(), "Sale is not paused");

    let err = fx.engine.start_free_mint(fx.as_owner()).unwrap_err();
    assert_eq!(err.to_string(), "Free mint has already started");
    Ok(())
}

#[test]
fn test_events_render_as_logs() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::Sale)?;
    fx.buy(fx.user2, 2)?;

    let emitter = Address::repeat_byte(0xe0);
    let logs: Vec<_> = fx.engine.take_events().iter().map(|event| event.to_log(emitter)).collect();
    assert_eq!(logs.len(), 2);

    let transfer_topic = keccak256("Transfer(address,address,uint256)");
    for (token_id, log) in logs.iter().enumerate() {
        let topics = log.data.topics();
        assert_eq!(log.address, emitter);
        assert_eq!(topics[0], transfer_topic);
        assert_eq!(topics[1], B256::ZERO);
        assert_eq!(topics[2], fx.user2.into_word());
        assert_eq!(topics[3], B256::from(U256::from(token_id)));
    }
    assert!(fx.engine.events().is_empty());
    Ok(())
}

#[test]
fn test_engine_from_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("collection.json");
    let owner = Address::repeat_byte(0x0a);
    let signer = Address::repeat_byte(0x0b);
    std::fs::write(
        &path,
        serde_json::json!({
            "evolution": {
                "owner": owner,
                "signer": signer,
                "maxSupply": 50,
                "reservedSupply": 10,
                "baseUri": "ipfs://collection/",
            }
        })
        .to_string(),
    )?;

    let extras: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let config = MintConfig::from_extras(&extras)?;
    let engine = MintEngine::new(config, evo_ledger::UnitLedger::new())?;

    assert_eq!(engine.owner(), owner);
    assert_eq!(engine.signer(), signer);
    assert_eq!(engine.reserved(), 10);
    assert_eq!(engine.supply().limits().max_supply, 50);
    assert_eq!(engine.contract_uri(), "ipfs://collection/contract.json");
    Ok(())
}
