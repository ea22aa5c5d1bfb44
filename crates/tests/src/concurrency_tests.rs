use crate::common::{fresh_nonce, sign_request, MintFixture};
use alloy_primitives::{Address, U256};
use evo_common::SALE_PRICE;
use evo_mint::{CallContext, ErrorKind, SalePhase, SharedMintEngine};
use eyre::Result;
use std::{collections::HashSet, thread};

const BUYERS: u8 = 8;
const BATCH: u64 = 5;

#[test]
fn test_parallel_buyers_never_exceed_supply() -> Result<()> {
    let mut fx = MintFixture::with_config(|config| {
        config.max_supply = 100;
        config.reserved_supply = 0;
    })?;
    fx.open_until(SalePhase::Sale)?;
    let signer = fx.signer.clone();
    let shared = SharedMintEngine::new(fx.engine);

    let minted: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=BUYERS)
            .map(|i| {
                let shared = shared.clone();
                let signer = signer.clone();
                scope.spawn(move || -> Result<Vec<u64>> {
                    let buyer = Address::with_last_byte(i);
                    let mut ids = Vec::new();
                    for _ in 0..4 {
                        let nonce = fresh_nonce();
                        let sig = sign_request(&signer, buyer, BATCH, &nonce)?;
                        let ctx = CallContext::with_value(buyer, SALE_PRICE * U256::from(BATCH));
                        match shared.write(|engine| engine.mint(ctx, BATCH, nonce, &sig)) {
                            Ok(batch) => ids.extend(batch),
                            Err(err) => assert_eq!(err.kind(), ErrorKind::Capacity),
                        }
                    }
                    Ok(ids)
                })
            })
            .collect();

        handles.into_iter().try_fold(Vec::new(), |mut all, handle| {
            let ids = handle.join().map_err(|_| eyre::eyre!("buyer thread panicked"))??;
            all.extend(ids);
            Ok::<_, eyre::Report>(all)
        })
    })?;

    let unique: HashSet<_> = minted.iter().copied().collect();
    assert_eq!(minted.len(), 100);
    assert_eq!(unique.len(), 100);

    shared.read(|engine| {
        assert_eq!(engine.total_minted(), 100);
        assert_eq!(
            engine.balance(evo_splitter::AssetKind::Native),
            SALE_PRICE * U256::from(100)
        );
    });
    Ok(())
}

#[test]
fn test_racing_nonce_is_consumed_once() -> Result<()> {
    let mut fx = MintFixture::new()?;
    fx.open_until(SalePhase::Sale)?;
    let buyer = fx.user1;
    let nonce = fresh_nonce();
    let sig = sign_request(&fx.signer, buyer, 1, &nonce)?;
    let shared = SharedMintEngine::new(fx.engine);

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..BUYERS)
            .map(|_| {
                let (shared, nonce, sig) = (shared.clone(), nonce.clone(), sig.clone());
                scope.spawn(move || {
                    shared.write(|engine| {
                        engine.mint(CallContext::with_value(buyer, SALE_PRICE), 1, nonce, &sig)
                    })
                })
            })
            .collect();
        handles.into_iter().filter_map(|handle| handle.join().ok()).collect()
    });

    assert_eq!(outcomes.len(), usize::from(BUYERS));
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .all(|err| err.kind() == ErrorKind::Replay));

    assert!(shared.read(|engine| engine.is_nonce_used(&nonce)));
    assert_eq!(shared.read(|engine| engine.balance_of(buyer)), 1);
    Ok(())
}
