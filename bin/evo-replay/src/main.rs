//! evo-replay: serial host for the Evolution mint engine.
//!
//! Loads a genesis-style config, builds the engine over a source collection
//! and applies an operation script in order, printing one JSON line per
//! operation and a closing state summary.

#![allow(missing_docs, rustdoc::missing_crate_level_docs)]

mod script;

use alloy_primitives::{Address, Bytes, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use evo_common::MintRequest;
use evo_ledger::UnitLedger;
use evo_mint::{CallContext, ErrorKind, MintConfig, MintEngine, MintError, MintEvent};
use evo_splitter::{AssetKind, Payout};
use eyre::{eyre, Result};
use script::{Genesis, Operation};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Replays a JSON operation script through the mint engine.
#[derive(Parser, Debug)]
#[command(name = "evo-replay", about = "Replay mint operations through the Evolution engine")]
struct Args {
    /// Genesis-style JSON with an `evolution` object and optional `sourceHoldings`.
    /// Falls back to `EVO_MINT_*` environment variables when omitted.
    #[arg(long, env = "EVO_REPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of operations.
    #[arg(long, env = "EVO_REPLAY_SCRIPT")]
    script: PathBuf,

    /// Hex private key used to sign mint requests that carry no signature.
    #[arg(long, env = "EVO_REPLAY_SIGNER_KEY", hide_env_values = true)]
    signer_key: Option<String>,
}

/// Outcome of one operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpReport {
    index: usize,
    op: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    token_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    payouts: Vec<Payout>,
    events: Vec<MintEvent>,
}

/// State after the last operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    sale_state: &'static str,
    owner: Address,
    total_minted: u64,
    total_supply: u64,
    reserved: u64,
    native_balance: U256,
    applied: usize,
    rejected: usize,
}

/// Side results of a successful call.
#[derive(Debug, Default)]
struct Applied {
    token_ids: Vec<u64>,
    payouts: Vec<Payout>,
}

impl From<Vec<u64>> for Applied {
    fn from(token_ids: Vec<u64>) -> Self {
        Self { token_ids, payouts: Vec::new() }
    }
}

impl From<Vec<Payout>> for Applied {
    fn from(payouts: Vec<Payout>) -> Self {
        Self { token_ids: Vec::new(), payouts }
    }
}

impl From<()> for Applied {
    fn from((): ()) -> Self {
        Self::default()
    }
}

/// Signing fallback for operations without a signature.
#[derive(Debug)]
struct Signatures {
    key: Option<PrivateKeySigner>,
}

impl Signatures {
    fn new(key: Option<&str>) -> Result<Self> {
        let key = key.map(str::parse::<PrivateKeySigner>).transpose()?;
        if let Some(key) = &key {
            info!(signer = %key.address(), "signing unsigned mint requests locally");
        }
        Ok(Self { key })
    }

    fn resolve(
        &self,
        provided: Option<Bytes>,
        requester: Address,
        quantity: u64,
        nonce: &Bytes,
    ) -> Result<Bytes> {
        if let Some(signature) = provided {
            return Ok(signature);
        }
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| eyre!("operation has no signature and no signer key is set"))?;
        let hash = MintRequest::new(requester, quantity, nonce.clone()).signing_hash();
        let signature = key.sign_message_sync(hash.as_slice())?;
        Ok(Bytes::copy_from_slice(&signature.as_bytes()))
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn apply(
    engine: &mut MintEngine<UnitLedger>,
    signatures: &Signatures,
    op: Operation,
) -> Result<Result<Applied, MintError>> {
    use Operation as Op;

    let outcome = match op {
        Op::StartFreeMint { caller } => engine.start_free_mint(CallContext::new(caller)).map(Applied::from),
        Op::StartPreSale { caller } => engine.start_pre_sale(CallContext::new(caller)).map(Applied::from),
        Op::StartSale { caller } => engine.start_sale(CallContext::new(caller)).map(Applied::from),
        Op::EndSale { caller } => engine.end_sale(CallContext::new(caller)).map(Applied::from),
        Op::Pause { caller } => engine.pause(CallContext::new(caller)).map(Applied::from),
        Op::Unpause { caller } => engine.unpause(CallContext::new(caller)).map(Applied::from),
        Op::SetSigner { caller, signer } => {
            engine.set_signer_address(CallContext::new(caller), signer).map(Applied::from)
        }
        Op::SetMerkleRoot { caller, root } => {
            engine.set_merkle_root(CallContext::new(caller), root).map(Applied::from)
        }
        Op::SetBaseUri { caller, base_uri } => {
            engine.set_base_uri(CallContext::new(caller), base_uri).map(Applied::from)
        }
        Op::SetBeneficiary { caller, index, address } => {
            engine.set_beneficiary(CallContext::new(caller), index, address).map(Applied::from)
        }
        Op::TransferOwnership { caller, new_owner } => {
            engine.transfer_ownership(CallContext::new(caller), new_owner).map(Applied::from)
        }
        Op::Mint { caller, value, quantity, nonce, signature } => {
            let signature = signatures.resolve(signature, caller, quantity, &nonce)?;
            engine
                .mint(CallContext::with_value(caller, value), quantity, nonce, &signature)
                .map(Applied::from)
        }
        Op::FreeMint { caller, value, free_ids, pre_sale_ids, nonce, signature } => {
            let quantity = (free_ids.len() + pre_sale_ids.len()) as u64;
            let signature = signatures.resolve(signature, caller, quantity, &nonce)?;
            engine
                .free_mint(
                    CallContext::with_value(caller, value),
                    &free_ids,
                    &pre_sale_ids,
                    nonce,
                    &signature,
                )
                .map(Applied::from)
        }
        Op::PreSaleMint { caller, value, proof, nonce, signature } => {
            let signature = signatures.resolve(signature, caller, 1, &nonce)?;
            engine
                .pre_sale_mint(CallContext::with_value(caller, value), &proof, nonce, &signature)
                .map(Applied::from)
        }
        Op::ReservedMint { caller, to, quantity } => {
            engine.reserved_mint(CallContext::new(caller), to, quantity).map(Applied::from)
        }
        Op::Burn { caller, token_id } => engine.burn(CallContext::new(caller), token_id).map(Applied::from),
        Op::Approve { caller, to, token_id } => {
            engine.approve(CallContext::new(caller), to, token_id).map(Applied::from)
        }
        Op::SetApprovalForAll { caller, operator, approved } => engine
            .set_approval_for_all(CallContext::new(caller), operator, approved)
            .map(Applied::from),
        Op::TransferFrom { caller, from, to, token_id } => {
            engine.transfer_from(CallContext::new(caller), from, to, token_id).map(Applied::from)
        }
        Op::Deposit { caller, value } => {
            engine.receive(CallContext::with_value(caller, value)).map(Applied::from)
        }
        Op::DepositToken { token, amount } => engine.deposit_token(token, amount).map(Applied::from),
        Op::WithdrawAll { caller } => engine.withdraw_all(CallContext::new(caller)).map(Applied::from),
        Op::WithdrawErc20 { caller, token } => {
            engine.withdraw_erc20(CallContext::new(caller), token).map(Applied::from)
        }
    };
    Ok(outcome)
}

fn run(args: Args) -> Result<Summary> {
    let (config, source) = match &args.config {
        Some(path) => {
            let genesis = Genesis::load(path)?;
            let source = genesis.source_collection()?;
            (genesis.config, source)
        }
        None => (MintConfig::from_env()?, UnitLedger::new()),
    };
    let mut engine = MintEngine::new(config, source)?;
    let signatures = Signatures::new(args.signer_key.as_deref())?;

    let operations = script::load_script(&args.script)?;
    info!(count = operations.len(), script = %args.script.display(), "replaying operations");

    let (mut applied, mut rejected) = (0, 0);
    for (index, op) in operations.into_iter().enumerate() {
        let name = op.name();
        let report = match apply(&mut engine, &signatures, op)? {
            Ok(result) => {
                applied += 1;
                OpReport {
                    index,
                    op: name,
                    status: "ok",
                    error: None,
                    kind: None,
                    token_ids: result.token_ids,
                    payouts: result.payouts,
                    events: engine.take_events(),
                }
            }
            Err(err) => {
                rejected += 1;
                warn!(index, op = name, %err, "operation rejected");
                OpReport {
                    index,
                    op: name,
                    status: "rejected",
                    error: Some(err.to_string()),
                    kind: Some(err.kind()),
                    token_ids: Vec::new(),
                    payouts: Vec::new(),
                    events: engine.take_events(),
                }
            }
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(Summary {
        sale_state: engine.sale_state(),
        owner: engine.owner(),
        total_minted: engine.total_minted(),
        total_supply: engine.total_supply(),
        reserved: engine.reserved(),
        native_balance: engine.balance(AssetKind::Native),
        applied,
        rejected,
    })
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let summary = run(args)?;
    info!(applied = summary.applied, rejected = summary.rejected, "replay finished");
    println!("{}", serde_json::json!({ "summary": summary }));
    Ok(())
}
