//! Input documents: the genesis-style config and the operation script.

use alloy_primitives::{Address, Bytes, B256, U256};
use evo_ledger::UnitLedger;
use evo_mint::MintConfig;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Units of the source collection assigned to one holder.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SourceHolding {
    pub(crate) owner: Address,
    pub(crate) count: u64,
}

/// Parsed config document.
#[derive(Debug)]
pub(crate) struct Genesis {
    pub(crate) config: MintConfig,
    pub(crate) holdings: Vec<SourceHolding>,
}

impl Genesis {
    /// Reads `{ "evolution": {...}, "sourceHoldings": [...] }` from `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let doc: Value = serde_json::from_str(&raw).wrap_err("config is not valid JSON")?;
        Self::from_value(&doc)
    }

    pub(crate) fn from_value(doc: &Value) -> Result<Self> {
        let config = MintConfig::from_extras(doc)?;
        let holdings = match doc.get("sourceHoldings") {
            Some(value) => serde_json::from_value(value.clone())
                .wrap_err("invalid sourceHoldings")?,
            None => Vec::new(),
        };
        Ok(Self { config, holdings })
    }

    /// Source collection with ids assigned in holding order, starting at 0.
    pub(crate) fn source_collection(&self) -> Result<UnitLedger> {
        let mut source = UnitLedger::new();
        for holding in &self.holdings {
            if holding.count > 0 {
                source.mint(holding.owner, holding.count)?;
            }
        }
        Ok(source)
    }
}

/// One engine call. Amounts accept decimal or `0x` strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub(crate) enum Operation {
    StartFreeMint { caller: Address },
    StartPreSale { caller: Address },
    StartSale { caller: Address },
    EndSale { caller: Address },
    Pause { caller: Address },
    Unpause { caller: Address },
    SetSigner { caller: Address, signer: Address },
    SetMerkleRoot { caller: Address, root: B256 },
    #[serde(rename = "setBaseURI")]
    SetBaseUri { caller: Address, base_uri: String },
    SetBeneficiary { caller: Address, index: usize, address: Address },
    TransferOwnership { caller: Address, new_owner: Address },
    Mint {
        caller: Address,
        #[serde(default)]
        value: U256,
        quantity: u64,
        nonce: Bytes,
        signature: Option<Bytes>,
    },
    FreeMint {
        caller: Address,
        #[serde(default)]
        value: U256,
        #[serde(default)]
        free_ids: Vec<u64>,
        #[serde(default)]
        pre_sale_ids: Vec<u64>,
        nonce: Bytes,
        signature: Option<Bytes>,
    },
    PreSaleMint {
        caller: Address,
        #[serde(default)]
        value: U256,
        proof: Vec<B256>,
        nonce: Bytes,
        signature: Option<Bytes>,
    },
    ReservedMint { caller: Address, to: Address, quantity: u64 },
    Burn { caller: Address, token_id: u64 },
    Approve { caller: Address, to: Address, token_id: u64 },
    SetApprovalForAll { caller: Address, operator: Address, approved: bool },
    TransferFrom { caller: Address, from: Address, to: Address, token_id: u64 },
    Deposit { caller: Address, value: U256 },
    DepositToken { token: Address, amount: U256 },
    WithdrawAll { caller: Address },
    WithdrawErc20 { caller: Address, token: Address },
}

impl Operation {
    /// Script name of the operation.
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::StartFreeMint { .. } => "startFreeMint",
            Self::StartPreSale { .. } => "startPreSale",
            Self::StartSale { .. } => "startSale",
            Self::EndSale { .. } => "endSale",
            Self::Pause { .. } => "pause",
            Self::Unpause { .. } => "unpause",
            Self::SetSigner { .. } => "setSigner",
            Self::SetMerkleRoot { .. } => "setMerkleRoot",
            Self::SetBaseUri { .. } => "setBaseURI",
            Self::SetBeneficiary { .. } => "setBeneficiary",
            Self::TransferOwnership { .. } => "transferOwnership",
            Self::Mint { .. } => "mint",
            Self::FreeMint { .. } => "freeMint",
            Self::PreSaleMint { .. } => "preSaleMint",
            Self::ReservedMint { .. } => "reservedMint",
            Self::Burn { .. } => "burn",
            Self::Approve { .. } => "approve",
            Self::SetApprovalForAll { .. } => "setApprovalForAll",
            Self::TransferFrom { .. } => "transferFrom",
            Self::Deposit { .. } => "deposit",
            Self::DepositToken { .. } => "depositToken",
            Self::WithdrawAll { .. } => "withdrawAll",
            Self::WithdrawErc20 { .. } => "withdrawErc20",
        }
    }
}

/// Reads a JSON array of operations from `path`.
pub(crate) fn load_script(path: &Path) -> Result<Vec<Operation>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err("invalid operation script")
}
