//! The mint engine.
//!
//! Every entry point follows the same shape: run all read-only checks, then
//! commit. Checks run in a fixed order (phase, signature, nonce, source units
//! or whitelist, capacity, payment) so the first failing rule decides the
//! reported error. Commits cannot fail once the checks pass, which is what
//! makes each call all-or-nothing.

use crate::{
    authorizer::{MintAuthorizer, SourceUnitFlags},
    config::MintConfig,
    error::MintError,
    events::MintEvent,
    phase::{SalePhase, SalePhaseController},
    whitelist::WhitelistState,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use evo_common::{MintRequest, OwnershipGuard};
use evo_ledger::{check_payment, SourceCollection, SupplyLedger, TransferRecord};
use evo_splitter::{AssetKind, FundSplitter, Payout, SplitterConfig};
use tracing::{debug, info, instrument};

/// Caller identity and attached native value of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Account invoking the entry point.
    pub caller: Address,
    /// Native value attached to the call.
    pub value: U256,
}

impl CallContext {
    /// A call without value.
    pub const fn new(caller: Address) -> Self {
        Self { caller, value: U256::ZERO }
    }

    /// A call carrying `value`.
    pub const fn with_value(caller: Address, value: U256) -> Self {
        Self { caller, value }
    }
}

/// Orchestrates phases, authorization, whitelist, supply and fund splitting.
///
/// `S` is the read-only view of the source collection whose holders may use
/// the free-mint path.
#[derive(Debug)]
pub struct MintEngine<S> {
    guard: OwnershipGuard,
    phases: SalePhaseController,
    authorizer: MintAuthorizer,
    whitelist: WhitelistState,
    supply: SupplyLedger,
    splitter: FundSplitter,
    source: S,
    source_address: Address,
    sale_price: U256,
    pre_sale_price: U256,
    base_uri: String,
    events: Vec<MintEvent>,
}

impl<S: SourceCollection> MintEngine<S> {
    /// Builds an engine from a validated configuration.
    pub fn new(config: MintConfig, source: S) -> Result<Self, MintError> {
        config.validate()?;
        let limits = config.limits();
        info!(
            owner = %config.owner,
            signer = %config.signer,
            max_supply = limits.max_supply,
            reserved = limits.reserved_supply,
            "mint engine initialised"
        );

        Ok(Self {
            guard: OwnershipGuard::new(config.owner),
            phases: SalePhaseController::new(),
            authorizer: MintAuthorizer::new(config.signer),
            whitelist: WhitelistState::new(config.merkle_root),
            supply: SupplyLedger::new(limits),
            splitter: FundSplitter::new(config.withdrawal)?,
            source,
            source_address: config.source_collection,
            sale_price: config.sale_price,
            pre_sale_price: config.pre_sale_price,
            base_uri: config.base_uri,
            events: Vec::new(),
        })
    }

    // --- ownership -------------------------------------------------------

    /// Current owner.
    pub const fn owner(&self) -> Address {
        self.guard.owner()
    }

    /// Owner-only: hands the contract to `new_owner`.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn transfer_ownership(
        &mut self,
        ctx: CallContext,
        new_owner: Address,
    ) -> Result<(), MintError> {
        let transfer = self.guard.transfer_ownership(ctx.caller, new_owner).inspect_err(rejected)?;
        self.emit(transfer.into());
        Ok(())
    }

    // --- phase control ---------------------------------------------------

    /// Owner-only: opens the free-mint window.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn start_free_mint(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.advance(ctx, SalePhase::FreeMint)
    }

    /// Owner-only: opens the pre-sale window.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn start_pre_sale(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.advance(ctx, SalePhase::PreSale)
    }

    /// Owner-only: opens the public sale.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn start_sale(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.advance(ctx, SalePhase::Sale)
    }

    /// Owner-only: ends the sale for good.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn end_sale(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.advance(ctx, SalePhase::Ended)
    }

    /// Owner-only: pauses the current mint window.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn pause(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        self.phases.pause().inspect_err(rejected)?;
        info!(state = self.phases.sale_state(), "sale paused");
        self.emit(MintEvent::Paused { account: ctx.caller });
        Ok(())
    }

    /// Owner-only: resumes the current mint window.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn unpause(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        self.phases.unpause().inspect_err(rejected)?;
        info!(state = self.phases.sale_state(), "sale unpaused");
        self.emit(MintEvent::Unpaused { account: ctx.caller });
        Ok(())
    }

    /// Current phase.
    pub const fn current_phase(&self) -> SalePhase {
        self.phases.current_phase()
    }

    /// Phase label, suffixed with `_PAUSED` while paused.
    pub const fn sale_state(&self) -> &'static str {
        self.phases.sale_state()
    }

    fn advance(&mut self, ctx: CallContext, target: SalePhase) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        self.phases.check_transition(target).inspect_err(rejected)?;

        let event = match target {
            SalePhase::FreeMint => {
                self.phases.start_free_mint()?;
                MintEvent::FreeMintBegins
            }
            SalePhase::PreSale => {
                self.phases.start_pre_sale()?;
                MintEvent::PreSaleBegins
            }
            SalePhase::Sale => {
                self.phases.start_sale()?;
                MintEvent::SaleBegins
            }
            SalePhase::Ended | SalePhase::NotStarted => {
                self.phases.end_sale()?;
                MintEvent::SaleEnds
            }
        };
        info!(phase = %target, "sale phase changed");
        self.emit(event);
        Ok(())
    }

    // --- configuration ---------------------------------------------------

    /// Trusted signer.
    pub const fn signer(&self) -> Address {
        self.authorizer.signer()
    }

    /// Owner-only: replaces the trusted signer.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn set_signer_address(&mut self, ctx: CallContext, signer: Address) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        let previous = self.authorizer.set_signer(signer);
        info!(%previous, %signer, "signer updated");
        Ok(())
    }

    /// Published whitelist root.
    pub const fn merkle_root(&self) -> Option<B256> {
        self.whitelist.root()
    }

    /// Owner-only: publishes a whitelist root. Used flags are kept.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn set_merkle_root(&mut self, ctx: CallContext, root: B256) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        self.whitelist.set_root(root);
        info!(%root, "whitelist root published");
        Ok(())
    }

    /// Metadata base.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Owner-only: changes the metadata base. It must end with `/`.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn set_base_uri(&mut self, ctx: CallContext, base_uri: String) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        if !base_uri.ends_with('/') {
            debug!(%base_uri, "base uri rejected");
            return Err(MintError::MissingTrailingSlash);
        }
        self.base_uri.clone_from(&base_uri);
        self.emit(MintEvent::SetBaseUri { base_uri });
        Ok(())
    }

    /// Owner-only: re-points the withdrawal beneficiary at `index`.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn set_beneficiary(
        &mut self,
        ctx: CallContext,
        index: usize,
        address: Address,
    ) -> Result<(), MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        self.splitter.set_beneficiary(index, address).inspect_err(rejected)?;
        Ok(())
    }

    /// Withdrawal table.
    pub const fn withdrawal_config(&self) -> &SplitterConfig {
        self.splitter.config()
    }

    // --- mint paths ------------------------------------------------------

    /// Public-sale mint of `quantity` units at the sale price.
    ///
    /// Returns the minted ids.
    #[instrument(skip(self, nonce, signature), fields(caller = %ctx.caller, value = %ctx.value))]
    pub fn mint(
        &mut self,
        ctx: CallContext,
        quantity: u64,
        nonce: Bytes,
        signature: &[u8],
    ) -> Result<Vec<u64>, MintError> {
        let request = MintRequest::new(ctx.caller, quantity, nonce);
        self.check_mint(ctx, &request, signature).inspect_err(rejected)?;

        self.authorizer.consume_nonce(&request.nonce)?;
        let records = self.supply.open_mint(ctx.caller, quantity)?;
        self.commit_mint(ctx, records, "public mint")
    }

    fn check_mint(
        &self,
        ctx: CallContext,
        request: &MintRequest,
        signature: &[u8],
    ) -> Result<(), MintError> {
        self.phases.ensure_active(SalePhase::Sale)?;
        self.authorizer.check(request, signature)?;
        self.supply.check_open_mint(ctx.caller, request.quantity)?;
        check_payment(ctx.value, self.sale_price, request.quantity)?;
        self.splitter.check_deposit(AssetKind::Native, ctx.value)?;
        Ok(())
    }

    /// Early-access mint: one free unit per id in `free_ids` and one
    /// discounted unit per id in `pre_sale_ids`. The caller must hold every
    /// listed source unit.
    #[instrument(
        skip(self, free_ids, pre_sale_ids, nonce, signature),
        fields(
            caller = %ctx.caller,
            value = %ctx.value,
            free = free_ids.len(),
            discounted = pre_sale_ids.len(),
        )
    )]
    pub fn free_mint(
        &mut self,
        ctx: CallContext,
        free_ids: &[u64],
        pre_sale_ids: &[u64],
        nonce: Bytes,
        signature: &[u8],
    ) -> Result<Vec<u64>, MintError> {
        let quantity = (free_ids.len() + pre_sale_ids.len()) as u64;
        let request = MintRequest::new(ctx.caller, quantity, nonce);
        self.check_free_mint(ctx, &request, free_ids, pre_sale_ids, signature)
            .inspect_err(rejected)?;

        self.authorizer.consume_nonce(&request.nonce)?;
        self.authorizer.consume_source_units(free_ids, pre_sale_ids)?;
        let records = self.supply.free_mint(ctx.caller, free_ids, pre_sale_ids)?;
        self.commit_mint(ctx, records, "free mint")
    }

    fn check_free_mint(
        &self,
        ctx: CallContext,
        request: &MintRequest,
        free_ids: &[u64],
        pre_sale_ids: &[u64],
        signature: &[u8],
    ) -> Result<(), MintError> {
        self.phases.ensure_active(SalePhase::FreeMint)?;
        self.authorizer.check(request, signature)?;
        self.authorizer.check_source_units(&self.source, ctx.caller, free_ids, pre_sale_ids)?;
        self.supply.check_open_mint(ctx.caller, request.quantity)?;
        check_payment(ctx.value, self.pre_sale_price, pre_sale_ids.len() as u64)?;
        self.splitter.check_deposit(AssetKind::Native, ctx.value)?;
        Ok(())
    }

    /// Whitelist mint of exactly one unit at the discounted price.
    #[instrument(skip(self, proof, nonce, signature), fields(caller = %ctx.caller, value = %ctx.value))]
    pub fn pre_sale_mint(
        &mut self,
        ctx: CallContext,
        proof: &[B256],
        nonce: Bytes,
        signature: &[u8],
    ) -> Result<Vec<u64>, MintError> {
        let request = MintRequest::new(ctx.caller, 1, nonce);
        self.check_pre_sale_mint(ctx, &request, proof, signature).inspect_err(rejected)?;

        self.authorizer.consume_nonce(&request.nonce)?;
        self.whitelist.mark_used(ctx.caller)?;
        let records = self.supply.open_mint(ctx.caller, 1)?;
        self.commit_mint(ctx, records, "pre-sale mint")
    }

    fn check_pre_sale_mint(
        &self,
        ctx: CallContext,
        request: &MintRequest,
        proof: &[B256],
        signature: &[u8],
    ) -> Result<(), MintError> {
        self.phases.ensure_active(SalePhase::PreSale)?;
        self.authorizer.check(request, signature)?;
        self.whitelist.check(ctx.caller, proof)?;
        self.supply.check_open_mint(ctx.caller, request.quantity)?;
        check_payment(ctx.value, self.pre_sale_price, request.quantity)?;
        self.splitter.check_deposit(AssetKind::Native, ctx.value)?;
        Ok(())
    }

    /// Owner-only: mints `quantity` units from the reserved pool to `to`.
    /// Ignores the phase and the per-wallet ceiling.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn reserved_mint(
        &mut self,
        ctx: CallContext,
        to: Address,
        quantity: u64,
    ) -> Result<Vec<u64>, MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        let records = self.supply.reserve_mint(to, quantity).inspect_err(rejected)?;
        info!(%to, quantity, reserved = self.supply.reserved_remaining(), "reserved units minted");
        Ok(self.emit_transfers(records))
    }

    fn commit_mint(
        &mut self,
        ctx: CallContext,
        records: Vec<TransferRecord>,
        path: &'static str,
    ) -> Result<Vec<u64>, MintError> {
        if !ctx.value.is_zero() {
            self.splitter.deposit(AssetKind::Native, ctx.value)?;
        }
        info!(
            path,
            quantity = records.len(),
            total_minted = self.supply.total_minted(),
            "units minted"
        );
        Ok(self.emit_transfers(records))
    }

    // --- unit ledger -----------------------------------------------------

    /// Destroys `token_id`. The caller must own it or be approved.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn burn(&mut self, ctx: CallContext, token_id: u64) -> Result<(), MintError> {
        let record = self.supply.burn(ctx.caller, token_id).inspect_err(rejected)?;
        info!(owner = %record.from, token_id, "unit burned");
        self.emit(record.into());
        Ok(())
    }

    /// Approves `to` for `token_id`.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn approve(&mut self, ctx: CallContext, to: Address, token_id: u64) -> Result<(), MintError> {
        let owner = self.supply.approve(ctx.caller, to, token_id).inspect_err(rejected)?;
        self.emit(MintEvent::Approval { owner, approved: to, token_id });
        Ok(())
    }

    /// Grants or revokes `operator` over all of the caller's units.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn set_approval_for_all(
        &mut self,
        ctx: CallContext,
        operator: Address,
        approved: bool,
    ) -> Result<(), MintError> {
        self.supply.set_approval_for_all(ctx.caller, operator, approved).inspect_err(rejected)?;
        self.emit(MintEvent::ApprovalForAll { owner: ctx.caller, operator, approved });
        Ok(())
    }

    /// Moves `token_id` from `from` to `to`.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn transfer_from(
        &mut self,
        ctx: CallContext,
        from: Address,
        to: Address,
        token_id: u64,
    ) -> Result<(), MintError> {
        let record = self.supply.transfer_from(ctx.caller, from, to, token_id).inspect_err(rejected)?;
        self.emit(record.into());
        Ok(())
    }

    /// Units held by `owner`.
    pub fn balance_of(&self, owner: Address) -> u64 {
        self.supply.units().balance_of(owner)
    }

    /// Holder of `token_id`.
    pub fn owner_of(&self, token_id: u64) -> Result<Address, MintError> {
        Ok(self.supply.units().owner_of(token_id)?)
    }

    /// Account approved for `token_id`.
    pub fn get_approved(&self, token_id: u64) -> Result<Option<Address>, MintError> {
        Ok(self.supply.units().get_approved(token_id)?)
    }

    /// Returns true if `operator` manages all units of `owner`.
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.supply.units().is_approved_for_all(owner, operator)
    }

    /// Units in existence.
    pub const fn total_supply(&self) -> u64 {
        self.supply.total_supply()
    }

    /// Units ever minted.
    pub const fn total_minted(&self) -> u64 {
        self.supply.total_minted()
    }

    /// Units left in the reserved pool.
    pub const fn reserved(&self) -> u64 {
        self.supply.reserved_remaining()
    }

    /// Supply accounting.
    pub const fn supply(&self) -> &SupplyLedger {
        &self.supply
    }

    // --- replay state ----------------------------------------------------

    /// Allowance flags of a source unit.
    pub fn used_token_id(&self, token_id: u64) -> SourceUnitFlags {
        self.authorizer.usage().flags(token_id)
    }

    /// Returns true if `nonce` was consumed.
    pub fn is_nonce_used(&self, nonce: &Bytes) -> bool {
        self.authorizer.nonces().contains(nonce)
    }

    /// Returns true if `address` used its pre-sale slot.
    pub fn is_whitelist_used(&self, address: Address) -> bool {
        self.whitelist.is_used(address)
    }

    /// Source collection view.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Configured source collection address.
    pub const fn source_address(&self) -> Address {
        self.source_address
    }

    // --- metadata --------------------------------------------------------

    /// `<base>token/<id>.json` for an existing unit.
    pub fn token_uri(&self, token_id: u64) -> Result<String, MintError> {
        if !self.supply.units().exists(token_id) {
            return Err(MintError::UriForNonexistentToken { token_id });
        }
        Ok(format!("{}token/{token_id}.json", self.base_uri))
    }

    /// `<base>contract.json`.
    pub fn contract_uri(&self) -> String {
        format!("{}contract.json", self.base_uri)
    }

    // --- funds -----------------------------------------------------------

    /// Accepts a plain native transfer.
    pub fn receive(&mut self, ctx: CallContext) -> Result<(), MintError> {
        self.splitter.deposit(AssetKind::Native, ctx.value)?;
        Ok(())
    }

    /// Credits a fungible token balance held by the contract.
    pub fn deposit_token(&mut self, token: Address, amount: U256) -> Result<(), MintError> {
        self.splitter.deposit(AssetKind::Erc20(token), amount)?;
        Ok(())
    }

    /// Held balance of `asset`.
    pub fn balance(&self, asset: AssetKind) -> U256 {
        self.splitter.balance(asset)
    }

    /// Owner-only: splits the whole native balance.
    pub fn withdraw_all(&mut self, ctx: CallContext) -> Result<Vec<Payout>, MintError> {
        self.withdraw(ctx, AssetKind::Native)
    }

    /// Owner-only: splits the whole balance of `token`.
    pub fn withdraw_erc20(&mut self, ctx: CallContext, token: Address) -> Result<Vec<Payout>, MintError> {
        self.withdraw(ctx, AssetKind::Erc20(token))
    }

    /// Owner-only: splits the whole balance of `asset` and returns the
    /// transfers to perform.
    #[instrument(skip(self), fields(caller = %ctx.caller))]
    pub fn withdraw(&mut self, ctx: CallContext, asset: AssetKind) -> Result<Vec<Payout>, MintError> {
        self.guard.ensure_owner(ctx.caller).inspect_err(rejected)?;
        let plan = self.splitter.withdraw_all(asset).inspect_err(rejected)?;
        Ok(plan.payouts)
    }

    // --- events ----------------------------------------------------------

    /// Records emitted since the last [`Self::take_events`].
    pub fn events(&self) -> &[MintEvent] {
        &self.events
    }

    /// Drains the emitted records.
    pub fn take_events(&mut self) -> Vec<MintEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: MintEvent) {
        debug!(event = event.name(), "emit");
        self.events.push(event);
    }

    fn emit_transfers(&mut self, records: Vec<TransferRecord>) -> Vec<u64> {
        let ids = records.iter().map(|record| record.token_id).collect();
        self.events.extend(records.into_iter().map(MintEvent::from));
        ids
    }
}

fn rejected<E: std::fmt::Display>(err: &E) {
    debug!(%err, "call rejected");
}
