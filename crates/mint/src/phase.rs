//! Sale lifecycle: a forward-only phase sequence plus a pause switch.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordered lifecycle stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalePhase {
    /// Nothing is mintable except the reserved pool.
    #[default]
    NotStarted,
    /// Source-collection holders claim free and discounted units.
    FreeMint,
    /// Whitelisted addresses buy one discounted unit each.
    PreSale,
    /// Public sale.
    Sale,
    /// Terminal.
    Ended,
}

impl SalePhase {
    /// Machine label, e.g. `PRE_SALE`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::FreeMint => "FREE_MINT",
            Self::PreSale => "PRE_SALE",
            Self::Sale => "SALE",
            Self::Ended => "ENDED",
        }
    }

    /// Label used while the phase is paused.
    pub const fn paused_label(self) -> Option<&'static str> {
        match self {
            Self::FreeMint => Some("FREE_MINT_PAUSED"),
            Self::PreSale => Some("PRE_SALE_PAUSED"),
            Self::Sale => Some("SALE_PAUSED"),
            Self::NotStarted | Self::Ended => None,
        }
    }

    /// Human name used in revert reasons.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::FreeMint => "Free mint",
            Self::PreSale => "Pre-sale",
            Self::Sale => "Sale",
            Self::Ended => "Ended",
        }
    }

    /// Phases in which minting can be paused.
    pub const fn is_mint_window(self) -> bool {
        matches!(self, Self::FreeMint | Self::PreSale | Self::Sale)
    }

    /// The phase that must be current before this one can be entered.
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::NotStarted => None,
            Self::FreeMint => Some(Self::NotStarted),
            Self::PreSale => Some(Self::FreeMint),
            Self::Sale => Some(Self::PreSale),
            Self::Ended => Some(Self::Sale),
        }
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase-control failures.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PhaseError {
    /// The target phase was already entered.
    #[error("{} has already started", .phase.display_name())]
    AlreadyStarted {
        /// Phase that was requested.
        phase: SalePhase,
    },
    /// The prerequisite phase is not current.
    #[error("{} state required", .required.display_name())]
    OutOfOrder {
        /// Phase that has to be current.
        required: SalePhase,
        /// Phase that is current.
        current: SalePhase,
    },
    /// Nothing can change once the sale has ended.
    #[error("Sale has ended")]
    SaleEnded,
    /// Pause switches only work inside a mint window.
    #[error("No active sale")]
    NoActiveSale,
    /// Already paused.
    #[error("Sale is paused")]
    AlreadyPaused,
    /// Not paused.
    #[error("Sale is not paused")]
    NotPaused,
    /// The mint path's phase is not current, or it is paused.
    #[error("{} not active", .phase.display_name())]
    NotActive {
        /// Phase the path needs.
        phase: SalePhase,
    },
}

/// Pause switch, meaningful only while a mint window is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Returns true when paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    fn pause(&mut self) -> Result<(), PhaseError> {
        if self.paused {
            return Err(PhaseError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    fn unpause(&mut self) -> Result<(), PhaseError> {
        if !self.paused {
            return Err(PhaseError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    fn reset(&mut self) {
        self.paused = false;
    }
}

/// Owns the current phase and the pause switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalePhaseController {
    phase: SalePhase,
    pause: PauseGuard,
}

impl SalePhaseController {
    /// Starts at [`SalePhase::NotStarted`], unpaused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub const fn current_phase(&self) -> SalePhase {
        self.phase
    }

    /// Returns true when the current phase is paused.
    pub const fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Label combining phase and pause state, e.g. `SALE_PAUSED`.
    pub const fn sale_state(&self) -> &'static str {
        match (self.pause.is_paused(), self.phase.paused_label()) {
            (true, Some(label)) => label,
            _ => self.phase.label(),
        }
    }

    /// Returns true when `phase` is current and not paused.
    pub fn is_active(&self, phase: SalePhase) -> bool {
        self.phase == phase && !self.pause.is_paused()
    }

    /// Fails unless `phase` is current and not paused.
    pub fn ensure_active(&self, phase: SalePhase) -> Result<(), PhaseError> {
        if !self.is_active(phase) {
            return Err(PhaseError::NotActive { phase });
        }
        Ok(())
    }

    /// Read-only check of a transition into `target`.
    pub fn check_transition(&self, target: SalePhase) -> Result<(), PhaseError> {
        if target == SalePhase::Ended {
            if self.phase == SalePhase::Ended {
                return Err(PhaseError::SaleEnded);
            }
        } else if self.phase >= target {
            return Err(PhaseError::AlreadyStarted { phase: target });
        }

        match target.prerequisite() {
            Some(required) if required != self.phase => {
                Err(PhaseError::OutOfOrder { required, current: self.phase })
            }
            _ => Ok(()),
        }
    }

    /// Opens the free-mint window.
    pub fn start_free_mint(&mut self) -> Result<SalePhase, PhaseError> {
        self.advance(SalePhase::FreeMint)
    }

    /// Opens the pre-sale window.
    pub fn start_pre_sale(&mut self) -> Result<SalePhase, PhaseError> {
        self.advance(SalePhase::PreSale)
    }

    /// Opens the public sale.
    pub fn start_sale(&mut self) -> Result<SalePhase, PhaseError> {
        self.advance(SalePhase::Sale)
    }

    /// Closes the public sale for good.
    pub fn end_sale(&mut self) -> Result<SalePhase, PhaseError> {
        self.advance(SalePhase::Ended)
    }

    /// Pauses the current mint window.
    pub fn pause(&mut self) -> Result<(), PhaseError> {
        self.ensure_mint_window()?;
        self.pause.pause()
    }

    /// Resumes the current mint window.
    pub fn unpause(&mut self) -> Result<(), PhaseError> {
        self.ensure_mint_window()?;
        self.pause.unpause()
    }

    fn ensure_mint_window(&self) -> Result<(), PhaseError> {
        if !self.phase.is_mint_window() {
            return Err(PhaseError::NoActiveSale);
        }
        Ok(())
    }

    fn advance(&mut self, target: SalePhase) -> Result<SalePhase, PhaseError> {
        self.check_transition(target)?;
        self.phase = target;
        self.pause.reset();
        Ok(target)
    }
}
