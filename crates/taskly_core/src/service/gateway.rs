//! Monetization collaborator seams.
//!
//! # Responsibility
//! - Define the interstitial-ad and in-app-purchase interfaces the planner
//!   consumes, without pulling any vendor SDK into core.
//!
//! # Invariants
//! - Gateways are consumed only; core never depends on their timing.
//! - Implementations must be side-effect safe when premium is active
//!   (`show` becomes a no-op).

use serde::{Deserialize, Serialize};

/// Result of a purchase or restore attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// Product newly purchased.
    Purchased,
    /// Prior purchase restored.
    Restored,
    /// Attempt failed or was cancelled.
    Failed,
}

/// Interstitial-ad controller seam.
///
/// The planner calls `load` on every fetch and `show` after mutations, the
/// way the original app drove its ad singleton; gating on premium state is
/// the implementation's job.
pub trait AdsGateway {
    /// Pre-loads the next interstitial.
    fn load(&self);
    /// Shows a loaded interstitial, if any.
    fn show(&self);
    /// Forwards the current premium entitlement.
    fn set_premium(&self, premium: bool);
}

/// In-app-purchase controller seam.
pub trait BillingGateway {
    /// Starts a purchase for the given store product.
    fn purchase(&self, product_id: &str) -> PurchaseOutcome;
    /// Restores prior purchases.
    fn restore(&self) -> PurchaseOutcome;
}

/// Ads gateway that does nothing. Used by tests and the CLI probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAds;

impl AdsGateway for NoopAds {
    fn load(&self) {}
    fn show(&self) {}
    fn set_premium(&self, _premium: bool) {}
}

/// Billing gateway with no store attached; every attempt fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBilling;

impl BillingGateway for NoopBilling {
    fn purchase(&self, _product_id: &str) -> PurchaseOutcome {
        PurchaseOutcome::Failed
    }

    fn restore(&self) -> PurchaseOutcome {
        PurchaseOutcome::Failed
    }
}
