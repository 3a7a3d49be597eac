//! Subscription hook - render-bypassing shared value cells.

use crate::engine::context::{SubscriptionCell, SubscriptionSlot};
use crate::error::Result;
use crate::types::{HookOptions, Value};

/// Create (or reuse) a subscription cell at the current call-order position.
///
/// The cell is the accessor: pass it to `Props::bind` and the diff policy
/// installs a write-through listener per bound host property. Updates go
/// through the equality-gated updater and reach every bound property
/// synchronously, without a render pass.
///
/// The updater returned on the creating render is usable immediately.
pub fn use_subscription(initial: impl Into<Value>) -> Result<(SubscriptionCell, SubscriptionUpdater)> {
    let context = super::active_context("subscription")?;
    let mut ctx = context.borrow_mut();
    super::require_enabled(&ctx, HookOptions::SUBSCRIPTION, "subscription")?;

    let cell = match ctx.subscriptions.next() {
        Some(slot) => slot.cell.clone(),
        None => {
            let cell = SubscriptionCell::new(initial.into());
            ctx.subscriptions.add(SubscriptionSlot { cell: cell.clone() });
            cell
        }
    };

    Ok((cell.clone(), SubscriptionUpdater { cell }))
}

/// Equality-gated updater for a subscription cell.
#[derive(Clone)]
pub struct SubscriptionUpdater {
    cell: SubscriptionCell,
}

impl SubscriptionUpdater {
    pub fn set(&self, value: impl Into<Value>) {
        self.cell.set(value.into());
    }
}
