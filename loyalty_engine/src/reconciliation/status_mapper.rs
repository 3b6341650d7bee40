use std::time::Duration;

use lpg_common::Points;

use crate::{
    accrual::{AccrualOutcome, AccrualStatus},
    db_types::{OrderStatusType, OrderVerdict},
};

/// What the reconciler should do with an order, given what the accrual authority said about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Move the order to a new status (and credit the owner, for `Processed`).
    Advance(OrderVerdict),
    /// The authority agrees with the order's current status. Nothing to write.
    Unchanged,
    /// The order is terminal. Terminal orders never re-enter the state machine.
    Ignore,
    /// Suspend all accrual queries for the given duration. The order is retried on a later pass.
    Throttle(Duration),
    /// The answer did not tell us anything. The order is retried on the next pass.
    RetryLater(String),
}

/// Maps an accrual outcome onto the local state machine for an order currently in `current`.
///
/// | Authority says          | Local result                 |
/// |-------------------------|------------------------------|
/// | `REGISTERED`/`PROCESSING` | `PROCESSING`               |
/// | `INVALID`               | `INVALID`                    |
/// | `PROCESSED`, accrual `A`| `PROCESSED`, credit `A` once |
/// | rate limited            | no change, back off          |
/// | anything else           | no change                    |
pub fn plan_transition(current: OrderStatusType, outcome: &AccrualOutcome) -> Transition {
    if current.is_terminal() {
        return Transition::Ignore;
    }
    let verdict = match outcome {
        AccrualOutcome::Verdict { status: AccrualStatus::Registered | AccrualStatus::Processing, .. } => {
            OrderVerdict::Processing
        },
        AccrualOutcome::Verdict { status: AccrualStatus::Invalid, .. } => OrderVerdict::Invalid,
        AccrualOutcome::Verdict { status: AccrualStatus::Processed, accrual } => {
            OrderVerdict::Processed(accrual.unwrap_or_else(Points::zero))
        },
        AccrualOutcome::RateLimited { retry_after } => return Transition::Throttle(*retry_after),
        AccrualOutcome::TransientError(reason) => return Transition::RetryLater(reason.clone()),
    };
    if current.can_transition_to(verdict.status()) {
        Transition::Advance(verdict)
    } else {
        Transition::Unchanged
    }
}
