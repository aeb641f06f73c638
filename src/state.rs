use crate::config::TransitionPolicy;
use crate::db::{DbPool, OrmConn};
use crate::realtime::broadcaster::AdminBroadcaster;

/// Approval-workflow knobs resolved at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalPolicy {
    pub retract_products_on_rejection: bool,
    pub order_transitions: TransitionPolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub broadcaster: AdminBroadcaster,
    pub policy: ApprovalPolicy,
}
