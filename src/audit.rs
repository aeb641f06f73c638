use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Mutations recorded in the audit trail. Reads are never audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    ProducerApproval,
    ProductApproval,
    UserStatusUpdate,
    OrderStatusUpdate,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::ProducerApproval => "producer_approval",
            AuditAction::ProductApproval => "product_approval",
            AuditAction::UserStatusUpdate => "user_status_update",
            AuditAction::OrderStatusUpdate => "order_status_update",
        }
    }

    /// Table the action mutates, stored in the `resource` column.
    pub fn resource(self) -> &'static str {
        match self {
            AuditAction::UserRegister
            | AuditAction::UserLogin
            | AuditAction::UserStatusUpdate => "users",
            AuditAction::ProducerApproval => "producer_profiles",
            AuditAction::ProductApproval => "products",
            AuditAction::OrderStatusUpdate => "orders",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_stable_trail_entries() {
        assert_eq!(AuditAction::ProducerApproval.as_str(), "producer_approval");
        assert_eq!(AuditAction::ProducerApproval.resource(), "producer_profiles");
        assert_eq!(AuditAction::ProductApproval.as_str(), "product_approval");
        assert_eq!(AuditAction::ProductApproval.resource(), "products");
        assert_eq!(AuditAction::OrderStatusUpdate.resource(), "orders");
        assert_eq!(AuditAction::UserLogin.resource(), "users");
    }
}
