use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;

use crate::db::DbPool;
use crate::dto::stats::{Notification, NotificationCounts};
use crate::realtime::broadcaster::{AdminBroadcaster, AdminEvent};
use crate::services::stats_service;

/// Build the badge list from raw counts, dropping empty entries. The full
/// filtered list is resent every tick; there is no delta compression.
pub fn build_notifications(counts: &NotificationCounts, now: DateTime<Utc>) -> Vec<Notification> {
    let entries = vec![
        Notification {
            id: 1,
            kind: "producer_approval".into(),
            title: "Producer Approvals Needed".into(),
            message: format!("{} producers awaiting approval", counts.pending_producers),
            count: counts.pending_producers,
            priority: "high".into(),
            timestamp: now,
        },
        Notification {
            id: 2,
            kind: "product_approval".into(),
            title: "Product Reviews Needed".into(),
            message: format!("{} products awaiting review", counts.pending_products),
            count: counts.pending_products,
            priority: "medium".into(),
            timestamp: now,
        },
        Notification {
            id: 3,
            kind: "new_orders".into(),
            title: "New Orders".into(),
            message: format!("{} new orders in the last hour", counts.new_orders_last_hour),
            count: counts.new_orders_last_hour,
            priority: "normal".into(),
            timestamp: now,
        },
    ];

    entries.into_iter().filter(|n| n.count > 0).collect()
}

/// Periodic notification fanout. Re-runs the pending counts every tick and
/// broadcasts the filtered list to all admin sessions. A failed query skips
/// the tick.
pub async fn run(pool: DbPool, broadcaster: AdminBroadcaster, period: Duration) {
    let mut timer = interval(period);
    tracing::info!(period_secs = period.as_secs(), "starting admin notifier");

    loop {
        timer.tick().await;

        match stats_service::notification_counts(&pool).await {
            Ok(counts) => {
                let notifications = build_notifications(&counts, Utc::now());
                match serde_json::to_value(&notifications) {
                    Ok(payload) => {
                        let sessions = broadcaster.publish(AdminEvent::NotificationUpdate(payload));
                        tracing::debug!(sessions, "notification tick broadcast");
                    }
                    Err(err) => tracing::error!(error = %err, "notification serialize failed"),
                }
            }
            Err(err) => tracing::error!(error = %err, "notification tick skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_counts_are_filtered_out() {
        let counts = NotificationCounts {
            pending_producers: 0,
            pending_products: 0,
            new_orders_last_hour: 0,
        };
        assert!(build_notifications(&counts, Utc::now()).is_empty());
    }

    #[test]
    fn nonzero_counts_keep_their_entries() {
        let counts = NotificationCounts {
            pending_producers: 4,
            pending_products: 0,
            new_orders_last_hour: 2,
        };
        let list = build_notifications(&counts, Utc::now());
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, "producer_approval");
        assert_eq!(list[0].count, 4);
        assert_eq!(list[0].message, "4 producers awaiting approval");
        assert_eq!(list[1].kind, "new_orders");
        assert_eq!(list[1].count, 2);
    }
}
