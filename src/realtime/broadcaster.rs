use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Events delivered to the admin broadcast group. Wire names match what the
/// dashboard listens for.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum AdminEvent {
    StatsUpdate(Value),
    StatsError(Value),
    NotificationUpdate(Value),
    ActivityUpdate(Value),
}

impl AdminEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AdminEvent::StatsUpdate(_) => "statsUpdate",
            AdminEvent::StatsError(_) => "statsError",
            AdminEvent::NotificationUpdate(_) => "notificationUpdate",
            AdminEvent::ActivityUpdate(_) => "activityUpdate",
        }
    }
}

/// Handle to the admin broadcast group. Cloned into every component that
/// publishes; each connected session holds a subscription. Delivery is
/// fire-and-forget: no acknowledgment, no replay for sessions that join
/// between ticks.
#[derive(Debug, Clone)]
pub struct AdminBroadcaster {
    tx: broadcast::Sender<AdminEvent>,
}

impl AdminBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to every subscribed session. Returns the number of sessions
    /// the event was handed to; zero subscribers is not an error.
    pub fn publish(&self, event: AdminEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdminEvent> {
        self.tx.subscribe()
    }

    pub fn session_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AdminBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let broadcaster = AdminBroadcaster::new(8);
        let delivered = broadcaster.publish(AdminEvent::ActivityUpdate(json!({"x": 1})));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn all_sessions_receive_identical_payloads() {
        let broadcaster = AdminBroadcaster::new(8);
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        let payload = json!([{"id": 1, "type": "producer_approval", "count": 3}]);
        let delivered = broadcaster.publish(AdminEvent::NotificationUpdate(payload));
        assert_eq!(delivered, 2);

        let got_a = a.recv().await.expect("session a");
        let got_b = b.recv().await.expect("session b");
        assert_eq!(
            serde_json::to_string(&got_a).unwrap(),
            serde_json::to_string(&got_b).unwrap()
        );
    }

    #[test]
    fn event_names_match_the_wire_protocol() {
        let event = AdminEvent::StatsUpdate(json!({"orders_today": 2}));
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["event"], "statsUpdate");
        assert_eq!(wire["data"]["orders_today"], 2);
        assert_eq!(
            AdminEvent::NotificationUpdate(json!([])).name(),
            "notificationUpdate"
        );
        assert_eq!(AdminEvent::ActivityUpdate(json!({})).name(), "activityUpdate");
        assert_eq!(AdminEvent::StatsError(json!({})).name(), "statsError");
    }
}
