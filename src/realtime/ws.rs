use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    error::AppResult,
    middleware::auth::{decode_token, ensure_admin},
    realtime::broadcaster::AdminEvent,
    services::stats_service,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(admin_ws))
}

/// Admin realtime channel. Browsers cannot set headers on a WebSocket
/// handshake, so the bearer token travels as a query parameter; the admin
/// role is checked before the upgrade is accepted.
pub async fn admin_ws(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let user = decode_token(&params.token)?;
    ensure_admin(&user)?;

    tracing::info!(user_id = %user.user_id, "admin session connected");
    Ok(ws.on_upgrade(move |socket| handle_session(socket, state)))
}

async fn handle_session(mut socket: WebSocket, state: AppState) {
    let mut rx = state.broadcaster.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                // A slow consumer dropped ticks; events are at-most-once, keep going.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "admin session lagged behind broadcast");
                }
                Err(RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) if text.as_str().trim() == "requestStats" => {
                    let event = match stats_service::realtime_stats(&state.pool).await {
                        Ok(stats) => match serde_json::to_value(&stats) {
                            Ok(payload) => AdminEvent::StatsUpdate(payload),
                            Err(err) => AdminEvent::StatsError(
                                serde_json::json!({ "error": err.to_string() }),
                            ),
                        },
                        Err(err) => {
                            tracing::error!(error = %err, "stats request failed");
                            AdminEvent::StatsError(serde_json::json!({ "error": err.to_string() }))
                        }
                    };
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    tracing::info!("admin session disconnected");
}
