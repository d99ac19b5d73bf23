//! WebSocket transport for the realtime push channel.

use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::{Message, MessageStream, Session};
use futures::StreamExt as _;

use crate::AppState;
use crate::push::{PushHub, Subscription};

/// `GET /ws/realtime`
///
/// Upgrades the connection, registers it with the push hub, and forwards
/// every broadcast until the client disconnects.
///
/// # Errors
///
/// Returns an error if the request is not a valid WebSocket handshake.
pub async fn realtime(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;

    let subscription = state.hub.subscribe();
    log::info!(
        "Realtime listener {} connected from {:?}",
        subscription.id,
        req.peer_addr()
    );

    actix_web::rt::spawn(serve_listener(
        state.hub.clone(),
        subscription,
        session,
        msg_stream,
    ));

    Ok(response)
}

async fn serve_listener(
    hub: PushHub,
    subscription: Subscription,
    mut session: Session,
    mut msg_stream: MessageStream,
) {
    let Subscription { id, mut rx } = subscription;

    let close_reason = loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(payload) = update else {
                    break None;
                };
                if session.text(payload.to_string()).await.is_err() {
                    log::debug!("Listener {id} socket closed during send");
                    hub.unsubscribe(id);
                    return;
                }
            }
            msg = msg_stream.next() => match msg {
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        hub.unsubscribe(id);
                        return;
                    }
                }
                Some(Ok(Message::Close(reason))) => break reason,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("Listener {id} protocol error: {e}");
                    break None;
                }
                None => break None,
            },
        }
    };

    hub.unsubscribe(id);
    if let Err(e) = session.close(close_reason).await {
        log::debug!("Listener {id} close failed: {e}");
    }
}
