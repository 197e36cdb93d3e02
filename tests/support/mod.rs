use async_trait::async_trait;
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use wamp_router::protocol::message::Message;
use wamp_router::protocol::Id;
use wamp_router::{Peer, SendError, Session};

/// Peer that forwards every routed message into a channel the test awaits.
pub struct RecordingPeer {
    delivered: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl Peer for RecordingPeer {
    async fn send(&self, message: Message) -> Result<(), SendError> {
        self.delivered.send(message).map_err(|_| SendError::Closed)
    }
}

pub fn attach_session(id: u64) -> (Session, mpsc::UnboundedReceiver<Message>) {
    let (delivered, messages) = mpsc::unbounded_channel();
    let session = Session::attach(Id(id), Arc::new(RecordingPeer { delivered }));
    (session, messages)
}

pub async fn recv_message(messages: &mut mpsc::UnboundedReceiver<Message>) -> Message {
    timeout(Duration::from_secs(2), messages.recv())
        .await
        .expect("delivery should not time out")
        .expect("delivery channel should stay open")
}

#[allow(dead_code)]
pub async fn assert_silent(messages: &mut mpsc::UnboundedReceiver<Message>) {
    assert!(
        timeout(Duration::from_millis(100), messages.recv())
            .await
            .is_err(),
        "expected no delivery"
    );
}

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}
