//! Session event bus.
//!
//! Observers (the UI surface, tests, the demo binary) subscribe to a
//! broadcast channel instead of holding callbacks into the session.
//! Events are values; emitting never blocks and is lossy when nobody
//! listens, which is exactly what a notification stream wants.

use std::path::PathBuf;
use tokio::sync::broadcast;

/// State changes a session broadcasts.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // Buffer events
    /// The buffer text changed
    BufferChanged,
    /// Only the selection moved
    SelectionChanged,
    /// The dirty flag flipped
    DirtyChanged(bool),

    // File events
    /// A file was opened into the buffer
    FileOpened(PathBuf),
    /// The buffer was written out
    FileSaved(PathBuf),
    /// The buffer was reset to a new blank file
    FileReset,

    // Compile events
    /// A compile request was dispatched
    CompileStarted,
    /// A compile round-trip finished (successfully or not)
    CompileFinished { success: bool },
    /// The diagnostics list was replaced (new length)
    DiagnosticsUpdated(usize),

    // Ambient events
    /// A user-facing status message was posted
    StatusMessage(String),
    /// The workspace tree was rebuilt
    WorkspaceRefreshed,
}

/// Broadcast bus for [`SessionEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers. A missing audience is fine.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Receiver wrapper that skips over lag instead of surfacing it.
pub struct EventStream {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl EventStream {
    pub fn new(receiver: broadcast::Receiver<SessionEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event; `None` once the session is gone.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event stream lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_delivers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(SessionEvent::BufferChanged);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::BufferChanged));
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(SessionEvent::CompileStarted);

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.emit(SessionEvent::StatusMessage("nobody listening".to_string()));
    }

    #[tokio::test]
    async fn test_event_stream_yields_events() {
        let bus = EventBus::new();
        let mut stream = EventStream::new(bus.subscribe());

        bus.emit(SessionEvent::DirtyChanged(true));

        let event = stream.next().await.unwrap();
        assert!(matches!(event, SessionEvent::DirtyChanged(true)));
    }

    #[tokio::test]
    async fn test_event_stream_ends_when_bus_drops() {
        let bus = EventBus::new();
        let mut stream = EventStream::new(bus.subscribe());
        drop(bus);

        assert!(stream.next().await.is_none());
    }
}
