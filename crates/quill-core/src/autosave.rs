//! Periodic auto-save task.
//!
//! A background interval reads the shared session and flushes the buffer
//! when it is dirty, auto-save is enabled and a file path exists. The
//! session mutex is the single serialization point for "write buffer to
//! storage": interactive saves and the timer both go through
//! [`EditorSession::save`], which is idempotent, so their ordering does
//! not matter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session::EditorSession;

/// A session shared between the interaction thread and background tasks.
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Spawns the auto-save loop. Aborting the handle stops it; a torn-down
/// session simply stops being saved.
pub fn spawn(session: SharedSession, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a fresh session
        // is not saved before anything happened.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let mut session = session.lock().await;
            if !session.auto_save_enabled() || !session.is_dirty() {
                continue;
            }
            if session.file_path().is_none() {
                continue;
            }

            tracing::debug!("auto-save tick");
            if let Err(error) = session.save() {
                tracing::warn!(%error, "auto-save failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use quill_buffer::Selection;
    use quill_syntax::SyntaxConfig;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_autosave_flushes_dirty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "v1").unwrap();

        let mut s = EditorSession::with_syntax(EditorConfig::default(), SyntaxConfig::builtin());
        s.open(&path).unwrap();
        s.update_text("v2", Selection::cursor(2));
        assert!(s.is_dirty());

        let session: SharedSession = Arc::new(Mutex::new(s));
        let handle = spawn(session.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert!(!session.lock().await.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_autosave_respects_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "v1").unwrap();

        let mut s = EditorSession::with_syntax(EditorConfig::default(), SyntaxConfig::builtin());
        s.open(&path).unwrap();
        s.toggle_auto_save(); // off
        s.update_text("v2", Selection::cursor(2));

        let session: SharedSession = Arc::new(Mutex::new(s));
        let handle = spawn(session.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.abort();

        assert!(session.lock().await.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v1");
    }
}
