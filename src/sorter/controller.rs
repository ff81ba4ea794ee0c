//! Sorting controller
//!
//! Looks up each scanned tag in the guest registry and writes the
//! matching audio path, one per line, for a downstream player.

use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::events::{ReaderEvent, Tag};
use crate::registry::GuestRegistry;

/// Errors that stop the controller
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("tag reader failed: {0}")]
    ReaderFailed(String),

    #[error("failed to write audio path: {0}")]
    Output(#[from] std::io::Error),
}

/// Result of sorting one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// The guest is known; this path was written
    Matched(PathBuf),
    /// No guest has this tag
    Unrecognized,
}

/// Resolves tags to audio paths and writes them out
pub struct SortingController<W: Write> {
    registry: GuestRegistry,
    audio_dir: PathBuf,
    out: W,
}

impl<W: Write> SortingController<W> {
    pub fn new(registry: GuestRegistry, audio_dir: PathBuf, out: W) -> Self {
        Self {
            registry,
            audio_dir,
            out,
        }
    }

    /// Resolve a tag and write its audio path if the guest is known
    pub fn sort(&mut self, tag: &Tag) -> Result<SortOutcome, ControllerError> {
        let Some(filename) = self.registry.lookup(tag) else {
            warn!(%tag, "unrecognised tag '{}'", tag);
            return Ok(SortOutcome::Unrecognized);
        };

        // Raw bytes, so paths that are not UTF-8 reach the player intact.
        let path = self.audio_dir.join(filename);
        self.out.write_all(path.as_os_str().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        Ok(SortOutcome::Matched(path))
    }

    /// Sort tags from the reader until it fails or the channel closes
    pub async fn run(
        &mut self,
        mut reader_rx: mpsc::Receiver<ReaderEvent>,
    ) -> Result<(), ControllerError> {
        info!("sorting controller started");

        while let Some(event) = reader_rx.recv().await {
            match event {
                ReaderEvent::Tag(tag) => {
                    info!(%tag, "tag '{}' read", tag);
                    self.sort(&tag)?;
                }
                ReaderEvent::Failed(reason) => {
                    return Err(ControllerError::ReaderFailed(reason));
                }
            }
        }

        info!("sorting controller stopped");
        Ok(())
    }

    /// Consume the controller, returning the output writer
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with every log line at `level` or above captured
    fn capture_logs<T>(level: tracing::Level, f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(level)
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.lines())
    }

    fn create_controller() -> SortingController<Vec<u8>> {
        let registry: GuestRegistry = [("1234".to_string(), "alice.mp3".to_string())]
            .into_iter()
            .collect();
        SortingController::new(registry, PathBuf::from("/music"), Vec::new())
    }

    #[test]
    fn test_known_tag_writes_path() {
        let mut controller = create_controller();

        let outcome = controller.sort(&Tag::from("1234")).unwrap();
        assert_eq!(outcome, SortOutcome::Matched(PathBuf::from("/music/alice.mp3")));

        let output = String::from_utf8(controller.into_output()).unwrap();
        assert_eq!(output, "/music/alice.mp3\n");
    }

    #[test]
    fn test_unknown_tag_writes_nothing() {
        let mut controller = create_controller();

        let outcome = controller.sort(&Tag::from("9999")).unwrap();
        assert_eq!(outcome, SortOutcome::Unrecognized);
        assert!(controller.into_output().is_empty());
    }

    #[test]
    fn test_unknown_tag_logs_one_warning() {
        let mut controller = create_controller();

        let (outcome, lines) =
            capture_logs(tracing::Level::WARN, || controller.sort(&Tag::from("9999")).unwrap());

        assert_eq!(outcome, SortOutcome::Unrecognized);
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("WARN"), "{lines:?}");
        assert!(lines[0].contains("9999"), "{lines:?}");
    }

    #[test]
    fn test_known_tag_logs_no_warning() {
        let mut controller = create_controller();

        let (_, lines) =
            capture_logs(tracing::Level::WARN, || controller.sort(&Tag::from("1234")).unwrap());

        assert!(lines.is_empty(), "{lines:?}");
    }

    #[test]
    fn test_non_utf8_audio_dir_written_exactly() {
        let registry: GuestRegistry = [("1234".to_string(), "alice.mp3".to_string())]
            .into_iter()
            .collect();
        let audio_dir = PathBuf::from(OsStr::from_bytes(b"/m\xffsic"));
        let mut controller = SortingController::new(registry, audio_dir, Vec::new());

        controller.sort(&Tag::from("1234")).unwrap();

        assert_eq!(controller.into_output(), b"/m\xffsic/alice.mp3\n".to_vec());
    }

    #[test]
    fn test_empty_tag_is_unrecognized() {
        let mut controller = create_controller();
        assert_eq!(controller.sort(&Tag::default()).unwrap(), SortOutcome::Unrecognized);
    }

    #[test]
    fn test_run_sorts_in_order_until_channel_closes() {
        let mut controller = create_controller();
        let (tx, rx) = mpsc::channel(8);

        tx.try_send(ReaderEvent::Tag(Tag::from("1234"))).unwrap();
        tx.try_send(ReaderEvent::Tag(Tag::from("9999"))).unwrap();
        tx.try_send(ReaderEvent::Tag(Tag::from("1234"))).unwrap();
        drop(tx);

        tokio_test::block_on(controller.run(rx)).unwrap();

        let output = String::from_utf8(controller.into_output()).unwrap();
        assert_eq!(output, "/music/alice.mp3\n/music/alice.mp3\n");
    }

    #[tokio::test]
    async fn test_run_stops_on_reader_failure() {
        let mut controller = create_controller();
        let (tx, rx) = mpsc::channel(8);

        tx.send(ReaderEvent::Tag(Tag::from("1234"))).await.unwrap();
        tx.send(ReaderEvent::Failed("No such device".to_string())).await.unwrap();
        tx.send(ReaderEvent::Tag(Tag::from("1234"))).await.unwrap();

        let err = controller.run(rx).await.unwrap_err();
        assert!(matches!(err, ControllerError::ReaderFailed(ref r) if r == "No such device"));

        let output = String::from_utf8(controller.into_output()).unwrap();
        assert_eq!(output, "/music/alice.mp3\n");
    }
}
