//! Checks which side of the control hand-off emits engine log events.
//!
//! plate-cli builds plate-core with its `tracing` feature, so the engine's
//! events are live here.

use std::io;
use std::sync::{Arc, Mutex};

use plate_core::DattorroReverb;
use tracing::Level;

/// Shared in-memory sink for a `fmt` subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn take(&self) -> String {
        let mut buf = self.0.lock().unwrap();
        let text = String::from_utf8_lossy(&buf).into_owned();
        buf.clear();
        text
    }
}

impl io::Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn debug_subscriber(sink: &Captured) -> impl tracing::Subscriber + Send + Sync {
    let sink = sink.clone();
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish()
}

#[test]
fn clamped_remote_snapshot_is_applied_silently() {
    let sink = Captured::default();

    tracing::subscriber::with_default(debug_subscriber(&sink), || {
        let mut reverb = DattorroReverb::new().unwrap();
        let mut controls = reverb.controls();
        controls.set_decay(7.0);
        controls.set_damping(f64::NAN);
        sink.take();

        for _ in 0..64 {
            reverb.process(0.0);
        }

        let logged = sink.take();
        assert!(logged.is_empty(), "audio thread logged: {logged}");
        assert_eq!(reverb.params().decay, 1.0);
        assert_eq!(reverb.params().damping, 0.95);
    });
}

#[test]
fn direct_setter_still_reports_clamping() {
    let sink = Captured::default();

    tracing::subscriber::with_default(debug_subscriber(&sink), || {
        let mut reverb = DattorroReverb::new().unwrap();
        sink.take();

        reverb.set_decay(7.0);
        let logged = sink.take();
        assert!(logged.contains("decay clamped"), "got: {logged}");
    });
}
