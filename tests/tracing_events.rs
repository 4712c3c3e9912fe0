//! Tests for the `tracing` events emitted by wrappers.
//!
//! Run with `cargo test --features tracing`.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_test::traced_test;
use unique_rc::testing::Counting;
use unique_rc::{UniqueArray, UniqueRc};

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(captured.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.contents()
}

#[test]
fn drop_emits_a_release_event() {
    let output = capture(|| {
        let _fd: UniqueRc<u32, Counting> = UniqueRc::new(3);
    });

    assert!(output.contains("releasing owned handle"));
    assert!(output.contains("TRACE"));
    assert!(output.contains("unique_rc"));
}

#[test]
fn empty_wrappers_are_silent() {
    let output = capture(|| {
        let mut empty: UniqueRc<u32, Counting> = UniqueRc::empty();
        empty.reset_empty();
    });

    assert!(output.is_empty(), "unexpected output: {}", output);
}

#[test]
fn each_release_is_logged_once() {
    let output = capture(|| {
        let mut array: UniqueArray<u8> = UniqueArray::from(vec![1, 2]);
        array.reset(vec![3]);
    });

    assert_eq!(output.matches("releasing owned handle").count(), 2);
}

#[cfg(not(feature = "strict-self-reset"))]
#[traced_test]
#[test]
fn self_reset_is_a_warning() {
    let counting = Counting::new();
    let mut handle: UniqueRc<u32, Counting> = UniqueRc::with_policy(5, counting.clone());
    handle.reset(handle.get());

    assert!(logs_contain("WARN"));
    assert!(logs_contain("self-reset"));
    assert_eq!(counting.count(), 1);
}
