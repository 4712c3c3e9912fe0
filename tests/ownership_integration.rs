//! Integration tests for single-owner wrappers over non-memory resources.
//!
//! These tests drive the wrappers with handles that stand in for real
//! resources (temp files, descriptor tables, saved drawing state) and check
//! that each resource is given back exactly once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use unique_rc::policy::func::{release_fn, ReleaseFn};
use unique_rc::sentinel::{InvalidHandleValue, Sentinel};
use unique_rc::testing::{Counting, Recording};
use unique_rc::{
    assert_empty, assert_owns, movable_policy, Null, ReleasePolicy, Resolved, UniquePtr, UniqueRc,
};

// ============================================================================
// Temp files
// ============================================================================

fn temp_file_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("unique_rc_test_{}_{}.txt", name, std::process::id()))
}

#[derive(Clone, Default)]
struct RemoveFile;

impl ReleasePolicy<PathBuf> for RemoveFile {
    type Handle = PathBuf;

    fn release(&mut self, path: PathBuf) {
        let _ = std::fs::remove_file(path);
    }
}

movable_policy!(RemoveFile);

type TempFile = UniqueRc<PathBuf, RemoveFile>;

#[test]
fn temp_file_is_removed_on_drop() {
    let path = temp_file_path("drop");
    std::fs::write(&path, "scratch").unwrap();

    {
        let file = TempFile::new(path.clone());
        assert_owns!(file);
        assert!(path.exists());
    }

    assert!(!path.exists(), "file should be removed when the owner drops");
}

#[test]
fn released_temp_file_survives() {
    let path = temp_file_path("release");
    std::fs::write(&path, "keep").unwrap();

    let mut file = TempFile::new(path.clone());
    let kept = file.release();
    drop(file);

    assert!(kept.exists());
    std::fs::remove_file(kept).unwrap();
}

#[test]
fn empty_path_is_not_owned() {
    let file = TempFile::empty();
    assert_empty!(file);
    assert_eq!(*file.as_handle(), PathBuf::new());
}

// ============================================================================
// Descriptor table
// ============================================================================

/// A fake descriptor table: open descriptors map to their names.
#[derive(Clone, Default)]
struct Table {
    open: Arc<Mutex<HashMap<i32, String>>>,
    closes: Arc<AtomicUsize>,
}

impl Table {
    fn open(&self, name: &str) -> i32 {
        let mut open = self.open.lock().unwrap();
        let fd = (0..).find(|fd| !open.contains_key(fd)).unwrap();
        open.insert(fd, name.to_string());
        fd
    }

    fn is_open(&self, fd: i32) -> bool {
        self.open.lock().unwrap().contains_key(&fd)
    }
}

impl ReleasePolicy<i32> for Table {
    type Handle = i32;

    fn release(&mut self, fd: i32) {
        let removed = self.open.lock().unwrap().remove(&fd);
        assert!(removed.is_some(), "closed descriptor {} twice", fd);
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

movable_policy!(Table);

type Fd = UniqueRc<i32, Table, InvalidHandleValue>;

#[test]
fn descriptor_zero_is_owned() {
    let table = Table::default();
    let fd = Fd::with_policy(table.open("stdin"), table.clone());
    assert_eq!(fd.get(), 0);
    assert_owns!(fd);

    drop(fd);
    assert!(!table.is_open(0));
}

#[test]
fn failed_open_is_rejected() {
    let table = Table::default();
    let err = Fd::try_with_policy(-1, table.clone()).unwrap_err();
    assert_eq!(err.into_handle(), -1);
    assert_eq!(table.closes.load(Ordering::SeqCst), 0);
}

#[test]
fn reassigning_closes_each_descriptor_once() {
    let table = Table::default();
    let mut log = Fd::with_policy(table.open("log"), table.clone());
    let mut rotated = Fd::with_policy(table.open("log.1"), table.clone());

    log.assign_from(&mut rotated);
    assert_eq!(table.closes.load(Ordering::SeqCst), 1);
    assert_eq!(log.get(), 1);
    assert!(rotated == Null);

    log.reset(table.open("log.2"));
    drop(log);
    drop(rotated);
    assert_eq!(table.closes.load(Ordering::SeqCst), 3);
    assert!(table.open.lock().unwrap().is_empty());
}

#[test]
fn release_reset_round_trip_between_wrappers() {
    let table = Table::default();
    let mut first = Fd::with_policy(table.open("a"), table.clone());
    let mut second = Fd::empty_with(table.clone());

    let fd = first.release();
    second.reset(fd);

    assert_eq!(second.get(), fd);
    assert_eq!(table.closes.load(Ordering::SeqCst), 0);
    assert!(table.is_open(fd));
}

// ============================================================================
// Composite handles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
struct SavedDc {
    dc: usize,
    state: i32,
}

/// Owned only when both the context and a saved state are present.
struct SavedDcSentinel;

impl Sentinel<SavedDc> for SavedDcSentinel {
    type Invalid = SavedDc;

    fn invalid() -> SavedDc {
        SavedDc::default()
    }

    fn is_owned(handle: &SavedDc) -> bool {
        handle.dc != 0 && handle.state != 0
    }
}

type RestoreDc = UniqueRc<SavedDc, Recording<SavedDc>, SavedDcSentinel>;

#[test]
fn composite_handle_requires_every_field() {
    let restored = Recording::new();
    {
        let _half = RestoreDc::with_policy(SavedDc { dc: 7, state: 0 }, restored.clone());
        let _full = RestoreDc::with_policy(SavedDc { dc: 7, state: 2 }, restored.clone());
    }
    assert_eq!(restored.released(), vec![SavedDc { dc: 7, state: 2 }]);
}

#[test]
fn composite_handles_hash_and_order() {
    let low = RestoreDc::with_policy(SavedDc { dc: 1, state: 1 }, Recording::new());
    let high = RestoreDc::with_policy(SavedDc { dc: 2, state: 1 }, Recording::new());
    assert!(low < high);

    let mut seen = std::collections::HashSet::new();
    assert!(seen.insert(low.get()));
    assert!(!seen.insert(SavedDc { dc: 1, state: 1 }));
}

// ============================================================================
// Handle resolution and policy forms
// ============================================================================

/// Marker for a dialog event subscription.
struct DialogEvents;

#[derive(Clone, Default)]
struct Unadvise {
    cookies: Arc<Mutex<Vec<u32>>>,
}

impl ReleasePolicy<DialogEvents> for Unadvise {
    type Handle = u32;

    fn release(&mut self, cookie: u32) {
        self.cookies.lock().unwrap().push(cookie);
    }
}

movable_policy!(Unadvise: assign);

#[test]
fn wrapper_stores_the_resolved_handle() {
    let policy = Unadvise::default();
    let mut subscription: UniqueRc<DialogEvents, Unadvise> =
        UniqueRc::with_policy(41, policy.clone());

    let cookie: Resolved<DialogEvents, Unadvise> = subscription.get();
    assert_eq!(cookie, 41);

    let mut replacement: UniqueRc<DialogEvents, Unadvise> =
        UniqueRc::with_policy(42, policy.clone());
    subscription.assign_from(&mut replacement);
    drop(subscription);

    assert_eq!(*policy.cookies.lock().unwrap(), vec![41, 42]);
}

static UNREGISTERED: AtomicUsize = AtomicUsize::new(0);

fn unregister(_id: u64) {
    UNREGISTERED.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn function_pointer_policy_needs_an_explicit_value() {
    let before = UNREGISTERED.load(Ordering::SeqCst);
    {
        let mut id = UniqueRc::<u64, fn(u64)>::with_policy(10, unregister);
        let mut other = UniqueRc::<u64, fn(u64)>::empty_with(unregister);
        id.swap(&mut other);
        assert!(id == Null);
    }
    assert_eq!(UNREGISTERED.load(Ordering::SeqCst), before + 1);
}

#[test]
fn closure_policy_captures_state() {
    let closed = Arc::new(Mutex::new(Vec::new()));
    let sink = closed.clone();
    {
        let _handle: UniqueRc<u8, ReleaseFn<_>> = UniqueRc::with_policy(
            3,
            release_fn(move |h: u8| sink.lock().unwrap().push(h)),
        );
    }
    assert_eq!(*closed.lock().unwrap(), vec![3]);
}

// ============================================================================
// Comparison and conversion across instantiations
// ============================================================================

#[test]
fn different_instantiations_compare_by_handle() {
    let counted: UniqueRc<i32, Counting> = UniqueRc::new(5);
    let fd: UniqueRc<i32, Counting, InvalidHandleValue> = UniqueRc::new(5);
    let other: UniqueRc<i32, Counting, InvalidHandleValue> = UniqueRc::new(6);

    assert!(counted == fd);
    assert!(counted < other);
    assert!(other > counted);
}

#[test]
fn widening_conversion_keeps_a_single_release() {
    let counting = Counting::new();
    let narrow: UniqueRc<i16, Counting> = UniqueRc::with_policy(-3, counting.clone());
    let wide: UniqueRc<i64, Counting> = narrow.convert();

    assert_eq!(wide.get(), -3);
    drop(wide);
    assert_eq!(counting.count(), 1);
}

#[test]
fn unique_ptr_swap_scenario() {
    let mut a: UniquePtr<String> = UniquePtr::from_box(Box::new("v1".into()));
    let mut b: UniquePtr<String> = UniquePtr::empty();
    let v1 = a.as_ptr();

    a.swap(&mut b);
    assert_eq!(b.as_ptr(), v1);
    assert!(a == Null);
    assert_eq!(*b, "v1");
}

// ============================================================================
// Self-reset
// ============================================================================

#[cfg(not(feature = "strict-self-reset"))]
#[test]
fn self_reset_releases_the_old_value_once() {
    let counting = Counting::new();
    let mut handle: UniqueRc<u32, Counting> = UniqueRc::with_policy(6, counting.clone());

    handle.reset(handle.get());
    assert_eq!(counting.count(), 1);
    assert_eq!(handle.get(), 6);
    assert_owns!(handle);
}

#[cfg(all(feature = "strict-self-reset", debug_assertions))]
#[test]
#[should_panic(expected = "self-reset")]
fn strict_self_reset_panics() {
    let mut handle: UniqueRc<u32, Counting> = UniqueRc::new(6);
    handle.reset(handle.get());
}
