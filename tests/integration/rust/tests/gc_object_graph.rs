//! Heap registry and object model integration tests
//!
//! Verifies collection over real object graphs: classes, metaclass
//! cycles, methods with captures and frames.

use integration_tests::init_tracing;
use memory_manager::{AllocError, HeapConfig};
use object_model::{
    bootstrap, call_chase, make_class, set_member, Class, HeapValue, NativeMethod, Object,
    ObjectError, ObjectHeap,
};

/// Test: collecting with no roots frees every value
#[test]
fn test_empty_root_set_frees_everything() {
    init_tracing();
    let mut heap = ObjectHeap::new();
    let class = make_class(&mut heap, "Thing", None, None).unwrap();
    for _ in 0..5 {
        heap.alloc(Object::with_isa(class)).unwrap();
    }

    let summary = heap.collect();

    assert_eq!(summary.live, 0);
    assert_eq!(heap.live_count(), 0);
}

/// Test: a cycle through a rooted value survives and collection terminates
#[test]
fn test_rooted_cycle_survives() {
    let mut heap = ObjectHeap::new();
    let ring: Vec<_> = (0..1000).map(|_| heap.alloc(Object::new()).unwrap()).collect();
    for (i, &node) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        set_member(&mut heap, node, "next", next).unwrap();
    }
    heap.add_root(ring[500]);

    let summary = heap.collect();

    assert_eq!(summary.marked, 1000);
    assert_eq!(summary.freed, 0);
}

/// Test: the bootstrap metaclass cycle does not keep itself alive
#[test]
fn test_unrooted_metaclass_cycle_is_freed() {
    let mut heap = ObjectHeap::new();
    let rt = bootstrap(&mut heap).unwrap();
    heap.remove_root(rt.globals());

    heap.collect();

    assert_eq!(heap.live_count(), 0);
}

/// Test: marks are clear before and after collection
#[test]
fn test_marks_cleared_after_collection() {
    let mut heap = ObjectHeap::new();
    let rt = bootstrap(&mut heap).unwrap();
    let point = rt.define_class(&mut heap, "Point", None).unwrap();
    let instance = call_chase(&mut heap, point, &[]).unwrap();
    heap.add_root(instance);

    for handle in heap.handles().collect::<Vec<_>>() {
        assert_eq!(heap.is_marked(handle), Some(false));
    }
    heap.collect();
    for handle in heap.handles().collect::<Vec<_>>() {
        assert_eq!(heap.is_marked(handle), Some(false));
    }
}

/// Test: handles captured by a native method stay alive with it
#[test]
fn test_method_captures_are_traced() {
    let mut heap = ObjectHeap::new();
    let captured = heap.alloc(Object::new()).unwrap();
    let method = heap
        .alloc(NativeMethod::with_captures(move |_, _| Ok(captured), vec![captured]))
        .unwrap();
    heap.add_root(method);

    heap.collect();

    assert!(heap.contains(captured));
    assert_eq!(call_chase(&mut heap, method, &[]).unwrap(), captured);
}

/// Test: superclass chains are traced from an instance
#[test]
fn test_instance_keeps_class_hierarchy_alive() {
    let mut heap = ObjectHeap::new();
    let base = heap.alloc(Class::new("Base", None, None)).unwrap();
    let derived = heap.alloc(Class::new("Derived", Some(base), None)).unwrap();
    let instance = heap.alloc(Object::with_isa(derived)).unwrap();
    let orphan = heap.alloc(Class::new("Orphan", None, None)).unwrap();
    heap.add_root(instance);

    heap.collect();

    assert!(heap.contains(base));
    assert!(heap.contains(derived));
    assert!(!heap.contains(orphan));
    assert!(matches!(heap.get(derived), Some(HeapValue::Class(_))));
}

/// Test: a capped heap refuses construction without leaking
#[test]
fn test_allocation_limit_during_construction() {
    let mut heap = ObjectHeap::with_config(HeapConfig::default().with_max_objects(2));
    let class = make_class(&mut heap, "Full", None, None).unwrap();
    assert_eq!(heap.live_count(), 2);

    let err = call_chase(&mut heap, class, &[]).unwrap_err();

    assert_eq!(err, ObjectError::Alloc(AllocError::LimitReached { limit: 2 }));
    assert_eq!(heap.live_count(), 2);
}

/// Test: stale handles are reported instead of aliasing new values
#[test]
fn test_stale_handle_after_reuse() {
    let mut heap = ObjectHeap::new();
    let old = heap.alloc(Object::new()).unwrap();
    heap.collect();
    let new = heap.alloc(Object::new()).unwrap();

    assert_eq!(old.index(), new.index());
    assert_ne!(old, new);
    assert!(matches!(
        object_model::send(&mut heap, old, "x", &[]),
        Err(ObjectError::StaleHandle(h)) if h == old
    ));
}
