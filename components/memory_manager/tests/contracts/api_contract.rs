//! Contract tests verifying the memory_manager public API.
//! These tests pin down every exported type and its signatures.

use memory_manager::{
    AllocError, CollectionSummary, GcStats, Handle, Heap, HeapConfig, RootStack, Trace, Tracer,
};

struct Cell {
    next: Option<Handle>,
}

impl Trace for Cell {
    fn report_references(&self, tracer: &mut Tracer) {
        tracer.visit_opt(self.next);
    }
}

/// Test Heap contract: new() -> Self
#[test]
fn contract_heap_new() {
    let heap: Heap<Cell> = Heap::new();
    assert_eq!(heap.live_count(), 0);
    assert_eq!(heap.root_count(), 0);
}

/// Test Heap contract: alloc(value) -> Result<Handle, AllocError>
#[test]
fn contract_heap_alloc() {
    let mut heap: Heap<Cell> = Heap::new();
    let handle: Handle = heap.alloc(Cell { next: None }).unwrap();
    assert!(heap.contains(handle));
    assert_eq!(heap.live_count(), 1);
}

/// Test Heap contract: with_config(HeapConfig) enforces max_objects
#[test]
fn contract_heap_with_config() {
    let mut heap: Heap<Cell> = Heap::with_config(HeapConfig::default().with_max_objects(0));
    let result: Result<Handle, AllocError> = heap.alloc(Cell { next: None });
    assert!(matches!(result, Err(AllocError::LimitReached { limit: 0 })));
    assert_eq!(heap.live_count(), 0);
}

/// Test Heap contract: collect() -> CollectionSummary
#[test]
fn contract_heap_collect() {
    let mut heap: Heap<Cell> = Heap::new();
    let tail = heap.alloc(Cell { next: None }).unwrap();
    let head = heap.alloc(Cell { next: Some(tail) }).unwrap();
    heap.alloc(Cell { next: None }).unwrap();
    heap.add_root(head);

    let summary: CollectionSummary = heap.collect();

    assert_eq!(
        summary,
        CollectionSummary {
            marked: 2,
            freed: 1,
            live: 2
        }
    );
}

/// Test Heap contract: stats() -> &GcStats
#[test]
fn contract_heap_stats() {
    let mut heap: Heap<Cell> = Heap::new();
    heap.collect();
    let stats: &GcStats = heap.stats();
    assert_eq!(stats.collections, 1);
}

/// Test RootStack contract: push/pop pin and unpin
#[test]
fn contract_root_stack() {
    let mut heap: Heap<Cell> = Heap::new();
    let mut stack = RootStack::new();
    let handle = heap.alloc(Cell { next: None }).unwrap();

    stack.push(&mut heap, handle);
    assert_eq!(heap.collect().live, 1);

    stack.pop(&mut heap);
    assert_eq!(heap.collect().live, 0);
}
