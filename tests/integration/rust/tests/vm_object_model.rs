//! Interpreter and object model integration tests
//!
//! Native callables bridge guest code into message dispatch; these tests
//! run bootstrapped class graphs through the VM.

use bytecode_system::{CodeChunk, Opcode};
use integration_tests::init_tracing;
use interpreter::{Vm, VmError};
use object_model::{
    alloc_string, bootstrap, call_chase, define_method, get_member, send, set_member, unwrap_host,
    Bootstrap, Callable, Handle, HeapValue, NativeContext, ObjectError, ObjectHeap,
};

/// Native that pops a receiver, sends `selector` and invokes the result
/// with the receiver as its only argument
fn message_native(heap: &mut ObjectHeap, selector: &'static str) -> Handle {
    heap.alloc(Callable::native(move |ctx: &mut dyn NativeContext| {
        let receiver = ctx
            .pop()
            .ok_or_else(|| ObjectError::Native("no receiver".into()))?;
        let method = send(ctx.heap_mut(), receiver, selector, &[])?;
        call_chase(ctx.heap_mut(), method, &[receiver])
    }))
    .unwrap()
}

/// Native that pops a class and calls it to construct an instance
fn construct_native(heap: &mut ObjectHeap) -> Handle {
    heap.alloc(Callable::native(|ctx: &mut dyn NativeContext| {
        let class = ctx
            .pop()
            .ok_or_else(|| ObjectError::Native("no class".into()))?;
        call_chase(ctx.heap_mut(), class, &[])
    }))
    .unwrap()
}

fn setup() -> (Vm, Bootstrap, Handle) {
    init_tracing();
    let mut heap = ObjectHeap::new();
    let rt = bootstrap(&mut heap).unwrap();
    let point = rt.define_class(&mut heap, "Point", None).unwrap();
    (Vm::with_heap(heap), rt, point)
}

/// Test: CALL on a native constructs an instance of a bootstrapped class
#[test]
fn test_construct_from_vm() {
    let (mut vm, _rt, point) = setup();
    let construct = construct_native(vm.heap_mut());
    vm.push(point);
    vm.push(construct);

    let code = vm.load_code(vec![Opcode::Call.word(), Opcode::Exit.word()]).unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();

    let instance = vm.peek(0).unwrap();
    match vm.heap().get(instance) {
        Some(HeapValue::Object(obj)) => assert_eq!(obj.isa(), Some(point)),
        other => panic!("expected instance, got {other:?}"),
    }
}

/// Test: sending `name` through a native yields the boxed class name
#[test]
fn test_class_name_through_vm() {
    let (mut vm, _rt, point) = setup();
    let name = message_native(vm.heap_mut(), "name");
    vm.push(point);
    vm.push(name);

    let code = vm.load_code(vec![Opcode::Call.word(), Opcode::Exit.word()]).unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();

    let boxed = vm.peek(0).unwrap();
    assert_eq!(unwrap_host::<String>(vm.heap(), boxed).unwrap(), "Point");
}

/// Test: an unresolved message surfaces as a host error naming the selector
#[test]
fn test_dispatch_failure_is_not_a_guest_exception() {
    let (mut vm, _rt, point) = setup();
    let missing = message_native(vm.heap_mut(), "area");
    vm.push(point);
    vm.push(missing);

    let code = vm.load_code(vec![Opcode::Call.word(), Opcode::Exit.word()]).unwrap();
    vm.enter(code).unwrap();
    let err = vm.run().unwrap_err();

    assert_eq!(err, VmError::Object(ObjectError::dispatch("area")));
    assert!(!err.is_guest_exception());
}

/// Test: methods defined by the host are reached from guest code
#[test]
fn test_instance_method_through_vm() {
    let (mut vm, _rt, point) = setup();
    define_method(vm.heap_mut(), point, "origin", |heap, args| {
        let zero = alloc_string(heap, "0,0")?;
        set_member(heap, args[0], "coords", zero)?;
        Ok(zero)
    })
    .unwrap();
    let construct = construct_native(vm.heap_mut());
    let origin = message_native(vm.heap_mut(), "origin");
    let key = alloc_string(vm.heap_mut(), "coords").unwrap();

    // Stack (bottom to top): key, origin, point, construct
    vm.push(key);
    vm.push(origin);
    vm.push(point);
    vm.push(construct);

    // 0: CALL      -> key, origin, instance
    // 1: SWAP      -> key, instance, origin
    // 2: CALL      -> key, "0,0"
    // 3: EXIT
    let mut chunk = CodeChunk::new();
    chunk.emit(Opcode::Call);
    chunk.emit(Opcode::Swap);
    chunk.emit(Opcode::Call);
    chunk.emit(Opcode::Exit);
    let code = vm.load_code(chunk).unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();

    let coords = vm.peek(0).unwrap();
    assert_eq!(vm.stack(), &[key, coords]);
    assert_eq!(unwrap_host::<String>(vm.heap(), coords).unwrap(), "0,0");
}

/// Test: values dropped from the stacks are collected, globals are not
#[test]
fn test_collection_between_runs() {
    let (mut vm, rt, point) = setup();
    let construct = construct_native(vm.heap_mut());
    vm.push(point);
    vm.push(construct);

    let code = vm
        .load_code(vec![Opcode::Call.word(), Opcode::Pop.word(), Opcode::Exit.word()])
        .unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();
    assert!(vm.stack().is_empty());

    let summary = vm.collect_garbage();

    // The instance and the construct native
    assert_eq!(summary.freed, 2);
    assert_eq!(rt.find_global(vm.heap_mut(), "Point").unwrap(), point);
    assert!(vm.heap().contains(point));
}

/// Test: OBJ_SET from code writes to a bootstrapped global
#[test]
fn test_obj_set_on_globals() {
    let (mut vm, rt, point) = setup();
    let key = alloc_string(vm.heap_mut(), "Alias").unwrap();
    vm.push(point);
    vm.push(key);
    vm.push(rt.globals());

    let code = vm.load_code(vec![Opcode::ObjSet.word(), Opcode::Exit.word()]).unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();

    assert_eq!(get_member(vm.heap(), rt.globals(), "Alias").unwrap(), Some(point));
    assert_eq!(rt.find_global(vm.heap_mut(), "Alias").unwrap(), point);
}
