//! End-to-end tests: bootstrapped runtime, assembled code, VM execution
//! and collection working together.

use std::cell::RefCell;
use std::rc::Rc;

use bytecode_system::{disassemble, CodeChunk, Opcode};
use integration_tests::init_tracing;
use interpreter::{Vm, VmConfig, VmError};
use memory_manager::HeapConfig;
use object_model::{
    bootstrap, call_chase, send, unwrap_host, Callable, Handle, NativeContext, Object,
    ObjectHeap,
};

type Output = Rc<RefCell<Vec<String>>>;

/// Native `print`: records the name of `subject` and returns it
fn print_native(heap: &mut ObjectHeap, subject: Handle, output: &Output) -> Handle {
    let output = Rc::clone(output);
    heap.alloc(Callable::native(move |ctx: &mut dyn NativeContext| {
        let name = send(ctx.heap_mut(), subject, "name", &[])?;
        let name = call_chase(ctx.heap_mut(), name, &[subject])?;
        output
            .borrow_mut()
            .push(unwrap_host::<String>(ctx.heap(), name)?.clone());
        Ok(subject)
    }))
    .unwrap()
}

/// Test: three prints, each result popped, stack empty at EXIT
#[test]
fn test_print_three_times() {
    init_tracing();
    let mut heap = ObjectHeap::new();
    let rt = bootstrap(&mut heap).unwrap();
    let output: Output = Rc::default();

    let mut vm = Vm::with_heap(heap);
    for _ in 0..3 {
        let print = print_native(vm.heap_mut(), rt.object_class(), &output);
        vm.push(print);
    }

    let mut chunk = CodeChunk::new();
    for _ in 0..3 {
        chunk.emit(Opcode::Call);
        chunk.emit(Opcode::Pop);
    }
    chunk.emit(Opcode::Exit);

    let code = vm.load_code(chunk).unwrap();
    vm.enter(code).unwrap();
    vm.run().unwrap();

    assert!(vm.stack().is_empty());
    assert_eq!(output.borrow().as_slice(), &["Object", "Object", "Object"]);
}

/// Test: a guest function installs no handler; the caller's handler
/// catches its THROW and execution continues in the caller
#[test]
fn test_throw_across_guest_frames_then_collect() {
    init_tracing();
    let mut heap = ObjectHeap::new();
    let rt = bootstrap(&mut heap).unwrap();
    let baseline = heap.live_count();

    let mut vm = Vm::with_heap(heap);

    // Callee: THROW
    let mut body = CodeChunk::new();
    body.emit(Opcode::Throw);
    let body = vm.load_code(body).unwrap();
    let function = vm.heap_mut().alloc(Callable::guest(body, 0)).unwrap();

    // Caller:
    // 0: SET_EXCEPTION_HANDLER H
    // 2: CALL
    // 3: EXIT           (not reached)
    // H: UNSET_EXCEPTION_HANDLER
    //    EXIT
    let mut main = CodeChunk::new();
    let handler = main.set_exception_handler(0);
    main.emit(Opcode::Call);
    main.emit(Opcode::Exit);
    main.patch_here(handler);
    let h = main.emit(Opcode::UnsetExceptionHandler);
    let exit = main.emit(Opcode::Exit);
    assert_eq!(
        disassemble(main.words()),
        "0000  SET_EXCEPTION_HANDLER 4\n0002  CALL\n0003  EXIT\n0004  UNSET_EXCEPTION_HANDLER\n0005  EXIT\n"
    );

    let main = vm.load_code(main).unwrap();
    vm.push(function);
    vm.enter(main).unwrap();
    vm.run().unwrap();

    assert_eq!(h, 4);
    assert_eq!(vm.pc(), exit);
    assert_eq!(vm.call_depth(), 1);
    assert_eq!(vm.current_frame().unwrap().exception_handler(), None);

    // Callee frame, callable and body are unreachable now
    let summary = vm.collect_garbage();
    assert_eq!(summary.freed, 3);

    let mut heap = vm.into_heap();
    heap.collect();
    assert_eq!(heap.live_count(), baseline);
    assert!(heap.contains(rt.globals()));
}

/// Test: a capped VM heap reports allocation failure from guest calls
#[test]
fn test_guest_call_hits_allocation_limit() {
    let config = VmConfig::default().with_heap(HeapConfig::default().with_max_objects(4));
    let mut vm = Vm::with_config(config);
    let body = vm.load_code(vec![Opcode::Ret.word()]).unwrap();
    let function = vm.heap_mut().alloc(Callable::guest(body, 0)).unwrap();
    let main = vm.load_code(vec![Opcode::Call.word(), Opcode::Exit.word()]).unwrap();
    vm.enter(main).unwrap();
    vm.push(function);

    let err = vm.run().unwrap_err();

    assert_eq!(
        err,
        VmError::Alloc(memory_manager::AllocError::LimitReached { limit: 4 })
    );
    // The callee stays on the stack for the host to inspect
    assert_eq!(vm.stack(), &[function]);
}

/// Test: the heap outlives a VM that failed mid-run
#[test]
fn test_failed_run_leaves_evidence() {
    let mut vm = Vm::new();
    let value = vm.heap_mut().alloc(Object::new()).unwrap();
    vm.push(value);
    let main = vm.load_code(vec![Opcode::Nop.word(), 55]).unwrap();
    vm.enter(main).unwrap();

    assert_eq!(vm.run(), Err(VmError::BadOpcode { word: 55, pc: 1 }));
    assert_eq!(vm.pc(), 1);
    assert_eq!(vm.stack(), &[value]);

    vm.reset();
    assert_eq!(vm.heap().root_count(), 0);
}
