//! Contract compliance tests for bytecode_system
//! Verifies the exported instruction set and assembler API

use bytecode_system::{CodeChunk, Opcode, PatchSite, Word};

/// Verify every opcode variant exists with its contract numbering
#[test]
fn test_contract_opcode_variants() {
    let _ = Opcode::Nop;
    let _ = Opcode::Pop;
    let _ = Opcode::Swap;
    let _ = Opcode::Jump;
    let _ = Opcode::Call;
    let _ = Opcode::Ret;
    let _ = Opcode::ObjGet;
    let _ = Opcode::ObjSet;
    let _ = Opcode::ObjUnset;
    let _ = Opcode::SetExceptionHandler;
    let _ = Opcode::UnsetExceptionHandler;
    let _ = Opcode::Throw;
    let _ = Opcode::Exit;
    assert_eq!(Opcode::ALL.len(), 13);
}

/// Verify CodeChunk builder API
#[test]
fn test_contract_chunk_api() {
    let mut chunk = CodeChunk::new();
    let offset: usize = chunk.emit(Opcode::Nop);
    let site: PatchSite = chunk.jump(offset);
    chunk.patch(site, 0);
    let words: &[Word] = chunk.words();
    assert_eq!(words.len(), 3);
}
