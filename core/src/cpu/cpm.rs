//! The minimal CP/M BDOS stub: enough of `CALL 0x0005`'s character and
//! string output calls to run classic Z80 conformance programs (e.g.
//! ZEXALL) that report results via BDOS rather than a memory-mapped
//! console.

use std::io::Write as _;

use crate::ports::Ports;
use crate::registers::Reg16;

use super::System;

/// Where BDOS call `C=2`/`C=9` output goes. The default forwards to the
/// host's stdout; tests substitute a [`BufferWriter`] to capture output
/// without touching the real console.
pub trait BdosWriter {
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Default [`BdosWriter`]: a thin wrapper over `io::Stdout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutWriter;

impl BdosWriter for StdoutWriter {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let _ = std::io::stdout().write_all(bytes);
    }
}

/// A [`BdosWriter`] that records output in memory, for tests.
#[derive(Clone, Debug, Default)]
pub struct BufferWriter {
    pub buffer: Vec<u8>,
}

impl BdosWriter for BufferWriter {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}

/// Invoked when execution reaches the CP/M BDOS entry point (`0x0005`),
/// before the `RET` installed there runs. Reads `C` to decide which BDOS
/// function is being called and performs its character/string output;
/// any other function is reported as unhandled rather than failing the
/// run, since most conformance programs only rely on `C=2`/`C=9`.
pub(super) fn dispatch_bdos(sys: &mut System<impl Ports, impl BdosWriter>) {
    use crate::registers::Reg8;

    let function = sys.registers.get8(Reg8::C);
    match function {
        2 => {
            let ch = sys.registers.get8(Reg8::E);
            sys.bdos_writer.write_bytes(&[ch]);
        }
        9 => {
            let mut addr = sys.registers.get16(Reg16::De);
            let mut bytes = Vec::new();
            loop {
                let byte = sys.memory.get_byte(addr);
                if byte == b'$' {
                    break;
                }
                bytes.push(byte);
                addr = addr.wrapping_add(1);
            }
            sys.bdos_writer.write_bytes(&bytes);
        }
        other => {
            let message = format!("Unhandled BDOS call {other:02X}");
            sys.bdos_writer.write_bytes(message.as_bytes());
        }
    }
}
