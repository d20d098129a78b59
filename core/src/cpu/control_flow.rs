//! `JP`/`JR`/`DJNZ`/`CALL`/`RET`/`RST` and the 3-bit condition-code table
//! they share.

use z80emu_tables::signed_byte;

use crate::ports::Ports;
use crate::registers::{Reg16, Reg8};

use super::{BdosWriter, Condition, System};

pub(super) fn jp_unconditional(sys: &mut System<impl Ports, impl BdosWriter>) {
    let target = sys.fetch_word();
    sys.registers.pc = target;
}

pub(super) fn jp_conditional(sys: &mut System<impl Ports, impl BdosWriter>, cond: Condition) {
    let target = sys.fetch_word();
    if sys.test_condition(cond) {
        sys.registers.pc = target;
    }
}

/// `JP (HL)` (or `(IX)`/`(IY)` under a prefix): note this does NOT read
/// through the pointer, it jumps TO the register's value.
pub(super) fn jp_hl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let reg = sys.hl_like();
    sys.registers.pc = sys.registers.get16(reg);
}

pub(super) fn jr_unconditional(sys: &mut System<impl Ports, impl BdosWriter>) {
    let d = signed_byte(sys.fetch_byte());
    sys.registers.add_pc(d);
}

pub(super) fn jr_conditional(sys: &mut System<impl Ports, impl BdosWriter>, cond: Condition) {
    let d = signed_byte(sys.fetch_byte());
    if sys.test_condition(cond) {
        sys.registers.add_pc(d);
    }
}

pub(super) fn djnz(sys: &mut System<impl Ports, impl BdosWriter>) {
    let d = signed_byte(sys.fetch_byte());
    let b = sys.registers.get8(Reg8::B).wrapping_sub(1);
    sys.registers.set8(Reg8::B, b);
    if b != 0 {
        sys.registers.add_pc(d);
    }
}

pub(super) fn call_unconditional(sys: &mut System<impl Ports, impl BdosWriter>) {
    let target = sys.fetch_word();
    let return_to = sys.registers.pc;
    sys.push16(return_to);
    sys.registers.pc = target;
}

pub(super) fn call_conditional(sys: &mut System<impl Ports, impl BdosWriter>, cond: Condition) {
    let target = sys.fetch_word();
    if sys.test_condition(cond) {
        let return_to = sys.registers.pc;
        sys.push16(return_to);
        sys.registers.pc = target;
    }
}

pub(super) fn ret_unconditional(sys: &mut System<impl Ports, impl BdosWriter>) {
    let target = sys.pop16();
    sys.registers.pc = target;
}

pub(super) fn ret_conditional(sys: &mut System<impl Ports, impl BdosWriter>, cond: Condition) {
    if sys.test_condition(cond) {
        let target = sys.pop16();
        sys.registers.pc = target;
    }
}

/// `RET` as used by the `ED`-prefixed `RETN`/`RETI` aliases: interrupt
/// modes aren't modeled, so both behave as a plain `RET`.
pub(super) fn retn_reti(sys: &mut System<impl Ports, impl BdosWriter>) {
    sys.iff1 = sys.iff2;
    ret_unconditional(sys);
}

/// `RST p`: only `p == 0` is supported, acting as the emulation's
/// termination convention. Any other target is an unsupported-instruction
/// failure, consistent with the "unimplemented opcode" panic path.
pub(super) fn rst(sys: &mut System<impl Ports, impl BdosWriter>, target: u8) {
    if target != 0 {
        panic!("unsupported RST target {target:#04x}");
    }
    let return_to = sys.registers.pc;
    sys.push16(return_to);
    sys.registers.pc = 0;
    sys.running = false;
}

/// `LD (nn),SP` / `LD SP,(nn)` (`ED`-prefixed): always target `SP`
/// directly, with no `IX`/`IY` substitution.
pub(super) fn ld_mem_nn_sp(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    let sp = sys.registers.get16(Reg16::Sp);
    sys.memory.set_word(addr, sp);
}

pub(super) fn ld_sp_mem_nn(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    let value = sys.memory.get_word(addr);
    sys.registers.set16(Reg16::Sp, value);
}
