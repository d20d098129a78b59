//! The `0xCB`-prefixed family: rotate/shift, `BIT`, `RES`, `SET`, including
//! the indexed `(IX+d)`/`(IY+d)` forms and their undocumented "also copy
//! into a register" variant.

use z80emu_tables::{tables, C_MASK, H_MASK, N_MASK, V_MASK, X_MASK, Y_MASK};

use crate::ports::Ports;
use crate::registers::Reg8;

use super::{BdosWriter, Operand8, Prefix, System};

fn reg_for_low_bits(bits: u8) -> Option<Reg8> {
    match bits & 0x07 {
        0 => Some(Reg8::B),
        1 => Some(Reg8::C),
        2 => Some(Reg8::D),
        3 => Some(Reg8::E),
        4 => Some(Reg8::H),
        5 => Some(Reg8::L),
        6 => None, // (HL) / (IX+d) / (IY+d)
        7 => Some(Reg8::A),
        _ => unreachable!(),
    }
}

fn rlc(v: u8) -> (u8, bool) {
    let carry = v & 0x80 != 0;
    (v.rotate_left(1), carry)
}

fn rrc(v: u8) -> (u8, bool) {
    let carry = v & 0x01 != 0;
    (v.rotate_right(1), carry)
}

fn rl(v: u8, carry_in: bool) -> (u8, bool) {
    let carry_out = v & 0x80 != 0;
    ((v << 1) | carry_in as u8, carry_out)
}

fn rr(v: u8, carry_in: bool) -> (u8, bool) {
    let carry_out = v & 0x01 != 0;
    ((v >> 1) | ((carry_in as u8) << 7), carry_out)
}

fn sla(v: u8) -> (u8, bool) {
    let carry_out = v & 0x80 != 0;
    (v << 1, carry_out)
}

fn sra(v: u8) -> (u8, bool) {
    let carry_out = v & 0x01 != 0;
    (((v as i8) >> 1) as u8, carry_out)
}

/// Undocumented: shifts left, shifting a 1 into bit 0 (as opposed to `SLA`,
/// which shifts a 0 in).
fn sll(v: u8) -> (u8, bool) {
    let carry_out = v & 0x80 != 0;
    ((v << 1) | 0x01, carry_out)
}

fn srl(v: u8) -> (u8, bool) {
    let carry_out = v & 0x01 != 0;
    (v >> 1, carry_out)
}

fn rotate_shift_flags(result: u8, carry: bool) -> u8 {
    let mut f = tables().szp[result as usize];
    if carry {
        f |= C_MASK;
    }
    f
}

fn apply_rotate_shift(sys: &mut System<impl Ports, impl BdosWriter>, family: u8, value: u8) -> (u8, u8) {
    let carry_in = sys.registers.test_flag(C_MASK);
    let (result, carry_out) = match family {
        0 => rlc(value),
        1 => rrc(value),
        2 => rl(value, carry_in),
        3 => rr(value, carry_in),
        4 => sla(value),
        5 => sra(value),
        6 => sll(value),
        7 => srl(value),
        _ => unreachable!(),
    };
    (result, rotate_shift_flags(result, carry_out))
}

fn bit_flags(bit_index: u8, value: u8, addr_high_byte: Option<u8>) -> u8 {
    let isolated = value & (1 << bit_index);
    let mut f = tables().sz_bit[isolated as usize];
    f |= H_MASK;
    if let Some(high) = addr_high_byte {
        f = (f & !(Y_MASK | X_MASK)) | (high & (Y_MASK | X_MASK));
    }
    f & !N_MASK
}

/// Dispatch a plain (unprefixed) `0xCB xx` opcode.
pub(super) fn dispatch_cb(sys: &mut System<impl Ports, impl BdosWriter>) {
    let op = sys.fetch_byte();
    let bits = op & 0x07;
    let operand = match reg_for_low_bits(bits) {
        Some(reg) => Operand8::Reg(reg),
        None => Operand8::Mem(sys.registers.get16(crate::registers::Reg16::Hl)),
    };
    let value = sys.get_operand8(operand);

    match op >> 6 {
        0 => {
            let family = (op >> 3) & 0x07;
            let (result, flags) = apply_rotate_shift(sys, family, value);
            sys.set_operand8(operand, result);
            sys.registers.set8(Reg8::F, flags);
        }
        1 => {
            let bit_index = (op >> 3) & 0x07;
            let addr_high = match operand {
                Operand8::Mem(addr) => Some((addr >> 8) as u8),
                Operand8::Reg(_) => None,
            };
            let old_f = sys.registers.get8(Reg8::F);
            let mut f = bit_flags(bit_index, value, addr_high);
            f |= old_f & C_MASK;
            sys.registers.set8(Reg8::F, f);
        }
        2 => {
            let bit_index = (op >> 3) & 0x07;
            sys.set_operand8(operand, value & !(1 << bit_index));
        }
        3 => {
            let bit_index = (op >> 3) & 0x07;
            sys.set_operand8(operand, value | (1 << bit_index));
        }
        _ => unreachable!(),
    }
}

/// Dispatch `DD CB d op` / `FD CB d op`: the displacement byte has already
/// been consumed by the caller's prefix absorption is NOT the case here —
/// `CB` under an index prefix reads `d` itself, before the final opcode
/// byte, so this function owns both reads.
pub(super) fn dispatch_indexed_cb(sys: &mut System<impl Ports, impl BdosWriter>, prefix: Prefix) {
    let d = z80emu_tables::signed_byte(sys.fetch_byte());
    let op = sys.fetch_byte();
    let base = match prefix {
        Prefix::Ix => sys.registers.get16(crate::registers::Reg16::Ix),
        Prefix::Iy => sys.registers.get16(crate::registers::Reg16::Iy),
        Prefix::None => unreachable!("indexed CB only reached under a DD/FD prefix"),
    };
    let addr = base.wrapping_add(d as i16 as u16);
    let value = sys.memory.get_byte(addr);
    let bits = op & 0x07;
    let mirror_reg = reg_for_low_bits(bits);

    let result = match op >> 6 {
        0 => {
            let family = (op >> 3) & 0x07;
            let (result, flags) = apply_rotate_shift(sys, family, value);
            sys.registers.set8(Reg8::F, flags);
            result
        }
        1 => {
            let bit_index = (op >> 3) & 0x07;
            let old_f = sys.registers.get8(Reg8::F);
            let mut f = bit_flags(bit_index, value, Some((addr >> 8) as u8));
            f |= old_f & C_MASK;
            sys.registers.set8(Reg8::F, f);
            return;
        }
        2 => {
            let bit_index = (op >> 3) & 0x07;
            value & !(1 << bit_index)
        }
        3 => {
            let bit_index = (op >> 3) & 0x07;
            value | (1 << bit_index)
        }
        _ => unreachable!(),
    };

    sys.memory.set_byte(addr, result);
    if let Some(reg) = mirror_reg {
        sys.registers.set8(reg, result);
    }
}

/// Accumulator-only rotates (`RLCA`/`RRCA`/`RLA`/`RRA`, opcodes `0x07/
/// 0x0F/0x17/0x1F`). Unlike the `CB`-prefixed per-register forms, these
/// leave S/Z/P-V untouched and only recompute H (cleared), N (cleared),
/// C, and Y/X (from the result).
fn accumulator_rotate(sys: &mut System<impl Ports, impl BdosWriter>, family: u8) {
    let a = sys.registers.get8(Reg8::A);
    let carry_in = sys.registers.test_flag(C_MASK);
    let (result, carry_out) = match family {
        0 => rlc(a),
        1 => rrc(a),
        2 => rl(a, carry_in),
        3 => rr(a, carry_in),
        _ => unreachable!(),
    };
    sys.registers.set8(Reg8::A, result);
    let mut f = sys.registers.get8(Reg8::F) & (z80emu_tables::S_MASK | z80emu_tables::Z_MASK | V_MASK);
    f |= result & (Y_MASK | X_MASK);
    if carry_out {
        f |= C_MASK;
    }
    sys.registers.set8(Reg8::F, f);
}

pub(super) fn rlca(sys: &mut System<impl Ports, impl BdosWriter>) {
    accumulator_rotate(sys, 0);
}

pub(super) fn rrca(sys: &mut System<impl Ports, impl BdosWriter>) {
    accumulator_rotate(sys, 1);
}

pub(super) fn rla(sys: &mut System<impl Ports, impl BdosWriter>) {
    accumulator_rotate(sys, 2);
}

pub(super) fn rra(sys: &mut System<impl Ports, impl BdosWriter>) {
    accumulator_rotate(sys, 3);
}
