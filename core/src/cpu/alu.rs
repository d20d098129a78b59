//! 8/16-bit arithmetic and logic: `ADD/ADC/SUB/SBC/AND/XOR/OR/CP`,
//! `INC`/`DEC`, `DAA`, and the accumulator flag-only opcodes
//! (`CPL`/`SCF`/`CCF`).

use z80emu_tables::{and_flags, cp_flags, or_xor_flags, reg_adc, reg_add, reg_sbc, reg_sub, tables, C_MASK, H_MASK, N_MASK, S_MASK, V_MASK, X_MASK, Y_MASK, Z_MASK};

use crate::ports::Ports;
use crate::registers::{Reg16, Reg8};

use super::{BdosWriter, System};

fn operand(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) -> u8 {
    let operand = sys.decode_r8(opcode);
    sys.get_operand8(operand)
}

pub(super) fn add(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let (result, flags) = reg_add(a, value);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn adc(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let carry = sys.registers.test_flag(C_MASK);
    let (result, flags) = reg_adc(a, value, carry);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn sub(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let (result, flags) = reg_sub(a, value);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn sbc(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let carry = sys.registers.test_flag(C_MASK);
    let (result, flags) = reg_sbc(a, value, carry);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn and(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let result = a & value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, and_flags(result));
}

pub(super) fn xor(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let result = a ^ value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, or_xor_flags(result));
}

pub(super) fn or(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    let result = a | value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, or_xor_flags(result));
}

pub(super) fn cp(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let value = operand(sys, opcode);
    let a = sys.registers.get8(Reg8::A);
    sys.registers.set8(Reg8::F, cp_flags(a, value));
}

pub(super) fn add_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let (result, flags) = reg_add(a, value);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn adc_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let carry = sys.registers.test_flag(C_MASK);
    let (result, flags) = reg_adc(a, value, carry);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn sub_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let (result, flags) = reg_sub(a, value);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn sbc_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let carry = sys.registers.test_flag(C_MASK);
    let (result, flags) = reg_sbc(a, value, carry);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn and_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let result = a & value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, and_flags(result));
}

pub(super) fn xor_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let result = a ^ value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, or_xor_flags(result));
}

pub(super) fn or_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let result = a | value;
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, or_xor_flags(result));
}

pub(super) fn cp_imm(sys: &mut System<impl Ports, impl BdosWriter>) {
    let value = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    sys.registers.set8(Reg8::F, cp_flags(a, value));
}

pub(super) fn inc_r8(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let operand = sys.decode_r8(opcode >> 3);
    let value = sys.get_operand8(operand);
    let result = value.wrapping_add(1);
    sys.set_operand8(operand, result);
    let carry = sys.registers.test_flag(C_MASK);
    let mut flags = tables().szhv_inc[result as usize];
    if carry {
        flags |= C_MASK;
    }
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn dec_r8(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let operand = sys.decode_r8(opcode >> 3);
    let value = sys.get_operand8(operand);
    let result = value.wrapping_sub(1);
    sys.set_operand8(operand, result);
    let carry = sys.registers.test_flag(C_MASK);
    let mut flags = tables().szhv_dec[result as usize];
    if carry {
        flags |= C_MASK;
    }
    sys.registers.set8(Reg8::F, flags);
}

pub(super) fn inc_rr(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let reg = sys.decode_rr(opcode >> 4);
    sys.registers.inc16(reg);
}

pub(super) fn dec_rr(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let reg = sys.decode_rr(opcode >> 4);
    sys.registers.dec16(reg);
}

/// `ADD HL,rr` (and its `IX`/`IY`-prefixed equivalents). Preserves S, Z,
/// P/V; recomputes H, C, and the undocumented Y/X from the result's high
/// byte; clears N.
pub(super) fn add_hl_rr(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let dest = sys.hl_like();
    let src = sys.decode_rr(opcode >> 4);
    let hl = sys.registers.get16(dest);
    let rr = sys.registers.get16(src);
    let result = hl.wrapping_add(rr);

    let half_carry = ((hl ^ rr ^ result) & 0x1000) != 0;
    let carry = (hl as u32 + rr as u32) > 0xFFFF;

    let old_f = sys.registers.get8(Reg8::F);
    let mut f = old_f & (S_MASK | Z_MASK | V_MASK);
    f |= yx_bits_of_high_byte(result);
    if half_carry {
        f |= H_MASK;
    }
    if carry {
        f |= C_MASK;
    }
    sys.registers.set8(Reg8::F, f);
    sys.registers.set16(dest, result);
}

fn yx_bits_of_high_byte(value: u16) -> u8 {
    ((value >> 8) as u8) & (Y_MASK | X_MASK)
}

/// `DAA`: the classic BCD correction, following the table every Z80
/// reference ties back to the N, H, and C flags left by the previous
/// add/subtract.
pub(super) fn daa(sys: &mut System<impl Ports, impl BdosWriter>) {
    let a = sys.registers.get8(Reg8::A);
    let f = sys.registers.get8(Reg8::F);
    let n = f & N_MASK != 0;
    let h = f & H_MASK != 0;
    let c = f & C_MASK != 0;

    let mut correction: u8 = 0;
    let mut carry_out = c;

    if h || (a & 0x0F) > 9 {
        correction |= 0x06;
    }
    if c || a > 0x99 {
        correction |= 0x60;
        carry_out = true;
    }

    let result = if n {
        a.wrapping_sub(correction)
    } else {
        a.wrapping_add(correction)
    };

    let half_carry_out = (a ^ result) & H_MASK != 0;

    let mut new_f = tables().szp[result as usize];
    new_f |= f & N_MASK;
    if half_carry_out {
        new_f |= H_MASK;
    }
    if carry_out {
        new_f |= C_MASK;
    }

    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, new_f);
}

/// `CPL`: complement A. Sets H and N, preserves S/Z/P/C, copies Y/X from
/// the (complemented) result.
pub(super) fn cpl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let a = sys.registers.get8(Reg8::A);
    let result = !a;
    sys.registers.set8(Reg8::A, result);
    let mut f = sys.registers.get8(Reg8::F) & (S_MASK | Z_MASK | V_MASK | C_MASK);
    f |= H_MASK | N_MASK;
    f |= result & (Y_MASK | X_MASK);
    sys.registers.set8(Reg8::F, f);
}

/// `SCF`: set carry. Clears H and N, copies Y/X from A.
pub(super) fn scf(sys: &mut System<impl Ports, impl BdosWriter>) {
    let a = sys.registers.get8(Reg8::A);
    let mut f = sys.registers.get8(Reg8::F) & (S_MASK | Z_MASK | V_MASK);
    f |= C_MASK;
    f |= a & (Y_MASK | X_MASK);
    sys.registers.set8(Reg8::F, f);
}

/// `CCF`: complement carry. Old carry moves into H, clears N, copies Y/X
/// from A.
pub(super) fn ccf(sys: &mut System<impl Ports, impl BdosWriter>) {
    let a = sys.registers.get8(Reg8::A);
    let old_f = sys.registers.get8(Reg8::F);
    let old_carry = old_f & C_MASK != 0;
    let mut f = old_f & (S_MASK | Z_MASK | V_MASK);
    if old_carry {
        f |= H_MASK;
    } else {
        f |= C_MASK;
    }
    f |= a & (Y_MASK | X_MASK);
    sys.registers.set8(Reg8::F, f);
}

/// `NEG`: `A := 0 - A`, used by the `ED` dispatcher (`0x44` and its
/// undocumented aliases).
pub(super) fn neg(sys: &mut System<impl Ports, impl BdosWriter>) {
    let a = sys.registers.get8(Reg8::A);
    let (result, flags) = reg_sub(0, a);
    sys.registers.set8(Reg8::A, result);
    sys.registers.set8(Reg8::F, flags);
}

/// `ADC HL,rr` / `SBC HL,rr` (ED-prefixed 16-bit forms). Always targets
/// `HL` regardless of any DD/FD prefix, unlike the non-ED `ADD HL,rr`.
pub(super) fn adc_hl(sys: &mut System<impl Ports, impl BdosWriter>, rr: Reg16) {
    let hl = sys.registers.get16(Reg16::Hl);
    let rr_val = sys.registers.get16(rr);
    let carry_in = sys.registers.test_flag(C_MASK) as u32;
    let full = hl as u32 + rr_val as u32 + carry_in;
    let result = full as u16;

    let half_carry = ((hl ^ rr_val ^ result) & 0x1000) != 0;
    let carry = full > 0xFFFF;
    let overflow = (!(hl ^ rr_val) & (hl ^ result) & 0x8000) != 0;

    let mut f = 0u8;
    if result == 0 {
        f |= Z_MASK;
    }
    f |= (result >> 8) as u8 & S_MASK;
    f |= yx_bits_of_high_byte(result);
    if half_carry {
        f |= H_MASK;
    }
    if overflow {
        f |= V_MASK;
    }
    if carry {
        f |= C_MASK;
    }
    sys.registers.set16(Reg16::Hl, result);
    sys.registers.set8(Reg8::F, f);
}

pub(super) fn sbc_hl(sys: &mut System<impl Ports, impl BdosWriter>, rr: Reg16) {
    let hl = sys.registers.get16(Reg16::Hl);
    let rr_val = sys.registers.get16(rr);
    let carry_in = sys.registers.test_flag(C_MASK) as i32;
    let full = hl as i32 - rr_val as i32 - carry_in;
    let result = full as u16;

    let half_borrow = ((hl ^ rr_val ^ result) & 0x1000) != 0;
    let borrow = full < 0;
    let overflow = ((hl ^ rr_val) & (hl ^ result) & 0x8000) != 0;

    let mut f = N_MASK;
    if result == 0 {
        f |= Z_MASK;
    }
    f |= (result >> 8) as u8 & S_MASK;
    f |= yx_bits_of_high_byte(result);
    if half_borrow {
        f |= H_MASK;
    }
    if overflow {
        f |= V_MASK;
    }
    if borrow {
        f |= C_MASK;
    }
    sys.registers.set16(Reg16::Hl, result);
    sys.registers.set8(Reg8::F, f);
}
