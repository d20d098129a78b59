//! `LD` in all its forms, the exchange instructions, and the block
//! transfer/compare family (`LDI`/`LDIR`/`CPI`/`CPIR`/...).

use z80emu_tables::{yx_bits, H_MASK, N_MASK, S_MASK, V_MASK, Z_MASK};

use crate::ports::Ports;
use crate::registers::{Reg16, Reg8};

use super::{BdosWriter, System};

/// `LD r1,r2` for the `0x40..=0x7F` range (excluding `0x76` = `HALT`,
/// handled by the caller).
pub(super) fn ld_r_r(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let dst_bits = (opcode >> 3) & 0x07;
    let src_bits = opcode & 0x07;
    let (dst, src) = sys.decode_ld_operands(dst_bits, src_bits);
    let value = sys.get_operand8(src);
    sys.set_operand8(dst, value);
}

pub(super) fn ld_r8_imm(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let dst = sys.decode_r8((opcode >> 3) & 0x07);
    let value = sys.fetch_byte();
    sys.set_operand8(dst, value);
}

pub(super) fn ld_rr_nn(sys: &mut System<impl Ports, impl BdosWriter>, opcode: u8) {
    let reg = sys.decode_rr(opcode >> 4);
    let value = sys.fetch_word();
    sys.registers.set16(reg, value);
}

pub(super) fn ld_bc_a(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.registers.get16(Reg16::Bc);
    sys.memory.set_byte(addr, sys.registers.get8(Reg8::A));
}

pub(super) fn ld_a_bc(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.registers.get16(Reg16::Bc);
    let value = sys.memory.get_byte(addr);
    sys.registers.set8(Reg8::A, value);
}

pub(super) fn ld_de_a(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.registers.get16(Reg16::De);
    sys.memory.set_byte(addr, sys.registers.get8(Reg8::A));
}

pub(super) fn ld_a_de(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.registers.get16(Reg16::De);
    let value = sys.memory.get_byte(addr);
    sys.registers.set8(Reg8::A, value);
}

pub(super) fn ld_mem_nn_hl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    let reg = sys.hl_like();
    let value = sys.registers.get16(reg);
    sys.memory.set_word(addr, value);
}

pub(super) fn ld_hl_mem_nn(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    let value = sys.memory.get_word(addr);
    let reg = sys.hl_like();
    sys.registers.set16(reg, value);
}

pub(super) fn ld_mem_nn_a(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    sys.memory.set_byte(addr, sys.registers.get8(Reg8::A));
}

pub(super) fn ld_a_mem_nn(sys: &mut System<impl Ports, impl BdosWriter>) {
    let addr = sys.fetch_word();
    let value = sys.memory.get_byte(addr);
    sys.registers.set8(Reg8::A, value);
}

pub(super) fn ex_de_hl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let de = sys.registers.get16(Reg16::De);
    let hl = sys.registers.get16(Reg16::Hl);
    sys.registers.set16(Reg16::De, hl);
    sys.registers.set16(Reg16::Hl, de);
}

/// `EX (SP),HL` (or `(SP),IX`/`(SP),IY` under a prefix).
pub(super) fn ex_sp_hl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let sp = sys.registers.sp;
    let mem_val = sys.memory.get_word(sp);
    let reg = sys.hl_like();
    let reg_val = sys.registers.get16(reg);
    sys.memory.set_word(sp, reg_val);
    sys.registers.set16(reg, mem_val);
}

pub(super) fn ld_sp_hl(sys: &mut System<impl Ports, impl BdosWriter>) {
    let reg = sys.hl_like();
    let value = sys.registers.get16(reg);
    sys.registers.sp = value;
}

pub(super) fn out_n_a(sys: &mut System<impl Ports, impl BdosWriter>) {
    let port = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    sys.ports.output(port, a);
}

pub(super) fn in_a_n(sys: &mut System<impl Ports, impl BdosWriter>) {
    let port = sys.fetch_byte();
    let a = sys.registers.get8(Reg8::A);
    let value = sys.ports.input(port, a);
    sys.registers.set8(Reg8::A, value);
}

// --- ED-prefixed 16-bit absolute load/store ---------------------------

pub(super) fn ld_mem_nn_rr(sys: &mut System<impl Ports, impl BdosWriter>, reg: Reg16) {
    let addr = sys.fetch_word();
    let value = sys.registers.get16(reg);
    sys.memory.set_word(addr, value);
}

pub(super) fn ld_rr_mem_nn(sys: &mut System<impl Ports, impl BdosWriter>, reg: Reg16) {
    let addr = sys.fetch_word();
    let value = sys.memory.get_word(addr);
    sys.registers.set16(reg, value);
}

pub(super) fn ld_a_i_or_r(sys: &mut System<impl Ports, impl BdosWriter>, value: u8) {
    sys.registers.set8(Reg8::A, value);
    let old_carry = sys.registers.carry();
    let mut f = z80emu_tables::tables().sz[value as usize];
    // P/V carries "interrupt pending" on real hardware; inert here since
    // interrupts aren't modeled, so it's always clear.
    f &= !V_MASK;
    f &= !(H_MASK | N_MASK);
    f |= old_carry;
    sys.registers.set8(Reg8::F, f);
}

// --- Block transfer / compare family -----------------------------------

fn bc_after_step(sys: &mut System<impl Ports, impl BdosWriter>) -> u16 {
    let bc = sys.registers.dec16(Reg16::Bc);
    bc
}

/// `LDI`/`LDD`: copy `(HL)` to `(DE)`, step `HL`/`DE` by `step`, decrement
/// `BC`. Flags: S/Z/C preserved; H, N cleared; P/V set if `BC != 0` after
/// the decrement; Y/X are the undocumented "A + transferred byte" bits.
fn ldi_ldd(sys: &mut System<impl Ports, impl BdosWriter>, step: i16) {
    let hl = sys.registers.get16(Reg16::Hl);
    let de = sys.registers.get16(Reg16::De);
    let byte = sys.memory.get_byte(hl);
    sys.memory.set_byte(de, byte);
    sys.registers.set16(Reg16::Hl, hl.wrapping_add(step as u16));
    sys.registers.set16(Reg16::De, de.wrapping_add(step as u16));
    let bc = bc_after_step(sys);

    let a = sys.registers.get8(Reg8::A);
    let n = a.wrapping_add(byte);
    let mut f = sys.registers.get8(Reg8::F) & (S_MASK | Z_MASK | z80emu_tables::C_MASK);
    if bc != 0 {
        f |= V_MASK;
    }
    f |= n & z80emu_tables::X_MASK;
    if n & 0x02 != 0 {
        f |= z80emu_tables::Y_MASK;
    }
    sys.registers.set8(Reg8::F, f);
}

pub(super) fn ldi(sys: &mut System<impl Ports, impl BdosWriter>) {
    ldi_ldd(sys, 1);
}

pub(super) fn ldd(sys: &mut System<impl Ports, impl BdosWriter>) {
    ldi_ldd(sys, -1);
}

pub(super) fn ldir(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        ldi_ldd(sys, 1);
        if sys.registers.get16(Reg16::Bc) == 0 {
            break;
        }
    }
}

pub(super) fn lddr(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        ldi_ldd(sys, -1);
        if sys.registers.get16(Reg16::Bc) == 0 {
            break;
        }
    }
}

/// `CPI`/`CPD`: compare `A` against `(HL)`, step `HL`, decrement `BC`.
fn cpi_cpd(sys: &mut System<impl Ports, impl BdosWriter>, step: i16) -> bool {
    let hl = sys.registers.get16(Reg16::Hl);
    let byte = sys.memory.get_byte(hl);
    let a = sys.registers.get8(Reg8::A);
    let result = a.wrapping_sub(byte);
    sys.registers.set16(Reg16::Hl, hl.wrapping_add(step as u16));
    let bc = bc_after_step(sys);

    let half_borrow = (a & 0x0F) < (byte & 0x0F);
    let mut f = sys.registers.get8(Reg8::F) & z80emu_tables::C_MASK;
    f |= N_MASK;
    f |= z80emu_tables::tables().sz[result as usize] & (S_MASK | Z_MASK);
    if half_borrow {
        f |= H_MASK;
    }
    if bc != 0 {
        f |= V_MASK;
    }
    let n = if half_borrow { result.wrapping_sub(1) } else { result };
    f |= n & z80emu_tables::X_MASK;
    if n & 0x02 != 0 {
        f |= z80emu_tables::Y_MASK;
    }
    sys.registers.set8(Reg8::F, f);

    result == 0
}

pub(super) fn cpi(sys: &mut System<impl Ports, impl BdosWriter>) {
    cpi_cpd(sys, 1);
}

pub(super) fn cpd(sys: &mut System<impl Ports, impl BdosWriter>) {
    cpi_cpd(sys, -1);
}

pub(super) fn cpir(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        let matched = cpi_cpd(sys, 1);
        if matched || sys.registers.get16(Reg16::Bc) == 0 {
            break;
        }
    }
}

pub(super) fn cpdr(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        let matched = cpi_cpd(sys, -1);
        if matched || sys.registers.get16(Reg16::Bc) == 0 {
            break;
        }
    }
}

// --- IN/OUT block family (through Ports, not memory for input) --------

fn ini_ind(sys: &mut System<impl Ports, impl BdosWriter>, step: i16) {
    let port = sys.registers.get8(Reg8::C);
    let a = sys.registers.get8(Reg8::A);
    let value = sys.ports.input(port, a);
    let hl = sys.registers.get16(Reg16::Hl);
    sys.memory.set_byte(hl, value);
    sys.registers.set16(Reg16::Hl, hl.wrapping_add(step as u16));
    let b = sys.registers.get8(Reg8::B).wrapping_sub(1);
    sys.registers.set8(Reg8::B, b);

    let mut f = N_MASK;
    f |= z80emu_tables::tables().sz[b as usize] & (S_MASK | Z_MASK);
    f |= yx_bits(b);
    sys.registers.set8(Reg8::F, f);
}

fn outi_outd(sys: &mut System<impl Ports, impl BdosWriter>, step: i16) {
    let hl = sys.registers.get16(Reg16::Hl);
    let value = sys.memory.get_byte(hl);
    sys.registers.set16(Reg16::Hl, hl.wrapping_add(step as u16));
    let b = sys.registers.get8(Reg8::B).wrapping_sub(1);
    sys.registers.set8(Reg8::B, b);
    let port = sys.registers.get8(Reg8::C);
    sys.ports.output(port, value);

    let mut f = N_MASK;
    f |= z80emu_tables::tables().sz[b as usize] & (S_MASK | Z_MASK);
    f |= yx_bits(b);
    sys.registers.set8(Reg8::F, f);
}

pub(super) fn ini(sys: &mut System<impl Ports, impl BdosWriter>) {
    ini_ind(sys, 1);
}

pub(super) fn ind(sys: &mut System<impl Ports, impl BdosWriter>) {
    ini_ind(sys, -1);
}

pub(super) fn outi(sys: &mut System<impl Ports, impl BdosWriter>) {
    outi_outd(sys, 1);
}

pub(super) fn outd(sys: &mut System<impl Ports, impl BdosWriter>) {
    outi_outd(sys, -1);
}

pub(super) fn inir(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        ini_ind(sys, 1);
        if sys.registers.get8(Reg8::B) == 0 {
            break;
        }
    }
}

pub(super) fn indr(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        ini_ind(sys, -1);
        if sys.registers.get8(Reg8::B) == 0 {
            break;
        }
    }
}

pub(super) fn otir(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        outi_outd(sys, 1);
        if sys.registers.get8(Reg8::B) == 0 {
            break;
        }
    }
}

pub(super) fn otdr(sys: &mut System<impl Ports, impl BdosWriter>) {
    loop {
        outi_outd(sys, -1);
        if sys.registers.get8(Reg8::B) == 0 {
            break;
        }
    }
}

// --- RRD / RLD -----------------------------------------------------------

/// `RRD`: rotate the 12-bit concatenation `A[3:0]:(HL)[7:0]` right by 4
/// bits, leaving the top nibble of `A` untouched.
pub(super) fn rrd(sys: &mut System<impl Ports, impl BdosWriter>) {
    let hl = sys.registers.get16(Reg16::Hl);
    let mem = sys.memory.get_byte(hl);
    let a = sys.registers.get8(Reg8::A);

    let new_mem = (a << 4) | (mem >> 4);
    let new_a = (a & 0xF0) | (mem & 0x0F);

    sys.memory.set_byte(hl, new_mem);
    sys.registers.set8(Reg8::A, new_a);

    let carry = sys.registers.carry();
    let mut f = z80emu_tables::tables().szp[new_a as usize];
    f |= carry;
    sys.registers.set8(Reg8::F, f);
}

/// `RLD`: rotate the same 12-bit concatenation left by 4 bits.
pub(super) fn rld(sys: &mut System<impl Ports, impl BdosWriter>) {
    let hl = sys.registers.get16(Reg16::Hl);
    let mem = sys.memory.get_byte(hl);
    let a = sys.registers.get8(Reg8::A);

    let new_mem = (mem << 4) | (a & 0x0F);
    let new_a = (a & 0xF0) | (mem >> 4);

    sys.memory.set_byte(hl, new_mem);
    sys.registers.set8(Reg8::A, new_a);

    let carry = sys.registers.carry();
    let mut f = z80emu_tables::tables().szp[new_a as usize];
    f |= carry;
    sys.registers.set8(Reg8::F, f);
}
