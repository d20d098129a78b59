//! Algebraic invariants that should hold regardless of which instruction
//! produced a given state: exchange involutions, stack round-trips, and
//! the memory layout contract.

use proptest::prelude::*;
use z80emu::{Memory, Reg16, Reg8, RegisterFile, System};

#[test]
fn ex_af_af_prime_is_an_involution() {
    let mut regs = RegisterFile::new(0x0000);
    regs.set16(Reg16::Af, 0x1234);
    let before = regs.get16(Reg16::Af);
    regs.exchange_af();
    regs.exchange_af();
    assert_eq!(regs.get16(Reg16::Af), before);
}

#[test]
fn exx_is_an_involution_over_bc_de_hl() {
    let mut regs = RegisterFile::new(0x0000);
    regs.set16(Reg16::Bc, 0x1111);
    regs.set16(Reg16::De, 0x2222);
    regs.set16(Reg16::Hl, 0x3333);
    let (bc, de, hl) = (regs.get16(Reg16::Bc), regs.get16(Reg16::De), regs.get16(Reg16::Hl));
    regs.exchange();
    regs.exchange();
    assert_eq!((regs.get16(Reg16::Bc), regs.get16(Reg16::De), regs.get16(Reg16::Hl)), (bc, de, hl));
}

#[test]
fn push_then_pop_restores_value_and_sp() {
    let mut system = System::new(0x10000, 0x0100, false);
    system.registers.sp = 0xF000;
    system.registers.set16(Reg16::Bc, 0xBEEF);

    // PUSH BC; POP DE
    system.memory.set_range(0x0100, &[0xC5, 0xD1, 0xC9]).unwrap();
    system.execute_instruction();
    system.execute_instruction();

    assert_eq!(system.registers.get16(Reg16::De), 0xBEEF);
    assert_eq!(system.registers.sp, 0xF000);
}

#[test]
fn cpl_twice_restores_a() {
    let mut system = System::new(0x10000, 0x0100, false);
    system.registers.set8(Reg8::A, 0x3C);
    system.memory.set_range(0x0100, &[0x2F, 0x2F]).unwrap();

    system.execute_instruction();
    assert_eq!(system.registers.get8(Reg8::A), !0x3C);
    system.execute_instruction();
    assert_eq!(system.registers.get8(Reg8::A), 0x3C);

    let f = system.registers.get8(Reg8::F);
    assert_ne!(f & z80emu_tables::H_MASK, 0);
    assert_ne!(f & z80emu_tables::N_MASK, 0);
}

proptest! {
    #[test]
    fn memory_byte_round_trips(addr in 0u16..0xFFFF, value in any::<u8>()) {
        let mut mem = Memory::new(0x10000);
        mem.set_byte(addr, value);
        prop_assert_eq!(mem.get_byte(addr), value);
    }

    #[test]
    fn memory_word_matches_byte_layout(addr in 0u16..0xFFFE, value in any::<u16>()) {
        let mut mem = Memory::new(0x10000);
        mem.set_word(addr, value);
        prop_assert_eq!(mem.get_byte(addr), (value & 0xFF) as u8);
        prop_assert_eq!(mem.get_byte(addr.wrapping_add(1)), (value >> 8) as u8);
        prop_assert_eq!(mem.get_word(addr), value);
    }
}
