//! Concrete end-to-end traces: load a short program at `0x0100`, run a
//! fixed number of steps, and check the resulting register/memory state
//! against independently-known-good values.

use z80emu::{Reg16, Reg8, System};

fn run_steps(program: &[u8], steps: usize) -> System {
    let mut system = System::new(0x10000, 0x0100, false);
    system.memory.set_range(0x0100, program).unwrap();
    for _ in 0..steps {
        system.execute_instruction();
    }
    system
}

#[test]
fn exx_and_ex_af_swap_registers() {
    let program = [
        0x3E, 0x03, 0x01, 0x05, 0x04, 0x11, 0x07, 0x06, 0x21, 0x09, 0x08, 0xDD, 0x21, 0x0B, 0x0A,
        0xFD, 0x21, 0x0D, 0x0C, 0xD9, 0x3E, 0x00, 0x01, 0xEE, 0xFF, 0x11, 0xCC, 0xDD, 0x21, 0xAA,
        0xBB, 0xC9,
    ];
    let system = run_steps(&program, 12);

    assert_eq!(system.registers.get8(Reg8::A), 0x00);
    assert_eq!(system.registers.get16(Reg16::Bc), 0xFFEE);
    assert_eq!(system.registers.get16(Reg16::De), 0xDDCC);
    assert_eq!(system.registers.get16(Reg16::Hl), 0xBBAA);
    assert_eq!(system.registers.get16(Reg16::Ix), 0x0A0B);
    assert_eq!(system.registers.get16(Reg16::Iy), 0x0C0D);
    assert_eq!(system.registers.alt.a(), 0x00);
    assert_eq!(system.registers.alt.bc(), 0x0405);
    assert_eq!(system.registers.alt.de(), 0x0607);
    assert_eq!(system.registers.alt.hl(), 0x0809);
}

#[test]
fn dec_from_zero_sets_borrow_flags() {
    let program = [0x16, 0x00, 0x15, 0xC9];
    let system = run_steps(&program, 3);

    assert_eq!(system.registers.get8(Reg8::F), 0xBB);
    assert_eq!(system.registers.get8(Reg8::D), 0xFF);
}

#[test]
fn daa_after_add_and_sub_chains() {
    let program = [
        0x3E, 0x37, 0x37, 0x27, 0xF5, 0xC1, 0x3E, 0x37, 0x3F, 0x27, 0xF5, 0xD1, 0x97, 0x3E, 0x99,
        0x27, 0xC9,
    ];
    let system = run_steps(&program, 14);

    assert_eq!(system.registers.get8(Reg8::A), 0x99);
    assert_eq!(system.registers.get8(Reg8::F), 0x8E);
    assert_eq!(system.registers.get16(Reg16::Bc), 0x9781);
    assert_eq!(system.registers.get16(Reg16::De), 0x3D28);
}

#[test]
fn arithmetic_mix_of_add_adc_sub() {
    let program = [
        0x3E, 0x0F, 0x1E, 0x12, 0xAB, 0xF5, 0xE1, 0x3E, 0x18, 0x06, 0xFE, 0x0E, 0x03, 0x80, 0x89,
        0x0E, 0x05, 0x91, 0x0E, 0x01, 0x37, 0x99, 0xC9,
    ];
    let system = run_steps(&program, 16);

    assert_eq!(system.registers.get8(Reg8::A), 0x13);
    assert_eq!(system.registers.get8(Reg8::F), 0x02);
    assert_eq!(system.registers.get16(Reg16::Hl), 0x1D0C);
}

#[test]
fn cpir_finds_a_matching_byte() {
    let program = [
        0x3E, 0x43, 0x01, 0x03, 0x00, 0x21, 0x0B, 0x01, 0xED, 0xB1, 0xC9, 0x42, 0x43, 0x44,
    ];
    let system = run_steps(&program, 5);

    assert_eq!(system.registers.get8(Reg8::A), 0x43);
    assert_eq!(system.registers.get8(Reg8::F), 0x47);
    assert_eq!(system.registers.get16(Reg16::Bc), 0x0001);
    assert_eq!(system.registers.get16(Reg16::Hl), 0x010D);
}

#[test]
fn ldir_copies_a_block() {
    let program = [
        0x01, 0x02, 0x00, 0x21, 0x0F, 0x01, 0x11, 0x11, 0x01, 0xED, 0xB0, 0x3A, 0x11, 0x01, 0xC9,
        0x42, 0x43, 0x00, 0x00,
    ];
    let system = run_steps(&program, 6);

    assert_eq!(system.registers.get8(Reg8::A), 0x42);
    assert_eq!(system.registers.get16(Reg16::Bc), 0x0000);
    assert_eq!(system.registers.get16(Reg16::De), 0x0113);
    assert_eq!(system.registers.get16(Reg16::Hl), 0x0111);
    assert_eq!(system.memory.get_byte(0x0111), 0x42);
    assert_eq!(system.memory.get_byte(0x0112), 0x43);
}
