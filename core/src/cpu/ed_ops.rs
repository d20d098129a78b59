//! The `0xED`-prefixed instruction space: 16-bit `ADC`/`SBC`, the absolute
//! load/store forms, `NEG`, `RRD`/`RLD`, `I`/`R` transfer, `IM`, and the
//! block transfer/compare/IO families (dispatched from here into
//! [`super::load_store`]).

use crate::ports::Ports;
use crate::registers::Reg8;

use super::{alu, control_flow, load_store, BdosWriter, System};

/// Dispatch a `0xED xx` opcode. Any byte this function doesn't recognize
/// is an undocumented `ED` no-op: real silicon treats unassigned `ED`
/// space as a multi-byte `NOP`, so (unlike a genuinely unimplemented
/// opcode elsewhere) this is not a fatal error.
pub(super) fn dispatch_ed(sys: &mut System<impl Ports, impl BdosWriter>) {
    let op = sys.fetch_byte();

    match op {
        0x47 => sys.registers.i = sys.registers.get8(Reg8::A),
        0x4F => sys.registers.r = sys.registers.get8(Reg8::A),
        0x57 => {
            let i = sys.registers.i;
            load_store::ld_a_i_or_r(sys, i);
        }
        0x5F => {
            let r = sys.registers.r;
            load_store::ld_a_i_or_r(sys, r);
        }

        0x67 => load_store::rrd(sys),
        0x6F => load_store::rld(sys),

        0x73 => control_flow::ld_mem_nn_sp(sys),
        0x7B => control_flow::ld_sp_mem_nn(sys),

        0xA0 => load_store::ldi(sys),
        0xA1 => load_store::cpi(sys),
        0xA8 => load_store::ldd(sys),
        0xA9 => load_store::cpd(sys),
        0xB0 => load_store::ldir(sys),
        0xB1 => load_store::cpir(sys),
        0xB8 => load_store::lddr(sys),
        0xB9 => load_store::cpdr(sys),

        0xA2 => load_store::ini(sys),
        0xAA => load_store::ind(sys),
        0xA3 => load_store::outi(sys),
        0xAB => load_store::outd(sys),
        0xB2 => load_store::inir(sys),
        0xBA => load_store::indr(sys),
        0xB3 => load_store::otir(sys),
        0xBB => load_store::otdr(sys),

        _ if op & 0xC7 == 0x44 => alu::neg(sys), // NEG + undocumented aliases
        _ if op & 0xC7 == 0x45 => control_flow::retn_reti(sys), // RETN/RETI
        _ if op & 0xC7 == 0x46 => sys.interrupt_mode = im_value(op),

        _ if op & 0xCF == 0x4A => {
            let rr = sys.decode_rr(op >> 4);
            alu::adc_hl(sys, rr);
        }
        _ if op & 0xCF == 0x42 => {
            let rr = sys.decode_rr(op >> 4);
            alu::sbc_hl(sys, rr);
        }
        _ if op & 0xCF == 0x43 => {
            let rr = sys.decode_rr(op >> 4);
            load_store::ld_mem_nn_rr(sys, rr);
        }
        _ if op & 0xCF == 0x4B => {
            let rr = sys.decode_rr(op >> 4);
            load_store::ld_rr_mem_nn(sys, rr);
        }

        _ if op & 0xC7 == 0x41 => {
            // OUT (C),r; the undocumented "OUT (C),0" encoding (r=6)
            // outputs the constant 0.
            let r_bits = (op >> 3) & 0x07;
            let value = if r_bits == 6 {
                0
            } else {
                let operand = sys.decode_r8(r_bits);
                sys.get_operand8(operand)
            };
            let port = sys.registers.get8(Reg8::C);
            sys.ports.output(port, value);
        }
        _ if op & 0xC7 == 0x40 => {
            // IN r,(C); sets flags from the value read. r=6 (undocumented)
            // discards the result but still sets flags.
            let port = sys.registers.get8(Reg8::C);
            let a = sys.registers.get8(Reg8::A);
            let value = sys.ports.input(port, a);
            let r_bits = (op >> 3) & 0x07;
            if r_bits != 6 {
                let operand = sys.decode_r8(r_bits);
                sys.set_operand8(operand, value);
            }
            let mut f = z80emu_tables::tables().szp[value as usize];
            f |= sys.registers.carry();
            sys.registers.set8(Reg8::F, f);
        }

        _ => {
            log::trace!("undocumented ED no-op: {op:#04x}");
        }
    }
}

fn im_value(op: u8) -> u8 {
    match (op >> 3) & 0x03 {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => unreachable!(),
    }
}
