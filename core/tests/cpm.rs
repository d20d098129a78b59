//! Exercises the optional CP/M BDOS stub (`CALL 0x0005`) in isolation from
//! the full ZEXALL harness: single-character output (`C=2`), `$`-terminated
//! string output (`C=9`), and the fallback message for an unhandled call.

use z80emu::{BufferWriter, NullPorts, Reg8, Reg16, System};

fn system_with_cpm_stub() -> System<NullPorts, BufferWriter> {
    System::with_collaborators(0x10000, 0x0100, true, NullPorts, BufferWriter::default())
}

#[test]
fn bdos_function_2_prints_one_character() {
    let mut system = system_with_cpm_stub();
    system.registers.set8(Reg8::C, 2);
    system.registers.set8(Reg8::E, b'!');

    // CALL 0x0005 ; HALT
    system.memory.set_range(0x0100, &[0xCD, 0x05, 0x00, 0x76]).unwrap();
    while system.running {
        system.execute_instruction();
    }

    assert_eq!(system.bdos_writer.buffer, b"!");
}

#[test]
fn bdos_function_9_prints_dollar_terminated_string() {
    let mut system = system_with_cpm_stub();
    system.registers.set8(Reg8::C, 9);
    system.registers.set16(Reg16::De, 0x0200);
    system.memory.set_range(0x0200, b"Hello$").unwrap();

    system.memory.set_range(0x0100, &[0xCD, 0x05, 0x00, 0x76]).unwrap();
    while system.running {
        system.execute_instruction();
    }

    assert_eq!(system.bdos_writer.buffer, b"Hello");
}

#[test]
fn bdos_unhandled_function_reports_its_code() {
    let mut system = system_with_cpm_stub();
    system.registers.set8(Reg8::C, 0x42);

    system.memory.set_range(0x0100, &[0xCD, 0x05, 0x00, 0x76]).unwrap();
    while system.running {
        system.execute_instruction();
    }

    assert_eq!(system.bdos_writer.buffer, b"Unhandled BDOS call 42");
}

#[test]
fn execution_continues_normally_after_the_stub() {
    let mut system = system_with_cpm_stub();
    system.registers.set8(Reg8::C, 2);
    system.registers.set8(Reg8::E, b'x');

    // CALL 0x0005 ; LD A,0x99 ; HALT
    system.memory.set_range(0x0100, &[0xCD, 0x05, 0x00, 0x3E, 0x99, 0x76]).unwrap();
    while system.running {
        system.execute_instruction();
    }

    assert_eq!(system.registers.get8(Reg8::A), 0x99);
    assert_eq!(system.bdos_writer.buffer, b"x");
}
