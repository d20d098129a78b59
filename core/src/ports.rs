/// The Z80's 8-bit I/O address space, kept as a trait so the CPU core
/// depends only on the functional contract and a host can wire up whatever
/// device model it likes.
pub trait Ports {
    /// `IN A,(port)` and the `IN r,(C)`/`INI`/`INIR` family. `a` is the
    /// accumulator's current value, which real hardware places on the
    /// upper half of the address bus alongside `port`.
    fn input(&mut self, port: u8, a: u8) -> u8;
    /// `OUT (port),A` and the `OUT (C),r`/`OUTI`/`OTIR` family.
    fn output(&mut self, port: u8, value: u8);
}

/// The default port implementation: reads return 0, writes are dropped.
/// Matches real hardware with nothing attached to the bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPorts;

impl Ports for NullPorts {
    fn input(&mut self, _port: u8, _a: u8) -> u8 {
        0
    }

    fn output(&mut self, _port: u8, _value: u8) {}
}

/// Wraps any `Ports` implementation and emits a trace line per access,
/// without altering behavior. Useful for diagnosing port traffic in a
/// ZEXALL-style harness where no device is actually attached.
pub struct LoggingPorts<P> {
    inner: P,
}

impl<P> LoggingPorts<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Ports> Ports for LoggingPorts<P> {
    fn input(&mut self, port: u8, a: u8) -> u8 {
        let value = self.inner.input(port, a);
        log::trace!("IN  ({port:#04x}) -> {value:#04x}");
        value
    }

    fn output(&mut self, port: u8, value: u8) {
        log::trace!("OUT ({port:#04x}) <- {value:#04x}");
        self.inner.output(port, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_ports_reads_zero_and_drops_writes() {
        let mut ports = NullPorts;
        assert_eq!(ports.input(0x42, 0xAA), 0);
        ports.output(0x42, 0xFF);
    }

    #[test]
    fn logging_ports_forwards_to_inner() {
        let mut ports = LoggingPorts::new(NullPorts);
        assert_eq!(ports.input(1, 0xAA), 0);
        ports.output(1, 7);
    }
}
