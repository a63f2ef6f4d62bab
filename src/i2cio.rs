use i2c_linux::{
    I2c, Message, ReadFlags, WriteFlags,
};
use embedded_hal::delay::DelayNs;
use log::trace;
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::{thread, time};

// -- the primitives a two-wire bus has to offer to the register helpers below
pub trait TwoWireBus {
    fn begin_transmission(&mut self, device_addr: u16) -> Result<(), std::io::Error>;
    fn write(&mut self, data: u8) -> Result<(), std::io::Error>;
    fn end_transmission(&mut self) -> Result<(), std::io::Error>;
    fn request_from(&mut self, device_addr: u16, count: usize) -> Result<(), std::io::Error>;
    fn read(&mut self) -> Result<u8, std::io::Error>;
}

#[derive(Debug, Default)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, nano_secs: u32) {
        let delay = time::Duration::from_nanos(nano_secs as u64);
        thread::sleep(delay);
    }

    fn delay_ms(&mut self, milli_secs: u32) {
        let delay = time::Duration::from_millis(milli_secs as u64);
        thread::sleep(delay);
    }
}

// -- bytes written between begin and end of a transmission go out as one write
// -- message, request_from issues one read message and queues the bytes for read
pub struct LinuxI2cBus {
    i2c: I2c<File>,
    tx_addr: Option<u16>,
    tx_buf: Vec<u8>,
    rx_buf: VecDeque<u8>,
}

impl LinuxI2cBus {
    pub fn new(bus_path: &Path) -> Result<LinuxI2cBus, std::io::Error> {
        let i2c = get_bus(bus_path)?;
        Ok(LinuxI2cBus {
            i2c,
            tx_addr: None,
            tx_buf: Vec::new(),
            rx_buf: VecDeque::new(),
        })
    }
}

impl TwoWireBus for LinuxI2cBus {
    fn begin_transmission(&mut self, device_addr: u16) -> Result<(), std::io::Error> {
        self.tx_addr = Some(device_addr);
        self.tx_buf.clear();
        Ok(())
    }

    fn write(&mut self, data: u8) -> Result<(), std::io::Error> {
        if self.tx_addr.is_none() {
            return Err(std::io::Error::other("write outside of a transmission"))
        }
        self.tx_buf.push(data);
        Ok(())
    }

    fn end_transmission(&mut self) -> Result<(), std::io::Error> {
        let device_addr = match self.tx_addr.take() {
            Some(device_addr) => device_addr,
            None => return Err(std::io::Error::other("no transmission in progress")),
        };
        let write_message = Message::Write { address: device_addr, data: &self.tx_buf, flags: WriteFlags::empty() };
        let mut messages = [write_message];
        let result = self.i2c.i2c_transfer(&mut messages);
        self.tx_buf.clear();
        result
    }

    fn request_from(&mut self, device_addr: u16, count: usize) -> Result<(), std::io::Error> {
        let mut data = vec![0u8; count];
        let read_message = Message::Read { address: device_addr, data: &mut data, flags: ReadFlags::empty() };
        let mut messages = [read_message];
        self.i2c.i2c_transfer(&mut messages)?;
        self.rx_buf.extend(data);
        Ok(())
    }

    fn read(&mut self) -> Result<u8, std::io::Error> {
        self.rx_buf.pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no byte left from last request")
        })
    }
}

pub fn get_bus(bus_path: &Path)  -> Result<I2c<File>, std::io::Error> {
    I2c::from_path(bus_path)
}

pub fn write_register<B: TwoWireBus>(bus: &mut B, device_addr: u16, register: u8, data: u8) -> Result<(), std::io::Error> {
    trace!("Writing {data:#04x} to register {register:#04x}");
    bus.begin_transmission(device_addr)?;
    bus.write(register)?;
    bus.write(data)?;
    bus.end_transmission()
}

fn select_register<B: TwoWireBus>(bus: &mut B, device_addr: u16, register: u8) -> Result<(), std::io::Error> {
    bus.begin_transmission(device_addr)?;
    bus.write(register)?;
    bus.end_transmission()
}

pub fn read_byte<B: TwoWireBus>(bus: &mut B, device_addr: u16, register: u8) -> Result<u8, std::io::Error> {
    select_register(bus, device_addr, register)?;
    bus.request_from(device_addr, 1)?;
    bus.read()
}

// -- big endian, first byte on the wire is the msb
pub fn read_word<B: TwoWireBus>(bus: &mut B, device_addr: u16, register: u8) -> Result<u16, std::io::Error> {
    select_register(bus, device_addr, register)?;
    bus.request_from(device_addr, 2)?;
    let msb = bus.read()?;
    let lsb = bus.read()?;
    Ok(concat_bytes(msb, lsb))
}

pub fn read_signed_word<B: TwoWireBus>(bus: &mut B, device_addr: u16, register: u8) -> Result<i16, std::io::Error> {
    let val = read_word(bus, device_addr, register)?;
    Ok(val as i16)
}

pub fn concat_bytes(msb: u8, lsb: u8) -> u16 {
    ((msb as u16) << 8) | (lsb as u16)
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;

    // -- register map device: a one byte write selects a register, longer
    // -- writes store data starting at the selected register
    #[derive(Debug, Default)]
    pub struct MockBus {
        pub regs: HashMap<u8, u8>,
        pub writes: Vec<(u8, u8)>,
        pub addresses: Vec<u16>,
        pub responding: bool,
        // -- (register, value) written -> (start register, data) that appears
        pub triggers: Vec<((u8, u8), (u8, Vec<u8>))>,
        pointer: u8,
        tx: Vec<u8>,
        rx: VecDeque<u8>,
    }

    impl MockBus {
        pub fn new() -> MockBus {
            MockBus { responding: true, ..Default::default() }
        }

        pub fn set_regs(&mut self, start: u8, data: &[u8]) {
            for (i, byte) in data.iter().enumerate() {
                self.regs.insert(start.wrapping_add(i as u8), *byte);
            }
        }

        fn check(&self) -> Result<(), std::io::Error> {
            match self.responding {
                true => Ok(()),
                false => Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "no ack from device")),
            }
        }
    }

    impl TwoWireBus for MockBus {
        fn begin_transmission(&mut self, device_addr: u16) -> Result<(), std::io::Error> {
            self.addresses.push(device_addr);
            self.tx.clear();
            Ok(())
        }

        fn write(&mut self, data: u8) -> Result<(), std::io::Error> {
            self.tx.push(data);
            Ok(())
        }

        fn end_transmission(&mut self) -> Result<(), std::io::Error> {
            self.check()?;
            let tx = std::mem::take(&mut self.tx);
            if let Some((register, data)) = tx.split_first() {
                self.pointer = *register;
                if let Some(value) = data.first() {
                    self.writes.push((*register, *value));
                    self.set_regs(*register, data);
                    let updates: Vec<(u8, Vec<u8>)> = self.triggers.iter()
                        .filter(|(cause, _)| *cause == (*register, *value))
                        .map(|(_, update)| update.clone())
                        .collect();
                    for (start, update) in updates {
                        self.set_regs(start, &update);
                    }
                }
            }
            Ok(())
        }

        fn request_from(&mut self, device_addr: u16, count: usize) -> Result<(), std::io::Error> {
            self.check()?;
            self.addresses.push(device_addr);
            for i in 0..count {
                let register = self.pointer.wrapping_add(i as u8);
                self.rx.push_back(*self.regs.get(&register).unwrap_or(&0));
            }
            Ok(())
        }

        fn read(&mut self) -> Result<u8, std::io::Error> {
            self.rx.pop_front().ok_or_else(|| std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
        }
    }

    #[derive(Debug, Default)]
    pub struct MockDelay {
        pub delays: Vec<u32>,
    }

    // -- records whole milliseconds, finer delays are rounded up
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, nano_secs: u32) {
            self.delays.push(nano_secs.div_ceil(1_000_000));
        }

        fn delay_ms(&mut self, milli_secs: u32) {
            self.delays.push(milli_secs);
        }
    }
}
