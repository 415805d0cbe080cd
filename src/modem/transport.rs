//! Line-oriented modem transport.
//!
//! The link state machine only needs three things from the wire: send a
//! command, read one line with a timeout, and change that timeout.  A read
//! that times out returns whatever arrived so far, which is an empty
//! buffer when the modem stayed silent.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

pub trait LineTransport {
    /// Write one command.  The caller supplies the terminator.
    fn write_command(&mut self, command: &[u8]) -> io::Result<()>;

    /// Read up to and including `\n`.  Empty on timeout with no data.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

/// Serial port adapter.
pub struct SerialLines {
    port: Box<dyn SerialPort>,
}

impl SerialLines {
    pub fn open(device: &str, baud: u32, timeout: Duration) -> io::Result<Self> {
        let port = serialport::new(device, baud)
            .timeout(timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()?;
        Ok(Self { port })
    }
}

impl LineTransport for SerialLines {
    fn write_command(&mut self, command: &[u8]) -> io::Result<()> {
        self.port.write_all(command)?;
        self.port.flush()
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        read_line_from(&mut self.port)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout)?;
        Ok(())
    }
}

/// Byte-at-a-time read so nothing past the `\n` is consumed.
fn read_line_from<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::with_capacity(64);
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(line),
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    return Ok(line);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(line),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
