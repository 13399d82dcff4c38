//! Console collaborators
//!
//! The engine never touches a stream itself. A host installs an input source and
//! an output sink in [`SharedState`] under [`INPUT`] and [`OUTPUT`]; instructions
//! that read or write look them up there at call time.

use crate::engine::errors::{FungeError, FungeResult};
use crate::ip::{SharedState, StateKey};
use std::io::{BufRead, Write};

/// Source of program input
pub trait FungeInput: Send {
    /// One raw code unit
    fn read_unit(&mut self) -> FungeResult<u8>;

    /// One whitespace-delimited token, parsed as a decimal integer
    fn read_integer(&mut self) -> FungeResult<i32>;
}

/// Sink for program output
pub trait FungeOutput: Send {
    fn write_unit(&mut self, unit: u8) -> FungeResult<()>;

    /// Decimal text followed by one space
    fn write_number(&mut self, value: i32) -> FungeResult<()>;

    fn flush(&mut self) -> FungeResult<()> {
        Ok(())
    }
}

pub const INPUT: StateKey<Box<dyn FungeInput>> = StateKey::new("stdin");
pub const OUTPUT: StateKey<Box<dyn FungeOutput>> = StateKey::new("stdout");

/// Register both collaborators
pub fn install(
    shared: &mut SharedState,
    input: impl FungeInput + 'static,
    output: impl FungeOutput + 'static,
) {
    let input: Box<dyn FungeInput> = Box::new(input);
    let output: Box<dyn FungeOutput> = Box::new(output);
    shared.insert(&INPUT, input);
    shared.insert(&OUTPUT, output);
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// [`FungeInput`] over any buffered reader
#[derive(Debug)]
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead + Send> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        ReaderInput { reader }
    }

    fn peek(&mut self) -> FungeResult<Option<u8>> {
        let buffer = self.reader.fill_buf()?;
        Ok(buffer.first().copied())
    }
}

impl<R: BufRead + Send> FungeInput for ReaderInput<R> {
    fn read_unit(&mut self) -> FungeResult<u8> {
        let unit = self.peek()?.ok_or(FungeError::UnexpectedEof)?;
        self.reader.consume(1);
        Ok(unit)
    }

    fn read_integer(&mut self) -> FungeResult<i32> {
        loop {
            match self.peek()? {
                None => return Err(FungeError::UnexpectedEof),
                Some(byte) if is_space(byte) => self.reader.consume(1),
                Some(_) => break,
            }
        }

        let mut token = Vec::new();
        while let Some(byte) = self.peek()? {
            if is_space(byte) {
                break;
            }
            token.push(byte);
            self.reader.consume(1);
        }

        let token = String::from_utf8_lossy(&token).into_owned();
        token
            .parse()
            .map_err(|_| FungeError::InputFormat { token })
    }
}

/// [`FungeOutput`] over any writer
#[derive(Debug)]
pub struct WriterOutput<W> {
    writer: W,
}

impl<W: Write + Send> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        WriterOutput { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> FungeOutput for WriterOutput<W> {
    fn write_unit(&mut self, unit: u8) -> FungeResult<()> {
        self.writer.write_all(&[unit])?;
        Ok(())
    }

    fn write_number(&mut self, value: i32) -> FungeResult<()> {
        write!(self.writer, "{} ", value)?;
        Ok(())
    }

    fn flush(&mut self) -> FungeResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn input(text: &str) -> ReaderInput<Cursor<Vec<u8>>> {
        ReaderInput::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_read_units_then_eof() {
        let mut source = input("ab");
        assert_eq!(source.read_unit().unwrap(), b'a');
        assert_eq!(source.read_unit().unwrap(), b'b');
        assert!(matches!(source.read_unit(), Err(FungeError::UnexpectedEof)));
    }

    #[test]
    fn test_read_integer_tokens() {
        let mut source = input("  12\n-7\t300");
        assert_eq!(source.read_integer().unwrap(), 12);
        assert_eq!(source.read_integer().unwrap(), -7);
        assert_eq!(source.read_integer().unwrap(), 300);
        assert!(matches!(
            source.read_integer(),
            Err(FungeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_read_integer_rejects_garbage() {
        let mut source = input("12x 4");
        match source.read_integer() {
            Err(FungeError::InputFormat { token }) => assert_eq!(token, "12x"),
            other => panic!("expected format error, got {:?}", other),
        }
        // The bad token is consumed.
        assert_eq!(source.read_integer().unwrap(), 4);
    }

    #[test]
    fn test_writer_output_format() {
        let mut sink = WriterOutput::new(Vec::new());
        sink.write_number(10).unwrap();
        sink.write_number(-3).unwrap();
        sink.write_unit(b'A').unwrap();
        assert_eq!(sink.into_inner(), b"10 -3 A".to_vec());
    }

    #[test]
    fn test_install_registers_both() {
        let mut shared = SharedState::new();
        install(&mut shared, input("1"), WriterOutput::new(Vec::new()));
        assert_eq!(shared.get_mut(&INPUT).unwrap().read_integer().unwrap(), 1);
        assert!(shared.contains(&OUTPUT));
    }
}
