//! The [CffWrite] trait and the writer that drives it.

use std::io;

use font_types::Uint24;

use crate::{
    error::Error,
    options::CffOptions,
    strings::{StringId, StringTable},
};

/// A type that can be written out as part of a CFF font.
pub(crate) trait CffWrite {
    /// Write our data into this [CffWriter].
    fn write_into(&self, writer: &mut CffWriter);
}

/// A destination for bytes that tracks how many have been written.
///
/// Writing never fails directly; a sink that can fail records the first
/// failure and reports it from [`check_io`](Sink::check_io).
pub(crate) trait Sink {
    fn write_slice(&mut self, bytes: &[u8]);

    /// The number of bytes written so far.
    fn position(&self) -> u32;

    fn check_io(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// A sink that discards its input and only counts it.
#[derive(Clone, Debug, Default)]
pub(crate) struct PositionOnly {
    position: u32,
}

impl Sink for PositionOnly {
    fn write_slice(&mut self, bytes: &[u8]) {
        self.position += bytes.len() as u32;
    }

    fn position(&self) -> u32 {
        self.position
    }
}

/// A sink that forwards to an [`io::Write`].
pub(crate) struct StreamSink<W> {
    inner: W,
    position: u32,
    error: Option<io::Error>,
}

impl<W: io::Write> StreamSink<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            position: 0,
            error: None,
        }
    }

    pub(crate) fn finish(mut self) -> Result<W, Error> {
        self.check_io()?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: io::Write> Sink for StreamSink<W> {
    fn write_slice(&mut self, bytes: &[u8]) {
        if self.error.is_none() {
            if let Err(e) = self.inner.write_all(bytes) {
                self.error = Some(e);
            }
        }
        self.position += bytes.len() as u32;
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn check_io(&mut self) -> Result<(), Error> {
        match self.error.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

enum Strings<'a> {
    Interning(&'a mut StringTable),
    Frozen(&'a StringTable),
}

/// Writes font data to a [Sink], resolving strings as it goes.
///
/// A writer either enters every string it sees into its table (while a
/// font is being prepared) or requires them all to be present already
/// (during layout).
pub(crate) struct CffWriter<'a> {
    sink: &'a mut dyn Sink,
    strings: Strings<'a>,
    options: CffOptions,
}

impl<'a> CffWriter<'a> {
    pub(crate) fn interning(
        sink: &'a mut dyn Sink,
        strings: &'a mut StringTable,
        options: CffOptions,
    ) -> Self {
        Self {
            sink,
            strings: Strings::Interning(strings),
            options,
        }
    }

    pub(crate) fn frozen(
        sink: &'a mut dyn Sink,
        strings: &'a StringTable,
        options: CffOptions,
    ) -> Self {
        Self {
            sink,
            strings: Strings::Frozen(strings),
            options,
        }
    }

    pub(crate) fn options(&self) -> &CffOptions {
        &self.options
    }

    #[inline]
    pub(crate) fn write_slice(&mut self, bytes: &[u8]) {
        self.sink.write_slice(bytes)
    }

    /// The number of bytes written so far.
    pub(crate) fn position(&self) -> u32 {
        self.sink.position()
    }

    /// Reports a failure of the underlying sink, if any.
    pub(crate) fn check_io(&mut self) -> Result<(), Error> {
        self.sink.check_io()
    }

    /// Writes an offset using `off_size` bytes.
    pub(crate) fn write_offset(&mut self, offset: u32, off_size: u8) {
        match off_size {
            1 => (offset as u8).write_into(self),
            2 => (offset as u16).write_into(self),
            3 => Uint24::new(offset).write_into(self),
            _ => offset.write_into(self),
        }
    }

    /// Resolves a string to its identifier.
    pub(crate) fn sid(&mut self, bytes: &[u8]) -> Result<StringId, Error> {
        match &mut self.strings {
            Strings::Interning(table) => table.sid(bytes),
            Strings::Frozen(table) => table.require(bytes),
        }
    }
}

macro_rules! write_be_bytes {
    ($ty:ty) => {
        impl CffWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut CffWriter) {
                writer.write_slice(&self.to_be_bytes())
            }
        }
    };
}

write_be_bytes!(u8);
write_be_bytes!(u16);
write_be_bytes!(u32);
write_be_bytes!(Uint24);

impl CffWrite for StringId {
    fn write_into(&self, writer: &mut CffWriter) {
        self.to_u16().write_into(writer)
    }
}

impl<T: CffWrite> CffWrite for [T] {
    fn write_into(&self, writer: &mut CffWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

/// Measures the encoded size of an object.
#[cfg(test)]
pub(crate) fn measure<T: CffWrite + ?Sized>(obj: &T) -> u32 {
    let mut sink = PositionOnly::default();
    let table = StringTable::default();
    let mut writer = CffWriter::frozen(&mut sink, &table, CffOptions::default());
    obj.write_into(&mut writer);
    writer.position()
}
