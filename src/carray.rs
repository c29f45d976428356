use std::io::{Read, Write};

use tracing::debug;

use crate::constants::{DATA_BEGIN, DATA_DECL, DATA_END, DATA_PREFIX, DEFAULT_WRAP_WIDTH};
use crate::error::EmbedError;
use crate::output::OutputBuffer;
use crate::stream::ByteStream;

/// Renders bytes as a `static const unsigned char` array definition.
///
/// ```text
/// static const unsigned char a_bin[] = {
///         0x00, 0xff, 0x10,
/// };
/// ```
///
/// A new line is started before a token once the current line holds
/// `wrap_width` tokens, so the body never ends with an empty line.
#[derive(Debug, Clone, Copy)]
pub struct HexArray {
    wrap_width: usize,
}

impl Default for HexArray {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH)
    }
}

impl HexArray {
    pub fn new(wrap_width: usize) -> Self {
        assert!(wrap_width > 0, "wrap width must be non-zero");

        Self { wrap_width }
    }

    /// Writes a complete declaration for everything left in `stream`.
    pub fn write_declaration<R, W>(
        &self,
        identifier: &[u8],
        stream: &mut ByteStream<'_, R>,
        out: &mut OutputBuffer<W>,
    ) -> Result<u64, EmbedError>
    where
        R: Read,
        W: Write,
    {
        self.write_prologue(identifier, out)?;

        let mut body = Body::new(self.wrap_width);
        while let Some(chunk) = stream.next_chunk()? {
            body.write(chunk, out)?;
        }

        out.write(DATA_END)?;
        out.mark_boundary();

        debug!(
            path = %stream.path().display(),
            identifier = %String::from_utf8_lossy(identifier),
            bytes = body.total,
            "embedded file"
        );

        Ok(body.total)
    }

    fn write_prologue<W>(&self, identifier: &[u8], out: &mut OutputBuffer<W>) -> Result<(), EmbedError>
    where
        W: Write,
    {
        out.write(DATA_DECL)?;
        out.write(identifier)?;
        out.write(DATA_BEGIN)
    }
}

/// Line-wrapping state carried across chunks of one declaration.
struct Body {
    wrap_width: usize,
    on_line: usize,
    total: u64,
}

impl Body {
    fn new(wrap_width: usize) -> Self {
        Self {
            wrap_width,
            on_line: 0,
            total: 0,
        }
    }

    fn write<W>(&mut self, bytes: &[u8], out: &mut OutputBuffer<W>) -> Result<(), EmbedError>
    where
        W: Write,
    {
        let mut token = *b" 0x00,";

        for &byte in bytes {
            if self.on_line == self.wrap_width {
                out.write(b"\n")?;
                self.on_line = 0;
            }
            if self.on_line == 0 {
                out.write(DATA_PREFIX)?;
            }
            self.on_line += 1;

            hex::encode_to_slice([byte], &mut token[3..5])
                .expect("one byte encodes to two hex digits");
            out.write(&token)?;
        }

        self.total += bytes.len() as u64;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use proptest::prelude::*;

    use super::*;

    fn render(format: HexArray, identifier: &str, bytes: &[u8]) -> String {
        let mut scratch = [0u8; 64];
        let mut stream = ByteStream::new(Cursor::new(bytes), Path::new("mem"), &mut scratch);
        let mut out = OutputBuffer::with_capacity(Vec::new(), 16);

        format.write_declaration(identifier.as_bytes(), &mut stream, &mut out).unwrap();
        String::from_utf8(out.finish().unwrap()).unwrap()
    }

    fn render_streamed(format: HexArray, chunk_size: usize, bytes: &[u8]) -> String {
        let mut scratch = vec![0u8; chunk_size];
        let mut stream = ByteStream::new(Cursor::new(bytes), Path::new("mem"), &mut scratch);
        let mut out = OutputBuffer::with_capacity(Vec::new(), 7);

        let total = format.write_declaration(b"data", &mut stream, &mut out).unwrap();
        assert_eq!(total, bytes.len() as u64);

        String::from_utf8(out.finish().unwrap()).unwrap()
    }

    /// Pulls the `0x..` tokens back out of a declaration body.
    fn parse_body(text: &str) -> Vec<u8> {
        let start = text.find("{\n").unwrap() + 2;
        let end = text.rfind("\n};\n").unwrap();

        text[start..end]
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| u8::from_str_radix(token.strip_prefix("0x").unwrap(), 16).unwrap())
            .collect()
    }

    #[test]
    fn renders_small_file() {
        assert_eq!(
            render(HexArray::default(), "a_bin", &[0x00, 0xff, 0x10]),
            "static const unsigned char a_bin[] = {\n        0x00, 0xff, 0x10,\n};\n"
        );
    }

    #[test]
    fn empty_input_has_empty_body() {
        assert_eq!(
            render(HexArray::default(), "empty", &[]),
            "static const unsigned char empty[] = {\n\n};\n"
        );
    }

    #[test]
    fn wraps_after_width_tokens() {
        let text = render(HexArray::new(2), "w", &[1, 2, 3, 4, 5]);
        assert_eq!(
            text,
            "static const unsigned char w[] = {\n\
             \x20       0x01, 0x02,\n\
             \x20       0x03, 0x04,\n\
             \x20       0x05,\n\
             };\n"
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_wrap() {
        let bytes = vec![0xabu8; 3 * DEFAULT_WRAP_WIDTH];
        let text = render(HexArray::default(), "full", &bytes);

        let body = &text[text.find("{\n").unwrap() + 2..text.rfind("\n};\n").unwrap()];
        let lines: Vec<&str> = body.split('\n').collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert!(line.starts_with("        0x"));
            assert_eq!(line.matches("0xab,").count(), DEFAULT_WRAP_WIDTH);
        }
    }

    #[test]
    fn hex_digits_are_lowercase_and_padded() {
        let text = render(HexArray::default(), "d", &[0x0a, 0xbc, 0x7f]);
        assert!(text.contains(" 0x0a, 0xbc, 0x7f,"));
    }

    #[test]
    fn chunk_size_does_not_change_output() {
        let bytes: Vec<u8> = (0..=255).cycle().take(1000).collect();
        let expected = render(HexArray::new(13), "data", &bytes);

        for chunk_size in [1, 13, 64, 999, 1000, 4096] {
            assert_eq!(render_streamed(HexArray::new(13), chunk_size, &bytes), expected);
        }
    }

    proptest! {
        #[test]
        fn body_round_trips(bytes in prop::collection::vec(any::<u8>(), 0..600), width in 1usize..80) {
            let text = render(HexArray::new(width), "rt", &bytes);
            prop_assert_eq!(parse_body(&text), bytes.clone());

            let lines = text.lines().count();
            let body_lines = bytes.len().div_ceil(width).max(1);
            prop_assert_eq!(lines, body_lines + 2);
        }

        #[test]
        fn streamed_body_round_trips(bytes in prop::collection::vec(any::<u8>(), 0..600), chunk in 1usize..100) {
            let text = render_streamed(HexArray::default(), chunk, &bytes);
            prop_assert_eq!(parse_body(&text), bytes);
        }
    }
}
