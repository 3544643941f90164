use crate::prelude::UtilResult;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Formatter producing the text layout the downstream consumer was built
/// against: `", "` and `": "` separators, ASCII-only output with `\uXXXX`
/// escapes, and floats that always carry a fraction or an exponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumerFormatter;

impl Formatter for ConsumerFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.write_f64(writer, f64::from(value))
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0_u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip text for a float: positional notation for decimal
/// exponents in `-4..16`, scientific with a signed two-digit exponent
/// otherwise (`1e-05`, `1e+16`).
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let positional = value.to_string();
        if positional.contains('.') {
            positional
        } else {
            format!("{}.0", positional)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Encodes any serializable value with [`ConsumerFormatter`].
pub fn dumps<T: Serialize + ?Sized>(value: &T) -> UtilResult<String> {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, ConsumerFormatter);
    value.serialize(&mut serializer)?;
    // Every byte written is ASCII.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
