//! Field layouts for the `read` command.
//!
//! A layout is a comma-separated list of items such as
//! `magic:89504e47,skip:4,u32be,align:4@8,i16le`.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use crimp::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Little,
    Big,
}

impl Order {
    fn suffix(self) -> &'static str {
        match self {
            Order::Little => "le",
            Order::Big => "be",
        }
    }
}

/// One layout item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    U8,
    I8,
    U16(Order),
    I16(Order),
    U32(Order),
    I32(Order),
    U64(Order),
    I64(Order),
    Skip(isize),
    Seek(usize),
    Align { stride: usize, base: isize },
    Magic(Vec<u8>),
    Bytes(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::U8 => write!(f, "u8"),
            Field::I8 => write!(f, "i8"),
            Field::U16(o) => write!(f, "u16{}", o.suffix()),
            Field::I16(o) => write!(f, "i16{}", o.suffix()),
            Field::U32(o) => write!(f, "u32{}", o.suffix()),
            Field::I32(o) => write!(f, "i32{}", o.suffix()),
            Field::U64(o) => write!(f, "u64{}", o.suffix()),
            Field::I64(o) => write!(f, "i64{}", o.suffix()),
            Field::Skip(n) => write!(f, "skip:{n}"),
            Field::Seek(n) => write!(f, "seek:{n}"),
            Field::Align { stride, base: 0 } => write!(f, "align:{stride}"),
            Field::Align { stride, base } => write!(f, "align:{stride}@{base}"),
            Field::Magic(bytes) => write!(f, "magic:{}", hex(bytes)),
            Field::Bytes(n) => write!(f, "bytes:{n}"),
        }
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(item: &str) -> Result<Self> {
        let item = item.trim();
        let (name, arg) = match item.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (item, None),
        };

        let field = match (name, arg) {
            ("u8", None) => Field::U8,
            ("i8", None) => Field::I8,
            ("u16le", None) => Field::U16(Order::Little),
            ("u16be", None) => Field::U16(Order::Big),
            ("i16le", None) => Field::I16(Order::Little),
            ("i16be", None) => Field::I16(Order::Big),
            ("u32le", None) => Field::U32(Order::Little),
            ("u32be", None) => Field::U32(Order::Big),
            ("i32le", None) => Field::I32(Order::Little),
            ("i32be", None) => Field::I32(Order::Big),
            ("u64le", None) => Field::U64(Order::Little),
            ("u64be", None) => Field::U64(Order::Big),
            ("i64le", None) => Field::I64(Order::Little),
            ("i64be", None) => Field::I64(Order::Big),
            ("skip", Some(arg)) => Field::Skip(parse_number(arg)?),
            ("seek", Some(arg)) => Field::Seek(parse_number(arg)?),
            ("bytes", Some(arg)) => Field::Bytes(parse_number(arg)?),
            ("magic", Some(arg)) => Field::Magic(parse_hex(arg)?),
            ("align", Some(arg)) => {
                let (stride, base) = match arg.split_once('@') {
                    Some((stride, base)) => (stride, parse_number::<isize>(base)?),
                    None => (arg, 0),
                };
                let stride: usize = parse_number(stride)?;
                if stride == 0 {
                    bail!("alignment stride must be non-zero");
                }
                Field::Align { stride, base }
            }
            _ => bail!("unknown layout item `{item}`"),
        };
        Ok(field)
    }
}

/// Parse a comma-separated layout.
pub fn parse_layout(layout: &str) -> Result<Vec<Field>> {
    layout
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| item.parse::<Field>().with_context(|| format!("invalid layout item `{item}`")))
        .collect()
}

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Hex(String),
    Position(usize),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "{v} ({v:#x})"),
            Value::Signed(v) => write!(f, "{v}"),
            Value::Hex(s) => write!(f, "{s}"),
            Value::Position(p) => write!(f, "-> {p}"),
        }
    }
}

/// One step of a walk: where it started, what ran, what came out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub offset: usize,
    pub field: String,
    pub value: Value,
}

/// Apply `layout` to `cursor`, handing each record to `emit`.
///
/// Stops at the first failing item.
pub fn walk(cursor: &mut ByteCursor<'_>, layout: &[Field], mut emit: impl FnMut(Record)) -> Result<()> {
    for (index, field) in layout.iter().enumerate() {
        let offset = cursor.tell();
        let value = apply(cursor, field)
            .with_context(|| format!("item {} `{}` at offset {}", index + 1, field, offset))?;
        emit(Record {
            offset,
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn apply(cursor: &mut ByteCursor<'_>, field: &Field) -> crimp::buffer::Result<Value> {
    use Order::{Big, Little};

    let value = match *field {
        Field::U8 => Value::Unsigned(cursor.read_u8()?.into()),
        Field::I8 => Value::Signed(cursor.read_i8()?.into()),
        Field::U16(Little) => Value::Unsigned(cursor.read_u16_le()?.into()),
        Field::U16(Big) => Value::Unsigned(cursor.read_u16_be()?.into()),
        Field::I16(Little) => Value::Signed(cursor.read_i16_le()?.into()),
        Field::I16(Big) => Value::Signed(cursor.read_i16_be()?.into()),
        Field::U32(Little) => Value::Unsigned(cursor.read_u32_le()?.into()),
        Field::U32(Big) => Value::Unsigned(cursor.read_u32_be()?.into()),
        Field::I32(Little) => Value::Signed(cursor.read_i32_le()?.into()),
        Field::I32(Big) => Value::Signed(cursor.read_i32_be()?.into()),
        Field::U64(Little) => Value::Unsigned(cursor.read_u64_le()?),
        Field::U64(Big) => Value::Unsigned(cursor.read_u64_be()?),
        Field::I64(Little) => Value::Signed(cursor.read_i64_le()?),
        Field::I64(Big) => Value::Signed(cursor.read_i64_be()?),
        Field::Skip(count) => {
            cursor.skip(count)?;
            Value::Position(cursor.tell())
        }
        Field::Seek(location) => {
            cursor.seek(location)?;
            Value::Position(cursor.tell())
        }
        Field::Align { stride, base } => {
            cursor.align_to_from(base, stride)?;
            Value::Position(cursor.tell())
        }
        Field::Magic(ref bytes) => {
            cursor.expect_magic(bytes)?;
            Value::Hex(hex(bytes))
        }
        Field::Bytes(count) => Value::Hex(hex(cursor.read_bytes(count)?)),
    };
    Ok(value)
}

fn parse_number<T: FromStr>(text: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse::<T>()
        .with_context(|| format!("invalid number `{text}`"))
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    if text.is_empty() || text.len() % 2 != 0 {
        bail!("hex literal `{text}` must have an even, non-zero number of digits");
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| anyhow!("invalid hex literal `{text}`"))
        })
        .collect()
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        let layout = parse_layout("magic:4D4D, u16be ,skip:-2,align:4@1,seek:0,bytes:3,i8").unwrap();

        assert_eq!(
            layout,
            vec![
                Field::Magic(vec![0x4D, 0x4D]),
                Field::U16(Order::Big),
                Field::Skip(-2),
                Field::Align { stride: 4, base: 1 },
                Field::Seek(0),
                Field::Bytes(3),
                Field::I8,
            ]
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for item in ["u32le", "i64be", "skip:-7", "align:8", "align:4@-2", "magic:cafe", "bytes:12"] {
            let field: Field = item.parse().unwrap();
            assert_eq!(field.to_string(), item);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_layout("u24le").is_err());
        assert!(parse_layout("skip").is_err());
        assert!(parse_layout("u8:3").is_err());
        assert!(parse_layout("align:0").is_err());
        assert!(parse_layout("magic:abc").is_err());
        assert!(parse_layout("magic:zz").is_err());
        assert!(parse_layout("seek:-1").is_err());
        assert!(parse_layout("").unwrap().is_empty());
    }

    #[test]
    fn test_walk() {
        let data = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0xFF, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        let layout = parse_layout("magic:4949,u16le,u32le,i16be").unwrap();

        let mut records = Vec::new();
        walk(&mut cursor, &layout, |r| records.push(r)).unwrap();

        let values: Vec<Value> = records.iter().map(|r| r.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                Value::Hex("4949".to_string()),
                Value::Unsigned(42),
                Value::Unsigned(8),
                Value::Signed(-1),
            ]
        );
        assert_eq!(records[2].offset, 4);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_walk_stops_at_first_failure() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&data);
        let layout = parse_layout("u16be,u16be,u8").unwrap();

        let mut records = Vec::new();
        let err = walk(&mut cursor, &layout, |r| records.push(r)).unwrap_err();

        assert_eq!(records.len(), 1);
        assert_eq!(cursor.tell(), 2);
        assert!(err.to_string().contains("item 2 `u16be` at offset 2"));
        let root = err.downcast_ref::<crimp::buffer::Error>().unwrap();
        assert!(root.is_out_of_range());
    }

    #[test]
    fn test_positioning_records() {
        let data = [0u8; 12];
        let mut cursor = ByteCursor::new(&data);
        let layout = parse_layout("u8,align:4,skip:-1,seek:11").unwrap();

        let mut records = Vec::new();
        walk(&mut cursor, &layout, |r| records.push(r)).unwrap();

        assert_eq!(records[1].value, Value::Position(4));
        assert_eq!(records[2].value, Value::Position(3));
        assert_eq!(records[3].value, Value::Position(11));
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x00, 0xAB, 0x0F]), "00ab0f");
        assert_eq!(parse_hex("00aB0f").unwrap(), vec![0x00, 0xAB, 0x0F]);
    }
}
