//! XML tree encoding
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <measurements>
//!   <measurement>
//!     <voltage>1.5</voltage>
//!     <current>0.25</current>
//!   </measurement>
//! </measurements>
//! ```

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{Measurement, StorageError};

const ROOT: &str = "measurements";
const RECORD: &str = "measurement";
const VOLTAGE: &str = "voltage";
const CURRENT: &str = "current";

const INDENT: usize = 2;

#[derive(Debug, Clone, Copy)]
enum Leaf {
    Voltage,
    Current,
}

impl Leaf {
    fn name(self) -> &'static str {
        match self {
            Leaf::Voltage => VOLTAGE,
            Leaf::Current => CURRENT,
        }
    }
}

/// Shortest text that parses back to the same `f64` (`1.0`, `0.1`, `1e-7`)
pub(crate) fn format_decimal(value: f64) -> String {
    format!("{value:?}")
}

fn encode_failure(path: &Path, err: impl std::fmt::Display) -> StorageError {
    StorageError::io(path, std::io::Error::other(err.to_string()))
}

fn parse_leaf(path: &Path, leaf: Leaf, text: &str) -> Result<f64, StorageError> {
    text.trim().parse::<f64>().map_err(|_| {
        StorageError::corrupt(
            path,
            format!("<{}> value '{}' is not numeric", leaf.name(), text),
        )
    })
}

/// Declaration plus an empty root element
pub(crate) fn empty_document(path: &Path) -> Result<Vec<u8>, StorageError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| encode_failure(path, e))?;
    writer
        .write_event(Event::Empty(BytesStart::new(ROOT)))
        .map_err(|e| encode_failure(path, e))?;
    Ok(writer.into_inner())
}

pub(crate) fn decode(path: &Path, text: &str) -> Result<Vec<Measurement>, StorageError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut in_record = false;
    let mut leaf: Option<Leaf> = None;
    let mut voltage: Option<f64> = None;
    let mut current: Option<f64> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| StorageError::corrupt(path, e))?
        {
            Event::Start(e) => {
                depth += 1;
                match (depth, e.name().as_ref()) {
                    (1, name) if name == ROOT.as_bytes() => root_seen = true,
                    (1, name) => {
                        return Err(StorageError::corrupt(
                            path,
                            format!("unexpected root <{}>", String::from_utf8_lossy(name)),
                        ))
                    }
                    (2, name) if name == RECORD.as_bytes() => {
                        in_record = true;
                        voltage = None;
                        current = None;
                    }
                    (3, name) if in_record && name == VOLTAGE.as_bytes() => {
                        leaf = Some(Leaf::Voltage)
                    }
                    (3, name) if in_record && name == CURRENT.as_bytes() => {
                        leaf = Some(Leaf::Current)
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match (depth + 1, e.name().as_ref()) {
                (1, name) if name == ROOT.as_bytes() => root_seen = true,
                (2, name) if name == RECORD.as_bytes() => {
                    return Err(StorageError::corrupt(
                        path,
                        format!("<{RECORD}> #{} has no <{VOLTAGE}>", records.len()),
                    ))
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(l) = leaf {
                    let raw = t.unescape().map_err(|e| StorageError::corrupt(path, e))?;
                    let value = parse_leaf(path, l, &raw)?;
                    match l {
                        Leaf::Voltage => voltage = Some(value),
                        Leaf::Current => current = Some(value),
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    3 => leaf = None,
                    2 if in_record => {
                        in_record = false;
                        let missing = |name: &str| {
                            StorageError::corrupt(
                                path,
                                format!("<{RECORD}> #{} has no <{name}>", records.len()),
                            )
                        };
                        let voltage = voltage.take().ok_or_else(|| missing(VOLTAGE))?;
                        let current = current.take().ok_or_else(|| missing(CURRENT))?;
                        records.push(Measurement { voltage, current });
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(StorageError::corrupt(path, format!("missing <{ROOT}> root")));
    }
    Ok(records)
}

fn write_record<W: std::io::Write>(
    writer: &mut Writer<W>,
    path: &Path,
    m: &Measurement,
) -> Result<(), StorageError> {
    let voltage = format_decimal(m.voltage);
    let current = format_decimal(m.current);
    let events = [
        Event::Start(BytesStart::new(RECORD)),
        Event::Start(BytesStart::new(VOLTAGE)),
        Event::Text(BytesText::new(&voltage)),
        Event::End(BytesEnd::new(VOLTAGE)),
        Event::Start(BytesStart::new(CURRENT)),
        Event::Text(BytesText::new(&current)),
        Event::End(BytesEnd::new(CURRENT)),
        Event::End(BytesEnd::new(RECORD)),
    ];
    for event in events {
        writer
            .write_event(event)
            .map_err(|e| encode_failure(path, e))?;
    }
    Ok(())
}

/// Re-emit `text` with one more `<measurement>` as the last child of the root.
///
/// Everything already in the document, including elements this crate does not
/// know about, is carried through.
pub(crate) fn append(path: &Path, text: &str, m: &Measurement) -> Result<Vec<u8>, StorageError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    let mut depth = 0usize;
    let mut appended = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| StorageError::corrupt(path, e))?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                if depth == 1 && e.name().as_ref() == ROOT.as_bytes() {
                    write_record(&mut writer, path, m)?;
                    appended = true;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Empty(e) if depth == 0 && e.name().as_ref() == ROOT.as_bytes() => {
                writer
                    .write_event(Event::Start(e.clone()))
                    .map_err(|err| encode_failure(path, err))?;
                write_record(&mut writer, path, m)?;
                writer
                    .write_event(Event::End(BytesEnd::new(ROOT)))
                    .map_err(|err| encode_failure(path, err))?;
                appended = true;
                continue;
            }
            Event::Eof => break,
            _ => {}
        }
        writer
            .write_event(event)
            .map_err(|e| encode_failure(path, e))?;
    }

    if !appended {
        return Err(StorageError::corrupt(path, format!("missing <{ROOT}> root")));
    }
    Ok(writer.into_inner())
}
