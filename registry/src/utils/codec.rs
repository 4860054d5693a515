use crate::error::DecodeError;
use crate::models::player::Player;
use anyhow::Result;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Format-agnostic decoded request body: field name to raw value.
///
/// JSON keeps its native value types; XML and form bodies only ever produce
/// strings. Coercion happens in the validator.
pub type Fields = serde_json::Map<String, Value>;

fn writer() -> Writer<Cursor<Vec<u8>>> {
    Writer::new(Cursor::new(Vec::new()))
}

fn finish(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    let result = writer.into_inner().into_inner();
    Ok(String::from_utf8(result)?)
}

fn write_declaration(writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

/// Writes `<tag>text</tag>`. quick-xml escapes the text for us.
fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Renders a list of players as
/// `<?xml ...?><players><player><id>1</id>...</player></players>`.
///
/// Order is whatever the caller passes in (the datastore's order).
pub fn player_list_xml(players: &[Player]) -> Result<String> {
    let mut writer = writer();
    write_declaration(&mut writer)?;
    writer.write_event(Event::Start(BytesStart::new("players")))?;
    for player in players {
        writer.write_event(Event::Start(BytesStart::new("player")))?;
        for (tag, text) in player.text_fields() {
            write_text_element(&mut writer, tag, &text)?;
        }
        writer.write_event(Event::End(BytesEnd::new("player")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("players")))?;
    finish(writer)
}

/// Renders the single-object form used for confirmations and errors:
/// `<response><message>..</message><field>..</field>...</response>`.
///
/// Record fields are flattened next to the message, not nested.
pub fn message_xml(message: &str, fields: &[(&str, String)]) -> Result<String> {
    let mut writer = writer();
    write_declaration(&mut writer)?;
    writer.write_event(Event::Start(BytesStart::new("response")))?;
    write_text_element(&mut writer, "message", message)?;
    for (tag, text) in fields {
        write_text_element(&mut writer, tag, text)?;
    }
    writer.write_event(Event::End(BytesEnd::new("response")))?;
    finish(writer)
}

/// Resolves `&amp;`-style and `&#38;`-style references inside text.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, DecodeError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|_| DecodeError::InvalidXml)?
    {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|_| DecodeError::InvalidXml)?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or(DecodeError::InvalidXml)
}

fn tag_name(start: &BytesStart<'_>) -> Result<String, DecodeError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|_| DecodeError::InvalidXml)
}

/// A direct child of the root while it is being read.
struct OpenChild {
    tag: String,
    text: String,
    // Set once a nested element shows up; later text is not part of `text`.
    sealed: bool,
}

/// Reads a single-object XML request body into a field mapping.
///
/// Only direct children of the root are read. A child's value is the text
/// that precedes its first nested element; anything nested is not
/// interpreted. Repeated tags keep the last value. A document whose root has
/// no children is rejected like a malformed one.
///
/// So `<name>Kane<first>Harry</first></name>` reads as `"Kane"`. Nobody sends
/// nested player fields today; if someone starts, this is the place to look.
pub fn read_fields_xml(xml: &str) -> Result<Fields, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut fields = Fields::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut child: Option<OpenChild> = None;

    loop {
        let event = reader.read_event().map_err(|_| DecodeError::InvalidXml)?;
        match event {
            Event::Start(e) => {
                match depth {
                    0 if seen_root => return Err(DecodeError::InvalidXml),
                    0 => seen_root = true,
                    1 => {
                        child = Some(OpenChild {
                            tag: tag_name(&e)?,
                            text: String::new(),
                            sealed: false,
                        })
                    }
                    _ => {
                        if let Some(open) = child.as_mut() {
                            open.sealed = true;
                        }
                    }
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 if seen_root => return Err(DecodeError::InvalidXml),
                0 => seen_root = true,
                1 => {
                    fields.insert(tag_name(&e)?, Value::String(String::new()));
                }
                _ => {
                    if let Some(open) = child.as_mut() {
                        open.sealed = true;
                    }
                }
            },
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(DecodeError::InvalidXml)?;
                if depth == 1 {
                    if let Some(done) = child.take() {
                        fields.insert(done.tag, Value::String(done.text));
                    }
                }
            }
            Event::Text(t) => {
                let text = reader
                    .decoder()
                    .decode(&t)
                    .map_err(|_| DecodeError::InvalidXml)?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(DecodeError::InvalidXml);
                }
                if depth == 2 {
                    push_text(child.as_mut(), &text);
                }
            }
            Event::CData(c) => {
                let text = reader
                    .decoder()
                    .decode(&c)
                    .map_err(|_| DecodeError::InvalidXml)?;
                if depth == 2 {
                    push_text(child.as_mut(), &text);
                }
            }
            Event::GeneralRef(r) => {
                let text = resolve_reference(&r)?;
                if depth == 0 {
                    return Err(DecodeError::InvalidXml);
                }
                if depth == 2 {
                    push_text(child.as_mut(), &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 || !seen_root || fields.is_empty() {
        return Err(DecodeError::InvalidXml);
    }
    Ok(fields)
}

fn push_text(child: Option<&mut OpenChild>, text: &str) {
    if let Some(open) = child {
        if !open.sealed {
            open.text.push_str(text);
        }
    }
}

/// Reads the `<players><player>..</player></players>` list form back into one
/// `tag -> text` map per record.
pub fn read_player_list_xml(xml: &str) -> Result<Vec<BTreeMap<String, String>>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut record: Option<BTreeMap<String, String>> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|_| DecodeError::InvalidXml)?;
        match event {
            Event::Start(e) => {
                match depth {
                    1 => record = Some(BTreeMap::new()),
                    2 => field = Some((tag_name(&e)?, String::new())),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                1 => records.push(BTreeMap::new()),
                2 => {
                    if let Some(current) = record.as_mut() {
                        current.insert(tag_name(&e)?, String::new());
                    }
                }
                _ => {}
            },
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(DecodeError::InvalidXml)?;
                match depth {
                    1 => records.extend(record.take()),
                    2 => {
                        if let (Some((tag, text)), Some(current)) = (field.take(), record.as_mut()) {
                            current.insert(tag, text);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if depth == 3 {
                    let text = reader
                        .decoder()
                        .decode(&t)
                        .map_err(|_| DecodeError::InvalidXml)?;
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&text);
                    }
                }
            }
            Event::GeneralRef(r) => {
                if depth == 3 {
                    let text = resolve_reference(&r)?;
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DecodeError::InvalidXml);
    }
    Ok(records)
}
