// codec.rs — XML encoding/decoding of permission documents.
//
// Document shape:
//
//   <?xml version="1.0" encoding="UTF-8"?>
//   <Profile>
//       <classAccesses>
//           <className>OrderService</className>
//           <enabled>true</enabled>
//       </classAccesses>
//       <fieldPermissions>
//           <field>Order.ContractId</field>
//           <readable>true</readable>
//           <editable>false</editable>
//       </fieldPermissions>
//   </Profile>
//
// Booleans are the literal tokens `true`/`false` — anything else is a
// parse error. Pretty-printing (indent width, newline style, declaration
// header) is configurable via XmlOptions; entry order and flag values
// round-trip exactly.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::document::{ClassAccess, FieldPermission, ProfileDocument};
use crate::error::ProfileError;

/// Newline style for encoded documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    #[default]
    Lf,
    Crlf,
}

/// Rendering options for the encoded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlOptions {
    /// Indent width in spaces.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Line ending style.
    #[serde(default)]
    pub newline: Newline,

    /// Declared XML version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Declared document encoding.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            newline: Newline::default(),
            version: default_version(),
            encoding: default_encoding(),
        }
    }
}

fn default_indent() -> usize {
    4
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

/// Decode a permission document from XML.
///
/// Unknown elements are skipped; `classAccesses` and `fieldPermissions`
/// blocks are collected in document order. Each block must carry its
/// identity leaf; missing flags default to `false`.
pub fn decode(name: &str, xml: &str) -> Result<ProfileDocument, ProfileError> {
    let parse_err = |reason: String| ProfileError::Parse {
        profile: name.to_string(),
        reason,
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = ProfileDocument::new(name);
    let mut depth = 0usize;

    #[derive(PartialEq)]
    enum Section {
        None,
        Class,
        Field,
    }
    let mut section = Section::None;
    let mut leaf: Option<Vec<u8>> = None;

    // Staging values for the block being read.
    let mut identity: Option<String> = None;
    let mut enabled = false;
    let mut readable = false;
    let mut editable = false;

    loop {
        match reader.read_event().map_err(|e| parse_err(e.to_string()))? {
            Event::Start(e) => {
                let tag = e.local_name().as_ref().to_vec();
                if depth == 1 {
                    section = match tag.as_slice() {
                        b"classAccesses" => Section::Class,
                        b"fieldPermissions" => Section::Field,
                        _ => Section::None,
                    };
                    identity = None;
                    enabled = false;
                    readable = false;
                    editable = false;
                } else if depth == 2 && section != Section::None {
                    leaf = Some(tag);
                }
                depth += 1;
            }
            Event::Text(t) => {
                if let Some(tag) = &leaf {
                    let value = t.unescape().map_err(|e| parse_err(e.to_string()))?;
                    match tag.as_slice() {
                        b"className" | b"field" => identity = Some(value.into_owned()),
                        b"enabled" => enabled = parse_bool(&value).map_err(&parse_err)?,
                        b"readable" => readable = parse_bool(&value).map_err(&parse_err)?,
                        b"editable" => editable = parse_bool(&value).map_err(&parse_err)?,
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                leaf = None;
                if depth == 1 {
                    match (&section, e.local_name().as_ref()) {
                        (Section::Class, b"classAccesses") => {
                            let class_name = identity.take().ok_or_else(|| {
                                parse_err("classAccesses entry missing <className>".to_string())
                            })?;
                            doc.class_accesses.push(ClassAccess::new(class_name, enabled));
                        }
                        (Section::Field, b"fieldPermissions") => {
                            let field = identity.take().ok_or_else(|| {
                                parse_err("fieldPermissions entry missing <field>".to_string())
                            })?;
                            doc.field_permissions
                                .push(FieldPermission::new(field, readable, editable));
                        }
                        _ => {}
                    }
                    section = Section::None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(doc)
}

/// Encode a permission document to XML with the given rendering options.
pub fn encode(doc: &ProfileDocument, opts: &XmlOptions) -> Result<String, ProfileError> {
    let encode_err = |reason: String| ProfileError::Encode {
        profile: doc.name().to_string(),
        reason,
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', opts.indent);

    writer
        .write_event(Event::Decl(BytesDecl::new(
            &opts.version,
            Some(&opts.encoding),
            None,
        )))
        .map_err(|e| encode_err(e.to_string()))?;
    writer
        .write_event(Event::Start(BytesStart::new("Profile")))
        .map_err(|e| encode_err(e.to_string()))?;

    for entry in &doc.class_accesses {
        writer
            .write_event(Event::Start(BytesStart::new("classAccesses")))
            .map_err(|e| encode_err(e.to_string()))?;
        write_leaf(&mut writer, "className", &entry.class_name).map_err(&encode_err)?;
        write_leaf(&mut writer, "enabled", bool_token(entry.enabled)).map_err(&encode_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("classAccesses")))
            .map_err(|e| encode_err(e.to_string()))?;
    }

    for entry in &doc.field_permissions {
        writer
            .write_event(Event::Start(BytesStart::new("fieldPermissions")))
            .map_err(|e| encode_err(e.to_string()))?;
        write_leaf(&mut writer, "field", &entry.field).map_err(&encode_err)?;
        write_leaf(&mut writer, "readable", bool_token(entry.readable)).map_err(&encode_err)?;
        write_leaf(&mut writer, "editable", bool_token(entry.editable)).map_err(&encode_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("fieldPermissions")))
            .map_err(|e| encode_err(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Profile")))
        .map_err(|e| encode_err(e.to_string()))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| encode_err(e.to_string()))?;
    xml.push('\n');
    if opts.newline == Newline::Crlf {
        xml = xml.replace('\n', "\r\n");
    }
    Ok(xml)
}

/// One `<tag>value</tag>` element.
fn write_leaf<W: Write>(writer: &mut Writer<W>, tag: &str, value: &str) -> Result<(), String> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected 'true' or 'false', found '{other}'")),
    }
}
