// scanner.rs — Directory walks and metadata parsing.
//
// Two independent discovery passes:
//
//   classes: every `<Name><class_meta_suffix>` file in the classes dir is
//            one class; the metadata file must parse as XML.
//   fields:  every `<Object><object_suffix>` file in the objects dir is
//            parsed and its embedded <fields> list expanded into
//            `Object.Field` identities, carrying the required flag.
//
// A directory that cannot be listed or a file that cannot be parsed is a
// ScanError naming the offending path — never swallowed.

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::entity::{LocalEntity, SourceSnapshot};
use crate::error::ScanError;
use crate::layout::SourceLayout;

/// Scans a source tree for permission-relevant entities.
pub struct SourceScanner {
    layout: SourceLayout,
}

impl SourceScanner {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    /// Run both discovery passes and return the combined snapshot.
    pub fn scan(&self) -> Result<SourceSnapshot, ScanError> {
        let classes = self.scan_classes()?;
        let fields = self.scan_fields()?;
        tracing::info!(
            classes = classes.len(),
            fields = fields.len(),
            "source scan complete"
        );
        Ok(SourceSnapshot { classes, fields })
    }

    /// Discover classes from per-class metadata files.
    ///
    /// The class identity is the file name with the metadata suffix
    /// stripped; the file itself must be well-formed XML.
    pub fn scan_classes(&self) -> Result<Vec<LocalEntity>, ScanError> {
        let dir = self.layout.classes_path();
        let mut classes = Vec::new();

        for file in list_files(&dir, &self.layout.class_meta_suffix)? {
            let name = file
                .strip_suffix(&self.layout.class_meta_suffix)
                .unwrap_or(&file)
                .to_string();
            let path = dir.join(&file);
            let content = read_file(&path)?;
            let status = parse_class_meta(&path, &content)?;
            tracing::debug!(class = %name, status = ?status, "discovered class");
            classes.push(LocalEntity::class(name, status));
        }

        Ok(classes)
    }

    /// Discover fields by expanding each object definition's field list.
    ///
    /// Objects without a `<fields>` list contribute zero entities.
    pub fn scan_fields(&self) -> Result<Vec<LocalEntity>, ScanError> {
        let dir = self.layout.objects_path();
        let mut fields = Vec::new();

        for file in list_files(&dir, &self.layout.object_suffix)? {
            let object = file
                .strip_suffix(&self.layout.object_suffix)
                .unwrap_or(&file)
                .to_string();
            let path = dir.join(&file);
            let content = read_file(&path)?;
            let object_fields = parse_object_fields(&path, &object, &content)?;
            tracing::debug!(
                object = %object,
                fields = object_fields.len(),
                "discovered object"
            );
            fields.extend(object_fields);
        }

        Ok(fields)
    }
}

/// List the file names in `dir` ending with `suffix`, sorted for
/// deterministic scan output.
fn list_files(dir: &Path, suffix: &str) -> Result<Vec<String>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::DirUnreadable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::DirUnreadable {
            path: dir.display().to_string(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(suffix) {
            files.push(name);
        }
    }

    files.sort();
    Ok(files)
}

fn read_file(path: &Path) -> Result<String, ScanError> {
    fs::read_to_string(path).map_err(|source| ScanError::FileUnreadable {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a class metadata file, returning the optional `<status>` value.
///
/// The root element name is not checked; the file only needs to be
/// well-formed XML with string leaves.
fn parse_class_meta(path: &Path, content: &str) -> Result<Option<String>, ScanError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut status = None;
    let mut depth = 0usize;
    let mut in_status = false;

    loop {
        match reader.read_event().map_err(|e| ScanError::Unparseable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })? {
            Event::Start(e) => {
                // <status> directly under the root element.
                in_status = depth == 1 && e.local_name().as_ref() == b"status";
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                in_status = false;
            }
            Event::Text(t) if in_status => {
                let value = t.unescape().map_err(|e| ScanError::Unparseable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                status = Some(value.into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(status)
}

/// Parse an object definition file into qualified field entities.
///
/// Recognizes repeated `<fields>` blocks under the root element, each
/// with a `<fullName>` leaf and an optional `<required>` leaf.
fn parse_object_fields(
    path: &Path,
    object: &str,
    content: &str,
) -> Result<Vec<LocalEntity>, ScanError> {
    let unparseable = |reason: String| ScanError::Unparseable {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut in_field_block = false;
    let mut leaf: Option<Vec<u8>> = None;
    let mut full_name: Option<String> = None;
    let mut required = false;

    loop {
        match reader.read_event().map_err(|e| unparseable(e.to_string()))? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if depth == 1 && name == b"fields" {
                    in_field_block = true;
                    full_name = None;
                    required = false;
                } else if in_field_block && depth == 2 {
                    leaf = Some(name);
                }
                depth += 1;
            }
            Event::Text(t) => {
                if let Some(tag) = &leaf {
                    let value = t.unescape().map_err(|e| unparseable(e.to_string()))?;
                    match tag.as_slice() {
                        b"fullName" => full_name = Some(value.into_owned()),
                        b"required" => required = value.as_ref() == "true",
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 && e.local_name().as_ref() == b"fields" {
                    in_field_block = false;
                    if let Some(name) = full_name.take() {
                        fields.push(LocalEntity::field(format!("{object}.{name}"), required));
                    }
                }
                leaf = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fields)
}
