//! `drumkit.xml` manifest writer.
//!
//! Layout of the generated document:
//!
//! ```text
//! <drumkit_info>
//!   <name>...</name>
//!   <info>...</info>            (only when the kit has info)
//!   <instrumentList>
//!     <instrument>
//!       <volume>1</volume>      (one element per attribute)
//!       ...
//!       <layer>
//!         <min>0</min>          (one element per attribute)
//!         ...
//!       </layer>
//!       <exclude/>
//!     </instrument>
//!   </instrumentList>
//! </drumkit_info>
//! ```
//!
//! The empty `exclude` element is expected by the sampler when it loads a kit.
//! Its contents are not produced by this crate.

use crate::attributes::Attributes;
use crate::error::Error;
use crate::kit::{Instrument, Kit, Layer};
use crate::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File name of the manifest inside a kit archive.
pub const MANIFEST_NAME: &str = "drumkit.xml";

/// Write the manifest for `kit` to `out`.
pub fn write_manifest<W: Write>(kit: &Kit, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut writer, Event::Start(BytesStart::new("drumkit_info")))?;
    write_text_element(&mut writer, "name", kit.name())?;
    if let Some(info) = kit.info() {
        write_text_element(&mut writer, "info", info)?;
    }

    emit(&mut writer, Event::Start(BytesStart::new("instrumentList")))?;
    for instrument in kit.instruments() {
        write_instrument(&mut writer, instrument)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("instrumentList")))?;

    emit(&mut writer, Event::End(BytesEnd::new("drumkit_info")))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Render the manifest for `kit` into a string.
pub fn manifest_to_string(kit: &Kit) -> Result<String> {
    let mut buffer = Vec::new();
    write_manifest(kit, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Xml(e.to_string()))
}

/// Write the manifest for `kit` to the file at `path`.
pub fn write_manifest_file(kit: &Kit, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_manifest(kit, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_instrument<W: Write>(writer: &mut Writer<W>, instrument: &Instrument) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("instrument")))?;
    write_attributes(writer, instrument.attributes())?;
    for layer in instrument.layers() {
        write_layer(writer, layer)?;
    }
    emit(writer, Event::Empty(BytesStart::new("exclude")))?;
    emit(writer, Event::End(BytesEnd::new("instrument")))
}

fn write_layer<W: Write>(writer: &mut Writer<W>, layer: &Layer) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("layer")))?;
    write_attributes(writer, layer.attributes())?;
    emit(writer, Event::End(BytesEnd::new("layer")))
}

fn write_attributes<W: Write>(writer: &mut Writer<W>, attributes: &Attributes) -> Result<()> {
    for (key, value) in attributes.iter() {
        write_text_element(writer, key, &value.to_string())?;
    }
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}
