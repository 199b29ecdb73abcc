use crate::error::RenderError;
use lopdf::content::Content;
use lopdf::xref::{Xref, XrefEntry, XrefType};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use std::io::{self, Seek, Write};

/// Writes a PDF incrementally.
///
/// Images and pages go to the output as soon as they are added. The shared
/// resources dictionary, the page tree, the catalog and the Info dictionary
/// reference ids reserved up front and are written by [`PdfWriter::finish`].
pub struct PdfWriter<W: Write + Seek> {
    writer: W,
    xref: Xref,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    fonts: Dictionary,
    xobjects: Dictionary,
    page_ids: Vec<ObjectId>,
    info: Option<Dictionary>,
}

impl<W: Write + Seek> PdfWriter<W> {
    pub fn new(mut writer: W, version: &str) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", version).as_bytes())?;

        Ok(Self {
            writer,
            xref: Xref::new(0, XrefType::CrossReferenceTable),
            max_id: 3,
            resources_id: (1, 0),
            pages_id: (2, 0),
            catalog_id: (3, 0),
            fonts: Dictionary::new(),
            xobjects: Dictionary::new(),
            page_ids: Vec::new(),
            info: None,
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    /// Writes `object` immediately under a fresh id.
    pub fn write_object(&mut self, object: Object) -> io::Result<ObjectId> {
        let id = self.new_object_id();
        internal_writer::write_indirect_object(&mut self.writer, id, &object, &mut self.xref)?;
        Ok(id)
    }

    /// Registers a standard Type1 font under `resource_name`.
    pub fn add_standard_font(&mut self, resource_name: &str, base_font: &str) -> io::Result<ObjectId> {
        let id = self.write_object(
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font,
                "Encoding" => "WinAnsiEncoding",
            }
            .into(),
        )?;
        self.fonts.set(resource_name, id);
        Ok(id)
    }

    /// Writes a baseline JPEG as an image XObject named `resource_name`.
    pub fn add_jpeg_image(&mut self, resource_name: &str, jpeg: &[u8], width: u32, height: u32) -> io::Result<ObjectId> {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let id = self.write_object(Object::Stream(Stream::new(dict, jpeg.to_vec())))?;
        self.xobjects.set(resource_name, id);
        Ok(id)
    }

    /// Writes one page: its content stream, then the page dictionary.
    pub fn add_page(&mut self, content: Content, width: f32, height: f32) -> Result<ObjectId, RenderError> {
        let content_id = self.write_object(Object::Stream(Stream::new(dictionary! {}, content.encode()?)))?;
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.write_object(page.into())?;
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn set_info(&mut self, info: Dictionary) {
        self.info = Some(info);
    }

    pub fn finish(mut self) -> io::Result<W> {
        let mut resources = dictionary! { "Font" => std::mem::take(&mut self.fonts) };
        if !self.xobjects.is_empty() {
            resources.set("XObject", std::mem::take(&mut self.xobjects));
        }
        internal_writer::write_indirect_object(&mut self.writer, self.resources_id, &resources.into(), &mut self.xref)?;

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        internal_writer::write_indirect_object(&mut self.writer, self.pages_id, &pages_dict.into(), &mut self.xref)?;

        let catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        internal_writer::write_indirect_object(&mut self.writer, self.catalog_id, &catalog_dict.into(), &mut self.xref)?;

        let info_id = match self.info.take() {
            Some(info) => Some(self.write_object(info.into())?),
            None => None,
        };

        let xref_start = self.writer.stream_position()?;
        self.xref.size = self.max_id + 1;
        internal_writer::write_xref(&mut self.writer, &self.xref)?;

        let mut trailer = dictionary! { "Size" => self.xref.size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = info_id {
            trailer.set("Info", info_id);
        }
        writeln!(self.writer, "trailer")?;
        internal_writer::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer)
    }
}

mod internal_writer {
    use super::*;

    pub fn write_indirect_object<W: Write + Seek>(
        writer: &mut W,
        id: ObjectId,
        object: &Object,
        xref: &mut Xref,
    ) -> io::Result<()> {
        let offset = writer.stream_position()?;
        xref.insert(
            id.0,
            XrefEntry::Normal {
                offset: offset as u32,
                generation: id.1,
            },
        );
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")?;
        Ok(())
    }

    /// Serializes the object kinds this writer produces. Strings are always
    /// written in literal form; names and dictionary keys are taken as given.
    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => write!(writer, "{}", b),
            Object::Integer(i) => write!(writer, "{}", i),
            Object::Real(r) => writer.write_all(format_real(*r).as_bytes()),
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(bytes, _) => write_literal_string(writer, bytes),
            Object::Array(items) => {
                writer.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, item)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    /// Reals with at most three decimals and no trailing zeros.
    fn format_real(value: f32) -> String {
        let text = format!("{:.3}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        match text {
            "" | "-" | "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }

    fn write_literal_string(writer: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
        writer.write_all(b"(")?;
        for &byte in bytes {
            match byte {
                b'(' | b')' | b'\\' => writer.write_all(&[b'\\', byte])?,
                b'\r' => writer.write_all(b"\\r")?,
                b'\n' => writer.write_all(b"\\n")?,
                _ => writer.write_all(&[byte])?,
            }
        }
        writer.write_all(b")")
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        let mut entries: Vec<_> = dict.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        writer.write_all(b"<<")?;
        for (key, value) in entries {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    /// Writes a single-section table covering ids `0..xref.size`.
    pub fn write_xref<W: Write>(writer: &mut W, xref: &Xref) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", xref.size.max(1))?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..xref.size {
            match xref.entries.get(&id) {
                Some(XrefEntry::Normal { offset, generation }) => {
                    writeln!(writer, "{:010} {:05} n ", offset, generation)?
                }
                _ => writeln!(writer, "0000000000 00000 f ")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use std::io::Cursor;

    #[test]
    fn test_empty_document_loads() {
        let writer = PdfWriter::new(Cursor::new(Vec::new()), "1.7").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_pages_and_info_round_trip() {
        let mut writer = PdfWriter::new(Cursor::new(Vec::new()), "1.7").unwrap();
        writer.add_standard_font("F1", "Helvetica").unwrap();
        for _ in 0..2 {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal("Hello")]),
                    Operation::new("ET", vec![]),
                ],
            };
            writer.add_page(content, 612.0, 792.0).unwrap();
        }
        assert_eq!(writer.page_count(), 2);
        writer.set_info(dictionary! { "Title" => Object::string_literal("Cards") });

        let bytes = writer.finish().unwrap().into_inner();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        let info_ref = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_ref).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Cards");
    }

    #[test]
    fn test_object_serialization() {
        let mut out = Vec::new();
        let array = Object::Array(vec![
            72.0f32.into(),
            0.75f32.into(),
            (-0.0f32).into(),
            Object::string_literal("a (b)\\c\n"),
        ]);
        internal_writer::write_object(&mut out, &array).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r"[72 0.75 0 (a \(b\)\\c\n)]");
    }
}
