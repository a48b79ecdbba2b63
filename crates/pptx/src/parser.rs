//! PPTX file parser implementation.

use slidecast_core::{
    Error, ExtractedSlide, PlaceholderRole, Presentation, PresentationFormat, Result, SlideText,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const REL_TYPE_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_TYPE_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// Text blocks at or above this many characters are never taken as a fallback title.
const FALLBACK_TITLE_MAX_CHARS: usize = 100;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse a presentation from disk, rejecting legacy `.ppt` files.
    pub fn parse_path(&self, path: &Path) -> Result<Presentation> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 8];
        let read = file.read(&mut magic)?;
        file.rewind()?;

        let format = PresentationFormat::from_magic(&magic[..read]).or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(PresentationFormat::from_extension)
        });

        match format {
            Some(PresentationFormat::Pptx) => {}
            Some(PresentationFormat::Ppt) => {
                return Err(Error::UnsupportedFormat(format!(
                    "{} is a legacy .ppt file; save it as .pptx first",
                    path.display()
                )));
            }
            None => {
                return Err(Error::UnsupportedFormat(path.display().to_string()));
            }
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        self.parse(BufReader::new(file), filename)
    }

    /// Parse a PPTX file from a reader.
    ///
    /// A slide whose shapes or notes cannot be read is logged and kept with
    /// whatever content was recovered, so numbering of later slides is stable.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Found {} slides in {}", slide_order.len(), filename);

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let number = idx + 1;
            let mut slide = match self.parse_slide(&mut archive, slide_path, number) {
                Ok(slide) => slide,
                Err(e) => {
                    log::warn!("Error processing slide {}: {}", number, e);
                    ExtractedSlide::new(number)
                }
            };

            match self.read_notes(&mut archive, slide_path) {
                Ok(Some(notes)) => slide.set_notes(&notes),
                Ok(None) => {}
                Err(e) => log::warn!("Could not read notes for slide {}: {}", number, e),
            }

            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// The authoritative order is `p:sldIdLst` in `ppt/presentation.xml`.
    /// Without it, slide relationships are ordered by the number in their id.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let rels = parse_relationships(&rels_content)?;

        let slide_rels: Vec<&Relationship> = rels
            .iter()
            .filter(|r| r.rel_type == REL_TYPE_SLIDE)
            .collect();

        let listed_ids = match self.read_file_from_archive(archive, "ppt/presentation.xml") {
            Ok(xml) => parse_slide_id_list(&xml)?,
            Err(e) => {
                log::warn!("presentation.xml unreadable, ordering slides by relationship id: {}", e);
                Vec::new()
            }
        };

        if !listed_ids.is_empty() {
            let ordered: Vec<String> = listed_ids
                .iter()
                .filter_map(|id| slide_rels.iter().find(|r| &r.id == id))
                .map(|r| resolve_part_path("ppt", &r.target))
                .collect();
            if !ordered.is_empty() {
                return Ok(ordered);
            }
        }

        let mut slides: Vec<(String, Option<usize>)> = slide_rels
            .iter()
            .map(|r| {
                let order_num = extract_slide_number(&r.id).or_else(|| extract_slide_number(&r.target));
                (resolve_part_path("ppt", &r.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let shapes = extract_shapes_from_xml(&content)?;

        let mut slide = ExtractedSlide::new(slide_number);
        slide.title = detect_title(&shapes);

        for shape in shapes {
            slide.add_shape_text(
                SlideText::with_position(shape.text, shape.y, shape.x)
                    .with_placeholder(shape.placeholder),
            );
        }
        slide.sort_by_position();

        Ok(slide)
    }

    /// Read the notes text for a slide: the body placeholder of its notes slide.
    fn read_notes<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Option<String>> {
        let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
        let rels_path = format!("{}/_rels/{}.rels", dir, file);

        // Slides without notes have no relationships file at all, or one without a notes link.
        let Ok(rels_content) = self.read_file_from_archive(archive, &rels_path) else {
            return Ok(None);
        };
        let rels = parse_relationships(&rels_content)?;

        let Some(notes_rel) = rels.iter().find(|r| r.rel_type == REL_TYPE_NOTES_SLIDE) else {
            return Ok(None);
        };

        let notes_path = resolve_part_path(dir, &notes_rel.target);
        let content = self.read_file_from_archive(archive, &notes_path)?;
        let shapes = extract_shapes_from_xml(&content)?;

        Ok(shapes
            .into_iter()
            .find(|s| s.placeholder == Some(PlaceholderRole::Body))
            .map(|s| s.text))
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a shape extracted from XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: f64,
    y: f64,
    placeholder: Option<PlaceholderRole>,
}

/// A package relationship.
#[derive(Debug)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// Title placeholder text, else the first short text block.
fn detect_title(shapes: &[ShapeInfo]) -> Option<String> {
    shapes
        .iter()
        .find(|s| s.placeholder == Some(PlaceholderRole::Title))
        .or_else(|| {
            shapes
                .iter()
                .find(|s| s.text.chars().count() < FALLBACK_TITLE_MAX_CHARS)
        })
        .map(|s| s.text.clone())
}

/// Extract shapes with text, position, and placeholder role from slide or notes XML.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut in_run_text = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        current_shape = Some(ShapeInfo::default());
                        current_text.clear();
                    }
                    b"ph" => set_placeholder(current_shape.as_mut(), e),
                    b"off" => set_offset(current_shape.as_mut(), e),
                    b"txBody" if current_shape.is_some() => {
                        in_text_body = true;
                    }
                    b"p" if in_text_body => {
                        in_paragraph = true;
                        if !current_text.is_empty() {
                            current_text.push('\n');
                        }
                    }
                    b"t" if in_paragraph => {
                        in_run_text = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"ph" => set_placeholder(current_shape.as_mut(), e),
                    b"off" => set_offset(current_shape.as_mut(), e),
                    b"br" if in_paragraph => current_text.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Bad text content: {}", e)))?;
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        if let Some(mut shape) = current_shape.take() {
                            shape.text = current_text.trim().to_string();
                            if !shape.text.is_empty() {
                                shapes.push(shape);
                            }
                        }
                        current_text.clear();
                        in_text_body = false;
                        in_paragraph = false;
                        in_run_text = false;
                    }
                    b"txBody" => {
                        in_text_body = false;
                    }
                    b"p" => {
                        in_paragraph = false;
                    }
                    b"t" => {
                        in_run_text = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

fn set_placeholder(shape: Option<&mut ShapeInfo>, e: &BytesStart) {
    let Some(shape) = shape else { return };
    let ph_type = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"type")
        .map(|a| String::from_utf8_lossy(&a.value).to_string());
    shape.placeholder = Some(PlaceholderRole::from_ph_type(ph_type.as_deref()));
}

fn set_offset(shape: Option<&mut ShapeInfo>, e: &BytesStart) {
    let Some(shape) = shape else { return };
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"x" => {
                if let Ok(x) = value.parse::<f64>() {
                    shape.x = x;
                }
            }
            b"y" => {
                if let Ok(y) = value.parse::<f64>() {
                    shape.y = y;
                }
            }
            _ => {}
        }
    }
}

/// Parse a `.rels` part.
fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                };

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"Id" => rel.id = value,
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The relationship id is the namespaced `r:id`; plain `id` is the numeric slide id.
                if let Some(attr) = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref().contains(&b':') && local_name(a.key.as_ref()) == b"id")
                {
                    ids.push(String::from_utf8_lossy(&attr.value).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

    fn shape(ph: Option<&str>, y: i64, paragraphs: &[&str]) -> String {
        let ph = match ph {
            Some("") => "<p:nvPr><p:ph idx=\"1\"/></p:nvPr>".to_string(),
            Some(t) => format!("<p:nvPr><p:ph type=\"{}\"/></p:nvPr>", t),
            None => "<p:nvPr/>".to_string(),
        };
        let paras: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"s\"/><p:cNvSpPr/>{}</p:nvSpPr>\
             <p:spPr><a:xfrm><a:off x=\"100\" y=\"{}\"/><a:ext cx=\"10\" cy=\"10\"/></a:xfrm></p:spPr>\
             <p:txBody><a:bodyPr/>{}</p:txBody></p:sp>",
            ph, y, paras
        )
    }

    fn slide_xml(shapes: &[String]) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><p:sld {}><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
            NS,
            shapes.concat()
        )
    }

    fn notes_xml(text: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><p:notes {}><p:cSld><p:spTree>{}{}{}</p:spTree></p:cSld></p:notes>",
            NS,
            shape(Some("sldImg"), 0, &[]),
            shape(Some("body"), 0, &[text]),
            shape(Some("sldNum"), 0, &["7"]),
        )
    }

    struct TestSlide {
        xml: String,
        notes: Option<String>,
    }

    /// Build a PPTX whose relationship ids are deliberately out of presentation order.
    fn build_pptx(slides: &[TestSlide]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        let count = slides.len();

        let rel_id = |i: usize| format!("rId{}", count - i + 10);

        let mut rels = String::from("<?xml version=\"1.0\"?><Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">");
        rels.push_str("<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>");
        let mut id_list = String::new();
        for i in 0..count {
            rels.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>",
                rel_id(i),
                REL_TYPE_SLIDE,
                i + 1
            ));
            id_list.push_str(&format!("<p:sldId id=\"{}\" r:id=\"{}\"/>", 256 + i, rel_id(i)));
        }
        rels.push_str("</Relationships>");

        zip.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(
            format!(
                "<?xml version=\"1.0\"?><p:presentation {}><p:sldIdLst>{}</p:sldIdLst></p:presentation>",
                NS, id_list
            )
            .as_bytes(),
        )
        .unwrap();

        for (i, slide) in slides.iter().enumerate() {
            let n = i + 1;
            zip.start_file(format!("ppt/slides/slide{}.xml", n), options).unwrap();
            zip.write_all(slide.xml.as_bytes()).unwrap();

            if let Some(notes) = &slide.notes {
                zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", n), options)
                    .unwrap();
                zip.write_all(
                    format!(
                        "<?xml version=\"1.0\"?><Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                         <Relationship Id=\"rId2\" Type=\"{}\" Target=\"../notesSlides/notesSlide{}.xml\"/></Relationships>",
                        REL_TYPE_NOTES_SLIDE, n
                    )
                    .as_bytes(),
                )
                .unwrap();

                zip.start_file(format!("ppt/notesSlides/notesSlide{}.xml", n), options)
                    .unwrap();
                zip.write_all(notes.as_bytes()).unwrap();
            }
        }

        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_part_path() {
        assert_eq!(resolve_part_path("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(
            resolve_part_path("ppt/slides", "../notesSlides/notesSlide1.xml"),
            "ppt/notesSlides/notesSlide1.xml"
        );
        assert_eq!(resolve_part_path("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
    }

    #[test]
    fn test_title_placeholder_wins_over_earlier_short_text() {
        let xml = slide_xml(&[
            shape(None, 10, &["Company logo"]),
            shape(Some("title"), 50, &["Definitions"]),
        ]);
        let shapes = extract_shapes_from_xml(&xml).unwrap();
        assert_eq!(detect_title(&shapes).as_deref(), Some("Definitions"));
    }

    #[test]
    fn test_fallback_title_is_first_short_text() {
        let long = "x".repeat(150);
        let xml = slide_xml(&[shape(None, 10, &[&long]), shape(Some(""), 50, &["Short heading"])]);
        let shapes = extract_shapes_from_xml(&xml).unwrap();
        assert_eq!(detect_title(&shapes).as_deref(), Some("Short heading"));
    }

    #[test]
    fn test_runs_keep_their_whitespace() {
        let xml = format!(
            "<p:sld {}><p:cSld><p:spTree><p:sp><p:nvSpPr><p:nvPr/></p:nvSpPr><p:txBody>\
             <a:p><a:r><a:t>Hello </a:t></a:r><a:r><a:t>world &amp; more</a:t></a:r></a:p>\
             <a:p><a:r><a:t>line</a:t></a:r><a:br/><a:r><a:t>break</a:t></a:r></a:p>\
             </p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
            NS
        );
        let shapes = extract_shapes_from_xml(&xml).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].text, "Hello world & more\nline\nbreak");
    }

    #[test]
    fn test_parse_orders_slides_and_reads_notes() {
        let slides = vec![
            TestSlide {
                xml: slide_xml(&[shape(Some("ctrTitle"), 10, &["Welcome"])]),
                notes: Some(notes_xml("  Welcome to the course.  ")),
            },
            TestSlide {
                xml: slide_xml(&[shape(Some("title"), 10, &["Agenda"]), shape(Some(""), 80, &["One", "Two"])]),
                notes: None,
            },
            TestSlide {
                xml: slide_xml(&[]),
                notes: Some(notes_xml("Untitled slide narration")),
            },
        ];
        let bytes = build_pptx(&slides);

        let presentation = PptxParser::new()
            .parse(Cursor::new(bytes), "deck.pptx")
            .unwrap();

        assert_eq!(presentation.filename, "deck.pptx");
        assert_eq!(presentation.slides.len(), 3);

        let first = &presentation.slides[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.title.as_deref(), Some("Welcome"));
        assert_eq!(first.notes.as_deref(), Some("Welcome to the course."));

        let second = &presentation.slides[1];
        assert_eq!(second.title.as_deref(), Some("Agenda"));
        assert_eq!(second.notes, None);
        assert_eq!(second.non_empty_lines(), vec!["Agenda", "One\nTwo"]);

        let third = &presentation.slides[2];
        assert_eq!(third.title, None);
        assert_eq!(third.notes.as_deref(), Some("Untitled slide narration"));
        assert_eq!(presentation.narrated_slide_count(), 2);
    }

    #[test]
    fn test_malformed_slide_does_not_abort_extraction() {
        let slides = vec![
            TestSlide {
                xml: "<p:sld><p:cSld><p:spTree><p:sp></p:nvSpPr>".to_string(),
                notes: Some(notes_xml("Still narrated")),
            },
            TestSlide {
                xml: slide_xml(&[shape(Some("title"), 10, &["Second"])]),
                notes: Some(notes_xml("Second notes")),
            },
        ];
        let bytes = build_pptx(&slides);

        let presentation = PptxParser::new()
            .parse(Cursor::new(bytes), "deck.pptx")
            .unwrap();

        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.slides[0].title, None);
        assert_eq!(presentation.slides[0].notes.as_deref(), Some("Still narrated"));
        assert_eq!(presentation.slides[1].title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_parse_path_rejects_legacy_ppt() {
        let mut file = tempfile::Builder::new().suffix(".ppt").tempfile().unwrap();
        file.write_all(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0])
            .unwrap();

        let err = PptxParser::new().parse_path(file.path()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
