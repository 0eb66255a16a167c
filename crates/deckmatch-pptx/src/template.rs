//! PPTX template loading and structural extraction.
//!
//! A template is opened as a ZIP container and three kinds of parts are
//! read: the canvas size from `ppt/presentation.xml`, the theme color
//! and font roles from `ppt/theme/theme1.xml`, and the placeholder
//! inventory of every `ppt/slideLayouts/slideLayoutN.xml`. A template
//! without a size element yields unset dimensions rather than an error;
//! downstream stages treat unset as "use defaults".

use crate::error::{PptxError, Result};
use crate::layout::{LayoutInfo, PlaceholderKind, PlaceholderRef};
use deckmatch_design::analysis::{RawDimensions, TemplateAnalysis};
use deckmatch_design::theme::ThemeRecord;
use deckmatch_design::units::SlideDimensions;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// A loaded PPTX/POTX template
#[derive(Debug, Clone)]
pub struct PptxTemplate {
    /// Template file path (if loaded from file)
    pub path: Option<String>,

    /// Theme color and font roles
    pub theme: ThemeRecord,

    /// Canvas size, when the template declares one
    pub dimensions: Option<SlideDimensions>,

    /// Slide layouts in file order
    layouts: Vec<LayoutInfo>,
}

impl PptxTemplate {
    /// Load a template from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PptxError::template_not_found(path.display().to_string())
            } else {
                PptxError::IoError(e)
            }
        })?;
        let mut template = Self::from_bytes(&data)?;
        template.path = Some(path.display().to_string());
        Ok(template)
    }

    /// Load a template from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = ZipArchive::new(cursor)
            .map_err(|_| PptxError::invalid_template("not a ZIP container"))?;

        let dimensions = Self::extract_slide_size(&mut archive)?;
        let theme = Self::extract_theme(&mut archive).unwrap_or_default();
        let layouts = Self::extract_layouts(&mut archive)?;

        Ok(Self {
            path: None,
            theme,
            dimensions,
            layouts,
        })
    }

    /// The standard built-in layout set, used when no template file is
    /// available (and by tests).
    pub fn standard() -> Self {
        use PlaceholderKind::*;
        let ph = PlaceholderRef::new;

        let layouts = vec![
            LayoutInfo::with_placeholders(0, "Title Slide", vec![ph(0, CenterTitle), ph(1, Subtitle)]),
            LayoutInfo::with_placeholders(1, "Title and Content", vec![ph(0, Title), ph(1, Body)]),
            LayoutInfo::with_placeholders(2, "Section Header", vec![ph(0, Title), ph(1, Body)]),
            LayoutInfo::with_placeholders(3, "Two Content", vec![ph(0, Title), ph(1, Body), ph(2, Body)]),
            LayoutInfo::with_placeholders(
                4,
                "Comparison",
                vec![ph(0, Title), ph(1, Body), ph(2, Body), ph(3, Body), ph(4, Body)],
            ),
            LayoutInfo::with_placeholders(5, "Title Only", vec![ph(0, Title)]),
            LayoutInfo::new(6, "Blank"),
            LayoutInfo::with_placeholders(
                7,
                "Content with Caption",
                vec![ph(0, Title), ph(1, Body), ph(2, Body)],
            ),
            LayoutInfo::with_placeholders(
                8,
                "Picture with Caption",
                vec![ph(0, Title), ph(1, Picture), ph(2, Body)],
            ),
        ];

        Self {
            path: None,
            theme: ThemeRecord::default(),
            dimensions: Some(SlideDimensions::from_emu(9_144_000, 6_858_000)),
            layouts,
        }
    }

    /// All layouts, in position order
    pub fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }

    /// Get a layout by 0-based position
    pub fn layout_at(&self, index: u32) -> Option<&LayoutInfo> {
        self.layouts.iter().find(|l| l.index == index)
    }

    /// Find a layout by name
    pub fn layout_by_name(&self, name: &str) -> Option<&LayoutInfo> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// The number of layouts
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// The structural analysis record for this template
    pub fn to_analysis(&self) -> TemplateAnalysis {
        TemplateAnalysis {
            color_scheme: self.theme.colors.clone(),
            font_scheme: Some(self.theme.fonts.clone()),
            slide_dimensions: match self.dimensions {
                Some(dims) => RawDimensions {
                    width: Some(dims.width_emu as f64),
                    height: Some(dims.height_emu as f64),
                },
                None => RawDimensions::default(),
            },
            layouts: self.layouts.iter().map(LayoutInfo::to_analysis).collect(),
            slides: Vec::new(),
        }
    }

    /// Extract the canvas size from presentation.xml. Absent part or
    /// absent `p:sldSz` element both yield `None`.
    fn extract_slide_size<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> Result<Option<SlideDimensions>> {
        let presentation_xml = match archive.by_name("ppt/presentation.xml") {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                contents
            }
            Err(_) => return Ok(None),
        };

        let mut reader = Reader::from_str(&presentation_xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut size: Option<(i64, i64)> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"p:sldSz" => {
                    let mut width = None;
                    let mut height = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"cx" => {
                                width = std::str::from_utf8(&attr.value)
                                    .ok()
                                    .and_then(|v| v.parse().ok());
                            }
                            b"cy" => {
                                height = std::str::from_utf8(&attr.value)
                                    .ok()
                                    .and_then(|v| v.parse().ok());
                            }
                            _ => {}
                        }
                    }
                    if let (Some(w), Some(h)) = (width, height) {
                        size = Some((w, h));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(PptxError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(size.map(|(w, h)| SlideDimensions::from_emu(w, h)))
    }

    /// Extract color and font roles from theme1.xml.
    fn extract_theme<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ThemeRecord> {
        let mut file = archive.by_name("ppt/theme/theme1.xml")?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let mut theme = ThemeRecord::default();
        let mut reader = Reader::from_str(&contents);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_clr_scheme = false;
        let mut current_role: Option<String> = None;
        // Which of majorFont/minorFont we are inside, if any
        let mut font_scope: Option<bool> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"a:clrScheme" => in_clr_scheme = true,
                    b"a:majorFont" => font_scope = Some(true),
                    b"a:minorFont" => font_scope = Some(false),
                    // Color values usually come as empty elements but may
                    // carry children (alpha modulation and the like)
                    b"a:srgbClr" => {
                        if let (Some(role), Some(val)) =
                            (current_role.as_ref(), attribute(e, b"val"))
                        {
                            theme.colors.insert(role.clone(), val);
                        }
                    }
                    b"a:sysClr" => {
                        if let (Some(role), Some(val)) =
                            (current_role.as_ref(), attribute(e, b"lastClr"))
                        {
                            theme.colors.insert(role.clone(), val);
                        }
                    }
                    name if in_clr_scheme && current_role.is_none() => {
                        if let Some(role) = local_name(name) {
                            current_role = Some(role.to_string());
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"a:clrScheme" => in_clr_scheme = false,
                    b"a:majorFont" | b"a:minorFont" => font_scope = None,
                    name => {
                        if current_role.as_deref() == local_name(name) {
                            current_role = None;
                        }
                    }
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    // A color role is either a fixed RGB value or a system
                    // color carrying its last-known concrete value.
                    b"a:srgbClr" => {
                        if let (Some(role), Some(val)) =
                            (current_role.as_ref(), attribute(e, b"val"))
                        {
                            theme.colors.insert(role.clone(), val);
                        }
                    }
                    b"a:sysClr" => {
                        if let (Some(role), Some(val)) =
                            (current_role.as_ref(), attribute(e, b"lastClr"))
                        {
                            theme.colors.insert(role.clone(), val);
                        }
                    }
                    b"a:latin" => {
                        if let (Some(major), Some(face)) = (font_scope, attribute(e, b"typeface")) {
                            let fonts = if major {
                                &mut theme.fonts.major
                            } else {
                                &mut theme.fonts.minor
                            };
                            fonts.insert("latin".to_string(), face);
                        }
                    }
                    b"a:font" => {
                        if let (Some(major), Some(script), Some(face)) = (
                            font_scope,
                            attribute(e, b"script"),
                            attribute(e, b"typeface"),
                        ) {
                            let fonts = if major {
                                &mut theme.fonts.major
                            } else {
                                &mut theme.fonts.minor
                            };
                            fonts.insert(script, face);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(PptxError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(theme)
    }

    /// Extract layouts from the slideLayouts directory.
    fn extract_layouts<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<LayoutInfo>> {
        let mut layout_files: Vec<(u32, String)> = (0..archive.len())
            .filter_map(|i| {
                archive.by_index(i).ok().map(|f| f.name().to_string())
            })
            .filter_map(|name| {
                let number = name
                    .strip_prefix("ppt/slideLayouts/slideLayout")?
                    .strip_suffix(".xml")?
                    .parse::<u32>()
                    .ok()?;
                Some((number, name))
            })
            .collect();

        layout_files.sort_by_key(|(number, _)| *number);

        let mut layouts = Vec::new();
        for (position, (number, file_name)) in layout_files.into_iter().enumerate() {
            let mut file = archive.by_name(&file_name)?;
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;

            match Self::parse_layout_xml(position as u32, number, &contents) {
                Ok(layout) => layouts.push(layout),
                Err(err) => log::warn!("skipping unreadable layout {file_name}: {err}"),
            }
        }

        Ok(layouts)
    }

    /// Parse a single layout XML part.
    fn parse_layout_xml(position: u32, file_number: u32, xml: &str) -> Result<LayoutInfo> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut layout_name = format!("Layout {file_number}");
        let mut placeholders = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"p:cSld" => {
                        if let Some(name) = attribute(e, b"name") {
                            layout_name = name;
                        }
                    }
                    b"p:ph" => {
                        let kind = attribute(e, b"type")
                            .map(|t| PlaceholderKind::from_ooxml_type(&t))
                            .unwrap_or(PlaceholderKind::Body);
                        let index = attribute(e, b"idx")
                            .and_then(|i| i.parse().ok())
                            .unwrap_or(0);
                        placeholders.push(PlaceholderRef::new(index, kind));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(PptxError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(LayoutInfo::with_placeholders(
            position,
            layout_name,
            placeholders,
        ))
    }
}

/// Strip the namespace prefix from an element name.
fn local_name(name: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(name).ok()?;
    Some(text.split_once(':').map(|(_, local)| local).unwrap_or(text))
}

/// Read one attribute as a string.
fn attribute(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| std::str::from_utf8(&attr.value).map(str::to_string).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Green Nature">
  <a:themeElements>
    <a:clrScheme name="Green">
      <a:dk1><a:sysClr val="windowText" lastClr="2D4A2E"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:accent1><a:srgbClr val="456446"/></a:accent1>
      <a:accent2><a:srgbClr val="6F8770"/></a:accent2>
    </a:clrScheme>
    <a:fontScheme name="Green">
      <a:majorFont>
        <a:latin typeface="Gothic A1"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
        <a:font script="Jpan" typeface="Yu Gothic"/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="Gothic A1"/>
      </a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    const PRESENTATION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:sldSz cx="12192000" cy="6858000"/>
</p:presentation>"#;

    const TITLE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="title">
  <p:cSld name="Title Slide">
    <p:spTree>
      <p:sp><p:nvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr></p:sp>
      <p:sp><p:nvSpPr><p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr></p:nvSpPr></p:sp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    const CONTENT_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="obj">
  <p:cSld name="Title and Content">
    <p:spTree>
      <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr></p:sp>
      <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr></p:sp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    fn template_bytes(include_size: bool) -> Vec<u8> {
        let cursor = std::io::Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = SimpleFileOptions::default();

        if include_size {
            zip.start_file("ppt/presentation.xml", options).unwrap();
            zip.write_all(PRESENTATION_XML.as_bytes()).unwrap();
        } else {
            zip.start_file("ppt/presentation.xml", options).unwrap();
            zip.write_all(
                br#"<?xml version="1.0"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#,
            )
            .unwrap();
        }

        zip.start_file("ppt/theme/theme1.xml", options).unwrap();
        zip.write_all(THEME_XML.as_bytes()).unwrap();

        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)
            .unwrap();
        zip.write_all(TITLE_LAYOUT_XML.as_bytes()).unwrap();

        zip.start_file("ppt/slideLayouts/slideLayout2.xml", options)
            .unwrap();
        zip.write_all(CONTENT_LAYOUT_XML.as_bytes()).unwrap();

        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_slide_size() {
        let template = PptxTemplate::from_bytes(&template_bytes(true)).unwrap();
        let dims = template.dimensions.unwrap();
        assert_eq!(dims.width_emu, 12_192_000);
        assert_eq!(dims.height_emu, 6_858_000);
        assert_eq!(dims.format_label(), "Widescreen (16:9)");
    }

    #[test]
    fn test_missing_size_element_is_unset() {
        let template = PptxTemplate::from_bytes(&template_bytes(false)).unwrap();
        assert!(template.dimensions.is_none());

        // And the analysis view carries the empty record through
        let analysis = template.to_analysis();
        assert!(!analysis.slide_dimensions.is_set());
    }

    #[test]
    fn test_extract_theme_colors() {
        let template = PptxTemplate::from_bytes(&template_bytes(true)).unwrap();

        // Fixed RGB roles
        assert_eq!(template.theme.colors["accent1"], "456446");
        assert_eq!(template.theme.colors["accent2"], "6F8770");
        // System colors resolve to their last-known value
        assert_eq!(template.theme.colors["dk1"], "2D4A2E");
        assert_eq!(template.theme.colors["lt1"], "FFFFFF");
    }

    #[test]
    fn test_extract_font_scheme() {
        let template = PptxTemplate::from_bytes(&template_bytes(true)).unwrap();

        assert_eq!(template.theme.fonts.major["latin"], "Gothic A1");
        assert_eq!(template.theme.fonts.major["Jpan"], "Yu Gothic");
        assert_eq!(template.theme.fonts.minor["latin"], "Gothic A1");
        // Empty ea/cs faces are not recorded
        assert!(!template.theme.fonts.major.contains_key("ea"));
    }

    #[test]
    fn test_extract_layouts() {
        let template = PptxTemplate::from_bytes(&template_bytes(true)).unwrap();

        assert_eq!(template.layout_count(), 2);

        let title = template.layout_at(0).unwrap();
        assert_eq!(title.name, "Title Slide");
        assert!(title.title_placeholder().is_some());
        assert!(title.subtitle_placeholder().is_some());

        let content = template.layout_at(1).unwrap();
        assert_eq!(content.name, "Title and Content");
        // The untyped idx=1 placeholder is a body placeholder
        assert_eq!(content.body_placeholder().unwrap().index, 1);

        assert!(template.layout_by_name("Title and Content").is_some());
        assert!(template.layout_by_name("Nonexistent Layout").is_none());
    }

    #[test]
    fn test_analysis_histograms_see_through_ooxml_names() {
        let template = PptxTemplate::from_bytes(&template_bytes(true)).unwrap();
        let analysis = template.to_analysis();

        let title = &analysis.layouts[0];
        let kinds: Vec<&str> = title.placeholders.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, vec!["TITLE", "SUBTITLE"]);
    }

    #[test]
    fn test_standard_layout_set() {
        let template = PptxTemplate::standard();

        assert_eq!(template.layout_count(), 9);
        assert_eq!(template.layout_at(0).unwrap().name, "Title Slide");
        assert_eq!(template.layout_at(1).unwrap().name, "Title and Content");
        assert!(template.layout_at(99).is_none());
        assert!(template.dimensions.is_some());
    }

    #[test]
    fn test_from_file_not_found() {
        let err = PptxTemplate::from_file("/nonexistent/deck.pptx").unwrap_err();
        assert_eq!(err.code(), "PPTX001");
    }

    #[test]
    fn test_not_a_zip() {
        let err = PptxTemplate::from_bytes(b"plainly not a zip").unwrap_err();
        assert_eq!(err.code(), "PPTX002");
    }
}
