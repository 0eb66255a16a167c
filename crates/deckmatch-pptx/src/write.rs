//! PPTX package generation from an assembled deck.
//!
//! The writer emits a complete OOXML package part by part: content
//! types, relationships, document properties, the presentation part
//! sized from the design specification, a theme carrying the design's
//! brand colors and font family, one master, the two layouts slides
//! bind against, and one slide part per assembled slide. Image bindings
//! are references to external assets and produce no media parts.

use crate::constants::*;
use crate::deck::{AssembledDeck, AssembledSlide, BoundBody, BoundContent, TextStyle};
use crate::error::Result;
use deckmatch_design::spec::{BACKGROUND, TEXT_DARK};
use deckmatch_design::{DesignSpecification, Rgb};
use deckmatch_content::ContentType;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// PPTX document writer
pub struct DeckWriter<'a> {
    /// Design specification driving size, fonts, and colors
    design: &'a DesignSpecification,

    /// Presentation title for docProps
    title: Option<String>,

    /// Presentation author for docProps
    author: Option<String>,
}

impl<'a> DeckWriter<'a> {
    /// Create a writer over a design specification
    pub fn new(design: &'a DesignSpecification) -> Self {
        Self {
            design,
            title: None,
            author: None,
        }
    }

    /// Set the presentation title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Generate the PPTX as bytes
    pub fn generate(&self, deck: &AssembledDeck) -> Result<Vec<u8>> {
        let buffer = Vec::new();
        let cursor = Cursor::new(buffer);
        let mut zip = ZipWriter::new(cursor);

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        self.write_content_types(&mut zip, options, deck)?;
        self.write_root_rels(&mut zip, options)?;
        self.write_app_xml(&mut zip, options, deck)?;
        self.write_core_xml(&mut zip, options)?;
        self.write_presentation_xml(&mut zip, options, deck)?;
        self.write_presentation_rels(&mut zip, options, deck)?;
        self.write_pres_props(&mut zip, options)?;
        self.write_view_props(&mut zip, options)?;
        self.write_theme(&mut zip, options)?;
        self.write_slide_master(&mut zip, options)?;
        self.write_slide_layouts(&mut zip, options)?;

        for (i, slide) in deck.slides.iter().enumerate() {
            self.write_slide(&mut zip, options, i + 1, slide)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Write [Content_Types].xml
    fn write_content_types<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        deck: &AssembledDeck,
    ) -> Result<()> {
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>
  <Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
        );

        for i in 1..=deck.slides.len() {
            content.push_str(&format!(
                "  <Override PartName=\"/ppt/slides/slide{i}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n",
            ));
        }

        content.push_str("</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write _rels/.rels
    fn write_root_rels<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write docProps/app.xml
    fn write_app_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        deck: &AssembledDeck,
    ) -> Result<()> {
        zip.start_file("docProps/app.xml", options)?;

        let format = self
            .design
            .slide_dimensions
            .as_ref()
            .map(|d| d.format.as_str())
            .unwrap_or("On-screen Show (4:3)");

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Words>0</Words>
  <Application>deckmatch</Application>
  <PresentationFormat>{}</PresentationFormat>
  <Slides>{}</Slides>
  <Notes>0</Notes>
  <HiddenSlides>0</HiddenSlides>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>1.0</AppVersion>
</Properties>"#,
            escape_xml(format),
            deck.slides.len()
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write docProps/core.xml
    fn write_core_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("docProps/core.xml", options)?;

        let title = self.title.as_deref().unwrap_or("Presentation");
        let author = self.author.as_deref().unwrap_or("deckmatch");
        let now = timestamp();

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{}</dc:title>
  <dc:creator>{}</dc:creator>
  <cp:lastModifiedBy>{}</cp:lastModifiedBy>
  <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>
</cp:coreProperties>"#,
            escape_xml(title),
            escape_xml(author),
            escape_xml(author),
            now,
            now
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/presentation.xml
    fn write_presentation_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        deck: &AssembledDeck,
    ) -> Result<()> {
        zip.start_file("ppt/presentation.xml", options)?;

        let size = self.design.dimensions_or_default();

        let mut slide_refs = String::new();
        for i in 1..=deck.slides.len() {
            slide_refs.push_str(&format!(
                "    <p:sldId id=\"{}\" r:id=\"rId{}\"/>\n",
                255 + i,
                i + 3 // rId1=slideMaster, rId2=presProps, rId3=theme, rId4+=slides
            ));
        }

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="2147483648" r:id="rId1"/>
  </p:sldMasterIdLst>
  <p:sldIdLst>
{}  </p:sldIdLst>
  <p:sldSz cx="{}" cy="{}"/>
  <p:notesSz cx="{}" cy="{}"/>
</p:presentation>"#,
            NS_DRAWING,
            NS_RELATIONSHIPS,
            NS_PRESENTATION,
            slide_refs,
            size.width_emu,
            size.height_emu,
            size.height_emu, // Notes are rotated
            size.width_emu
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/_rels/presentation.xml.rels
    fn write_presentation_rels<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        deck: &AssembledDeck,
    ) -> Result<()> {
        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps" Target="presProps.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
"#,
        );

        for i in 1..=deck.slides.len() {
            rels.push_str(&format!(
                "  <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>\n",
                i + 3,
                REL_TYPE_SLIDE,
                i
            ));
        }

        rels.push_str("</Relationships>");

        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write ppt/presProps.xml
    fn write_pres_props<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/presProps.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:extLst/>
</p:presentationPr>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/viewProps.xml
    fn write_view_props<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/viewProps.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
</p:viewPr>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/theme/theme1.xml, carrying the design's brand colors
    /// and font family so the package matches the specification even
    /// when opened without any slide content.
    fn write_theme<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/theme/theme1.xml", options)?;

        let palette = &self.design.brand_guidelines.color_palette;
        let font = escape_xml(self.design.primary_font());

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{}" name="{}">
  <a:themeElements>
    <a:clrScheme name="deckmatch">
      <a:dk1><a:srgbClr val="{}"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="{}"/></a:lt1>
      <a:dk2><a:srgbClr val="{}"/></a:dk2>
      <a:lt2><a:srgbClr val="{}"/></a:lt2>
      <a:accent1><a:srgbClr val="{}"/></a:accent1>
      <a:accent2><a:srgbClr val="{}"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="deckmatch">
      <a:majorFont>
        <a:latin typeface="{}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="{}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
            NS_DRAWING,
            escape_xml(&self.design.brand_guidelines.theme),
            ooxml_hex(&palette.text_dark, TEXT_DARK),
            ooxml_hex(&palette.background, BACKGROUND),
            ooxml_hex(&palette.text_dark, TEXT_DARK),
            ooxml_hex(&palette.secondary, BACKGROUND),
            ooxml_hex(&palette.primary, TEXT_DARK),
            ooxml_hex(&palette.accent, TEXT_DARK),
            font,
            font
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/slideMasters/slideMaster1.xml
    fn write_slide_master<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="rId1"/>
    <p:sldLayoutId id="2147483650" r:id="rId2"/>
  </p:sldLayoutIdLst>
</p:sldMaster>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );

        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;

        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{}" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId3" Type="{}" Target="../theme/theme1.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_LAYOUT, REL_TYPE_SLIDE_LAYOUT, REL_TYPE_THEME
        );

        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write the two slide layouts slides bind against
    fn write_slide_layouts<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        let layout_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_MASTER
        );

        // Layout 1: Title Slide
        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="title" preserve="1">
  <p:cSld name="Title Slide">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="2" name="Title 1"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="ctrTitle"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr>
          <a:xfrm>
            <a:off x="685800" y="2130425"/>
            <a:ext cx="7772400" cy="1470025"/>
          </a:xfrm>
        </p:spPr>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
          <a:p><a:endParaRPr lang="en-US"/></a:p>
        </p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="3" name="Subtitle 2"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr>
          <a:xfrm>
            <a:off x="1371600" y="3886200"/>
            <a:ext cx="6400800" cy="1752600"/>
          </a:xfrm>
        </p:spPr>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
          <a:p><a:endParaRPr lang="en-US"/></a:p>
        </p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
        zip.write_all(layout_rels.as_bytes())?;

        // Layout 2: Title and Content
        zip.start_file("ppt/slideLayouts/slideLayout2.xml", options)?;
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="obj" preserve="1">
  <p:cSld name="Title and Content">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="2" name="Title 1"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="title"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr>
          <a:xfrm>
            <a:off x="457200" y="274638"/>
            <a:ext cx="8229600" cy="1143000"/>
          </a:xfrm>
        </p:spPr>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
          <a:p><a:endParaRPr lang="en-US"/></a:p>
        </p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="3" name="Content Placeholder 2"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph idx="1"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr>
          <a:xfrm>
            <a:off x="457200" y="1600200"/>
            <a:ext cx="8229600" cy="4525963"/>
          </a:xfrm>
        </p:spPr>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
          <a:p><a:endParaRPr lang="en-US"/></a:p>
        </p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideLayouts/_rels/slideLayout2.xml.rels", options)?;
        zip.write_all(layout_rels.as_bytes())?;

        Ok(())
    }

    /// Write a single slide part and its relationships
    fn write_slide<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide_num: usize,
        slide: &AssembledSlide,
    ) -> Result<()> {
        zip.start_file(format!("ppt/slides/slide{slide_num}.xml"), options)?;
        zip.write_all(self.slide_xml(slide).as_bytes())?;

        // Title-slide layouts bind to layout 1, everything else to 2
        let layout_num = if slide.layout_index == 0 { 1 } else { 2 };

        zip.start_file(
            format!("ppt/slides/_rels/slide{slide_num}.xml.rels"),
            options,
        )?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout{}.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_LAYOUT, layout_num
        );
        zip.write_all(rels.as_bytes())?;

        Ok(())
    }

    /// Generate one slide's XML from its bindings
    fn slide_xml(&self, slide: &AssembledSlide) -> String {
        let mut shapes = String::new();
        let mut shape_id = 2;

        for binding in &slide.bindings {
            match &binding.body {
                BoundBody::Paragraphs(_) => {
                    shapes.push_str(&self.text_shape(shape_id, slide, binding));
                    shape_id += 1;
                }
                BoundBody::Table(rows) => {
                    shapes.push_str(&self.table_frame(shape_id, binding, rows));
                    shape_id += 1;
                }
                // Image bindings reference external assets; no media
                // parts are embedded
                BoundBody::ImageRef(_) => {}
            }
        }

        let background = slide
            .background
            .map(|color| {
                format!(
                    "    <p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>\n",
                    color.to_ooxml()
                )
            })
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
{}    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
{}    </p:spTree>
  </p:cSld>
</p:sld>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, background, shapes
        )
    }

    /// Generate a placeholder text shape
    fn text_shape(&self, id: u32, slide: &AssembledSlide, binding: &BoundContent) -> String {
        let (ph_attr, name) = match binding.content_type {
            ContentType::Title => {
                let ph_type = if slide.layout_index == 0 { "ctrTitle" } else { "title" };
                (format!("type=\"{ph_type}\""), "Title")
            }
            ContentType::Subtitle => (
                format!("type=\"subTitle\" idx=\"{}\"", binding.placeholder_index.max(1)),
                "Subtitle",
            ),
            _ => (
                format!("idx=\"{}\"", binding.placeholder_index.max(1)),
                "Content Placeholder",
            ),
        };

        let paragraphs = match &binding.body {
            BoundBody::Paragraphs(paragraphs) => paragraphs,
            _ => return String::new(),
        };

        let is_list = binding.content_type == ContentType::BulletList;
        let mut body = String::new();
        for text in paragraphs {
            let ppr = if is_list { "<a:pPr lvl=\"0\"/>" } else { "" };
            body.push_str(&format!(
                "          <a:p>{}\n{}          </a:p>\n",
                ppr,
                text_run(text, binding.style.as_ref())
            ));
        }

        format!(
            r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{id}" name="{name} {id}"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph {ph_attr}/></p:nvPr>
        </p:nvSpPr>
        <p:spPr/>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
{body}        </p:txBody>
      </p:sp>
"#
        )
    }

    /// Generate a table graphic frame
    fn table_frame(&self, id: u32, binding: &BoundContent, rows: &[Vec<String>]) -> String {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let table_width: i64 = 8_229_600;
        let column_width = table_width / columns as i64;
        let row_height: i64 = 370_840;

        let mut grid = String::new();
        for _ in 0..columns {
            grid.push_str(&format!("              <a:gridCol w=\"{column_width}\"/>\n"));
        }

        let mut body = String::new();
        for row in rows {
            body.push_str(&format!("              <a:tr h=\"{row_height}\">\n"));
            for column in 0..columns {
                let text = row.get(column).map(String::as_str).unwrap_or("");
                body.push_str(&format!(
                    "                <a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>\n{}                </a:p></a:txBody><a:tcPr/></a:tc>\n",
                    text_run(text, binding.style.as_ref())
                ));
            }
            body.push_str("              </a:tr>\n");
        }

        format!(
            r#"      <p:graphicFrame>
        <p:nvGraphicFramePr>
          <p:cNvPr id="{id}" name="Table {id}"/>
          <p:cNvGraphicFramePr/>
          <p:nvPr/>
        </p:nvGraphicFramePr>
        <p:xfrm>
          <a:off x="457200" y="1600200"/>
          <a:ext cx="{table_width}" cy="{}"/>
        </p:xfrm>
        <a:graphic>
          <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">
            <a:tbl>
              <a:tblPr firstRow="1" bandRow="1"/>
              <a:tblGrid>
{grid}              </a:tblGrid>
{body}            </a:tbl>
          </a:graphicData>
        </a:graphic>
      </p:graphicFrame>
"#,
            row_height * rows.len() as i64
        )
    }
}

/// Generate one text run, styled when a style is present
fn text_run(text: &str, style: Option<&TextStyle>) -> String {
    let rpr = match style {
        Some(style) => format!(
            "<a:rPr lang=\"en-US\" sz=\"{}\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:latin typeface=\"{}\"/></a:rPr>",
            style.size_pt * 100,
            style.color.to_ooxml(),
            escape_xml(&style.font_family)
        ),
        None => "<a:rPr lang=\"en-US\"/>".to_string(),
    };

    format!(
        "            <a:r>\n              {}\n              <a:t>{}</a:t>\n            </a:r>\n",
        rpr,
        escape_xml(text)
    )
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Hex value formatted for OOXML attributes, with a fallback for
/// unparseable palette entries
fn ooxml_hex(hex: &str, fallback: &str) -> String {
    Rgb::from_hex(hex)
        .or_else(|_| Rgb::from_hex(fallback))
        .map(Rgb::to_ooxml)
        .unwrap_or_else(|_| "000000".to_string())
}

/// Fixed package timestamp; document dates are not semantic here
fn timestamp() -> String {
    "2025-01-01T00:00:00Z".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::SlideAssembler;
    use crate::template::PptxTemplate;
    use deckmatch_content::MappingSet;
    use serde_json::json;
    use std::io::Read;
    use zip::ZipArchive;

    fn record() -> serde_json::Value {
        json!({
            "presentation_data": {
                "title_slide": {
                    "title": "Sustainable Urban Farming",
                    "subtitle": "Feeding Cities Differently"
                },
                "benefits_slide": {
                    "slide_title": "Benefits",
                    "text_body": ["Lower food miles", "Year-round yield"],
                    "image_description": "rooftop garden"
                },
                "impact_slide": {
                    "slide_title": "Impact",
                    "table_data": [["Metric", "Value"], ["Yield", "12t"]]
                }
            }
        })
    }

    fn generated_deck() -> Vec<u8> {
        let design = DesignSpecification::default();
        let template = PptxTemplate::standard();
        let mappings = MappingSet::default_set();
        let deck = SlideAssembler::new(&design, &template, &mappings).assemble(&record());
        DeckWriter::new(&design)
            .with_title("Sustainable Urban Farming")
            .generate(&deck)
            .unwrap()
    }

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn test_generate_is_a_valid_package() {
        let bytes = generated_deck();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/theme/theme1.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/slide3.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }
    }

    #[test]
    fn test_slide_size_comes_from_design() {
        let bytes = generated_deck();
        let presentation = part(&bytes, "ppt/presentation.xml");
        // Default design has no dimensions, so the standard 4:3 applies
        assert!(presentation.contains("cx=\"9144000\" cy=\"6858000\""));
    }

    #[test]
    fn test_title_run_is_styled() {
        let bytes = generated_deck();
        let slide1 = part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide1.contains("<a:t>Sustainable Urban Farming</a:t>"));
        assert!(slide1.contains("sz=\"4400\""));
        assert!(slide1.contains("val=\"2D4A2E\""));
        assert!(slide1.contains("typeface=\"Gothic A1\""));
        assert!(slide1.contains("type=\"ctrTitle\""));
    }

    #[test]
    fn test_bullet_paragraphs_at_level_zero() {
        let bytes = generated_deck();
        let slide2 = part(&bytes, "ppt/slides/slide2.xml");

        assert!(slide2.contains("<a:pPr lvl=\"0\"/>"));
        assert!(slide2.contains("<a:t>Lower food miles</a:t>"));
        assert!(slide2.contains("<a:t>Year-round yield</a:t>"));
        // Order preserved
        let first = slide2.find("Lower food miles").unwrap();
        let second = slide2.find("Year-round yield").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_table_slide_has_graphic_frame() {
        let bytes = generated_deck();
        let slide3 = part(&bytes, "ppt/slides/slide3.xml");

        assert!(slide3.contains("<a:tbl>"));
        assert!(slide3.contains("<a:t>Metric</a:t>"));
        assert!(slide3.contains("<a:t>12t</a:t>"));
        assert_eq!(slide3.matches("<a:gridCol").count(), 2);
        assert_eq!(slide3.matches("<a:tr ").count(), 2);
    }

    #[test]
    fn test_theme_carries_brand_colors_and_font() {
        let bytes = generated_deck();
        let theme = part(&bytes, "ppt/theme/theme1.xml");

        assert!(theme.contains("val=\"456446\"")); // brand primary
        assert!(theme.contains("val=\"2D4A2E\"")); // text dark
        assert!(theme.contains("typeface=\"Gothic A1\""));
    }

    #[test]
    fn test_background_fill_is_written_when_set() {
        let mut design = DesignSpecification::default();
        design.brand_guidelines.color_palette.background = "#e7f3ec".to_string();
        let template = PptxTemplate::standard();
        let mappings = MappingSet::default_set();
        let deck = SlideAssembler::new(&design, &template, &mappings).assemble(&record());

        let bytes = DeckWriter::new(&design).generate(&deck).unwrap();
        let slide1 = part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("<p:bg>"));
        assert!(slide1.contains("val=\"E7F3EC\""));
    }

    #[test]
    fn test_white_background_is_omitted() {
        let bytes = generated_deck();
        let slide1 = part(&bytes, "ppt/slides/slide1.xml");
        assert!(!slide1.contains("<p:bg>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Food & Farming"), "Food &amp; Farming");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_image_bindings_produce_no_media() {
        let bytes = generated_deck();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let media: Vec<String> = (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
            .filter(|name| name.starts_with("ppt/media/"))
            .collect();
        assert!(media.is_empty());
    }
}
