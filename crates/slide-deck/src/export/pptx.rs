//! Minimal PresentationML package writer.
//!
//! Produces a 16:9 deck with one slide master (solid background and an
//! accent rule), one blank layout, absolutely positioned text boxes and
//! pictures, and optional speaker notes.

use crate::error::DeckError;
use crate::types::ThemeColors;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 10in x 5.625in in EMU.
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

const NOTES_WIDTH_EMU: i64 = 6_858_000;
const NOTES_HEIGHT_EMU: i64 = 9_144_000;
const FONT_FACE: &str = "Arial";
const ACCENT_LINE_Y_PCT: f64 = 90.0;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Position and size as percentages of the slide canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            pct(SLIDE_WIDTH_EMU, self.x),
            pct(SLIDE_HEIGHT_EMU, self.y),
            pct(SLIDE_WIDTH_EMU, self.w),
            pct(SLIDE_HEIGHT_EMU, self.h),
        )
    }
}

fn pct(total: i64, percent: f64) -> i64 {
    (total as f64 * percent / 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub text: String,
    pub size_pt: u32,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detect from magic bytes, falling back to the declared media type.
    pub fn detect(bytes: &[u8], mime: Option<&str>) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG") {
            return Some(Self::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }
        match mime?.split(';').next()?.trim() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub frame: Frame,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

/// Everything placed on one slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideSpec {
    pub texts: Vec<TextBox>,
    pub picture: Option<Picture>,
    pub notes: Option<String>,
}

/// Package-level metadata.
#[derive(Debug, Clone)]
pub struct DeckMeta {
    pub title: String,
    pub author: String,
    pub colors: ThemeColors,
    pub created: DateTime<Utc>,
}

/// Build the complete `.pptx` archive in memory.
pub fn write_package(meta: &DeckMeta, slides: &[SlideSpec]) -> Result<Vec<u8>, DeckError> {
    let noted: Vec<usize> = slides
        .iter()
        .enumerate()
        .filter(|(_, s)| s.notes.is_some())
        .map(|(i, _)| i + 1)
        .collect();
    let has_notes = !noted.is_empty();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |name: String, data: &[u8]| -> Result<(), DeckError> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };

    put("[Content_Types].xml".into(), content_types(slides.len(), &noted).as_bytes())?;
    put("_rels/.rels".into(), ROOT_RELS.as_bytes())?;
    put("docProps/core.xml".into(), core_props(meta).as_bytes())?;
    put("docProps/app.xml".into(), app_props(slides.len()).as_bytes())?;
    put("ppt/presentation.xml".into(), presentation_xml(slides.len(), has_notes).as_bytes())?;
    put(
        "ppt/_rels/presentation.xml.rels".into(),
        presentation_rels(slides.len(), has_notes).as_bytes(),
    )?;
    put("ppt/slideMasters/slideMaster1.xml".into(), slide_master(&meta.colors).as_bytes())?;
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
        rels(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;
    put("ppt/slideLayouts/slideLayout1.xml".into(), SLIDE_LAYOUT.as_bytes())?;
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
        rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
    )?;
    put("ppt/theme/theme1.xml".into(), theme_xml("Deck Theme").as_bytes())?;

    if has_notes {
        put("ppt/notesMasters/notesMaster1.xml".into(), notes_master().as_bytes())?;
        put(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels".into(),
            rels(&[("rId1", "theme", "../theme/theme2.xml")]).as_bytes(),
        )?;
        put("ppt/theme/theme2.xml".into(), theme_xml("Notes Theme").as_bytes())?;
    }

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        let mut slide_rels = vec![(
            "rId1".to_string(),
            "slideLayout",
            "../slideLayouts/slideLayout1.xml".to_string(),
        )];

        if let Some(picture) = &slide.picture {
            let media = format!("image{}.{}", n, picture.format.extension());
            put(format!("ppt/media/{}", media), &picture.bytes)?;
            slide_rels.push(("rId2".into(), "image", format!("../media/{}", media)));
        }

        if let Some(notes) = &slide.notes {
            let slide_target = format!("../slides/slide{}.xml", n);
            put(
                format!("ppt/notesSlides/notesSlide{}.xml", n),
                notes_slide(notes).as_bytes(),
            )?;
            put(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", n),
                rels(&[
                    ("rId1", "notesMaster", "../notesMasters/notesMaster1.xml"),
                    ("rId2", "slide", slide_target.as_str()),
                ])
                .as_bytes(),
            )?;
            slide_rels.push((
                "rId3".into(),
                "notesSlide",
                format!("../notesSlides/notesSlide{}.xml", n),
            ));
        }

        put(
            format!("ppt/slides/slide{}.xml", n),
            slide_xml(slide, &meta.colors).as_bytes(),
        )?;
        let borrowed: Vec<(&str, &str, &str)> = slide_rels
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        put(
            format!("ppt/slides/_rels/slide{}.xml.rels", n),
            rels(&borrowed).as_bytes(),
        )?;
    }

    Ok(zip.finish()?.into_inner())
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are invalid in XML 1.0.
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' => {}
            c => out.push(c),
        }
    }
    out
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(r#"{}<Relationships xmlns="{}">"#, XML_DECL, NS_PKG_RELS);
    for (id, kind, target) in entries {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

/// `notes` lists the 1-based numbers of slides that carry speaker notes.
fn content_types(slide_count: usize, notes: &[usize]) -> String {
    let mut xml = format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="gif" ContentType="image/gif"/>"#,
        XML_DECL
    );
    let mut part = |name: &str, content_type: &str| {
        let _ = write!(
            xml,
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            name, content_type
        );
    };

    part("/ppt/presentation.xml", &format!("{}.presentation.main+xml", CT_BASE));
    part("/ppt/slideMasters/slideMaster1.xml", &format!("{}.slideMaster+xml", CT_BASE));
    part("/ppt/slideLayouts/slideLayout1.xml", &format!("{}.slideLayout+xml", CT_BASE));
    part("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml");
    for n in 1..=slide_count {
        part(&format!("/ppt/slides/slide{}.xml", n), &format!("{}.slide+xml", CT_BASE));
    }
    if !notes.is_empty() {
        part("/ppt/notesMasters/notesMaster1.xml", &format!("{}.notesMaster+xml", CT_BASE));
        part("/ppt/theme/theme2.xml", "application/vnd.openxmlformats-officedocument.theme+xml");
    }
    for n in notes {
        part(
            &format!("/ppt/notesSlides/notesSlide{}.xml", n),
            &format!("{}.notesSlide+xml", CT_BASE),
        );
    }
    part("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml");
    part(
        "/docProps/app.xml",
        "application/vnd.openxmlformats-officedocument.extended-properties+xml",
    );
    xml.push_str("</Types>");
    xml
}

fn core_props(meta: &DeckMeta) -> String {
    let created = meta.created.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"{}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified></cp:coreProperties>"#,
        XML_DECL,
        escape_xml(&meta.title),
        escape_xml(&meta.author),
        created,
        created
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application><Slides>{}</Slides></Properties>"#,
        XML_DECL,
        env!("CARGO_PKG_NAME"),
        slide_count
    )
}

fn presentation_xml(slide_count: usize, has_notes: bool) -> String {
    let mut xml = format!(
        r#"{}<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        XML_DECL, NS_A, NS_R, NS_P
    );
    if has_notes {
        let _ = write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId{}"/></p:notesMasterIdLst>"#,
            slide_count + 3
        );
    }
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            let _ = write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2);
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
        SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU, NOTES_WIDTH_EMU, NOTES_HEIGHT_EMU
    );
    xml
}

/// rId1 master, rId2.. slides, then theme, then the notes master.
fn presentation_rels(slide_count: usize, has_notes: bool) -> String {
    let slide_targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (format!("rId{}", n + 1), format!("slides/slide{}.xml", n)))
        .collect();
    let theme_id = format!("rId{}", slide_count + 2);
    let notes_id = format!("rId{}", slide_count + 3);

    let mut entries: Vec<(&str, &str, &str)> =
        vec![("rId1", "slideMaster", "slideMasters/slideMaster1.xml")];
    entries.extend(
        slide_targets
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    entries.push((theme_id.as_str(), "theme", "theme/theme1.xml"));
    if has_notes {
        entries.push((notes_id.as_str(), "notesMaster", "notesMasters/notesMaster1.xml"));
    }
    rels(&entries)
}

const GROUP_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

fn slide_master(colors: &ThemeColors) -> String {
    format!(
        r#"{decl}<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{bg}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{group}<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="2" name="Accent Line"/><p:cNvCxnSpPr/><p:nvPr userDrawn="1"/></p:nvCxnSpPr><p:spPr><a:xfrm><a:off x="0" y="{line_y}"/><a:ext cx="{width}" cy="0"/></a:xfrm><a:prstGeom prst="line"><a:avLst/></a:prstGeom><a:ln w="12700"><a:solidFill><a:srgbClr val="{accent}"/></a:solidFill></a:ln></p:spPr></p:cxnSp></p:spTree></p:cSld>{clr_map}<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="2400"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#,
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = colors.background,
        group = GROUP_HEADER,
        line_y = pct(SLIDE_HEIGHT_EMU, ACCENT_LINE_Y_PCT),
        width = SLIDE_WIDTH_EMU,
        accent = colors.accent,
        clr_map = CLR_MAP,
    )
}

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

fn paragraphs(text: &str, size_pt: u32, bold: bool, italic: bool, color: &str) -> String {
    let size = size_pt * 100;
    let mut xml = String::new();
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            let _ = write!(
                xml,
                r#"<a:p><a:pPr algn="l"/><a:endParaRPr lang="en-US" sz="{}" dirty="0"/></a:p>"#,
                size
            );
            continue;
        }
        let _ = write!(
            xml,
            r#"<a:p><a:pPr algn="l"/><a:r><a:rPr lang="en-US" sz="{}" b="{}" i="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            size,
            u8::from(bold),
            u8::from(italic),
            color,
            FONT_FACE,
            escape_xml(line)
        );
    }
    xml
}

fn text_shape(id: usize, text: &TextBox, color: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#,
        id = id,
        xfrm = text.frame.xfrm(),
        body = paragraphs(&text.text, text.size_pt, text.bold, text.italic, color),
    )
}

fn picture_shape(id: usize, picture: &Picture) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Image {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id = id,
        xfrm = picture.frame.xfrm(),
    )
}

fn slide_xml(slide: &SlideSpec, colors: &ThemeColors) -> String {
    let mut shapes = String::new();
    let mut id = 2;
    if let Some(picture) = &slide.picture {
        shapes.push_str(&picture_shape(id, picture));
        id += 1;
    }
    for text in &slide.texts {
        shapes.push_str(&text_shape(id, text, colors.text));
        id += 1;
    }

    format!(
        r#"{}<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        XML_DECL, NS_A, NS_R, NS_P, GROUP_HEADER, shapes
    )
}

fn notes_master() -> String {
    format!(
        r#"{}<p:notesMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>{}</p:spTree></p:cSld>{}</p:notesMaster>"#,
        XML_DECL, NS_A, NS_R, NS_P, GROUP_HEADER, CLR_MAP
    )
}

fn notes_slide(notes: &str) -> String {
    format!(
        r#"{}<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>{}<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        GROUP_HEADER,
        paragraphs(notes, 12, false, false, "000000")
    )
}

fn theme_xml(name: &str) -> String {
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        r#"{decl}<a:theme xmlns:a="{a}" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="{name}"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        decl = XML_DECL,
        a = NS_A,
        name = name,
        font = FONT_FACE,
        fill = fill,
        line = line,
        effect = effect,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Theme;
    use std::io::Read;

    fn meta() -> DeckMeta {
        DeckMeta {
            title: "Cats & Dogs".into(),
            author: "tester".into(),
            colors: Theme::Midnight.colors(),
            created: Utc::now(),
        }
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\"'"), "a&lt;b &amp; &quot;c&quot;&apos;");
        assert_eq!(escape_xml("tab\tok\u{1}"), "tab\tok");
    }

    #[test]
    fn test_frame_to_emu() {
        let xfrm = Frame::new(5.0, 5.0, 90.0, 15.0).xfrm();
        assert!(xfrm.contains(r#"<a:off x="457200" y="257175"/>"#));
        assert!(xfrm.contains(r#"<a:ext cx="8229600" cy="771525"/>"#));
    }

    #[test]
    fn test_detect_image_format() {
        assert_eq!(ImageFormat::detect(b"\x89PNG\r\n", None), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(&[0xFF, 0xD8, 0xFF], None), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::detect(b"????", Some("image/jpeg; charset=binary")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect(b"RIFF", Some("image/webp")), None);
    }

    #[test]
    fn test_package_parts() {
        let slides = vec![
            SlideSpec {
                texts: vec![TextBox {
                    frame: Frame::new(5.0, 5.0, 90.0, 15.0),
                    text: "Hello <world>".into(),
                    size_pt: 44,
                    bold: true,
                    italic: false,
                }],
                picture: Some(Picture {
                    frame: Frame::new(5.0, 25.0, 45.0, 60.0),
                    bytes: b"\x89PNG fake".to_vec(),
                    format: ImageFormat::Png,
                }),
                notes: Some("Speak slowly".into()),
            },
            SlideSpec::default(),
        ];

        let bytes = write_package(&meta(), &slides).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/media/image1.png",
            "ppt/notesSlides/notesSlide1.xml",
            "ppt/notesMasters/notesMaster1.xml",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(!names.contains(&"ppt/notesSlides/notesSlide2.xml"));

        let slide1 = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("Hello &lt;world&gt;"));
        assert!(slide1.contains(r#"sz="4400" b="1""#));
        assert!(slide1.contains(r#"r:embed="rId2""#));

        let rels = read_entry(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../media/image1.png"));
        assert!(rels.contains("../notesSlides/notesSlide1.xml"));

        let core = read_entry(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Cats &amp; Dogs</dc:title>"));

        let master = read_entry(&bytes, "ppt/slideMasters/slideMaster1.xml");
        assert!(master.contains(r#"<a:srgbClr val="0F172A"/>"#));
        assert!(master.contains(r#"y="4629150""#));

        let content_types = read_entry(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/ppt/notesSlides/notesSlide1.xml"));
    }

    #[test]
    fn test_package_without_notes_has_no_notes_master() {
        let bytes = write_package(&meta(), &[SlideSpec::default()]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(!archive
            .file_names()
            .any(|n| n.starts_with("ppt/notesMasters")));

        let presentation = read_entry(&bytes, "ppt/presentation.xml");
        assert!(!presentation.contains("notesMasterIdLst"));
    }
}
