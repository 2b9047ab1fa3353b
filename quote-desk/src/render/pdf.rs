//! PDF serialisation of paginated blocks with lopdf.
//!
//! Both faces are embedded as Type0 fonts (Identity-H, CID = glyph id).
//! Text is written as shaped glyph ids, and each font carries a ToUnicode
//! map so the document stays searchable and copyable.

use super::layout::{Align, Element, Frame, Page, PAGE_HEIGHT, PAGE_WIDTH};
use super::logo::LogoImage;
use super::text::{Font, FontBook};
use super::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::collections::BTreeMap;

const LOGO_RESOURCE: &str = "Im1";
const FOOTER_SIZE: f32 = 8.0;
const FONTS: [Font; 2] = [Font::Regular, Font::Bold];

/// Glyph ids used per font, with the text each one stands for.
type GlyphUsage = BTreeMap<Font, BTreeMap<u16, Option<String>>>;

/// Encoded document plus the number of glyphs the fonts could not supply.
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub missing_glyphs: usize,
}

pub fn write_pdf(
    pages: &[Page],
    frame: &Frame,
    logo: Option<&LogoImage>,
    book: &FontBook,
) -> Result<PdfOutput, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Font objects are filled in once every page has been written and the
    // glyph set is known.
    let mut font_ids = BTreeMap::new();
    let mut fonts = Dictionary::new();
    for font in FONTS {
        let id = doc.new_object_id();
        fonts.set(font.resource(), id);
        font_ids.insert(font, id);
    }

    let mut resources = dictionary! { "Font" => fonts };
    if let Some(logo) = logo {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => logo.pixel_width as i64,
                "Height" => logo.pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            logo.jpeg.clone(),
        )
        .with_compression(false);
        let image_id = doc.add_object(image);
        resources.set("XObject", dictionary! { LOGO_RESOURCE => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut writer = PageWriter::new(book);
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let total = pages.len();

    for (index, page) in pages.iter().enumerate() {
        writer.operations.clear();
        for placed in &page.blocks {
            for element in &placed.block.elements {
                writer.element(element, frame.left, placed.top);
            }
        }
        writer.text(
            frame.left + frame.width / 2.0,
            frame.bottom / 2.0,
            &format!("Page {} of {}", index + 1, total),
            Font::Regular,
            FOOTER_SIZE,
            Align::Center,
        );

        let content = Content {
            operations: std::mem::take(&mut writer.operations),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    for (font, id) in font_ids {
        let used = writer.used.remove(&font).unwrap_or_default();
        let dict = embed_font(&mut doc, book, font, &used);
        doc.objects.insert(id, Object::Dictionary(dict));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(PdfOutput {
        bytes,
        missing_glyphs: writer.missing,
    })
}

// TODO: subset the embedded faces to the used glyphs; the full files make
// up most of the output size.
fn embed_font(
    doc: &mut Document,
    book: &FontBook,
    font: Font,
    used: &BTreeMap<u16, Option<String>>,
) -> Dictionary {
    let data = font.data();
    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => data.len() as i64 },
        data.to_vec(),
    ));

    let metrics = book.metrics(font);
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.base_font(),
        "Flags" => 32_i64,
        "FontBBox" => metrics.bbox.iter().map(|v| Object::Real(*v)).collect::<Vec<_>>(),
        "ItalicAngle" => 0_i64,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => 80_i64,
        "FontFile2" => file_id,
    });

    let widths: Vec<Object> = used
        .keys()
        .flat_map(|&id| {
            [
                Object::Integer(i64::from(id)),
                Object::Array(vec![book.advance(font, id).into()]),
            ]
        })
        .collect();
    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font.base_font(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0_i64,
        },
        "FontDescriptor" => descriptor_id,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), to_unicode_cmap(used).into_bytes()));

    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font.base_font(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant_id)],
        "ToUnicode" => to_unicode_id,
    }
}

const CMAP_HEADER: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
";

const CMAP_FOOTER: &str = "endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

/// ToUnicode CMap mapping each used glyph id to its UTF-16BE text.
fn to_unicode_cmap(used: &BTreeMap<u16, Option<String>>) -> String {
    let entries: Vec<String> = used
        .iter()
        .filter_map(|(id, text)| {
            let units: String = text
                .as_deref()?
                .encode_utf16()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            (!units.is_empty()).then(|| format!("<{:04X}> <{}>", id, units))
        })
        .collect();

    let mut cmap = String::from(CMAP_HEADER);
    // At most 100 mappings per section.
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for entry in chunk {
            cmap.push_str(entry);
            cmap.push('\n');
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(CMAP_FOOTER);
    cmap
}

struct PageWriter<'a> {
    book: &'a FontBook,
    operations: Vec<Operation>,
    used: GlyphUsage,
    missing: usize,
}

impl<'a> PageWriter<'a> {
    fn new(book: &'a FontBook) -> Self {
        Self {
            book,
            operations: Vec::new(),
            used: GlyphUsage::new(),
            missing: 0,
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn element(&mut self, element: &Element, left: f32, top: f32) {
        match element {
            Element::Text {
                x,
                baseline,
                text,
                font,
                size,
                align,
            } => self.text(left + x, top - baseline, text, *font, *size, *align),
            Element::Rule { x1, x2, y, width } => {
                self.op("w", vec![(*width).into()]);
                self.op("m", vec![(left + x1).into(), (top - y).into()]);
                self.op("l", vec![(left + x2).into(), (top - y).into()]);
                self.op("S", vec![]);
            }
            Element::Fill {
                x,
                y,
                width,
                height,
                gray,
            } => {
                self.op("q", vec![]);
                self.op("g", vec![(*gray).into()]);
                self.op(
                    "re",
                    vec![
                        (left + x).into(),
                        (top - y - height).into(),
                        (*width).into(),
                        (*height).into(),
                    ],
                );
                self.op("f", vec![]);
                self.op("Q", vec![]);
            }
            Element::Logo {
                x,
                y,
                width,
                height,
            } => {
                self.op("q", vec![]);
                self.op(
                    "cm",
                    vec![
                        (*width).into(),
                        0_i64.into(),
                        0_i64.into(),
                        (*height).into(),
                        (left + x).into(),
                        (top - y - height).into(),
                    ],
                );
                self.op("Do", vec![LOGO_RESOURCE.into()]);
                self.op("Q", vec![]);
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font: Font, size: f32, align: Align) {
        let glyphs = self.book.shape(text, font);
        if glyphs.is_empty() {
            return;
        }
        self.missing += glyphs.iter().filter(|g| g.is_missing()).count();

        let width = glyphs.iter().map(|g| g.advance).sum::<f32>() * size / 1000.0;
        let x = match align {
            Align::Left => x,
            Align::Right => x - width,
            Align::Center => x - width / 2.0,
        };

        // TJ moves the pen by each glyph's table width; the numbers between
        // glyphs correct that to the shaped position.
        let used = self.used.entry(font).or_default();
        let mut shown: Vec<Object> = Vec::new();
        let mut run: Vec<u8> = Vec::new();
        for glyph in &glyphs {
            if glyph.x_offset != 0.0 {
                flush(&mut run, &mut shown);
                shown.push((-glyph.x_offset).into());
            }
            run.extend_from_slice(&glyph.id.to_be_bytes());

            let correction = self.book.advance(font, glyph.id) - glyph.advance + glyph.x_offset;
            if correction.abs() > 0.01 {
                flush(&mut run, &mut shown);
                shown.push(correction.into());
            }

            let mapped = used.entry(glyph.id).or_insert(None);
            if mapped.is_none() {
                mapped.clone_from(&glyph.text);
            }
        }
        flush(&mut run, &mut shown);

        self.op("BT", vec![]);
        self.op("Tf", vec![font.resource().into(), size.into()]);
        self.op("Td", vec![x.into(), y.into()]);
        self.op("TJ", vec![Object::Array(shown)]);
        self.op("ET", vec![]);
    }
}

fn flush(run: &mut Vec<u8>, shown: &mut Vec<Object>) {
    if !run.is_empty() {
        shown.push(Object::String(std::mem::take(run), StringFormat::Hexadecimal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmap_maps_glyphs_to_utf16() {
        let used = BTreeMap::from([
            (3_u16, Some(" ".to_string())),
            (0x0201, Some("لأ".to_string())),
            (7, None),
        ]);
        let cmap = to_unicode_cmap(&used);
        assert!(cmap.contains("2 beginbfchar\n<0003> <0020>\n<0201> <06440623>\nendbfchar\n"));
        assert!(cmap.starts_with("/CIDInit /ProcSet findresource begin\n"));
        assert!(cmap.ends_with("end\nend\n"));
    }

    #[test]
    fn cmap_sections_hold_at_most_100_entries() {
        let used: BTreeMap<u16, Option<String>> =
            (1..=150).map(|id| (id, Some("a".to_string()))).collect();
        let cmap = to_unicode_cmap(&used);
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("50 beginbfchar"));
    }
}
