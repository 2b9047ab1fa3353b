//! Font loading, text shaping and line wrapping.
//!
//! Text is shaped with the bundled DejaVu Sans faces, which cover Latin and
//! Arabic. A line is split into bidi runs first and each run is shaped in
//! its own direction, so glyphs come back in visual (left to right) order
//! with Arabic letters already joined.

use rustybuzz::ttf_parser::{self, GlyphId};
use rustybuzz::{Direction, UnicodeBuffer};
use thiserror::Error;
use unicode_bidi::BidiInfo;

static REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name in the page dictionary.
    pub fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "DejaVuSans",
            Font::Bold => "DejaVuSans-Bold",
        }
    }

    /// The TrueType file embedded in every PDF.
    pub fn data(&self) -> &'static [u8] {
        match self {
            Font::Regular => REGULAR_TTF,
            Font::Bold => BOLD_TTF,
        }
    }
}

#[derive(Debug, Error)]
#[error("bundled font {0} could not be parsed")]
pub struct FontError(&'static str);

/// One shaped glyph. Metrics are in 1/1000 em.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    pub advance: f32,
    pub x_offset: f32,
    /// Source text of the glyph's cluster; only the first glyph of a
    /// cluster carries it.
    pub text: Option<String>,
}

impl ShapedGlyph {
    /// Glyph 0 is `.notdef`: the font has nothing for this character.
    pub fn is_missing(&self) -> bool {
        self.id == 0
    }
}

/// Font descriptor values, in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub bbox: [f32; 4],
}

struct LoadedFont {
    /// Metrics and glyph tables.
    face: ttf_parser::Face<'static>,
    shaper: rustybuzz::Face<'static>,
}

pub struct FontBook {
    regular: LoadedFont,
    bold: LoadedFont,
}

impl FontBook {
    pub fn load() -> Result<Self, FontError> {
        Ok(Self {
            regular: parse(Font::Regular)?,
            bold: parse(Font::Bold)?,
        })
    }

    fn loaded(&self, font: Font) -> &LoadedFont {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }

    fn face(&self, font: Font) -> &ttf_parser::Face<'static> {
        &self.loaded(font).face
    }

    fn scale(&self, font: Font) -> f32 {
        1000.0 / f32::from(self.face(font).units_per_em())
    }

    /// Shape one line of text. Control characters are treated as spaces.
    pub fn shape(&self, text: &str, font: Font) -> Vec<ShapedGlyph> {
        let text: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let mut glyphs = Vec::new();
        if text.is_empty() {
            return glyphs;
        }

        let bidi = BidiInfo::new(&text, None);
        for paragraph in &bidi.paragraphs {
            let (levels, runs) = bidi.visual_runs(paragraph, paragraph.range.clone());
            for run in runs {
                let direction = if levels[run.start].is_rtl() {
                    Direction::RightToLeft
                } else {
                    Direction::LeftToRight
                };
                self.shape_run(&text[run], direction, font, &mut glyphs);
            }
        }
        glyphs
    }

    fn shape_run(&self, run: &str, direction: Direction, font: Font, glyphs: &mut Vec<ShapedGlyph>) {
        let scale = self.scale(font);
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(run);
        buffer.set_direction(direction);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&self.loaded(font).shaper, &[], buffer);

        // Cluster values are byte offsets into `run`.
        let mut starts: Vec<usize> = output
            .glyph_infos()
            .iter()
            .map(|info| info.cluster as usize)
            .collect();
        starts.sort_unstable();
        starts.dedup();
        let mut claimed = vec![false; starts.len()];

        for (info, position) in output.glyph_infos().iter().zip(output.glyph_positions()) {
            let start = info.cluster as usize;
            let text = match starts.binary_search(&start) {
                Ok(slot) if !claimed[slot] => {
                    claimed[slot] = true;
                    let end = starts.get(slot + 1).copied().unwrap_or(run.len());
                    run.get(start..end).map(str::to_string)
                }
                _ => None,
            };
            glyphs.push(ShapedGlyph {
                id: u16::try_from(info.glyph_id).unwrap_or(0),
                advance: position.x_advance as f32 * scale,
                x_offset: position.x_offset as f32 * scale,
                text,
            });
        }
    }

    /// Width of `text` in points.
    pub fn width(&self, text: &str, font: Font, size: f32) -> f32 {
        self.shape(text, font).iter().map(|g| g.advance).sum::<f32>() * size / 1000.0
    }

    /// Unshaped advance of a glyph, as listed in the PDF width table.
    pub fn advance(&self, font: Font, id: u16) -> f32 {
        self.face(font)
            .glyph_hor_advance(GlyphId(id))
            .map_or(0.0, |a| f32::from(a) * self.scale(font))
    }

    pub fn metrics(&self, font: Font) -> FontMetrics {
        let face = self.face(font);
        let scale = self.scale(font);
        let bbox = face.global_bounding_box();
        FontMetrics {
            ascent: f32::from(face.ascender()) * scale,
            descent: f32::from(face.descender()) * scale,
            cap_height: f32::from(face.capital_height().unwrap_or(face.ascender())) * scale,
            bbox: [
                f32::from(bbox.x_min) * scale,
                f32::from(bbox.y_min) * scale,
                f32::from(bbox.x_max) * scale,
                f32::from(bbox.y_max) * scale,
            ],
        }
    }

    /// Greedy word wrap in logical order. Explicit newlines are kept; words
    /// wider than `max_width` are broken between characters. Always returns
    /// at least one (possibly empty) line.
    pub fn wrap(&self, text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.width(&candidate, font, size) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                for c in word.chars() {
                    current.push(c);
                    if self.width(&current, font, size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
            lines.push(current);
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

fn parse(font: Font) -> Result<LoadedFont, FontError> {
    let face = ttf_parser::Face::parse(font.data(), 0).map_err(|_| FontError(font.base_font()))?;
    Ok(LoadedFont {
        shaper: rustybuzz::Face::from_face(face.clone()),
        face,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> FontBook {
        FontBook::load().expect("bundled fonts parse")
    }

    fn cluster_text(glyphs: &[ShapedGlyph]) -> String {
        glyphs.iter().filter_map(|g| g.text.as_deref()).collect()
    }

    #[test]
    fn latin_and_arabic_have_glyphs() {
        let book = book();
        for text in ["Quote No. 12", "شركة مثلث الأنظمة", "١٢٬٣٤٥٫٥٠ ريال"] {
            let glyphs = book.shape(text, Font::Regular);
            assert!(!glyphs.is_empty());
            assert!(glyphs.iter().all(|g| !g.is_missing()), "missing glyph in {text}");
        }
    }

    #[test]
    fn reports_characters_the_font_lacks() {
        let glyphs = book().shape("漢", Font::Regular);
        assert!(glyphs.iter().any(ShapedGlyph::is_missing));
    }

    #[test]
    fn arabic_runs_come_back_in_visual_order() {
        let glyphs = book().shape("مرحبا", Font::Regular);
        assert_eq!(cluster_text(&glyphs), "ابحرم");
    }

    #[test]
    fn arabic_letters_take_joining_forms() {
        let book = book();
        let isolated = book.shape("ب", Font::Regular);
        let joined = book.shape("ببب", Font::Regular);
        assert_eq!(joined.len(), 3);
        // Visual order: final, medial, initial.
        assert_ne!(joined[1].id, isolated[0].id);
    }

    #[test]
    fn measures_text() {
        let book = book();
        let narrow = book.width("il", Font::Regular, 10.0);
        let wide = book.width("WM", Font::Regular, 10.0);
        assert!(narrow > 0.0 && wide > narrow);
        assert!(book.width("WM", Font::Bold, 10.0) > wide);
        assert_eq!(book.width("", Font::Regular, 10.0), 0.0);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let book = book();
        let lines = book.wrap("one two three four", Font::Regular, 10.0, 45.0);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|l| book.width(l, Font::Regular, 10.0) <= 45.0));
        assert_eq!(lines.join(" "), "one two three four");
    }

    #[test]
    fn breaks_overlong_words() {
        let lines = book().wrap("abcdefghijklmnopqrstuvwxyz", Font::Regular, 10.0, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        let book = book();
        assert_eq!(book.wrap("a\nb", Font::Regular, 10.0, 500.0), vec!["a", "b"]);
        assert_eq!(book.wrap("", Font::Regular, 10.0, 500.0), vec![""]);
    }
}
