//! Block model and page breaking.
//!
//! A document is a flat list of blocks laid out top to bottom. Blocks are
//! never split; anything that may flow across pages (notes, table rows) is
//! emitted as one block per unit.

use super::text::{Font, FontBook};
use super::RenderWarning;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LEADING: f32 = 1.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Drawing primitive. `x` is measured from the left margin and `y` offsets
/// downwards from the top of the owning block.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: Font,
        size: f32,
        align: Align,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Content,
    /// Repeated at the top of every page a table continues on.
    TableHeader,
    TableRow,
    /// Forces following content onto a new page; no height.
    PageBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Names the block in warnings.
    pub label: &'static str,
    pub height: f32,
    /// Start a new page unless this block and the next fit together.
    pub keep_with_next: bool,
    pub elements: Vec<Element>,
}

impl Block {
    pub fn new(kind: BlockKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            height: 0.0,
            keep_with_next: false,
            elements: Vec::new(),
        }
    }

    pub fn page_break() -> Self {
        Self::new(BlockKind::PageBreak, "page break")
    }

    pub fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }

    /// Append one text line at the current bottom and grow the block.
    pub fn line(&mut self, x: f32, text: impl Into<String>, font: Font, size: f32, align: Align) {
        self.elements.push(Element::Text {
            x,
            baseline: self.height + size,
            text: text.into(),
            font,
            size,
            align,
        });
        self.height += size * LEADING;
    }

    /// Wrapped text; returns the number of lines added.
    pub fn paragraph(
        &mut self,
        book: &FontBook,
        x: f32,
        text: &str,
        font: Font,
        size: f32,
        max_width: f32,
    ) -> usize {
        let lines = book.wrap(text, font, size, max_width);
        let count = lines.len();
        for line in lines {
            self.line(x, line, font, size, Align::Left);
        }
        count
    }

    pub fn rule(&mut self, x1: f32, x2: f32, width: f32) {
        self.elements.push(Element::Rule {
            x1,
            x2,
            y: self.height,
            width,
        });
    }

    pub fn gap(&mut self, height: f32) {
        self.height += height;
    }
}

/// Printable area of a page, in PDF coordinates (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
    pub width: f32,
}

impl Frame {
    pub fn a4(margin_mm: f32) -> Self {
        let margin = margin_mm.max(0.0) * POINTS_PER_MM;
        Self {
            left: margin,
            top: PAGE_HEIGHT - margin,
            bottom: margin,
            width: PAGE_WIDTH - 2.0 * margin,
        }
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    /// PDF y coordinate of the block's top edge.
    pub top: f32,
    pub block: Block,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<Placed>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Break `blocks` into pages.
///
/// - a block that does not fit below the cursor moves to the next page;
/// - `keep_with_next` blocks move together with their successor;
/// - table rows continuing on a new page get the table header repeated;
/// - a block taller than the frame is placed alone on a fresh page and
///   reported, its overflow is clipped by the page edge.
pub fn paginate(blocks: Vec<Block>, frame: &Frame, warnings: &mut Vec<RenderWarning>) -> Vec<Page> {
    let mut pages = vec![Page::default()];
    let mut cursor = frame.top;
    let mut table_header: Option<Block> = None;

    for i in 0..blocks.len() {
        let block = &blocks[i];

        match block.kind {
            BlockKind::PageBreak => {
                if pages.last().is_some_and(|p| !p.is_empty()) {
                    pages.push(Page::default());
                    cursor = frame.top;
                }
                continue;
            }
            BlockKind::TableHeader => table_header = Some(block.clone()),
            BlockKind::TableRow => {}
            BlockKind::Content => table_header = None,
        }

        let mut needed = block.height;
        if block.keep_with_next {
            if let Some(next) = blocks.get(i + 1).filter(|b| b.kind != BlockKind::PageBreak) {
                needed += next.height;
            }
        }

        let page_has_content = pages.last().is_some_and(|p| !p.is_empty());
        if page_has_content && cursor - needed < frame.bottom {
            pages.push(Page::default());
            cursor = frame.top;

            if block.kind == BlockKind::TableRow {
                if let Some(header) = &table_header {
                    place(&mut pages, &mut cursor, header.clone());
                }
            }
        }

        if block.height > frame.height() {
            tracing::warn!(block = block.label, height = block.height, "Block taller than a page");
            warnings.push(RenderWarning::OversizedBlock { label: block.label });
        }

        place(&mut pages, &mut cursor, block.clone());
    }

    if pages.len() > 1 && pages.last().is_some_and(Page::is_empty) {
        pages.pop();
    }
    pages
}

fn place(pages: &mut [Page], cursor: &mut f32, block: Block) {
    let height = block.height;
    if let Some(page) = pages.last_mut() {
        page.blocks.push(Placed {
            top: *cursor,
            block,
        });
    }
    *cursor -= height;
}
