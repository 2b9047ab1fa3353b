//! Quote document sections, in print order.

use super::layout::{Align, Block, BlockKind, Element, LEADING};
use super::logo::LogoImage;
use super::text::{Font, FontBook};
use crate::format::{currency_label, format_amount, format_date, format_quantity, Locale};
use crate::models::{CompanyProfile, Quote};
use crate::services::totals::tax_rate;
use rust_decimal::Decimal;

const BODY: f32 = 9.5;
const SMALL: f32 = 8.5;
const HEADING: f32 = 11.0;
const SECTION_GAP: f32 = 12.0;
const CELL_PAD: f32 = 4.0;

/// Logo box in the header, in points.
pub const LOGO_MAX_WIDTH: f32 = 120.0;
pub const LOGO_MAX_HEIGHT: f32 = 60.0;

pub struct SectionInput<'a> {
    pub fonts: &'a FontBook,
    pub quote: &'a Quote,
    pub company: &'a CompanyProfile,
    pub logo: Option<&'a LogoImage>,
    pub locale: Locale,
    /// Frame width in points.
    pub width: f32,
    pub break_after_header: bool,
    pub break_before_terms: bool,
}

pub fn build_blocks(input: &SectionInput<'_>) -> Vec<Block> {
    let mut blocks = vec![header(input)];
    if input.break_after_header {
        blocks.push(Block::page_break());
    }
    let fonts = input.fonts;
    blocks.push(seller(fonts, input.company, input.width));
    blocks.push(customer(fonts, input.quote, input.width));
    blocks.push(project(fonts, input.quote, input.width));

    let table = Table::new(input.width);
    blocks.push(table.header());
    for (index, item) in input.quote.items.iter().enumerate() {
        let cells = [
            (index + 1).to_string(),
            item.description.clone(),
            format_quantity(item.quantity, input.locale),
            item.unit.clone(),
            format_amount(item.unit_price, input.locale),
            format_amount(item.total_price, input.locale),
        ];
        blocks.push(table.row(fonts, &cells));
    }

    blocks.push(totals(input));

    if let Some(notes) = input.quote.notes_text() {
        if input.break_before_terms {
            blocks.push(Block::page_break());
        }
        blocks.extend(terms(fonts, notes, input.width));
    }

    blocks.push(signatures(input.company, input.width));
    blocks
}

/// Overlay `column` onto `target`; the taller of the two sets the height.
fn merge(target: &mut Block, column: Block) {
    target.height = target.height.max(column.height);
    target.elements.extend(column.elements);
}

fn header(input: &SectionInput<'_>) -> Block {
    let mut block = Block::new(BlockKind::Content, "header");
    let company = input.company;
    let quote = input.quote;

    let text_x = match input.logo {
        Some(logo) => {
            block.elements.push(Element::Logo {
                x: 0.0,
                y: 0.0,
                width: logo.display_width,
                height: logo.display_height,
            });
            block.height = logo.display_height;
            logo.display_width + 12.0
        }
        None => 0.0,
    };

    let mut names = Block::new(BlockKind::Content, "header");
    let names_width = (input.width * 0.6 - text_x).max(60.0);
    let fonts = input.fonts;
    names.paragraph(fonts, text_x, &company.name_ar, Font::Bold, 13.0, names_width);
    names.paragraph(fonts, text_x, &company.name_en, Font::Bold, 10.0, names_width);
    for description in [&company.description_ar, &company.description_en] {
        if !description.trim().is_empty() {
            names.paragraph(fonts, text_x, description, Font::Regular, SMALL, names_width);
        }
    }
    merge(&mut block, names);

    let mut meta = Block::new(BlockKind::Content, "header");
    let right = input.width;
    meta.line(right, "QUOTATION", Font::Bold, 16.0, Align::Right);
    meta.line(
        right,
        format!("Quote No. {}", quote.quote_number),
        Font::Regular,
        10.0,
        Align::Right,
    );
    meta.line(
        right,
        format!("Date: {}", format_date(quote.created_date, Locale::En)),
        Font::Regular,
        SMALL,
        Align::Right,
    );
    meta.line(
        right,
        format!("التاريخ: {}", format_date(quote.created_date, Locale::Ar)),
        Font::Regular,
        SMALL,
        Align::Right,
    );
    merge(&mut block, meta);

    block.gap(6.0);
    block.rule(0.0, input.width, 1.0);
    block.gap(SECTION_GAP);
    block
}

fn labelled(label: &str, value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| format!("{}: {}", label, value))
}

fn details(
    fonts: &FontBook,
    label: &'static str,
    heading: &str,
    lines: Vec<String>,
    width: f32,
) -> Block {
    let mut block = Block::new(BlockKind::Content, label);
    block.line(0.0, heading, Font::Bold, HEADING, Align::Left);
    for line in lines {
        block.paragraph(fonts, 0.0, &line, Font::Regular, BODY, width);
    }
    block.gap(SECTION_GAP);
    block
}

fn seller(fonts: &FontBook, company: &CompanyProfile, width: f32) -> Block {
    let address = company.address_parts().join(", ");
    let lines = [
        Some(company.name_en.trim().to_string()).filter(|s| !s.is_empty()),
        Some(address).filter(|s| !s.is_empty()),
        labelled("Additional No.", &company.additional_number),
        labelled("VAT No.", &company.tax_number),
        labelled("C.R.", &company.commercial_registration),
        labelled("Phone", &company.phones().join(" / ")),
        labelled("Email", &company.email),
    ];
    details(fonts, "seller", "From", lines.into_iter().flatten().collect(), width)
}

fn customer(fonts: &FontBook, quote: &Quote, width: f32) -> Block {
    let customer = &quote.customer;
    let optional = |label: &str, value: &Option<String>| {
        value.as_deref().and_then(|v| labelled(label, v))
    };
    let address = customer.address_parts().join(", ");
    let lines = [
        Some(customer.name.trim().to_string()),
        Some(address).filter(|s| !s.is_empty()),
        optional("Additional No.", &customer.additional_number),
        optional("VAT No.", &customer.tax_number),
        optional("C.R.", &customer.commercial_registration),
        optional("Phone", &customer.phone),
    ];
    details(fonts, "customer", "Bill To", lines.into_iter().flatten().collect(), width)
}

fn project(fonts: &FontBook, quote: &Quote, width: f32) -> Block {
    let mut lines = vec![quote.project_description.clone()];
    lines.extend(labelled("Location", &quote.location));
    details(fonts, "project", "Project", lines, width)
}

struct Column {
    title: &'static str,
    x: f32,
    width: f32,
    align: Align,
}

impl Column {
    fn anchor(&self) -> f32 {
        match self.align {
            Align::Left => self.x + CELL_PAD,
            Align::Right => self.x + self.width - CELL_PAD,
            Align::Center => self.x + self.width / 2.0,
        }
    }
}

struct Table {
    columns: Vec<Column>,
    width: f32,
}

const DESCRIPTION: usize = 1;

impl Table {
    fn new(width: f32) -> Self {
        let fixed = [
            ("#", 24.0, Align::Center),
            ("Description", 0.0, Align::Left),
            ("Qty", 46.0, Align::Right),
            ("Unit", 54.0, Align::Left),
            ("Unit Price", 80.0, Align::Right),
            ("Total", 85.0, Align::Right),
        ];
        let flexible = (width - fixed.iter().map(|c| c.1).sum::<f32>()).max(80.0);

        let mut x = 0.0;
        let columns = fixed
            .into_iter()
            .map(|(title, w, align)| {
                let width = if w == 0.0 { flexible } else { w };
                let column = Column {
                    title,
                    x,
                    width,
                    align,
                };
                x += width;
                column
            })
            .collect();
        Self { columns, width }
    }

    fn header(&self) -> Block {
        let height = BODY * LEADING + 2.0 * CELL_PAD;
        let mut block = Block::new(BlockKind::TableHeader, "table header").keep_with_next();
        block.elements.push(Element::Fill {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height,
            gray: 0.88,
        });
        for column in &self.columns {
            block.elements.push(Element::Text {
                x: column.anchor(),
                baseline: CELL_PAD + BODY,
                text: column.title.to_string(),
                font: Font::Bold,
                size: BODY,
                align: column.align,
            });
        }
        block.height = height;
        block
    }

    fn row(&self, fonts: &FontBook, cells: &[String; 6]) -> Block {
        let mut block = Block::new(BlockKind::TableRow, "table row");
        let description = &self.columns[DESCRIPTION];
        let lines = fonts.wrap(
            &cells[DESCRIPTION],
            Font::Regular,
            BODY,
            description.width - 2.0 * CELL_PAD,
        );

        for (i, line) in lines.iter().enumerate() {
            block.elements.push(Element::Text {
                x: description.anchor(),
                baseline: CELL_PAD + BODY + i as f32 * BODY * LEADING,
                text: line.clone(),
                font: Font::Regular,
                size: BODY,
                align: Align::Left,
            });
        }
        for (column, cell) in self.columns.iter().zip(cells.iter()) {
            if column.title == "Description" {
                continue;
            }
            block.elements.push(Element::Text {
                x: column.anchor(),
                baseline: CELL_PAD + BODY,
                text: cell.clone(),
                font: Font::Regular,
                size: BODY,
                align: column.align,
            });
        }

        block.height = lines.len() as f32 * BODY * LEADING + 2.0 * CELL_PAD;
        block.rule(0.0, self.width, 0.5);
        block
    }
}

fn totals(input: &SectionInput<'_>) -> Block {
    let quote = input.quote;
    let currency = currency_label(input.locale);
    let rate = (tax_rate() * Decimal::ONE_HUNDRED).normalize();
    let value_x = input.width;
    let label_x = input.width - 120.0;

    let mut block = Block::new(BlockKind::Content, "totals");
    block.gap(8.0);
    let rows = [
        ("Subtotal".to_string(), quote.subtotal, Font::Regular),
        (format!("VAT ({}%)", rate), quote.tax_amount, Font::Regular),
        ("Total".to_string(), quote.total_amount, Font::Bold),
    ];
    for (label, amount, font) in rows {
        let size = if font == Font::Bold { HEADING } else { BODY };
        let baseline = block.height + size;
        block.elements.push(Element::Text {
            x: label_x,
            baseline,
            text: label,
            font,
            size,
            align: Align::Right,
        });
        block.line(
            value_x,
            format!("{} {}", format_amount(amount, input.locale), currency),
            font,
            size,
            Align::Right,
        );
    }
    block.gap(SECTION_GAP);
    block
}

/// Heading kept with the first note line, then one block per wrapped line.
fn terms(fonts: &FontBook, notes: &str, width: f32) -> Vec<Block> {
    let mut heading = Block::new(BlockKind::Content, "terms heading").keep_with_next();
    heading.line(0.0, "Terms & Notes", Font::Bold, HEADING, Align::Left);

    let mut blocks = vec![heading];
    for line in fonts.wrap(notes, Font::Regular, BODY, width) {
        let mut block = Block::new(BlockKind::Content, "notes");
        block.line(0.0, line, Font::Regular, BODY, Align::Left);
        blocks.push(block);
    }
    if let Some(last) = blocks.last_mut() {
        last.gap(SECTION_GAP);
    }
    blocks
}

fn signatures(company: &CompanyProfile, width: f32) -> Block {
    let column = width * 0.4;
    let right_x = width - column;

    let mut block = Block::new(BlockKind::Content, "signatures");
    block.gap(36.0);
    block.elements.push(Element::Rule {
        x1: 0.0,
        x2: column,
        y: block.height,
        width: 0.5,
    });
    block.elements.push(Element::Rule {
        x1: right_x,
        x2: width,
        y: block.height,
        width: 0.5,
    });
    block.gap(4.0);

    let baseline = block.height + BODY;
    block.elements.push(Element::Text {
        x: right_x,
        baseline,
        text: "Customer Acceptance".to_string(),
        font: Font::Bold,
        size: BODY,
        align: Align::Left,
    });
    block.line(0.0, "Authorized Signature", Font::Bold, BODY, Align::Left);
    block.line(0.0, company.name_en.trim(), Font::Regular, SMALL, Align::Left);
    block
}
