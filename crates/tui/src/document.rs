use folio_core::content::Portfolio;
use folio_core::host::ElementKey;
use folio_core::reveal::stagger;
use folio_protocol::{Rect, SectionId, ThemeToken};

/// Height of one terminal row in layout pixels.
pub const ROW_PX: f64 = 16.0;
/// Width of one terminal column in layout pixels.
pub const COL_PX: f64 = 8.0;

const STAGGER_MS: u32 = 100;
const SECTION_PAD: usize = 2;

/// One rendered row of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub token: ThemeToken,
    pub bold: bool,
}

impl Line {
    fn new(text: impl Into<String>, token: ThemeToken) -> Self {
        Self {
            text: text.into(),
            token,
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A group of lines that reveals as one element.
#[derive(Debug, Clone)]
pub struct Block {
    pub section: SectionId,
    /// First row, in document rows.
    pub top: usize,
    pub lines: Vec<Line>,
    pub delay_ms: u32,
    pub reveal: Option<ElementKey>,
}

impl Block {
    pub fn rows(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpan {
    pub id: SectionId,
    pub top: usize,
    pub rows: usize,
}

/// The portfolio laid out as a column of text rows.
#[derive(Debug, Clone)]
pub struct Document {
    width: u16,
    blocks: Vec<Block>,
    sections: Vec<SectionSpan>,
    rows: usize,
}

impl Document {
    pub fn build(portfolio: &Portfolio, width: u16) -> Self {
        let mut b = Builder::new(width);
        let text_width = usize::from(width.saturating_sub(4)).max(20);

        b.section(SectionId::Home);
        b.gap(3);
        let hero = &portfolio.hero;
        let mut lines = Vec::new();
        if let Some(badge) = &hero.badge {
            lines.push(Line::new(format!("● {badge}"), ThemeToken::BadgeBackground));
            lines.push(blank());
        }
        lines.extend(wrap(&hero.headline, text_width, ThemeToken::TextPrimary, true));
        if let Some(accent) = &hero.headline_accent {
            lines.extend(wrap(accent, text_width, ThemeToken::Accent, true));
        }
        lines.push(blank());
        lines.extend(wrap(&hero.tagline, text_width, ThemeToken::TextSecondary, false));
        b.block(0, lines);
        if !hero.tags.is_empty() {
            let tags = hero
                .tags
                .iter()
                .map(|t| format!("[{t}]"))
                .collect::<Vec<_>>()
                .join(" ");
            b.block(
                stagger(1, STAGGER_MS),
                wrap(&tags, text_width, ThemeToken::TextMuted, false),
            );
        }
        b.block(
            stagger(2, STAGGER_MS),
            vec![
                Line::new(format!("▶ {}  (c)", hero.cta_label), ThemeToken::ButtonPrimary).bold(),
            ],
        );

        let about = &portfolio.about;
        b.section(SectionId::About);
        b.heading(&about.eyebrow);
        b.block(0, wrap(&about.statement, text_width, ThemeToken::TextPrimary, true));
        for (i, paragraph) in about.paragraphs.iter().enumerate() {
            b.block(
                stagger(i + 1, STAGGER_MS),
                wrap(paragraph, text_width, ThemeToken::TextSecondary, false),
            );
        }
        if !about.licenses.is_empty() {
            let mut lines = vec![Line::new("Licenses", ThemeToken::TextMuted).bold()];
            lines.extend(about.licenses.iter().map(|l| {
                Line::new(
                    format!("  {}  ·  {}", l.jurisdiction, l.status),
                    ThemeToken::TextSecondary,
                )
            }));
            b.block(0, lines);
        }
        if !about.certifications.is_empty() {
            let mut lines = vec![Line::new("Certifications", ThemeToken::TextMuted).bold()];
            for cert in &about.certifications {
                lines.extend(wrap(
                    &format!("  ✓ {cert}"),
                    text_width,
                    ThemeToken::TextSecondary,
                    false,
                ));
            }
            b.block(0, lines);
        }

        b.section(SectionId::Experience);
        b.heading("Professional Experience");
        for (i, exp) in portfolio.experiences.iter().enumerate() {
            let mut lines = vec![
                Line::new(format!("{} {}", exp.icon.glyph(), exp.role), ThemeToken::TextPrimary)
                    .bold(),
                Line::new(
                    format!("  {} · {}", exp.institution, exp.location),
                    ThemeToken::Accent,
                ),
                Line::new(format!("  {}", exp.period), ThemeToken::TextMuted),
            ];
            for detail in &exp.details {
                lines.extend(wrap(
                    &format!("  • {detail}"),
                    text_width,
                    ThemeToken::TextSecondary,
                    false,
                ));
            }
            b.block(stagger(i, STAGGER_MS), lines);
        }

        b.section(SectionId::Skills);
        b.heading("Skills & Competencies");
        for (i, group) in portfolio.skills.iter().enumerate() {
            let token = group.category.token();
            let mut lines = vec![Line::new(group.title.clone(), token).bold()];
            for item in &group.items {
                lines.push(Line::new(format!("  ▪ {item}"), ThemeToken::TextSecondary));
            }
            b.block(stagger(i, STAGGER_MS), lines);
        }

        b.section(SectionId::Education);
        b.heading("Education");
        for (i, degree) in portfolio.education.iter().enumerate() {
            let dot = if degree.current { "◉" } else { "○" };
            let mut lines = vec![
                Line::new(format!("{dot} {}", degree.degree), ThemeToken::TextPrimary).bold(),
            ];
            if let Some(focus) = &degree.focus {
                lines.push(Line::new(format!("  {focus}"), ThemeToken::Accent));
            }
            lines.push(Line::new(
                format!("  {} · {}", degree.institution, degree.period),
                ThemeToken::TextMuted,
            ));
            if let Some(note) = &degree.note {
                lines.extend(wrap(
                    &format!("  {note}"),
                    text_width,
                    ThemeToken::TextSecondary,
                    false,
                ));
            }
            b.block(stagger(i, STAGGER_MS), lines);
        }
        if !portfolio.leadership.is_empty() {
            let mut lines = vec![Line::new("Leadership", ThemeToken::TextMuted).bold()];
            for role in &portfolio.leadership {
                lines.push(Line::new(
                    format!("  {} ({})", role.role, role.years),
                    ThemeToken::TextPrimary,
                ));
                lines.push(Line::new(
                    format!("    {}", role.description),
                    ThemeToken::TextSecondary,
                ));
            }
            b.block(0, lines);
        }
        if let Some(research) = &portfolio.research {
            b.block(0, wrap(research, text_width, ThemeToken::TextSecondary, false));
        }

        let contact = &portfolio.contact;
        b.section(SectionId::Contact);
        b.heading(&contact.heading);
        b.block(0, wrap(&contact.pitch, text_width, ThemeToken::TextSecondary, false));
        let mut lines =
            vec![Line::new(format!("✉ {}", contact.email), ThemeToken::ButtonPrimary).bold()];
        if let Some(phone) = &contact.phone {
            lines.push(Line::new(format!("☏ {phone}"), ThemeToken::ButtonSecondary));
        }
        lines.push(Line::new(format!("⌖ {}", contact.location), ThemeToken::TextMuted));
        if let Some(relocation) = &contact.relocation {
            lines.push(Line::new(format!("  {relocation}"), ThemeToken::TextMuted));
        }
        b.block(stagger(1, STAGGER_MS), lines);
        b.gap(1);
        b.plain(Line::new(portfolio.owner.name.clone(), ThemeToken::TextPrimary).bold());
        b.gap(SECTION_PAD);

        b.finish()
    }

    /// Re-wrap for a new width, keeping reveal keys attached to the same
    /// blocks.
    pub fn relayout(&mut self, portfolio: &Portfolio, width: u16) {
        let mut next = Self::build(portfolio, width);
        for (new, old) in next.blocks.iter_mut().zip(&self.blocks) {
            new.reveal = old.reveal;
        }
        *self = next;
    }

    /// Register every revealable block, storing the returned keys.
    pub fn attach_reveals(&mut self, mut register: impl FnMut(u32) -> ElementKey) {
        for block in self.blocks.iter_mut().filter(|b| b.delay_ms != u32::MAX) {
            block.reveal = Some(register(block.delay_ms));
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionSpan> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn block(&self, key: ElementKey) -> Option<&Block> {
        self.blocks.iter().find(|b| b.reveal == Some(key))
    }

    /// Document-relative rectangle, in layout pixels.
    pub fn section_rect(&self, id: SectionId) -> Option<Rect> {
        self.section(id).map(|s| self.rows_rect(s.top, s.rows))
    }

    pub fn block_rect(&self, key: ElementKey) -> Option<Rect> {
        self.block(key).map(|b| self.rows_rect(b.top, b.rows()))
    }

    fn rows_rect(&self, top: usize, rows: usize) -> Rect {
        Rect::new(
            0.0,
            top as f64 * ROW_PX,
            f64::from(self.width) * COL_PX,
            rows as f64 * ROW_PX,
        )
    }
}

fn blank() -> Line {
    Line::new("", ThemeToken::TextPrimary)
}

/// Greedy word wrap. Words longer than `width` get a row of their own.
pub fn wrap(text: &str, width: usize, token: ThemeToken, bold: bool) -> Vec<Line> {
    let indent: String = text.chars().take_while(|c| *c == ' ').collect();
    let mut rows: Vec<String> = Vec::new();
    let mut current = indent.clone();
    for word in text.split_whitespace() {
        let used = current.chars().count();
        let fits = used + word.chars().count() < width;
        if used > indent.len() && !fits {
            rows.push(std::mem::replace(&mut current, indent.clone()));
        }
        if current.chars().count() > indent.len() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if current.chars().count() > indent.len() || rows.is_empty() {
        rows.push(current);
    }
    rows.into_iter()
        .map(|text| Line { text, token, bold })
        .collect()
}

struct Builder {
    width: u16,
    row: usize,
    blocks: Vec<Block>,
    sections: Vec<SectionSpan>,
    current: Option<(SectionId, usize)>,
}

impl Builder {
    fn new(width: u16) -> Self {
        Self {
            width,
            row: 0,
            blocks: Vec::new(),
            sections: Vec::new(),
            current: None,
        }
    }

    fn section(&mut self, id: SectionId) {
        self.close_section();
        self.current = Some((id, self.row));
        if id != SectionId::Home {
            self.gap(SECTION_PAD);
        }
    }

    fn close_section(&mut self) {
        if let Some((id, top)) = self.current.take() {
            self.gap(SECTION_PAD);
            self.sections.push(SectionSpan {
                id,
                top,
                rows: self.row - top,
            });
        }
    }

    fn heading(&mut self, title: &str) {
        let rule = "─".repeat(title.chars().count());
        self.block(
            0,
            vec![
                Line::new(title, ThemeToken::TextPrimary).bold(),
                Line::new(rule, ThemeToken::Accent),
            ],
        );
    }

    fn block(&mut self, delay_ms: u32, lines: Vec<Line>) {
        self.push(delay_ms, lines);
        self.gap(1);
    }

    /// A block that is never revealed.
    fn plain(&mut self, line: Line) {
        self.push(u32::MAX, vec![line]);
    }

    fn push(&mut self, delay_ms: u32, lines: Vec<Line>) {
        let Some((section, _)) = self.current else {
            return;
        };
        let rows = lines.len();
        self.blocks.push(Block {
            section,
            top: self.row,
            lines,
            delay_ms,
            reveal: None,
        });
        self.row += rows;
    }

    fn gap(&mut self, rows: usize) {
        self.row += rows;
    }

    fn finish(mut self) -> Document {
        self.close_section();
        Document {
            width: self.width,
            blocks: self.blocks,
            sections: self.sections,
            rows: self.row,
        }
    }
}
