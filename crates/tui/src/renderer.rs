use folio_protocol::{SectionId, ThemeToken};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::document::ROW_PX;

/// Below this width the navbar collapses into the menu button.
const NAV_COLLAPSE_WIDTH: u16 = 90;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Rgb(15, 23, 42),
        ThemeToken::Surface => Color::Rgb(30, 41, 59),
        ThemeToken::SurfaceInverted => Color::Rgb(241, 245, 249),
        ThemeToken::Border => Color::Rgb(51, 65, 85),
        ThemeToken::TextPrimary => Color::Rgb(241, 245, 249),
        ThemeToken::TextSecondary => Color::Rgb(203, 213, 225),
        ThemeToken::TextMuted => Color::Rgb(148, 163, 184),
        ThemeToken::TextInverted => Color::Rgb(15, 23, 42),
        ThemeToken::Accent => Color::Rgb(45, 212, 191),
        ThemeToken::AccentSoft => Color::Rgb(19, 78, 74),
        ThemeToken::NavbarTransparent => Color::Rgb(15, 23, 42),
        ThemeToken::NavbarSolid => Color::Rgb(30, 41, 59),
        ThemeToken::NavLink => Color::Rgb(148, 163, 184),
        ThemeToken::NavLinkActive => Color::Rgb(45, 212, 191),
        ThemeToken::MenuOverlay => Color::Rgb(30, 41, 59),
        ThemeToken::MenuDivider => Color::Rgb(51, 65, 85),
        ThemeToken::BadgeBackground => Color::Rgb(94, 234, 212),
        ThemeToken::TimelineDot => Color::Rgb(45, 212, 191),
        ThemeToken::SkillClinical => Color::Rgb(96, 165, 250),
        ThemeToken::SkillSystems => Color::Rgb(192, 132, 252),
        ThemeToken::SkillProfessional => Color::Rgb(251, 191, 36),
        ThemeToken::ButtonPrimary => Color::Rgb(45, 212, 191),
        ThemeToken::ButtonSecondary => Color::Rgb(226, 232, 240),
    }
}

/// Mix `fg` toward `bg` for partially transparent text.
fn fade(fg: Color, bg: Color, opacity: f64) -> Color {
    match (fg, bg) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |f: u8, b: u8| {
                (f64::from(b) + (f64::from(f) - f64::from(b)) * opacity).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => fg,
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let background = theme_to_color(ThemeToken::Background);
    frame.render_widget(Block::default().style(Style::default().bg(background)), area);

    let content = Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1));
    draw_document(frame, app, content, background);
    draw_navbar(frame, app, content);
    if app.state().menu_open {
        draw_menu(frame, app, content);
    }
    draw_status(frame, app, Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1));
}

fn draw_document(frame: &mut Frame, app: &App, area: Rect, background: Color) {
    let host = app.host();
    let top_row = host.top_row() as i64;
    let visible = i64::from(area.height);
    let buf = frame.buffer_mut();

    for block in host.document().blocks() {
        let look = app.block_look(block.reveal);
        if look.opacity < 0.02 {
            continue;
        }
        for (i, line) in block.lines.iter().enumerate() {
            let row = block.top as i64 + i as i64 + i64::from(look.shift) - top_row;
            if !(0..visible).contains(&row) {
                continue;
            }
            let mut style = Style::default()
                .fg(fade(theme_to_color(line.token), background, look.opacity))
                .bg(background);
            if line.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            let y = area.y + row as u16;
            let room = usize::from(area.width.saturating_sub(2));
            for (i, ch) in line.text.chars().take(room).enumerate() {
                let x = area.x + 2 + i as u16;
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}

fn draw_navbar(frame: &mut Frame, app: &App, area: Rect) {
    let nav = app.navbar_style();
    let height = if nav.shadow { 2 } else { 1 };
    let bar = Rect::new(area.x, area.y, area.width, height.min(area.height));
    frame.render_widget(Clear, bar);

    let bg = theme_to_color(nav.background);
    let mut block = Block::default().style(Style::default().bg(bg));
    if nav.shadow {
        block = block
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme_to_color(ThemeToken::Border)));
    }
    let inner = block.inner(bar);
    frame.render_widget(block, bar);

    let owner = &app.portfolio().owner;
    let logo = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!(" {} ", owner.logo_initial()),
            Style::default()
                .fg(theme_to_color(ThemeToken::TextInverted))
                .bg(theme_to_color(ThemeToken::Accent))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", owner.name),
            Style::default()
                .fg(theme_to_color(ThemeToken::TextPrimary))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(logo), inner);

    let links = if area.width < NAV_COLLAPSE_WIDTH {
        let label = if app.state().menu_open { "✕ close (m) " } else { "☰ menu (m) " };
        Line::from(Span::styled(
            label,
            Style::default().fg(theme_to_color(ThemeToken::NavLink)),
        ))
    } else {
        let mut spans = Vec::new();
        for (i, section) in SectionId::NAV_LINKS.into_iter().enumerate() {
            let token = app.link_token(section);
            let mut style = Style::default().fg(theme_to_color(token));
            if token == ThemeToken::NavLinkActive {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!("{} {}", i + 2, section.label()), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    };
    let w = (links.width() as u16).min(inner.width);
    let right = Rect::new(inner.right().saturating_sub(w), inner.y, w, inner.height);
    frame.render_widget(Paragraph::new(links), right);
}

fn draw_menu(frame: &mut Frame, app: &App, area: Rect) {
    let width = 26.min(area.width);
    let height = (SectionId::NAV_LINKS.len() as u16 + 2).min(area.height.saturating_sub(2));
    let menu = Rect::new(area.right().saturating_sub(width), area.y + 2, width, height);
    frame.render_widget(Clear, menu);

    let lines: Vec<Line> = SectionId::NAV_LINKS
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let selected = i == app.menu_cursor();
            let marker = if selected { "▸ " } else { "  " };
            let mut style = Style::default().fg(theme_to_color(app.link_token(section)));
            if selected {
                style = style
                    .bg(theme_to_color(ThemeToken::AccentSoft))
                    .add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format!("{marker}{}", section.label()), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme_to_color(ThemeToken::MenuDivider)))
        .style(Style::default().bg(theme_to_color(ThemeToken::MenuOverlay)));
    frame.render_widget(Paragraph::new(lines).block(block), menu);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let host = app.host();
    let max = host.max_offset();
    let percent = if max > 0.0 {
        (host.top_row() as f64 * ROW_PX / max * 100.0).round()
    } else {
        100.0
    };
    let help = " j/k scroll · 1-6 sections · m menu · c contact · q quit";
    let position = format!("{}  {percent:>3}% ", app.state().active_section.label());

    let style = Style::default()
        .fg(theme_to_color(ThemeToken::TextMuted))
        .bg(theme_to_color(ThemeToken::Surface));
    frame.render_widget(Paragraph::new(help).style(style), area);
    let w = (position.chars().count() as u16).min(area.width);
    let right = Rect::new(area.right().saturating_sub(w), area.y, w, area.height);
    frame.render_widget(Paragraph::new(position).style(style), right);
}
