use crate::styles;
use anyhow::Result;
use claimcheck_client::render::{self, Body, Screen, SectionContent};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io::Stdout;
use textwrap::wrap;

/// Everything one frame needs, detached from the actor.
pub struct ViewSnap {
    pub screen: Screen,
    pub caret_col: u16,
    pub scroll: usize,
    /// Columns the results pane is shifted left, for links wider than the pane.
    pub hscroll: u16,
    pub spinner: &'static str,
    pub backend: String,
    pub notice: Option<String>,
}

/// One line of the results pane.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyLine {
    pub text: String,
    pub style: Style,
    /// Links stay on one line so the terminal can detect the whole URL.
    pub wrap: bool,
}

impl BodyLine {
    fn prose(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            wrap: true,
        }
    }

    fn link(url: &str) -> Self {
        Self {
            text: format!("  - {url}"),
            style: styles::link(),
            wrap: false,
        }
    }
}

/// Draw one frame. Returns the scroll offset actually shown.
pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &ViewSnap) -> Result<usize> {
    let mut shown = snap.scroll;
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(vec![
            Line::from(Span::styled(format!(" {} ", render::TITLE), styles::title())),
            Line::from(Span::styled(format!(" {}", render::SUBTITLE), styles::dim())),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(header, layout[0]);

        // Input box
        let (input_offset, caret) =
            input_window(snap.caret_col, layout[1].width.saturating_sub(2));
        let input_box = Paragraph::new(snap.screen.input.clone())
            .scroll((0, input_offset))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Claim (Enter to check, Esc to clear) "),
            );
        frame.render_widget(Clear, layout[1]);
        frame.render_widget(input_box, layout[1]);
        frame.set_cursor_position(Position {
            x: layout[1].x + 1 + caret,
            y: layout[1].y + 1,
        });

        // Results
        let visible_h = layout[2].height.saturating_sub(2) as usize;
        let content_width = layout[2].width.saturating_sub(2) as usize;
        let wrapped = wrap_lines(&body_lines(&snap.screen.body), content_width);
        let start = clamp_scroll(snap.scroll, wrapped.len(), visible_h);
        shown = start;
        let lines: Vec<Line> = wrapped
            .iter()
            .skip(start)
            .take(visible_h)
            .map(|l| Line::from(Span::styled(l.text.clone(), l.style)))
            .collect();
        let results = Paragraph::new(lines)
            .scroll((0, snap.hscroll))
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        frame.render_widget(results, layout[2]);

        // Status bar
        let submit_style = if snap.screen.submit.enabled {
            styles::heading()
        } else {
            styles::dim()
        };
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(snap.spinner, styles::heading()),
            Span::raw(" "),
            Span::styled(format!("[{}]", snap.screen.submit.label), submit_style),
            Span::styled(format!(" • backend: {}", snap.backend), styles::dim()),
        ];
        if let Some(notice) = &snap.notice {
            spans.push(Span::styled(format!(" • {notice}"), styles::error()));
        }
        let status_line = Line::from(spans);
        let status = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(status, layout[3]);
    })?;

    Ok(shown)
}

/// Styled lines for the results pane. Empty body, empty pane.
pub fn body_lines(body: &Body) -> Vec<BodyLine> {
    let mut out = Vec::new();
    match body {
        Body::Empty => {}
        Body::Error(message) => {
            out.push(BodyLine::prose(format!("Error: {message}"), styles::error()))
        }
        Body::Result(view) => {
            out.push(BodyLine::prose(
                view.banner.to_string(),
                styles::banner(view.banner.category),
            ));
            for section in &view.sections {
                out.push(BodyLine::prose("", Style::default()));
                if !section.heading.is_empty() {
                    out.push(BodyLine::prose(section.heading, styles::heading()));
                }
                match &section.content {
                    SectionContent::Text(text) => {
                        out.extend(
                            text.lines()
                                .map(|l| BodyLine::prose(format!("  {l}"), styles::value())),
                        );
                    }
                    SectionContent::Links(links) => {
                        out.extend(links.iter().map(|l| BodyLine::link(l)));
                    }
                }
            }
        }
    }
    out
}

fn wrap_lines(lines: &[BodyLine], width: usize) -> Vec<BodyLine> {
    let effective_width = width.max(1);
    let mut out = Vec::new();
    for line in lines {
        if !line.wrap {
            out.push(line.clone());
            continue;
        }
        let segments = wrap(&line.text, effective_width);
        if segments.is_empty() {
            out.push(BodyLine::prose("", line.style));
        } else {
            out.extend(
                segments
                    .into_iter()
                    .map(|seg| BodyLine::prose(seg.into_owned(), line.style)),
            );
        }
    }
    out
}

/// Horizontal input scroll and on-screen caret column for a caret at
/// `caret_col` in a box `inner_width` cells wide.
fn input_window(caret_col: u16, inner_width: u16) -> (u16, u16) {
    if inner_width == 0 {
        return (0, 0);
    }
    if caret_col < inner_width {
        (0, caret_col)
    } else {
        (caret_col - inner_width + 1, inner_width - 1)
    }
}

/// First visible line for a scroll offset counted from the top.
fn clamp_scroll(scroll: usize, total: usize, visible: usize) -> usize {
    scroll.min(total.saturating_sub(visible))
}
