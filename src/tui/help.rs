use super::state::Palette;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(keys: &[&'static str], pad: usize, desc: &'static str, p: &Palette) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    let mut width = 0;
    for (i, k) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" / "));
            width += 3;
        }
        spans.push(Span::styled(*k, Style::default().fg(p.key)));
        width += k.chars().count();
    }
    spans.push(Span::raw(" ".repeat(pad.saturating_sub(width).max(1))));
    spans.push(Span::raw(desc));
    Line::from(spans)
}

pub fn draw_help(area: Rect, f: &mut Frame, p: &Palette) {
    let pad = 14;
    let lines = vec![
        Line::from("Keybinds:"),
        key_line(&["q", "Ctrl-C"], pad, "Quit", p),
        key_line(&["e", "Enter"], pad, "Enhance resume", p),
        key_line(&["E"], pad, "Re-submit now, cancelling the running request", p),
        key_line(&["s"], pad, "Fill a random sample resume", p),
        key_line(&["d"], pad, "Clear inputs", p),
        key_line(&["m"], pad, "Toggle light/dark theme", p),
        key_line(&["tab"], pad, "Switch tabs", p),
        key_line(&["?"], pad, "Show this help", p),
        Line::from(""),
        Line::from("Editing:"),
        key_line(&["i"], pad, "Edit resume text (paste works anywhere)", p),
        key_line(&["t"], pad, "Edit target role", p),
        key_line(&["u"], pad, "Upload a PDF: type its path, Enter to extract", p),
        key_line(&["Esc"], pad, "Stop editing", p),
        Line::from(""),
        Line::from("Result tab:"),
        key_line(&["↑/↓", "PgUp/PgDn"], pad, "Scroll", p),
        key_line(&["c"], pad, "Copy improved text to clipboard", p),
        key_line(&["l"], pad, "Export LaTeX (enhanced_resume.tex)", p),
        key_line(&["x"], pad, "Export JSON report", p),
        key_line(&["y"], pad, "Copy exported path to clipboard", p),
    ];
    let para = Paragraph::new(lines)
        .style(Style::default().fg(p.fg).bg(p.bg))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(para, area);
}
