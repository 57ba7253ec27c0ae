mod export;
mod help;
mod state;

use crate::cli::Cli;
use crate::config::Settings;
use crate::engine::{self, ServiceClient};
use crate::model::{Presentation, Status, UiEvent};
use crate::orchestrator::{self, EnhancementController, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use state::{Focus, Palette, UiState, TAB_COMPOSE, TAB_COUNT, TAB_HELP, TAB_RESULT};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

/// Values the UI thread needs besides its own state.
struct UiContext {
    args: Cli,
    base_url: String,
    settings: Settings,
    config_path: Option<PathBuf>,
}

pub async fn run(args: Cli, settings: Settings) -> Result<()> {
    let config = crate::cli::build_config(&args, &settings);
    let client = ServiceClient::new(&config)?;
    let controller = Arc::new(EnhancementController::new(Arc::new(client.clone())));
    let pres_rx = controller.subscribe();

    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let config_path = match args.config_path() {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(error = %e, "no config path; theme changes won't be saved");
            None
        }
    };
    let ctx = UiContext {
        args,
        base_url: config.base_url.clone(),
        settings,
        config_path,
    };

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(ctx, event_rx, pres_rx, cmd_tx));

    let res = orchestrator::run_controller(client, controller, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Fill the compose tab from `--resume` / `--sample` and optionally submit right away.
fn load_initial_input(ctx: &UiContext, state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) {
    let args = &ctx.args;
    if let Some(role) = args.target_role.as_deref() {
        state.target_role = role.to_string();
    }

    let mut has_text = false;
    if args.sample {
        let sample = crate::samples::random();
        state.fill_sample(sample.role, sample.text);
        if let Some(role) = args.target_role.as_deref() {
            state.target_role = role.to_string();
        }
        has_text = true;
    } else if let Some(path) = args.resume.as_deref() {
        if engine::is_pdf(path) {
            state.pdf_path = path.display().to_string();
            let _ = cmd_tx.send(UiCommand::ExtractPdf(path.to_path_buf()));
        } else {
            let read = if path == std::path::Path::new("-") {
                io::read_to_string(io::stdin())
            } else {
                std::fs::read_to_string(path)
            };
            match read {
                Ok(text) => {
                    state.resume_text = text;
                    state.info = format!("Loaded {}", path.display());
                    has_text = true;
                }
                Err(e) => state.info = format!("Could not read {}: {e}", path.display()),
            }
        }
    }

    if has_text && args.submit_on_launch {
        submit(state, cmd_tx, false);
    }
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut ctx: UiContext,
    mut event_rx: UnboundedReceiver<UiEvent>,
    mut pres_rx: watch::Receiver<Presentation>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    let mut state = UiState {
        theme: ctx.settings.theme,
        info: "Paste or type your resume, then press 'e' to enhance. '?' for help.".into(),
        ..Default::default()
    };
    // Read stdin before raw mode takes over the terminal.
    load_initial_input(&ctx, &mut state, &cmd_tx);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if pres_rx.has_changed().unwrap_or(false) {
            let next = pres_rx.borrow_and_update().clone();
            apply_presentation(&ctx, &mut state, next);
        }

        if last_tick.elapsed() >= tick_rate {
            if state.presentation.busy {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
            }
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) => {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(&mut ctx, &mut state, k, &cmd_tx) {
                        break Ok(());
                    }
                }
                Ok(Event::Paste(text)) => state.paste(&text),
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

/// Show a new presentation snapshot; a fresh result gets its report and `--export-*` run.
fn apply_presentation(ctx: &UiContext, state: &mut UiState, next: Presentation) {
    let Some(result) = state.apply_presentation(next) else {
        return;
    };
    let processed = orchestrator::process_result(
        &ctx.args,
        &ctx.base_url,
        state.submitted_role.as_deref(),
        &result,
    );
    state.report = Some(processed.report);
    if !processed.export_messages.is_empty() {
        state.info = processed.export_messages.join(" | ");
    }
}

fn apply_event(state: &mut UiState, ev: UiEvent) {
    match ev {
        UiEvent::PdfExtracted { file_name, text } => {
            state.resume_text = text;
            state.pdf_path.clear();
            state.resume_scroll = 0;
            state.tab = TAB_COMPOSE;
            state.info = format!("Extracted text from {file_name}. Review it, then press 'e'.");
        }
        UiEvent::Info(info) => {
            state.info = info.to_message();
        }
    }
}

/// Send the current inputs. Plain submits are refused while a request is running.
fn submit(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>, force: bool) {
    if state.presentation.busy && !force {
        state.info = "Enhancement already running. Press 'E' to restart it with the current input."
            .into();
        return;
    }
    if !state.resume_text.trim().is_empty() {
        let role = state.target_role.trim();
        state.submitted_role = (!role.is_empty()).then(|| role.to_string());
    }
    state.focus = Focus::None;
    let _ = cmd_tx.send(UiCommand::Submit {
        resume_text: state.resume_text.clone(),
        target_role: state.target_role.clone(),
    });
}

fn copy_and_report(state: &mut UiState, what: &str, text: &str) {
    match export::copy_to_clipboard(text) {
        Ok(_) => {
            let shown = if text.chars().count() > 60 {
                format!("{}...", text.chars().take(57).collect::<String>())
            } else {
                text.to_string()
            };
            state.info = format!("✓ Copied {what} to clipboard: {shown}");
        }
        Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
    }
}

/// Returns true when the UI should exit.
fn handle_key(
    ctx: &mut UiContext,
    state: &mut UiState,
    k: KeyEvent,
    cmd_tx: &UnboundedSender<UiCommand>,
) -> bool {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        let _ = cmd_tx.send(UiCommand::Quit);
        return true;
    }

    if state.focus != Focus::None {
        match k.code {
            KeyCode::Esc => state.focus = Focus::None,
            KeyCode::Backspace => state.backspace(),
            KeyCode::Enter => match state.focus {
                Focus::Resume => state.insert_char('\n'),
                Focus::Role => submit(state, cmd_tx, false),
                Focus::PdfPath => {
                    let path = state.pdf_path.trim().to_string();
                    state.focus = Focus::None;
                    if path.is_empty() {
                        state.info = "Type the path of a PDF first.".into();
                    } else {
                        let _ = cmd_tx.send(UiCommand::ExtractPdf(PathBuf::from(path)));
                    }
                }
                Focus::None => {}
            },
            KeyCode::Tab => state.insert_char(' '),
            KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
                state.insert_char(c)
            }
            _ => {}
        }
        return false;
    }

    match k.code {
        KeyCode::Char('q') => {
            let _ = cmd_tx.send(UiCommand::Quit);
            return true;
        }
        KeyCode::Enter | KeyCode::Char('e') => submit(state, cmd_tx, false),
        KeyCode::Char('E') => submit(state, cmd_tx, true),
        KeyCode::Char('i') => {
            state.tab = TAB_COMPOSE;
            state.focus = Focus::Resume;
        }
        KeyCode::Char('t') => {
            state.tab = TAB_COMPOSE;
            state.focus = Focus::Role;
        }
        KeyCode::Char('u') => {
            state.tab = TAB_COMPOSE;
            state.focus = Focus::PdfPath;
        }
        KeyCode::Char('s') => {
            let sample = crate::samples::random();
            state.fill_sample(sample.role, sample.text);
        }
        KeyCode::Char('d') => state.clear_inputs(),
        KeyCode::Char('c') => match state.presentation.result.clone() {
            Some(r) if state.presentation.result_visible() => {
                copy_and_report(state, "improved resume", &r.improved_text)
            }
            _ => state.info = "No enhanced resume to copy yet.".into(),
        },
        KeyCode::Char('l') => export::export_and_show_path(state, "LaTeX", export::export_latex),
        KeyCode::Char('x') => export::export_and_show_path(state, "JSON", export::export_json),
        KeyCode::Char('y') => match state.last_exported_path.clone() {
            Some(path) => copy_and_report(state, "path", &path),
            None => {
                state.info = "No exported file path to copy. Export a file first (l/x)".into();
            }
        },
        KeyCode::Char('m') => {
            state.theme = state.theme.toggle();
            ctx.settings.theme = state.theme;
            state.info = format!("Theme: {}", state.theme.label());
            if let Some(path) = ctx.config_path.as_deref() {
                if let Err(e) = ctx.settings.save_to(path) {
                    state.info = format!("Theme: {} (not saved: {e:#})", state.theme.label());
                }
            }
        }
        KeyCode::Tab => state.tab = (state.tab + 1) % TAB_COUNT,
        KeyCode::Char('?') => state.tab = TAB_HELP,
        KeyCode::Up | KeyCode::Char('k') => state.scroll_up(1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_down(1),
        KeyCode::PageUp => state.scroll_up(10),
        KeyCode::PageDown => state.scroll_down(10),
        _ => {}
    }
    false
}

fn draw(area: Rect, f: &mut Frame, state: &UiState) {
    let p = state::palette(state.theme);
    f.render_widget(Block::default().style(Style::default().bg(p.bg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let tabs = Tabs::new(vec![
        Line::from("Compose"),
        Line::from("Result"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .style(Style::default().fg(p.fg).bg(p.bg))
    .block(Block::default().borders(Borders::ALL).title("resume-refiner"))
    .highlight_style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_COMPOSE => draw_compose(chunks[1], f, state, &p),
        TAB_RESULT => draw_result(chunks[1], f, state, &p),
        _ => help::draw_help(chunks[1], f, &p),
    }

    draw_status(chunks[2], f, state, &p);
}

fn field_block(title: &str, focused: bool, p: &Palette) -> Block<'static> {
    let border = if focused { p.accent } else { p.muted };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title.to_string())
}

fn field_text<'a>(value: &'a str, placeholder: &'a str, p: &Palette) -> Line<'a> {
    if value.is_empty() {
        Line::from(Span::styled(placeholder, Style::default().fg(p.muted)))
    } else {
        Line::from(value)
    }
}

fn draw_compose(area: Rect, f: &mut Frame, state: &UiState, p: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);
    let base = Style::default().fg(p.fg).bg(p.bg);

    let role = Paragraph::new(field_text(
        &state.target_role,
        "e.g. Software Engineer (optional)",
        p,
    ))
    .style(base)
    .block(field_block(
        "Target role [t]",
        state.focus == Focus::Role,
        p,
    ));
    f.render_widget(role, rows[0]);

    let pdf = Paragraph::new(field_text(&state.pdf_path, "path/to/resume.pdf", p))
        .style(base)
        .block(field_block(
            "Upload PDF [u]",
            state.focus == Focus::PdfPath,
            p,
        ));
    f.render_widget(pdf, rows[1]);

    let resume_lines: Vec<Line> = if state.resume_text.is_empty() {
        vec![Line::from(Span::styled(
            "Paste your resume here, press 'i' to type, or 's' for a sample.",
            Style::default().fg(p.muted),
        ))]
    } else {
        state.resume_text.lines().map(Line::from).collect()
    };
    let title = format!(
        "Resume text [i] ({} chars)",
        state.resume_text.chars().count()
    );
    let resume = Paragraph::new(resume_lines)
        .style(base)
        .wrap(Wrap { trim: false })
        .scroll((state.resume_scroll, 0))
        .block(field_block(&title, state.focus == Focus::Resume, p));
    f.render_widget(resume, rows[2]);
}

fn draw_result(area: Rect, f: &mut Frame, state: &UiState, p: &Palette) {
    let pres = &state.presentation;
    let mut lines: Vec<Line> = Vec::new();

    if pres.busy {
        lines.push(Line::from(vec![
            Span::styled(state.spinner(), Style::default().fg(p.accent)),
            Span::raw(" Enhancing your resume…"),
        ]));
    } else if let (true, Some(r)) = (pres.result_visible(), pres.result.as_ref()) {
        lines.push(Line::from(Span::styled(
            "Improved resume",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.extend(r.improved_text.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Suggestions",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )));
        if r.suggestions.is_empty() {
            lines.push(Line::from(Span::styled(
                "  none",
                Style::default().fg(p.muted),
            )));
        }
        for (i, s) in r.suggestions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}. ", i + 1), Style::default().fg(p.ok)),
                Span::raw(s.clone()),
            ]));
        }
    } else if pres.status == Status::Error {
        let notice = pres.notice.as_deref().unwrap_or("An error occurred.");
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(p.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No enhanced resume yet. Fill in the Compose tab and press 'e'.",
            Style::default().fg(p.muted),
        )));
    }

    let para = Paragraph::new(lines)
        .style(Style::default().fg(p.fg).bg(p.bg))
        .wrap(Wrap { trim: false })
        .scroll((state.result_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(para, area);
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState, p: &Palette) {
    let (label, color) = match state.presentation.status {
        Status::Idle => ("idle", p.muted),
        Status::Loading => ("loading", p.accent),
        Status::Result => ("ready", p.ok),
        Status::Error => ("error", p.error),
    };
    let export_hint = if state.presentation.can_export() {
        "  l/x export"
    } else {
        ""
    };
    let line = Line::from(vec![
        Span::styled(format!("[{label}] "), Style::default().fg(color)),
        Span::raw(state.info.clone()),
        Span::styled(export_hint, Style::default().fg(p.muted)),
    ]);
    let para = Paragraph::new(line)
        .style(Style::default().fg(p.fg).bg(p.bg))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(para, area);
}
