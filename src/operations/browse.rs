use crate::db::snapshot;
use crate::ledger::Ledger;
use crate::models::expense::ExpenseRecord;
use crate::view::{CategoryFilter, ExpenseForm, ViewState};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use rusqlite::Connection;
use std::cmp::min;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Table,
    Add,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Description,
    Amount,
    Category,
    Date,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Description,
        FormField::Amount,
        FormField::Category,
        FormField::Date,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Description => "Description",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }
}

struct ScreenState {
    mode: Mode,
    table_state: TableState,
    add_form: ExpenseForm,
    field: FormField,
    form_error: Option<String>,
}

impl ScreenState {
    fn new(view: &ViewState) -> Self {
        Self {
            mode: Mode::Table,
            table_state: TableState::default(),
            add_form: ExpenseForm::empty(view.form_category),
            field: FormField::Description,
            form_error: None,
        }
    }
}

/// The interactive form-and-table screen: filtered expense table, add/edit
/// form, live totals and a clock footer. Every successful mutation goes
/// through the ledger and is persisted best-effort.
pub fn run_browse(
    conn: &Connection,
    ledger: &mut Ledger,
    view: &mut ViewState,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        let mut screen = ScreenState::new(view);
        clamp_selection(ledger, view, &mut screen);

        loop {
            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Min(5),
                            Constraint::Length(4),
                            Constraint::Length(4),
                        ])
                        .split(size);

                    render_header(frame, layout[0], ledger, view);
                    render_table(frame, layout[1], ledger, view, &mut screen);
                    render_totals(frame, layout[2], ledger);
                    render_footer(frame, layout[3], &screen);

                    if screen.mode != Mode::Table {
                        render_form_modal(frame, size, view, &screen);
                    }
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            // The short poll timeout doubles as the clock tick: every pass
            // through the loop redraws the footer with the current time.
            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                let event = event::read().map_err(|e| format!("Failed to read input: {}", e))?;
                match event {
                    Event::Key(key) => {
                        if handle_key(conn, ledger, view, &mut screen, key) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn handle_key(
    conn: &Connection,
    ledger: &mut Ledger,
    view: &mut ViewState,
    screen: &mut ScreenState,
    key: KeyEvent,
) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on
    // Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match screen.mode {
        Mode::Table => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => move_selection(ledger, view, screen, -1),
            KeyCode::Down => move_selection(ledger, view, screen, 1),
            KeyCode::Home => screen.table_state.select(Some(0)),
            KeyCode::End => {
                let len = view.filtered(ledger).len();
                if len > 0 {
                    screen.table_state.select(Some(len - 1));
                }
            }
            KeyCode::Char('a') => {
                screen.add_form = ExpenseForm::empty(view.form_category);
                screen.field = FormField::Description;
                screen.form_error = None;
                screen.mode = Mode::Add;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = selected_id(ledger, view, screen) {
                    if let Some(record) = ledger.list().iter().find(|r| r.id == id) {
                        view.begin_edit(record);
                        screen.field = FormField::Description;
                        screen.form_error = None;
                        screen.mode = Mode::Edit;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected_id(ledger, view, screen) {
                    if ledger.remove(&id) {
                        snapshot::save_best_effort(conn, ledger.list());
                    }
                    clamp_selection(ledger, view, screen);
                }
            }
            KeyCode::Char('f') => {
                view.set_filter(view.filter.next());
                clamp_selection(ledger, view, screen);
            }
            _ => {}
        },
        Mode::Add | Mode::Edit => match key.code {
            KeyCode::Esc => {
                if screen.mode == Mode::Edit {
                    view.cancel_edit();
                }
                screen.form_error = None;
                screen.mode = Mode::Table;
            }
            KeyCode::Enter => commit_form(conn, ledger, view, screen),
            KeyCode::Tab | KeyCode::Down => screen.field = screen.field.next(),
            KeyCode::BackTab | KeyCode::Up => screen.field = screen.field.prev(),
            KeyCode::Left if screen.field == FormField::Category => {
                if let Some(form) = active_form(screen, view) {
                    form.category = form.category.prev();
                }
            }
            KeyCode::Right if screen.field == FormField::Category => {
                if let Some(form) = active_form(screen, view) {
                    form.category = form.category.next();
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = active_text_field(screen, view) {
                    buffer.pop();
                }
            }
            KeyCode::Char(ch) => {
                if screen.field == FormField::Category {
                    if ch == ' ' {
                        if let Some(form) = active_form(screen, view) {
                            form.category = form.category.next();
                        }
                    }
                } else if let Some(buffer) = active_text_field(screen, view) {
                    buffer.push(ch);
                }
            }
            _ => {}
        },
    }

    false
}

fn commit_form(
    conn: &Connection,
    ledger: &mut Ledger,
    view: &mut ViewState,
    screen: &mut ScreenState,
) {
    match screen.mode {
        Mode::Add => {
            let form = &screen.add_form;
            match ledger.add(
                &form.description,
                &form.amount,
                form.category.as_str(),
                &form.date,
            ) {
                Ok(record) => {
                    snapshot::save_best_effort(conn, ledger.list());
                    // Show the new entry right away, like the original
                    // screen: the filter follows the added category.
                    view.set_filter(CategoryFilter::Only(record.category));
                    screen.table_state.select(Some(0));
                    screen.form_error = None;
                    screen.mode = Mode::Table;
                }
                Err(e) => screen.form_error = Some(e.to_string()),
            }
        }
        Mode::Edit => match view.commit_edit(ledger) {
            Some(Ok(_)) => {
                snapshot::save_best_effort(conn, ledger.list());
                screen.form_error = None;
                screen.mode = Mode::Table;
            }
            Some(Err(e)) => screen.form_error = Some(e.to_string()),
            None => screen.mode = Mode::Table,
        },
        Mode::Table => {}
    }
}

fn active_form<'a>(
    screen: &'a mut ScreenState,
    view: &'a mut ViewState,
) -> Option<&'a mut ExpenseForm> {
    match screen.mode {
        Mode::Add => Some(&mut screen.add_form),
        Mode::Edit => view.editing_mut().map(|draft| &mut draft.fields),
        Mode::Table => None,
    }
}

fn active_text_field<'a>(
    screen: &'a mut ScreenState,
    view: &'a mut ViewState,
) -> Option<&'a mut String> {
    let field = screen.field;
    let form = active_form(screen, view)?;
    match field {
        FormField::Description => Some(&mut form.description),
        FormField::Amount => Some(&mut form.amount),
        FormField::Date => Some(&mut form.date),
        FormField::Category => None,
    }
}

fn selected_id(ledger: &Ledger, view: &ViewState, screen: &ScreenState) -> Option<String> {
    let visible = view.filtered(ledger);
    let idx = screen.table_state.selected()?;
    visible.get(idx).map(|r| r.id.clone())
}

fn clamp_selection(ledger: &Ledger, view: &ViewState, screen: &mut ScreenState) {
    let len = view.filtered(ledger).len();
    if len == 0 {
        screen.table_state.select(None);
    } else {
        let selected = screen.table_state.selected().unwrap_or(0);
        screen.table_state.select(Some(min(selected, len - 1)));
    }
}

fn move_selection(ledger: &Ledger, view: &ViewState, screen: &mut ScreenState, delta: i32) {
    let len = view.filtered(ledger).len();
    if len == 0 {
        screen.table_state.select(None);
        return;
    }
    let current = screen.table_state.selected().unwrap_or(0) as i32;
    let next = (current + delta).clamp(0, len as i32 - 1) as usize;
    screen.table_state.select(Some(next));
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, ledger: &Ledger, view: &ViewState) {
    let line = Line::from(vec![
        Span::styled("Expense Tracker", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  |  "),
        Span::raw(format!("Filter: {}", view.filter.label())),
        Span::raw("  |  "),
        Span::raw(format!("Rows: {}", view.filtered(ledger).len())),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Left),
        area,
    );
}

fn render_table(
    frame: &mut ratatui::Frame,
    area: Rect,
    ledger: &Ledger,
    view: &ViewState,
    screen: &mut ScreenState,
) {
    let block = Block::default().title("Expenses").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Id").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let visible = view.filtered(ledger);
    let rows = visible.iter().map(|record| expense_row(record, view));

    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(40),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut screen.table_state);

    if visible.is_empty() {
        let empty = Paragraph::new("No expenses")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn expense_row<'a>(record: &'a ExpenseRecord, view: &ViewState) -> Row<'a> {
    let date = record.date.format("%Y-%m-%d").to_string();
    let mut desc = record.description.clone();
    if desc.len() > 42 {
        desc.truncate(39);
        desc.push_str("...");
    }
    let amount = format!("${:.2}", record.amount);
    let mut id_short = record.id.clone();
    if id_short.len() > 8 {
        id_short.truncate(8);
    }

    let row = Row::new([
        Cell::from(date),
        Cell::from(desc),
        Cell::from(record.category.as_str()),
        Cell::from(amount),
        Cell::from(id_short),
    ]);

    if view.is_editing(&record.id) {
        row.style(Style::default().fg(Color::Yellow))
    } else {
        row
    }
}

fn render_totals(frame: &mut ratatui::Frame, area: Rect, ledger: &Ledger) {
    let block = Block::default().title("Totals").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::new();
    for (category, total) in ledger.totals_by_category() {
        spans.push(Span::styled(
            format!("{} ", category.as_str()),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            format!("${:.2}", total),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw("   "));
    }

    let overall = Line::from(vec![
        Span::styled("Overall ", Style::default().bold()),
        Span::styled(
            format!("${:.2}", ledger.overall_total()),
            Style::default().fg(Color::Green).bold(),
        ),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(spans), overall]).alignment(Alignment::Left);
    frame.render_widget(paragraph, inner);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, screen: &ScreenState) {
    let hint = match screen.mode {
        Mode::Table => "↑/↓ move  a add  e/Enter edit  d delete  f filter  q/Esc exit",
        Mode::Add | Mode::Edit => "Tab/↓ next field  ←/→ category  Enter save  Esc cancel",
    };

    let clock = Line::from(format!(
        "Now: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(vec![Line::from(hint), clock])
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_form_modal(
    frame: &mut ratatui::Frame,
    area: Rect,
    view: &ViewState,
    screen: &ScreenState,
) {
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let (title, form) = match screen.mode {
        Mode::Edit => match view.editing() {
            Some(draft) => ("Edit Expense", &draft.fields),
            None => ("Edit Expense", &screen.add_form),
        },
        _ => ("Add Expense", &screen.add_form),
    };

    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().bold())),
        Line::from(""),
    ];

    for field in FormField::ORDER {
        let value = match field {
            FormField::Description => form.description.clone(),
            FormField::Amount => form.amount.clone(),
            FormField::Category => format!("< {} >", form.category.as_str()),
            FormField::Date => form.date.clone(),
        };

        let active = field == screen.field;
        let marker = if active { "> " } else { "  " };
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        lines.push(Line::from(Span::styled(
            format!("{}{:<12} {}", marker, field.label(), value),
            style,
        )));
    }

    if let Some(ref err) = screen.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title("Input");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
