use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::entry::submit;
use crate::feedback::{Feedback, FeedbackKind};
use crate::presenter::{BookList, EMPTY_NOTICE};
use crate::store::RecordStore;

use super::forms::{ConfirmDelete, EntryField, EntryForm};
use super::helpers::{centered_rect, surface_error, truncate};

const APP_TITLE: &str = "My Reading Log";
const INTRO: &str = "Record the books you read along with the date and a star rating.";
/// Header space for the title and introductory note.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the input panel on the left.
const PANEL_WIDTH: u16 = 38;
/// Rows moved by PageUp/PageDown.
const PAGE: isize = 5;

/// Where keyboard input goes.
enum Mode {
    Normal,
    Editing,
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

impl From<FeedbackKind> for StatusKind {
    fn from(kind: FeedbackKind) -> Self {
        match kind {
            FeedbackKind::Success => StatusKind::Info,
            FeedbackKind::Warning => StatusKind::Warning,
            FeedbackKind::Error => StatusKind::Error,
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: RecordStore,
    list: BookList,
    form: EntryForm,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RecordStore, list: BookList) -> Self {
        Self {
            store,
            list,
            form: EntryForm::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Route a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Editing => self.handle_editing_key(code),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                self.clear_status();
                return Mode::Editing;
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE),
            KeyCode::PageDown => self.list.move_selection(PAGE),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char(' ') => self.list.toggle_current(),
            KeyCode::Char('c') => {
                self.list.clear_marks();
                self.clear_status();
            }
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let count = self.list.marked_count();
                if count > 0 {
                    self.clear_status();
                    return Mode::ConfirmDelete(ConfirmDelete { count });
                }
                // Nothing marked: the presenter answers with its warning.
                let feedback = self.list.confirm_delete(&self.store);
                self.show(feedback);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_editing_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Tab => self.form.next_field(),
            KeyCode::BackTab => self.form.previous_field(),
            KeyCode::Up => self.form.step(1),
            KeyCode::Down => self.form.step(-1),
            KeyCode::Right if self.form.active == EntryField::Rating => self.form.step(1),
            KeyCode::Left if self.form.active == EntryField::Rating => self.form.step(-1),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => {
                if self.form.push_char(ch) {
                    self.form.error = None;
                }
            }
            _ => {}
        }
        Mode::Editing
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let feedback = self.list.confirm_delete(&self.store);
                self.show(feedback);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn submit_form(&mut self) {
        let draft = match self.form.parse_inputs() {
            Ok(draft) => draft,
            Err(err) => {
                let message = surface_error(&err);
                self.form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                return;
            }
        };

        let mut feedback = submit(&self.store, &draft);
        match feedback.kind {
            FeedbackKind::Success => {
                self.form.clear_title();
                self.form.focus(EntryField::Title);
                if !self.reload() {
                    return;
                }
            }
            FeedbackKind::Warning => self.form.error = Some(feedback.text.clone()),
            FeedbackKind::Error => {
                feedback = self.list.reload_after_failure(&self.store, feedback.text);
                self.form.error = Some(feedback.text.clone());
            }
        }
        self.show(feedback);
    }

    /// Re-read the store into the list. Failures land in the footer; returns
    /// whether the reload succeeded.
    fn reload(&mut self) -> bool {
        match self.list.reload(&self.store) {
            Ok(()) => true,
            Err(err) => {
                self.set_status(format!("Could not load books: {err}"), StatusKind::Error);
                false
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(PANEL_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_entry_panel(frame, body[0]);
        self.draw_book_list(frame, body[1]);

        self.draw_footer(frame, chunks[2]);

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                APP_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(INTRO, Style::default().fg(Color::Gray))),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_entry_panel(&self, frame: &mut Frame, area: Rect) {
        let focused = matches!(self.mode, Mode::Editing);
        let mut block = Block::default()
            .title("Record a new book")
            .borders(Borders::ALL);
        if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines = vec![
            self.form.build_line("Date", EntryField::Date),
            self.form.build_line("Title", EntryField::Title),
            self.form.build_line("Rating", EntryField::Rating),
            Line::from(""),
        ];

        if let Some(error) = &self.form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if focused {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to leave",
                Style::default().fg(Color::Gray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Press 'a' to add a book",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if !focused {
            return;
        }
        let cursor = match self.form.active {
            EntryField::Date => Some(("Date: ", EntryField::Date, 0)),
            EntryField::Title => Some(("Title: ", EntryField::Title, 1)),
            EntryField::Rating => None,
        };
        if let Some((prefix, field, row)) = cursor {
            let x = inner.x + prefix.len() as u16 + self.form.value_len(field) as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
        }
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Books I've read")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let count = Paragraph::new(Line::from(Span::styled(
            self.list.count_label(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(count, chunks[1]);

        if self.list.is_empty() {
            let message = Paragraph::new(EMPTY_NOTICE)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Cyan));
            frame.render_widget(message, chunks[0]);
            return;
        }

        let title_width = chunks[0].width.saturating_sub(3 + 12 + 7 + 6) as usize;
        let rows: Vec<Row> = self
            .list
            .rows()
            .iter()
            .map(|row| {
                let checkbox = if row.marked { "[x]" } else { "[ ]" };
                let style = if row.marked {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(checkbox),
                    Cell::from(row.book.date.clone()),
                    Cell::from(truncate(&row.book.title, title_width)),
                    Cell::from(Span::styled(
                        row.book.stars(),
                        Style::default().fg(Color::Yellow),
                    )),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["Del", "Date read", "Title", "Rating"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(7),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        if !matches!(self.mode, Mode::Editing) {
            state.select(Some(self.list.selected()));
        }
        frame.render_stateful_widget(table, chunks[0], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Editing => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Change Date/Rating   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Mark   "),
                Span::styled("[d]", key_style),
                Span::raw(" Delete Marked   "),
                Span::styled("[c]", key_style),
                Span::raw(" Clear Marks   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Books").borders(Borders::ALL);
        let noun = if confirm.count == 1 { "book" } else { "books" };
        let lines = vec![
            Line::from(format!("Delete {} marked {noun}?", confirm.count)),
            Line::from(""),
            Line::from(Span::styled(
                "This cannot be undone. Y to delete, N to keep.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn show(&mut self, feedback: Feedback) {
        self.set_status(feedback.text, feedback.kind.into());
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
