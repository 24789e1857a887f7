use anyhow::{anyhow, Result};
use chrono::{Days, Local, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::entry::{EntryDraft, DATE_FORMAT};
use crate::models::{star_glyphs, DEFAULT_RATING, MAX_RATING, MIN_RATING};

/// Longest text the date field accepts (`YYYY-MM-DD`).
const DATE_INPUT_LEN: usize = 10;

/// Input panel state. The date is edited as text so it can be typed freely,
/// and only parsed when the user submits.
#[derive(Clone)]
pub(crate) struct EntryForm {
    pub(crate) date: String,
    pub(crate) title: String,
    pub(crate) rating: u8,
    pub(crate) active: EntryField,
    pub(crate) error: Option<String>,
}

/// Fields of the input panel, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum EntryField {
    #[default]
    Date,
    Title,
    Rating,
}

impl EntryField {
    fn next(self) -> Self {
        match self {
            EntryField::Date => EntryField::Title,
            EntryField::Title => EntryField::Rating,
            EntryField::Rating => EntryField::Date,
        }
    }

    fn previous(self) -> Self {
        match self {
            EntryField::Date => EntryField::Rating,
            EntryField::Title => EntryField::Date,
            EntryField::Rating => EntryField::Title,
        }
    }
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl EntryForm {
    /// Fresh form preset to `date`, an empty title and the default rating.
    pub(crate) fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            title: String::new(),
            rating: DEFAULT_RATING,
            active: EntryField::default(),
            error: None,
        }
    }

    pub(crate) fn focus(&mut self, field: EntryField) {
        self.active = field;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    /// Feed a typed character to the active field. Returns whether it was
    /// accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            EntryField::Date => {
                if (ch.is_ascii_digit() || ch == '-') && self.date.len() < DATE_INPUT_LEN {
                    self.date.push(ch);
                    true
                } else {
                    false
                }
            }
            EntryField::Title => {
                if !ch.is_control() {
                    self.title.push(ch);
                    true
                } else {
                    false
                }
            }
            EntryField::Rating => match ch.to_digit(10) {
                Some(digit) if (MIN_RATING as u32..=MAX_RATING as u32).contains(&digit) => {
                    self.rating = digit as u8;
                    true
                }
                _ => false,
            },
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            EntryField::Date => {
                self.date.pop();
            }
            EntryField::Title => {
                self.title.pop();
            }
            EntryField::Rating => {}
        }
    }

    /// Move the date by whole days or the rating by whole stars. An
    /// unparseable date is left as typed.
    pub(crate) fn step(&mut self, delta: i64) {
        match self.active {
            EntryField::Date => {
                if let Ok(date) = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT) {
                    let days = Days::new(delta.unsigned_abs());
                    let stepped = if delta >= 0 {
                        date.checked_add_days(days)
                    } else {
                        date.checked_sub_days(days)
                    };
                    if let Some(stepped) = stepped {
                        self.date = stepped.format(DATE_FORMAT).to_string();
                    }
                }
            }
            EntryField::Rating => {
                let rating = i64::from(self.rating) + delta;
                self.rating = rating.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING)) as u8;
            }
            EntryField::Title => {}
        }
    }

    /// Convert the panel into a draft. Only the date is checked here; title
    /// presence is the controller's call.
    pub(crate) fn parse_inputs(&self) -> Result<EntryDraft> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| anyhow!("Date must be a real date written as YYYY-MM-DD."))?;
        Ok(EntryDraft::new(date, self.title.clone(), self.rating))
    }

    /// Keep date and rating for the next entry, drop the title.
    pub(crate) fn clear_title(&mut self) {
        self.title.clear();
        self.error = None;
    }

    /// Render a single line for the panel widget.
    pub(crate) fn build_line(&self, field_name: &str, field: EntryField) -> Line<'static> {
        let is_active = self.active == field;
        let (display, empty) = match field {
            EntryField::Date => (self.date.clone(), self.date.is_empty()),
            EntryField::Title => (self.title.clone(), self.title.is_empty()),
            EntryField::Rating => (
                format!("{} ({}/{MAX_RATING})", star_glyphs(self.rating), self.rating),
                false,
            ),
        };

        let display = if empty {
            "<required>".to_string()
        } else {
            display
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: EntryField) -> usize {
        match field {
            EntryField::Date => self.date.chars().count(),
            EntryField::Title => self.title.chars().count(),
            EntryField::Rating => 0,
        }
    }
}

/// Confirmation state for deleting the marked rows.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) count: usize,
}
