//! Terminal view layer.
//!
//! # Responsibility
//! - Render the live list and route user input to the state holder.
//! - Run the editor dialog state machine (`Closed -> Open -> Closed`).
//!
//! # Invariants
//! - The view never writes storage directly; every mutation goes through
//!   `TodoStateHolder`.
//! - While a dialog is open, list changes are recorded but not drawn, so
//!   the dialog prompt is never interleaved with a redraw.
//! - A list equal to the one already on screen is not drawn again.
//! - Delete acts immediately: no confirmation, no undo.

pub mod command;
pub mod dialog;
pub mod list;

use command::{parse_command, Command, HELP};
use dialog::{DialogOutcome, EditorDialog};
use list::render_list;
use log::debug;
use std::io::{self, Write};
use todo_core::{Todo, TodoStateHolder, TodoStore};

pub const LIST_PROMPT: &str = "> ";

/// What the input loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
enum Editor {
    Closed,
    Open(EditorDialog),
}

pub struct TodoView<'a, S: TodoStore + 'static> {
    holder: &'a TodoStateHolder<S>,
    rows: Vec<Todo>,
    editor: Editor,
    /// The last screen drawn still shows `rows`.
    screen_current: bool,
}

impl<'a, S: TodoStore + 'static> TodoView<'a, S> {
    pub fn new(holder: &'a TodoStateHolder<S>) -> Self {
        Self {
            rows: holder.todos().current(),
            holder,
            editor: Editor::Closed,
            screen_current: false,
        }
    }

    /// Prompt for the next line of input.
    pub fn prompt(&self) -> String {
        match &self.editor {
            Editor::Closed => LIST_PROMPT.to_string(),
            Editor::Open(dialog) => dialog.prompt(),
        }
    }

    pub fn is_dialog_open(&self) -> bool {
        matches!(self.editor, Editor::Open(_))
    }

    /// Draws the list screen.
    pub fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Todos ({})", self.rows.len())?;
        write!(out, "{}", render_list(&self.rows))?;
        self.screen_current = true;
        Ok(())
    }

    /// Records a new list from the state holder; redraws when no dialog
    /// is open and the list differs from the one on screen. Returns whether
    /// a redraw happened.
    pub fn on_list_changed(&mut self, todos: Vec<Todo>, out: &mut impl Write) -> io::Result<bool> {
        if self.screen_current && todos == self.rows {
            return Ok(false);
        }
        self.rows = todos;
        if self.is_dialog_open() {
            self.screen_current = false;
            return Ok(false);
        }
        self.draw(out)?;
        Ok(true)
    }

    /// Handles one line typed by the user.
    pub fn on_input(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        match std::mem::replace(&mut self.editor, Editor::Closed) {
            Editor::Open(mut dialog) => {
                match dialog.answer(line) {
                    Some(outcome) => self.close_dialog(outcome, out)?,
                    None => self.editor = Editor::Open(dialog),
                }
                Ok(Flow::Continue)
            }
            Editor::Closed => self.on_command(line, out),
        }
    }

    fn on_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::New => self.open_dialog(EditorDialog::create(), out)?,
            Command::Edit(row) => match self.row(row) {
                Some(todo) => self.open_dialog(EditorDialog::edit(todo), out)?,
                None => writeln!(out, "no row {row}")?,
            },
            Command::Delete(row) => match self.row(row) {
                Some(todo) => {
                    debug!("event=view_delete module=view status=issued");
                    self.holder.delete(todo);
                }
                None => writeln!(out, "no row {row}")?,
            },
            Command::Refresh => self.draw(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn row(&self, row: usize) -> Option<Todo> {
        row.checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .cloned()
    }

    fn open_dialog(&mut self, dialog: EditorDialog, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "-- {} (`:cancel` to abort) --", dialog.heading())?;
        self.editor = Editor::Open(dialog);
        // Dialog prompts scroll the list away; redraw on the next change.
        self.screen_current = false;
        Ok(())
    }

    fn close_dialog(&mut self, outcome: DialogOutcome, out: &mut impl Write) -> io::Result<()> {
        self.editor = Editor::Closed;
        match outcome {
            DialogOutcome::Insert(todo) => {
                debug!("event=view_insert module=view status=issued");
                self.holder.insert(todo);
            }
            DialogOutcome::Update(todo) => {
                debug!("event=view_update module=view status=issued");
                self.holder.update(todo);
            }
            DialogOutcome::Cancelled => {
                writeln!(out, "cancelled")?;
                // Changes that arrived while the dialog was open were not drawn yet.
                self.draw(out)?;
            }
        }
        Ok(())
    }
}
