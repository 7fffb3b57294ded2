//! Modal editor used for both creating and editing a todo.
//!
//! A dialog walks through three prompts (title, description, confirm) and
//! finishes with exactly one outcome. It never touches storage itself; the
//! caller forwards the outcome to the state holder.

use todo_core::Todo;

/// Answer that aborts the dialog from any prompt.
pub const CANCEL_ANSWER: &str = ":cancel";
/// Answer that clears a pre-populated field.
pub const CLEAR_ANSWER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Create,
    /// The record under edit is held for the dialog's whole lifetime.
    Edit(Todo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Title,
    Description,
    Confirm,
}

/// How a dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Insert(Todo),
    Update(Todo),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDialog {
    mode: Mode,
    stage: Stage,
    title: String,
    description: String,
}

impl EditorDialog {
    /// Opens a blank dialog.
    pub fn create() -> Self {
        Self {
            mode: Mode::Create,
            stage: Stage::Title,
            title: String::new(),
            description: String::new(),
        }
    }

    /// Opens a dialog pre-populated from `todo`.
    pub fn edit(todo: Todo) -> Self {
        Self {
            stage: Stage::Title,
            title: todo.title.clone(),
            description: todo.description.clone(),
            mode: Mode::Edit(todo),
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            Mode::Create => "New todo",
            Mode::Edit(_) => "Edit todo",
        }
    }

    /// Text shown before reading the next answer.
    pub fn prompt(&self) -> String {
        match self.stage {
            Stage::Title => field_prompt("Title", &self.title),
            Stage::Description => field_prompt("Description", &self.description),
            Stage::Confirm => match self.mode {
                Mode::Create => "[a]dd / [c]ancel: ".to_string(),
                Mode::Edit(_) => "[a]pply / [c]ancel: ".to_string(),
            },
        }
    }

    /// Feeds one answer; returns the outcome once the dialog closes.
    ///
    /// Field answers are stored verbatim. Surrounding whitespace is only
    /// ignored when matching `:cancel`, `-` and the confirm keywords.
    pub fn answer(&mut self, input: &str) -> Option<DialogOutcome> {
        let keyword = input.trim();
        if keyword == CANCEL_ANSWER {
            return Some(DialogOutcome::Cancelled);
        }

        match self.stage {
            Stage::Title => {
                apply_field(&mut self.title, input);
                self.stage = Stage::Description;
                None
            }
            Stage::Description => {
                apply_field(&mut self.description, input);
                self.stage = Stage::Confirm;
                None
            }
            Stage::Confirm => match keyword.to_ascii_lowercase().as_str() {
                "a" | "add" | "apply" | "y" | "yes" => Some(self.confirm()),
                "c" | "cancel" | "n" | "no" => Some(DialogOutcome::Cancelled),
                _ => None,
            },
        }
    }

    fn confirm(&self) -> DialogOutcome {
        match &self.mode {
            Mode::Create => DialogOutcome::Insert(Todo::new(
                self.title.clone(),
                self.description.clone(),
            )),
            Mode::Edit(todo) => DialogOutcome::Update(
                todo.edited(self.title.clone(), self.description.clone()),
            ),
        }
    }
}

fn field_prompt(label: &str, current: &str) -> String {
    if current.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{current}]: ")
    }
}

fn apply_field(field: &mut String, input: &str) {
    if input.trim() == CLEAR_ANSWER {
        field.clear();
    } else if !input.is_empty() {
        *field = input.to_string();
    }
}
