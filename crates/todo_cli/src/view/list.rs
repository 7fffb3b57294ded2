//! Text rendering of the todo list screen.

use todo_core::Todo;

pub const EMPTY_PLACEHOLDER: &str = "  (nothing to do; type `n` to add a todo)";

/// Renders one block per todo: row number and title, then description
/// and timestamp indented under it.
pub fn render_list(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return format!("{EMPTY_PLACEHOLDER}\n");
    }

    let width = todos.len().to_string().len();
    let mut screen = String::new();
    for (index, todo) in todos.iter().enumerate() {
        let indent = " ".repeat(width + 4);
        screen.push_str(&format!("  {:>width$}. {}\n", index + 1, todo.title));
        if !todo.description.is_empty() {
            screen.push_str(&format!("{indent}{}\n", todo.description));
        }
        screen.push_str(&format!("{indent}{}\n", todo.created_at));
    }
    screen
}
