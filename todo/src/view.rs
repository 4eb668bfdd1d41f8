//! Plain-text rendering of the todo list.
//!
//! The renderer only reads derived queries; it never decides what is valid.

use crate::types::{Filter, TodoState, Theme};
use std::fmt::Write;

/// Renders the header, the visible items and the counters
///
/// Visible items are numbered from 1; those numbers are what the command
/// line accepts as references.
///
/// ```
/// use todo::{view, TodoState};
///
/// let screen = view::render(&TodoState::new());
/// assert!(screen.contains("Nothing to show"));
/// assert!(screen.contains("0 remaining / 0 total"));
/// ```
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut out = String::new();
    let counts = state.counts();

    let _ = writeln!(out, "{} Todos   {}", state.theme.icon(), filter_bar(state.filter));
    let rule = match state.theme {
        Theme::Dark => "─",
        Theme::Light => "-",
    };
    let _ = writeln!(out, "{}", rule.repeat(40));

    let visible = state.visible_items();
    if visible.is_empty() {
        let _ = writeln!(out, "  {}", empty_message(state.filter, counts.total));
    }
    for (index, item) in visible.iter().enumerate() {
        let marker = if state.is_editing(&item.id) { '>' } else { ' ' };
        let check = if item.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "{marker} {:>2}. [{check}] {}", index + 1, item.text);
    }

    let _ = writeln!(out, "{}", rule.repeat(40));
    let _ = write!(out, "{} remaining / {} total", counts.remaining, counts.total);
    if state.is_all_completed() {
        let _ = write!(out, "   (all done)");
    }
    let _ = writeln!(out);

    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "! {error}");
    }

    out
}

fn filter_bar(active: Filter) -> String {
    Filter::ALL
        .iter()
        .map(|&filter| {
            if filter == active {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn empty_message(filter: Filter, total: usize) -> &'static str {
    match (filter, total) {
        (_, 0) => "Nothing to show. Add something with `add <text>`.",
        (Filter::Active, _) => "Nothing left to do.",
        (Filter::Completed, _) => "Nothing completed yet.",
        (Filter::All, _) => "Nothing to show.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PersistFailure, TodoId, TodoItem};
    use chrono::Utc;

    fn item(id: &str, text: &str, completed: bool) -> TodoItem {
        TodoItem {
            completed,
            ..TodoItem::new(TodoId::from(id), text.to_string(), Utc::now())
        }
    }

    #[test]
    fn renders_visible_items_in_order() {
        let mut state = TodoState::with_items(vec![item("b", "second", true), item("a", "first", false)]);
        state.editing = Some("a".into());

        let screen = render(&state);
        let lines: Vec<&str> = screen.lines().collect();

        assert!(lines[0].starts_with("🌙"));
        assert!(lines[0].contains("[all] active completed"));
        assert_eq!(lines[2], "   1. [x] second");
        assert_eq!(lines[3], ">  2. [ ] first");
        assert_eq!(lines[5], "1 remaining / 2 total");
    }

    #[test]
    fn filter_hides_items_and_renumbers() {
        let mut state = TodoState::with_items(vec![item("b", "second", true), item("a", "first", false)]);
        state.filter = Filter::Active;
        state.theme = Theme::Light;

        let screen = render(&state);

        assert!(screen.starts_with("☀️"));
        assert!(screen.contains("all [active] completed"));
        assert!(screen.contains("   1. [ ] first"));
        assert!(!screen.contains("second"));
    }

    #[test]
    fn empty_states() {
        let mut state = TodoState::with_items(vec![item("a", "done", true)]);
        state.filter = Filter::Active;

        let screen = render(&state);
        assert!(screen.contains("Nothing left to do."));
        assert!(screen.contains("(all done)"));
    }

    #[test]
    fn shows_last_persistence_error() {
        let mut state = TodoState::new();
        state.last_error = Some(PersistFailure {
            key: "todos.v1".into(),
            error: "disk full".into(),
        });
        assert!(render(&state).contains("! could not save todos.v1: disk full"));
    }
}
