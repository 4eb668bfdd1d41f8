//! Line-oriented command parsing for the interactive shell.
//!
//! Parsing is two steps: [`parse`] turns a line into a [`Command`], then
//! [`Command::into_action`] resolves item references against the visible
//! list and yields the [`TodoAction`] to send. Shell-only commands (`list`,
//! `help`, `quit`) never reach the store.

use crate::types::{Filter, TodoAction, TodoId, TodoState};
use thiserror::Error;

/// Usage text printed by `help` and after a parse error
pub const USAGE: &str = "\
commands:
  add <text>            add a todo
  done <ref>            mark completed
  undone <ref>          mark active
  rm <ref>              delete
  edit <ref>            start editing
  save <ref> <text>     finish editing (empty text deletes)
  cancel <ref>          abandon editing
  clear                 delete all completed
  toggle-all            complete all, or un-complete all if all are done
  filter all|active|completed
  theme                 switch dark/light
  list | help | quit
<ref> is the number shown in the list or a raw id; #<id> always means an id";

/// Errors produced while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The first word is not a known command
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// A required argument is missing
    #[error("`{command}` needs {what}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the missing argument
        what: &'static str,
    },

    /// Unknown filter name
    #[error("unknown filter `{0}` (expected all, active or completed)")]
    UnknownFilter(String),

    /// The reference matches neither a visible position nor an id
    #[error("no todo matches `{0}`")]
    UnknownRef(String),
}

/// Reference to an item as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// 1-based position in the visible list
    Index(usize),
    /// Raw item id
    Id(TodoId),
}

impl ItemRef {
    fn parse(word: &str) -> Self {
        if let Some(id) = word.strip_prefix('#') {
            return Self::Id(TodoId::from(id));
        }
        match word.parse::<usize>() {
            Ok(index) if index > 0 => Self::Index(index),
            _ => Self::Id(TodoId::from(word)),
        }
    }

    /// Resolves the reference against the items currently visible in `state`
    ///
    /// A number past the end of the visible list falls back to an item whose
    /// id is that number.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownRef`] if no visible position or existing
    /// id matches.
    pub fn resolve(&self, state: &TodoState) -> Result<TodoId, ParseError> {
        match self {
            Self::Index(index) => state
                .visible_items()
                .get(index - 1)
                .map(|item| item.id.clone())
                .or_else(|| {
                    let id = TodoId::new(index.to_string());
                    state.exists(&id).then_some(id)
                })
                .ok_or_else(|| ParseError::UnknownRef(index.to_string())),
            Self::Id(id) if state.exists(id) => Ok(id.clone()),
            Self::Id(id) => Err(ParseError::UnknownRef(id.to_string())),
        }
    }
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`
    Add(String),
    /// `done <ref>` / `undone <ref>`
    SetCompleted(ItemRef, bool),
    /// `rm <ref>`
    Remove(ItemRef),
    /// `edit <ref>`
    BeginEdit(ItemRef),
    /// `save <ref> <text>`
    CommitEdit(ItemRef, String),
    /// `cancel <ref>`
    CancelEdit(ItemRef),
    /// `clear`
    ClearCompleted,
    /// `toggle-all`
    ToggleAll,
    /// `filter <name>`
    SetFilter(Filter),
    /// `theme`
    ToggleTheme,
    /// `list`
    List,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    /// Turns the command into a store action, resolving references
    ///
    /// Returns `Ok(None)` for shell-only commands.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownRef`] if a reference does not resolve.
    pub fn into_action(self, state: &TodoState) -> Result<Option<TodoAction>, ParseError> {
        let action = match self {
            Self::Add(text) => TodoAction::Add { text },
            Self::SetCompleted(r, completed) => TodoAction::SetCompleted {
                id: r.resolve(state)?,
                completed,
            },
            Self::Remove(r) => TodoAction::Remove { id: r.resolve(state)? },
            Self::BeginEdit(r) => TodoAction::BeginEdit { id: r.resolve(state)? },
            Self::CommitEdit(r, text) => TodoAction::CommitEdit {
                id: r.resolve(state)?,
                text,
            },
            Self::CancelEdit(r) => TodoAction::CancelEdit { id: r.resolve(state)? },
            Self::ClearCompleted => TodoAction::ClearCompleted,
            Self::ToggleAll => TodoAction::ToggleAll,
            Self::SetFilter(filter) => TodoAction::SetFilter { filter },
            Self::ToggleTheme => TodoAction::ToggleTheme,
            Self::List | Self::Help | Self::Quit => return Ok(None),
        };
        Ok(Some(action))
    }
}

/// Parses one input line
///
/// Returns `Ok(None)` for a blank line. Text arguments are passed through
/// verbatim; trimming is the reducer's job.
///
/// ```
/// use todo::command::{parse, Command, ItemRef};
///
/// assert_eq!(parse("add  buy milk").unwrap(), Some(Command::Add(" buy milk".into())));
/// assert_eq!(parse("done 2").unwrap(), Some(Command::SetCompleted(ItemRef::Index(2), true)));
/// assert_eq!(parse("   ").unwrap(), None);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands, missing arguments or an
/// unknown filter name.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = split_word(line);

    let command = match word {
        "add" => Command::Add(rest.to_string()),
        "done" => Command::SetCompleted(item_ref("done", rest)?, true),
        "undone" => Command::SetCompleted(item_ref("undone", rest)?, false),
        "rm" => Command::Remove(item_ref("rm", rest)?),
        "edit" => Command::BeginEdit(item_ref("edit", rest)?),
        "save" => {
            let (target, text) = split_word(rest.trim_start());
            Command::CommitEdit(item_ref("save", target)?, text.to_string())
        },
        "cancel" => Command::CancelEdit(item_ref("cancel", rest)?),
        "clear" => Command::ClearCompleted,
        "toggle-all" => Command::ToggleAll,
        "filter" => {
            let name = rest.trim();
            if name.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "filter",
                    what: "all, active or completed",
                });
            }
            Command::SetFilter(
                name.parse()
                    .map_err(|_| ParseError::UnknownFilter(name.to_string()))?,
            )
        },
        "theme" => Command::ToggleTheme,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

/// Splits off the first word at the first whitespace character
fn split_word(line: &str) -> (&str, &str) {
    line.split_once(char::is_whitespace).unwrap_or((line, ""))
}

fn item_ref(command: &'static str, arg: &str) -> Result<ItemRef, ParseError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            what: "an item number or id",
        });
    }
    Ok(ItemRef::parse(arg))
}
