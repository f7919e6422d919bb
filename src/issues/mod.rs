mod load;
mod model;
mod selection;

use crate::config::RuntimeConfig;
use crate::ui::{render_header, scroll_top};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::{bail, Result};
use console::{style, Key, Term};
use tracing::info;

pub use load::load_issues_safely;
pub use selection::{RowState, SelectionController};

const NAME_WIDTH: usize = 24;
const MESSAGE_WIDTH: usize = 40;

/// Issues screen. Returns `true` when the user asked to quit the app.
pub fn run(cfg: &RuntimeConfig) -> Result<bool> {
    let issues = load_issues_safely(&cfg.issues_file);
    info!("loaded {} issues from {}", issues.len(), cfg.issues_file.display());
    let mut table = SelectionController::new(issues);

    let term = Term::stdout();
    let mut cursor: usize = 0;
    let mut top: usize = 0;
    loop {
        term.clear_screen()?;
        render_header(
            cfg.header.as_deref(),
            "Issues (space = toggle, a = select all, b = back, q = quit)",
        );
        println!("{}", header_row(&table));

        let (rows, _cols) = term.size();
        let reserved = 3 + usize::from(cfg.header.is_some());
        let visible = (rows as usize).saturating_sub(reserved).max(3);
        top = scroll_top(top, cursor, visible);
        let rows_to_show = table.issues().len().min(top + visible);
        for i in top..rows_to_show {
            println!("{}", issue_row(&table, i, i == cursor));
        }
        if table.issues().is_empty() {
            println!("  (no issues)");
        }
        println!("{}", summary_line(&table));

        let last = table.issues().len().saturating_sub(1);
        match term.read_key()? {
            Key::ArrowUp => cursor = cursor.saturating_sub(1),
            Key::ArrowDown => cursor = (cursor + 1).min(last),
            Key::Home => cursor = 0,
            Key::End => cursor = last,
            Key::Char(' ') | Key::Enter => {
                table.toggle(cursor);
            }
            Key::Char('a') | Key::Char('A') => {
                let checked = !table.is_select_all_checked();
                table.set_select_all(checked);
            }
            Key::Char('q') | Key::Char('Q') => return Ok(true),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(false),
            Key::Unknown => bail!("terminal input unavailable"),
            _ => {}
        }
    }
}

/// `[x]` all open rows, `[-]` some, `[ ]` none.
pub fn select_all_box(table: &SelectionController) -> &'static str {
    if table.is_select_all_checked() {
        "[x]"
    } else if table.is_indeterminate() {
        "[-]"
    } else {
        "[ ]"
    }
}

fn header_row(table: &SelectionController) -> String {
    let label = if table.selected_count() == 0 {
        "Select all".to_string()
    } else {
        format!("Selected {}", table.selected_count())
    };
    format!("  {} {}", select_all_box(table), style(label).bold())
}

fn row_box(state: RowState) -> &'static str {
    match (state.selectable, state.checked) {
        (false, _) => " - ",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    }
}

fn issue_row(table: &SelectionController, index: usize, cursor: bool) -> String {
    let issue = &table.issues()[index];
    let state = table.row_state(index);
    let marker = if cursor { ">" } else { " " };
    let line = format!(
        "{marker} {} {:<NAME_WIDTH$} {:<MESSAGE_WIDTH$} {:>6} ev {:>5} usr  {}",
        row_box(state),
        sanitize_for_terminal(&issue.name, NAME_WIDTH),
        sanitize_for_terminal(&issue.message, MESSAGE_WIDTH),
        issue.num_events,
        issue.num_users,
        issue.status,
    );
    if !state.selectable {
        style(line).dim().to_string()
    } else if state.checked {
        style(line).bold().to_string()
    } else {
        line
    }
}

/// Two decimals at most, without trailing zeros.
fn format_value(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

fn summary_line(table: &SelectionController) -> String {
    let ids: Vec<&str> = table
        .selected_indices()
        .map(|i| table.issues()[i].id.as_str())
        .collect();
    format!(
        "{} of {} open selected, total value {} {}",
        table.selected_count(),
        table.open_count(),
        format_value(table.total_selected_value()),
        if ids.is_empty() { String::new() } else { format!("({})", ids.join(", ")) },
    )
}
