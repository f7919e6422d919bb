use anyhow::{bail, Result};
use console::{Key, Term};
use dialoguer::Input;

#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
    /// Input that names no entry; the caller redraws.
    Invalid,
}

/// Fails when stdout is not an interactive terminal; key reads would never
/// block there.
pub fn require_terminal(term: &Term) -> Result<()> {
    if !term.is_term() {
        bail!("newsboard needs an interactive terminal");
    }
    Ok(())
}

/// Numbered menu. The first key picks the mode: arrows navigate, anything
/// else drops into a typed selection.
pub fn prompt_menu(
    prompt: &str,
    labels: &[String],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let _ = term.clear_screen();
    render_header(header, prompt);
    for (i, it) in labels.iter().enumerate() {
        println!("{}", numbered(i, it, false));
    }
    println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown => {
            arrow_select(&term, prompt, labels, default, header)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Enter => Ok(default.map_or(MenuChoice::Invalid, MenuChoice::Index)),
        Key::Unknown => bail!("terminal input unavailable"),
        Key::Char(c) => {
            let mut builder = Input::new().with_prompt("Selection").allow_empty(true);
            if !c.is_control() {
                builder = builder.with_initial_text(c.to_string());
            }
            let s: String = builder.interact_text()?;
            Ok(parse_selection(&s, labels.len(), default))
        }
        _ => {
            let s: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .interact_text()?;
            Ok(parse_selection(&s, labels.len(), default))
        }
    }
}

/// Shows `lines` until any key is pressed.
pub fn show_message(header: Option<&str>, title: &str, lines: &[String]) -> Result<()> {
    let term = Term::stdout();
    let _ = term.clear_screen();
    render_header(header, title);
    for l in lines {
        println!("{l}");
    }
    println!();
    println!("Press any key to go back.");
    term.read_key()?;
    Ok(())
}

pub fn render_header(header: Option<&str>, prompt: &str) {
    if let Some(h) = header {
        println!("{h}");
    }
    println!("{prompt}");
}

fn numbered(i: usize, label: &str, cursor: bool) -> String {
    let marker = if cursor { "> " } else { "  " };
    // Continuation lines of multi-line labels are indented under the text.
    let pad = " ".repeat(marker.len() + (i + 1).to_string().len() + 2);
    let mut lines = label.lines();
    let mut out = format!("{marker}{}: {}", i + 1, lines.next().unwrap_or(""));
    for rest in lines {
        out.push('\n');
        out.push_str(&pad);
        out.push_str(rest);
    }
    out
}

fn parse_selection(input: &str, len: usize, default: Option<usize>) -> MenuChoice {
    let s = input.trim();
    if s.is_empty() {
        return default.map_or(MenuChoice::Invalid, MenuChoice::Index);
    }
    if s.eq_ignore_ascii_case("q") {
        return MenuChoice::Quit;
    }
    if s.eq_ignore_ascii_case("b") {
        return MenuChoice::Back;
    }
    match s.parse::<usize>() {
        Ok(idx) if idx >= 1 && idx <= len => MenuChoice::Index(idx - 1),
        _ => MenuChoice::Invalid,
    }
}

/// First row of the window that keeps `sel` visible.
pub fn scroll_top(top: usize, sel: usize, visible: usize) -> usize {
    if sel < top {
        sel
    } else if visible > 0 && sel >= top + visible {
        sel + 1 - visible
    } else {
        top
    }
}

fn arrow_select(
    term: &Term,
    prompt: &str,
    labels: &[String],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let mut sel = default.unwrap_or(0).min(labels.len().saturating_sub(1));
    let mut top: usize = 0;
    loop {
        term.clear_screen()?;
        render_header(header, prompt);

        let (rows, _cols) = term.size();
        let line_height = labels.iter().map(|l| l.lines().count()).max().unwrap_or(1).max(1);
        let reserved = 2 + usize::from(header.is_some());
        let max_visible = ((rows as usize).saturating_sub(reserved) / line_height)
            .max(3)
            .min(labels.len());

        top = scroll_top(top, sel, max_visible);
        let end = (top + max_visible).min(labels.len());
        for (i, label) in labels.iter().enumerate().take(end).skip(top) {
            println!("{}", numbered(i, label, i == sel));
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        let step = max_visible.saturating_sub(1).max(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => {
                if sel + 1 < labels.len() {
                    sel += 1;
                }
            }
            Key::Home => sel = 0,
            Key::End => sel = labels.len().saturating_sub(1),
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(labels.len().saturating_sub(1)),
            Key::Enter if !labels.is_empty() => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            Key::Unknown => bail!("terminal input unavailable"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_numbers_are_one_based() {
        assert_eq!(parse_selection("3", 5, None), MenuChoice::Index(2));
        assert_eq!(parse_selection(" 1 ", 5, None), MenuChoice::Index(0));
    }

    #[test]
    fn typed_letters_navigate() {
        assert_eq!(parse_selection("Q", 5, None), MenuChoice::Quit);
        assert_eq!(parse_selection("b", 5, None), MenuChoice::Back);
    }

    #[test]
    fn empty_input_uses_default() {
        assert_eq!(parse_selection("", 5, Some(4)), MenuChoice::Index(4));
        assert_eq!(parse_selection("", 5, None), MenuChoice::Invalid);
    }

    #[test]
    fn mistyped_input_is_invalid_not_an_error() {
        assert_eq!(parse_selection("0", 5, None), MenuChoice::Invalid);
        assert_eq!(parse_selection("6", 5, None), MenuChoice::Invalid);
        assert_eq!(parse_selection("two", 5, Some(1)), MenuChoice::Invalid);
    }

    #[test]
    fn multi_line_labels_are_indented() {
        assert_eq!(numbered(9, "title\nmeta", true), "> 10: title\n      meta");
    }

    #[test]
    fn window_follows_cursor() {
        assert_eq!(scroll_top(0, 2, 5), 0);
        assert_eq!(scroll_top(0, 7, 5), 3);
        assert_eq!(scroll_top(4, 1, 5), 1);
    }
}
