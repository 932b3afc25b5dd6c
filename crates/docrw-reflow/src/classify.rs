//! Line-by-line grouping of a raw doc-comment block.
//!
//! Classification is stateful rather than purely line-local: a line
//! indented five spaces past the `//` with no list marker is a
//! *continuation* of whatever list item precedes it, and is folded back
//! into that item's text rather than starting a fresh paragraph.

use docrw_classify::is_preserved_line;

const BULLET_CHARS: &[char] = &['•', '‣', '▸', '▪', '▫', '◦', '⁃'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    Blank,
    Pragma(String),
    Code(Vec<String>),
    Bulleted(Vec<String>),
    Numbered(Vec<String>),
    Paragraph(Vec<String>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bulleted,
    Numbered,
}

fn strip_slashes(line: &str) -> &str {
    line.strip_prefix("//").unwrap_or(line)
}

fn proper_bullet(rest: &str) -> Option<&str> {
    rest.strip_prefix("   - ")
}

fn improper_bullet(rest: &str) -> Option<&str> {
    for prefix in ["- ", "* ", "+ "] {
        if let Some(item) = rest.strip_prefix(' ').and_then(|r| r.strip_prefix(prefix)) {
            return Some(item);
        }
    }
    let stripped = rest.strip_prefix(' ')?;
    let first = stripped.chars().next()?;
    if !BULLET_CHARS.contains(&first) {
        return None;
    }
    stripped[first.len_utf8()..].strip_prefix(' ')
}

/// `"{lead_spaces}{digits}. {text}"` -> `(digits, text)`.
fn parse_numbered<'a>(rest: &'a str, lead_spaces: &str) -> Option<(&'a str, &'a str)> {
    let body = rest.strip_prefix(lead_spaces)?;
    if body.starts_with(' ') {
        return None;
    }
    let digit_end = body.find(|c: char| !c.is_ascii_digit())?;
    if digit_end == 0 {
        return None;
    }
    let (digits, rest2) = body.split_at(digit_end);
    let text = rest2.strip_prefix(". ")?;
    Some((digits, text))
}

/// Classify and group a raw doc-comment block (every line expected to
/// start with `//`, already whitespace-trimmed on the right) in one pass.
pub fn classify_and_group(block: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut in_list: Option<ListKind> = None;

    for raw in block.lines() {
        let trimmed = raw.trim_end();
        if is_preserved_line(trimmed) {
            groups.push(Group::Pragma(trimmed.to_string()));
            in_list = None;
            continue;
        }
        let rest = strip_slashes(trimmed);
        if rest.is_empty() {
            groups.push(Group::Blank);
            in_list = None;
            continue;
        }
        if let Some(code) = rest.strip_prefix('\t') {
            push_coalesced(&mut groups, Group::Code(vec![code.to_string()]));
            in_list = None;
            continue;
        }
        if let Some(item) = proper_bullet(rest).or_else(|| improper_bullet(rest)) {
            push_coalesced(&mut groups, Group::Bulleted(vec![item.to_string()]));
            in_list = Some(ListKind::Bulleted);
            continue;
        }
        if let Some((_, item)) = parse_numbered(rest, "  ").or_else(|| parse_numbered(rest, " ")) {
            push_coalesced(&mut groups, Group::Numbered(vec![item.to_string()]));
            in_list = Some(ListKind::Numbered);
            continue;
        }
        if let (Some(kind), Some(cont)) = (in_list, rest.strip_prefix("     ")) {
            if !cont.starts_with(' ') {
                if let Some(items) = last_list_items(&mut groups, kind) {
                    if let Some(last) = items.last_mut() {
                        last.push(' ');
                        last.push_str(cont);
                        continue;
                    }
                }
            }
        }
        let text = rest.trim_start_matches(' ').to_string();
        push_coalesced(&mut groups, Group::Paragraph(vec![text]));
        in_list = None;
    }
    groups
}

fn last_list_items<'a>(groups: &'a mut [Group], kind: ListKind) -> Option<&'a mut Vec<String>> {
    match (groups.last_mut()?, kind) {
        (Group::Bulleted(items), ListKind::Bulleted) => Some(items),
        (Group::Numbered(items), ListKind::Numbered) => Some(items),
        _ => None,
    }
}

fn push_coalesced(groups: &mut Vec<Group>, next: Group) {
    match (groups.last_mut(), next) {
        (Some(Group::Code(items)), Group::Code(mut new_items)) => items.append(&mut new_items),
        (Some(Group::Bulleted(items)), Group::Bulleted(mut new_items)) => {
            items.append(&mut new_items)
        }
        (Some(Group::Numbered(items)), Group::Numbered(mut new_items)) => {
            items.append(&mut new_items)
        }
        (Some(Group::Paragraph(items)), Group::Paragraph(mut new_items)) => {
            items.append(&mut new_items)
        }
        (_, next) => groups.push(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_proper_bullet_with_continuation() {
        let block = "// List:\n//   - first item\n//     continued\n//   - second item";
        let groups = classify_and_group(block);
        assert_eq!(
            groups,
            vec![
                Group::Paragraph(vec!["List:".into()]),
                Group::Bulleted(vec!["first item continued".into(), "second item".into()]),
            ]
        );
    }

    #[test]
    fn groups_improper_numbered_list() {
        let block = "// 1. first step\n// 2. second step";
        let groups = classify_and_group(block);
        assert_eq!(
            groups,
            vec![Group::Numbered(vec![
                "first step".into(),
                "second step".into()
            ])]
        );
    }

    #[test]
    fn recognizes_unicode_bullets() {
        let block = "// • alpha\n// • beta";
        let groups = classify_and_group(block);
        assert_eq!(
            groups,
            vec![Group::Bulleted(vec!["alpha".into(), "beta".into()])]
        );
    }

    #[test]
    fn pragma_breaks_a_paragraph_run() {
        let block = "// normal text\n//go:generate stringer\n// more text";
        let groups = classify_and_group(block);
        assert_eq!(
            groups,
            vec![
                Group::Paragraph(vec!["normal text".into()]),
                Group::Pragma("//go:generate stringer".into()),
                Group::Paragraph(vec!["more text".into()]),
            ]
        );
    }

    #[test]
    fn code_line_preserves_tab() {
        let block = "//\tfmt.Println(x)";
        let groups = classify_and_group(block);
        assert_eq!(groups, vec![Group::Code(vec!["fmt.Println(x)".into()])]);
    }
}
