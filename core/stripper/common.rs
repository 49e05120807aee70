/// Rewritten lines of one file plus the issues found, in line order.
///
/// Lines are raw bytes: content is never decoded, so files in any
/// ASCII-compatible encoding round-trip unchanged outside the removed comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripResult {
    pub lines: Vec<Vec<u8>>,
    pub issues: Vec<String>,
}

impl StripResult {
    pub fn content(&self) -> Vec<u8> {
        self.lines.join(&b'\n')
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Lines decoded for display; invalid UTF-8 is replaced.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }
}

/// What a transition decided to do with the line it was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    Keep,
    Replace(Vec<u8>),
    Drop,
}

pub trait Start: Sized {
    fn start() -> Self;
}

impl Start for () {
    fn start() -> Self {}
}

/// Runs a per-line state machine over `lines`.
///
/// Blank lines are copied through without reaching `transition`, so no
/// language ever sees them and state carries across them untouched.
pub fn strip_lines_impl<LineState, TransitionFn>(
    lines: &[&[u8]],
    transition: TransitionFn,
) -> StripResult
where
    LineState: Start + Copy,
    TransitionFn: Fn(LineState, usize, &[u8]) -> (LineState, LineAction, Option<String>),
{
    let mut result = StripResult {
        lines: Vec::with_capacity(lines.len()),
        issues: Vec::new(),
    };
    let mut current_state = LineState::start();

    for (index, &line) in lines.iter().enumerate() {
        if line.trim_ascii().is_empty() {
            result.lines.push(line.to_vec());
            continue;
        }

        let (next_state, action, issue) = transition(current_state, index, line);
        current_state = next_state;

        match action {
            LineAction::Keep => result.lines.push(line.to_vec()),
            LineAction::Replace(rewritten) => result.lines.push(rewritten),
            LineAction::Drop => {}
        }
        if let Some(issue) = issue {
            result.issues.push(issue);
        }
    }

    result
}

/// Builds the replacement for a line whose comment ended before `rest`.
/// Keeps the original indentation when something survives.
pub(crate) fn remainder(line: &[u8], rest: &[u8]) -> LineAction {
    let rest = rest.trim_ascii();
    if rest.is_empty() {
        return LineAction::Replace(Vec::new());
    }
    let indent_len = line.len() - line.trim_ascii_start().len();
    let mut rewritten = Vec::with_capacity(indent_len + rest.len());
    rewritten.extend_from_slice(&line[..indent_len]);
    rewritten.extend_from_slice(rest);
    LineAction::Replace(rewritten)
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
