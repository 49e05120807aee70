use super::common::{LineAction, Start, StripResult, find, remainder, strip_lines_impl};

const LINE_COMMENT: &[u8] = b"//";
const BLOCK_OPEN: &[u8] = b"/*";
const BLOCK_CLOSE: &[u8] = b"*/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CState {
    Code,
    InBlock { start: usize },
}
impl Start for CState {
    fn start() -> Self {
        CState::Code
    }
}

pub(crate) fn c_transition(
    from: CState,
    index: usize,
    line: &[u8],
) -> (CState, LineAction, Option<String>) {
    match from {
        CState::InBlock { start } => match find(line, BLOCK_CLOSE) {
            Some(pos) => (
                CState::Code,
                remainder(line, &line[pos + BLOCK_CLOSE.len()..]),
                Some(format!(
                    "Multi-line comment from line {} to line {}",
                    start + 1,
                    index + 1
                )),
            ),
            None => (from, LineAction::Drop, None),
        },
        CState::Code => {
            let trimmed = line.trim_ascii_start();
            if trimmed.starts_with(LINE_COMMENT) {
                return (
                    CState::Code,
                    LineAction::Drop,
                    Some(format!("Single-line comment on line {}", index + 1)),
                );
            }
            let Some(body) = trimmed.strip_prefix(BLOCK_OPEN) else {
                return (CState::Code, LineAction::Keep, None);
            };
            match find(body, BLOCK_CLOSE) {
                Some(pos) => (
                    CState::Code,
                    remainder(line, &body[pos + BLOCK_CLOSE.len()..]),
                    Some(format!("Multi-line comment on line {}", index + 1)),
                ),
                None => (CState::InBlock { start: index }, LineAction::Drop, None),
            }
        }
    }
}

pub fn strip(lines: &[&[u8]]) -> StripResult {
    strip_lines_impl(lines, c_transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(src: impl AsRef<[u8]>) -> StripResult {
        let lines: Vec<&[u8]> = src.as_ref().split(|&b| b == b'\n').collect();
        strip(&lines)
    }

    #[test]
    fn drops_leading_line_comments() {
        let result = run("package main\n\n// Answer is 42.\n  // indented\nvar x = 42");
        assert_eq!(result.text_lines(), vec!["package main", "", "var x = 42"]);
        assert_eq!(
            result.issues,
            vec![
                "Single-line comment on line 3",
                "Single-line comment on line 4"
            ]
        );
    }

    #[test]
    fn trailing_comment_after_code_is_left_alone() {
        let src = "x := 1 // keep me\nurl := \"http://example.com\"";
        let result = run(src);
        assert!(result.is_clean());
        assert_eq!(result.content(), src.as_bytes());
    }

    #[test]
    fn single_line_block_keeps_trailing_code() {
        let result = run("\t/* note */ x++\n/* alone */");
        assert_eq!(result.text_lines(), vec!["\tx++", ""]);
        assert_eq!(
            result.issues,
            vec!["Multi-line comment on line 1", "Multi-line comment on line 2"]
        );
    }

    #[test]
    fn block_spanning_lines_reports_its_range() {
        let src = "a()\n/*\n * doc\n\n */ b()\nc()";
        let result = run(src);
        assert_eq!(result.text_lines(), vec!["a()", "", " b()", "c()"]);
        assert_eq!(result.issues, vec!["Multi-line comment from line 2 to line 5"]);
    }

    #[test]
    fn opener_is_not_its_own_closer() {
        let result = run("/*/ still open\nx\n*/");
        assert_eq!(result.text_lines(), vec![""]);
        assert_eq!(result.issues, vec!["Multi-line comment from line 1 to line 3"]);
    }

    #[test]
    fn unterminated_block_swallows_the_rest_without_an_issue() {
        let result = run("keep()\n/* never closed\nlost()\nalso_lost()");
        assert_eq!(result.text_lines(), vec!["keep()"]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn stripping_is_idempotent() {
        let src = "// a\nfunc f() {\n\t/* b */ return\n}\n/*\nc\n*/\n";
        let first = run(src);
        let second = run(first.content());
        assert!(second.is_clean());
        assert_eq!(second.content(), first.content());
    }
}
