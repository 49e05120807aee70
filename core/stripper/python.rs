use super::common::{LineAction, Start, StripResult, find, remainder, strip_lines_impl};

const TRIPLE_DBL: &[u8] = b"\"\"\"";
const TRIPLE_SGL: &[u8] = b"'''";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PyState {
    Code,
    InDocstring { start: usize, delim: &'static [u8] },
}
impl Start for PyState {
    fn start() -> Self {
        PyState::Code
    }
}

fn py_transition(from: PyState, index: usize, line: &[u8]) -> (PyState, LineAction, Option<String>) {
    match from {
        PyState::InDocstring { start, delim } => match find(line, delim) {
            Some(pos) => (
                PyState::Code,
                remainder(line, &line[pos + delim.len()..]),
                Some(format!(
                    "Docstring from line {} to line {}",
                    start + 1,
                    index + 1
                )),
            ),
            None => (from, LineAction::Drop, None),
        },
        PyState::Code => {
            let trimmed = line.trim_ascii_start();
            if trimmed.starts_with(b"#") {
                return (
                    PyState::Code,
                    LineAction::Drop,
                    Some(format!("Single-line comment on line {}", index + 1)),
                );
            }
            for delim in [TRIPLE_DBL, TRIPLE_SGL] {
                let Some(body) = trimmed.strip_prefix(delim) else {
                    continue;
                };
                return match find(body, delim) {
                    Some(pos) => (
                        PyState::Code,
                        remainder(line, &body[pos + delim.len()..]),
                        Some(format!("Docstring on line {}", index + 1)),
                    ),
                    None => (
                        PyState::InDocstring {
                            start: index,
                            delim,
                        },
                        LineAction::Drop,
                        None,
                    ),
                };
            }
            (PyState::Code, LineAction::Keep, None)
        }
    }
}

pub fn strip(lines: &[&[u8]]) -> StripResult {
    strip_lines_impl(lines, py_transition)
}
