use super::common::{LineAction, StripResult, strip_lines_impl};

/// Byte offset of the line's first `#`, provided that `#` sits outside a
/// quoted region. A quoted first `#` means the line carries no comment.
///
/// Quotes toggle only while the other kind is closed. Backslash escapes are
/// not understood, so `\"` still toggles.
fn find_comment_start(line: &[u8]) -> Option<usize> {
    let pos = line.iter().position(|&b| b == b'#')?;
    let mut in_sgl = false;
    let mut in_dbl = false;
    for &b in &line[..pos] {
        match b {
            b'\'' if !in_dbl => in_sgl = !in_sgl,
            b'"' if !in_sgl => in_dbl = !in_dbl,
            _ => {}
        }
    }
    (!in_sgl && !in_dbl).then_some(pos)
}

fn sh_transition(_: (), index: usize, line: &[u8]) -> ((), LineAction, Option<String>) {
    if index == 0 && line.starts_with(b"#!") {
        return ((), LineAction::Keep, None);
    }
    match find_comment_start(line) {
        Some(pos) => (
            (),
            LineAction::Replace(line[..pos].trim_ascii().to_vec()),
            Some(format!("Comment on line {}", index + 1)),
        ),
        None => ((), LineAction::Keep, None),
    }
}

pub fn strip(lines: &[&[u8]]) -> StripResult {
    strip_lines_impl(lines, sh_transition)
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
    fn hash_inside_double_quotes_is_not_a_comment() {
        let src = "echo \"value # not a comment\"";
        let result = run(src);
        assert!(result.is_clean());
        assert_eq!(result.content(), src.as_bytes());
    }

    #[test]
    fn trailing_comment_is_cut() {
        let result = run("echo hi # trailing");
        assert_eq!(result.text_lines(), vec!["echo hi"]);
        assert_eq!(result.issues, vec!["Comment on line 1"]);
    }

    #[test]
    fn kept_prefix_is_trimmed_on_both_sides() {
        let result = run("if true; then\n  # why\n    run # now\nfi");
        assert_eq!(result.text_lines(), vec!["if true; then", "", "run", "fi"]);
        assert_eq!(result.issues, vec!["Comment on line 2", "Comment on line 3"]);
    }

    #[test]
    fn shebang_only_counts_on_the_first_line() {
        let result = run("#!/bin/bash\nset -e\n#!not a shebang");
        assert_eq!(result.text_lines(), vec!["#!/bin/bash", "set -e", ""]);
        assert_eq!(result.issues, vec!["Comment on line 3"]);
    }

    #[test]
    fn only_the_first_hash_is_considered() {
        assert_eq!(find_comment_start(b"echo \"it's\" # c"), Some(12));
        assert_eq!(find_comment_start(b"echo 'say \"#'"), None);
        assert_eq!(find_comment_start(b"echo '#' \"#\" # real"), None);
        assert_eq!(find_comment_start(b"x=1 # a # b"), Some(4));
    }

    #[test]
    fn line_whose_first_hash_is_quoted_is_left_unchanged() {
        let src = "echo '#' # real";
        let result = run(src);
        assert!(result.is_clean());
        assert_eq!(result.content(), src.as_bytes());
    }

    #[test]
    fn escaped_quotes_are_not_special() {
        assert_eq!(find_comment_start(b"echo \\\" # hidden"), None);
    }

    #[test]
    fn stripping_is_idempotent() {
        let src = "#!/bin/sh\n# a\nx=1 # b\necho \"#{x}\"\n";
        let first = run(src);
        let second = run(first.content());
        assert!(second.is_clean());
        assert_eq!(second.content(), first.content());
    }
}
