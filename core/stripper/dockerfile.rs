use super::common::{LineAction, StripResult, strip_lines_impl};

fn directive_transition(_: (), index: usize, line: &[u8]) -> ((), LineAction, Option<String>) {
    let trimmed = line.trim_ascii();
    if trimmed.starts_with(b"#") {
        return (
            (),
            LineAction::Drop,
            Some(format!(
                "Comment on line {}: {:?}",
                index + 1,
                String::from_utf8_lossy(trimmed)
            )),
        );
    }
    ((), LineAction::Keep, None)
}

pub fn strip(lines: &[&[u8]]) -> StripResult {
    strip_lines_impl(lines, directive_transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_lines_are_dropped_and_quoted_in_the_issue() {
        let lines: [&[u8]; 5] = [
            b"# syntax=docker/dockerfile:1",
            b"FROM alpine:3.20",
            b"",
            b"  # install deps",
            b"RUN apk add curl # inline stays",
        ];
        let result = strip(&lines);
        assert_eq!(
            result.text_lines(),
            vec!["FROM alpine:3.20", "", "RUN apk add curl # inline stays"]
        );
        assert_eq!(
            result.issues,
            vec![
                "Comment on line 1: \"# syntax=docker/dockerfile:1\"",
                "Comment on line 4: \"# install deps\"",
            ]
        );
    }

    #[test]
    fn clean_file_is_untouched() {
        let lines: [&[u8]; 3] = [b"FROM scratch", b"COPY app /app", b""];
        let result = strip(&lines);
        assert!(result.is_clean());
        assert_eq!(result.content(), b"FROM scratch\nCOPY app /app\n");
    }
}
