//! Line-oriented comment scanning.

use crate::ir::CommentInfo;

use super::profile::LanguageProfile;

const QUOTES: &[char] = &['"', '\'', '`'];

/// Scan `content` line by line. The first pattern that matches a line wins;
/// a comment whose captured text is empty after trimming is dropped.
///
/// Markers inside string literals closed on the same line are not comments,
/// and neither is a `#!` interpreter line at the top of the file.
pub fn scan_comments(content: &str, file_path: &str, profile: &LanguageProfile) -> Vec<CommentInfo> {
    let mut comments = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if idx == 0 && line.starts_with("#!") {
            continue;
        }
        let masked = mask_strings(line);
        for pattern in &profile.comment_patterns {
            let Some(caps) = pattern.regex.captures(&masked) else {
                continue;
            };
            let text = caps
                .get(1)
                .and_then(|m| line.get(m.range()))
                .map(str::trim)
                .unwrap_or("");
            if !text.is_empty() {
                comments.push(CommentInfo {
                    content: text.to_string(),
                    line_number: idx + 1,
                    comment_type: pattern.kind,
                    language: profile.language,
                    file_path: file_path.to_string(),
                });
            }
            break;
        }
    }

    comments
}

/// The `#!` interpreter line, when the file starts with one.
pub fn shebang(content: &str) -> Option<String> {
    content
        .lines()
        .next()
        .filter(|line| line.starts_with("#!"))
        .map(|line| line.trim_end().to_string())
}

/// Blank the contents of string literals that close on the same line,
/// keeping byte offsets intact.
fn mask_strings(line: &str) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut chars = line.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        masked.push(c);
        if !QUOTES.contains(&c) {
            continue;
        }
        let Some(end) = closing_quote(&line[start + c.len_utf8()..], c) else {
            continue;
        };
        let body_end = start + c.len_utf8() + end;
        masked.extend(std::iter::repeat(' ').take(end));
        masked.push(c);
        while chars.next_if(|(i, _)| *i <= body_end).is_some() {}
    }
    masked
}

/// Byte offset of the unescaped `quote` closing `rest`.
fn closing_quote(rest: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            _ if c == quote => return Some(i),
            _ => {}
        }
    }
    None
}

/// Comments forming a contiguous run that ends on the line just above `line`.
pub fn leading_comments(comments: &[CommentInfo], line: usize) -> Vec<CommentInfo> {
    let mut run = Vec::new();
    let mut expected = line.saturating_sub(1);

    for comment in comments.iter().rev() {
        if comment.line_number >= line {
            continue;
        }
        if expected == 0 || comment.line_number != expected {
            break;
        }
        run.push(comment.clone());
        expected -= 1;
    }

    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::profile::profile_for;
    use crate::ir::CommentKind;
    use crate::language::Language;

    #[test]
    fn test_hash_comments() {
        let src = "# header\nx = 1  # trailing\n#\ny = 2\n";
        let comments = scan_comments(src, "a.py", profile_for(Language::Python));
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "header");
        assert_eq!(comments[0].line_number, 1);
        assert_eq!(comments[1].content, "trailing");
        assert_eq!(comments[1].line_number, 2);
        assert_eq!(comments[1].comment_type, CommentKind::Line);
    }

    #[test]
    fn test_c_style_kinds() {
        let src = "/// documented\n// plain\n/* block */\n/** javadoc */\nint x;\n";
        let comments = scan_comments(src, "a.rs", profile_for(Language::Rust));
        let kinds: Vec<_> = comments.iter().map(|c| c.comment_type).collect();
        assert_eq!(
            kinds,
            vec![CommentKind::Doc, CommentKind::Line, CommentKind::Block, CommentKind::Doc]
        );
        assert_eq!(comments[0].content, "documented");
        assert_eq!(comments[2].content, "block");
    }

    #[test]
    fn test_one_comment_per_line() {
        let src = "foo(); // one /* two */\n";
        let comments = scan_comments(src, "a.js", profile_for(Language::JavaScript));
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "one /* two */");
    }

    #[test]
    fn test_markers_inside_strings_are_skipped() {
        let src = "url = \"http://x\"\ntag = '#fff'  # color\nlabel = \"a \\\" # b\"\n";
        let comments = scan_comments(src, "a.py", profile_for(Language::Python));
        let texts: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["color"]);

        let js = scan_comments("fetch(\"http://host/api\"); // call it\n", "a.js", profile_for(Language::JavaScript));
        assert_eq!(js.len(), 1);
        assert_eq!(js[0].content, "call it");
    }

    #[test]
    fn test_shebang_is_not_a_comment() {
        let src = "#!/usr/bin/env python3\n# Real header.\nimport os\n";
        let comments = scan_comments(src, "tool.py", profile_for(Language::Python));
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Real header.");
        assert_eq!(comments[0].line_number, 2);
    }

    #[test]
    fn test_sql_comments() {
        let comments = scan_comments("-- users table\nSELECT 1;", "q.sql", profile_for(Language::Sql));
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "users table");
    }

    #[test]
    fn test_leading_comments_contiguous_run() {
        let src = "# unrelated\n\n# first\n# second\ndef f():\n    pass\n";
        let comments = scan_comments(src, "a.py", profile_for(Language::Python));
        let leading = leading_comments(&comments, 5);
        let texts: Vec<_> = leading.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);

        assert!(leading_comments(&comments, 1).is_empty());
    }
}
