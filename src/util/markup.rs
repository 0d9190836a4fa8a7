const BLOCK_OPEN: &str = "{{{";
const BLOCK_CLOSE: &str = "}}}";
const INDENT: &str = "    ";
const INLINE_CODE: &str = "`";

/// Convert Bitbucket/Trac wiki code blocks (`{{{ ... }}}`) into Markdown.
///
/// A line starting with a block marker opens or closes an indented code
/// block. Open and close are each split on the whole line: the text after
/// `{{{` and the text before `}}}` become separate indented lines, and
/// fragments left empty by a split are dropped. Markers in the middle of ordinary text become inline code
/// spans. An unterminated block indents everything up to the end.
pub fn wiki_to_markdown(body: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_block = false;

    for line in body.lines() {
        if line.starts_with(BLOCK_OPEN) || line.starts_with(BLOCK_CLOSE) {
            if let Some((_, after)) = line.split_once(BLOCK_OPEN) {
                if !after.is_empty() {
                    lines.push(format!("{INDENT}{after}"));
                }
                in_block = true;
            }
            if let Some((before, _)) = line.split_once(BLOCK_CLOSE) {
                if !before.is_empty() {
                    lines.push(format!("{INDENT}{before}"));
                }
                in_block = false;
            }
        } else if in_block {
            lines.push(format!("{INDENT}{line}"));
        } else {
            lines.push(
                line.replace(BLOCK_OPEN, INLINE_CODE)
                    .replace(BLOCK_CLOSE, INLINE_CODE),
            );
        }
    }

    lines.join("\n")
}
