// src/agent/extract.rs — Recover source code from model output
//
// Codegen prompts forbid fences and prose, but models add them anyway.
// Line-oriented scan: when fenced blocks exist, their contents are the
// code and everything outside is chatter; when none exist, the whole
// response is taken as code.

/// Strip markdown decoration from a generated-code response.
pub fn extract_code(raw: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in raw.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            match current.take() {
                // Closing fence ends the block.
                Some(lines) => blocks.push(lines.join("\n")),
                // Opening fence, with or without a language tag.
                None => current = Some(Vec::new()),
            }
            continue;
        }
        if let Some(ref mut lines) = current {
            lines.push(line);
        }
    }
    // Unterminated fence: keep what was collected.
    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }

    if blocks.is_empty() {
        raw.trim().to_string()
    } else {
        blocks.join("\n\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_code_passes_through() {
        let raw = "import re\n\ndef parse(path):\n    return rows\n";
        assert_eq!(extract_code(raw), "import re\n\ndef parse(path):\n    return rows");
    }

    #[test]
    fn test_python_tagged_fence() {
        let raw = "```python\ndef parse(path):\n    pass\n```";
        assert_eq!(extract_code(raw), "def parse(path):\n    pass");
    }

    #[test]
    fn test_untagged_fence() {
        let raw = "```\nx = 1\n```\n";
        assert_eq!(extract_code(raw), "x = 1");
    }

    #[test]
    fn test_prose_around_fence_dropped() {
        let raw = "Here is the parser you asked for:\n```python\ndef parse(path):\n    pass\n```\nLet me know if it works!";
        assert_eq!(extract_code(raw), "def parse(path):\n    pass");
    }

    #[test]
    fn test_multiple_blocks_joined() {
        let raw = "```python\nimport re\n```\nand then\n```python\ndef parse(path):\n    pass\n```";
        assert_eq!(extract_code(raw), "import re\n\ndef parse(path):\n    pass");
    }

    #[test]
    fn test_unterminated_fence_kept() {
        let raw = "```python\ndef parse(path):\n    pass";
        assert_eq!(extract_code(raw), "def parse(path):\n    pass");
    }

    #[test]
    fn test_indented_fence_recognized() {
        let raw = "  ```python\ndef parse(path):\n    pass\n  ```";
        assert_eq!(extract_code(raw), "def parse(path):\n    pass");
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(extract_code(""), "");
        assert_eq!(extract_code("```python\n```"), "");
    }

    #[test]
    fn test_triple_backticks_inside_string_survive() {
        // A fence marker must start the (trimmed) line to count.
        let raw = "s = \"not a ``` fence\"\ndef parse(path):\n    pass";
        assert_eq!(extract_code(raw), raw);
    }
}
