//! Bug report markdown, as produced by the playground's "copy markdown" button.

use serde::{Deserialize, Serialize};

/// Formatter options echoed into the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub parser: String,
}

/// Everything a bug report example is built from
#[derive(Debug, Clone)]
pub struct PlaygroundExample<'a> {
    pub input: &'a str,
    pub output: &'a str,
    /// Output of formatting `output` again; empty when not checked
    pub second_output: &'a str,
    pub version: &'a str,
    pub url: &'a str,
    pub options: &'a FormatOptions,
    /// CLI flags as `(flag, enabled)` pairs
    pub flags: &'a [(String, bool)],
    /// Append the "Expected behavior" heading
    pub full: bool,
}

/// Renders a [`PlaygroundExample`] as markdown.
pub trait MarkdownFormatter {
    fn format(&self, example: &PlaygroundExample<'_>) -> String;
}

/// The playground's markdown layout
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaygroundMarkdown;

impl MarkdownFormatter for PlaygroundMarkdown {
    fn format(&self, example: &PlaygroundExample<'_>) -> String {
        let syntax = markdown_syntax(&example.options.parser);
        let flags = format_flags(example.flags);
        let idempotent =
            example.second_output.is_empty() || example.output == example.second_output;

        let mut parts = vec![
            format!("**Prettier {}**", example.version),
            format!("[Playground link]({})", example.url),
        ];
        if !flags.is_empty() {
            parts.push(code_block(&flags, "sh"));
        }
        parts.extend([
            String::new(),
            "**Input:**".to_string(),
            code_block(example.input, syntax),
            String::new(),
            "**Output:**".to_string(),
            code_block(example.output, syntax),
        ]);
        if !idempotent {
            parts.extend([
                String::new(),
                "**Second Output:**".to_string(),
                code_block(example.second_output, syntax),
            ]);
        }
        if example.full {
            parts.extend([
                String::new(),
                "**Expected behavior:**".to_string(),
                String::new(),
            ]);
        }

        parts.join("\n")
    }
}

/// Code fence language for a parser name.
fn markdown_syntax(parser: &str) -> &str {
    match parser {
        "babylon" | "flow" => "jsx",
        "typescript" => "tsx",
        "postcss" => "scss",
        other => other,
    }
}

fn format_flags(flags: &[(String, bool)]) -> String {
    flags
        .iter()
        .map(|(name, enabled)| {
            if *enabled {
                name.clone()
            } else {
                format!("{name} false")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fence long enough that no backtick run inside `content` closes it.
fn code_block(content: &str, syntax: &str) -> String {
    let longest_run = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.saturating_add(1).max(3));
    format!("{fence}{syntax}\n{content}\n{fence}")
}
