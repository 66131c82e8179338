//! Markdown annotations spliced into the display copy.

/// Inline image reference for a base64-encoded PNG.
pub fn image_annotation(png_base64: &str) -> String {
    format!("\n\n![plot](data:image/png;base64,{png_base64})\n")
}

/// `source` with 1-based, right-aligned line numbers.
pub fn numbered_listing(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>3}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Listing of the attempted source followed by the fault description.
pub fn error_annotation(source: &str, description: &str) -> String {
    format!(
        "\n\n**Plot execution failed**\n\n```text\n{}\n```\n\nError: {}\n",
        numbered_listing(source),
        description.trim_end()
    )
}
