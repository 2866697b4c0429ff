use std::fs;
use std::io;
use std::path::Path;

pub fn load(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Maps a file extension to the editor's language identifier.
pub fn language_id(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match extension.as_str() {
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "css" => "css",
        "go" => "go",
        "html" | "htm" => "html",
        "java" => "java",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "json" => "json",
        "lua" => "lua",
        "md" | "markdown" => "markdown",
        "php" => "php",
        "py" | "pyw" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "sh" | "bash" => "shellscript",
        "toml" => "toml",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "txt" => "plaintext",
        "yaml" | "yml" => "yaml",
        _ => return None,
    };

    Some(language)
}
