/// Print a passing case with checkmark
pub fn success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print a failure with X (stderr, so it survives `--json` redirection)
pub fn error(msg: &str) {
    eprintln!("  ✗ {}", msg);
}

/// Print a failing case line
pub fn failure(msg: &str) {
    println!("  ✗ {}", msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print a skipped case line
pub fn skip(msg: &str) {
    println!("  - {}", msg);
}

/// Print a dimmed/secondary message
pub fn dim(msg: &str) {
    println!("  {}", msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg);
}

/// Echo captured tool output to stderr, indented under the case line
pub fn diagnostic(label: &str, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        return;
    }
    eprintln!("    {}:", label);
    for line in text.lines() {
        eprintln!("      {}", line);
    }
}
