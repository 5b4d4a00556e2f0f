use versi_backend::Version;

/// Strip ANSI escape sequences that nvm emits even with `NO_COLOR` on some
/// versions.
pub(crate) fn clean_output(output: &str) -> String {
    let mut cleaned = String::with_capacity(output.len());
    let mut chars = output.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            continue;
        }
        cleaned.push(c);
    }

    cleaned
}

/// Versions mentioned in `nvm list` output, without the `v` marker and in
/// order of first appearance. Alias lines whose target nvm reports as `N/A`
/// name versions that are not installed and are skipped.
pub(crate) fn parse_installed(output: &str) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();

    let lines = output.lines().filter(|line| !line.contains("N/A"));
    for token in lines.flat_map(str::split_whitespace) {
        let token = token.trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '.'));
        let token = token.strip_prefix('v').unwrap_or(token);
        if token.starts_with(|c: char| c.is_ascii_digit())
            && token.contains('.')
            && !versions.iter().any(|v| v == token)
        {
            versions.push(token.to_string());
        }
    }

    versions
}

/// A pin like `20` or `20.18` is satisfied by any installed version under it.
pub(crate) fn is_installed(installed: &[String], version: &Version) -> bool {
    let wanted = version.as_str();
    let prefix = format!("{wanted}.");
    installed
        .iter()
        .any(|v| v == wanted || v.starts_with(&prefix))
}
