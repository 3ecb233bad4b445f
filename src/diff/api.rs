//! Argument builders for the diff queries the engine issues.

/// Options every diff query carries so user configuration (external diff
/// drivers, colors, mnemonic prefixes) cannot change the parsed format.
const STABLE_DIFF_OPTIONS: &[&str] = &[
    "--no-color",
    "--no-ext-diff",
    "--src-prefix=a/",
    "--dst-prefix=b/",
];

/// Arguments for the top-level diff of a revision range.
///
/// Produces `git diff <stable options> <params> <start> <target> [-- <paths>]`.
pub fn range_diff_args(
    start: &str,
    target: &str,
    params: &[String],
    paths: &[String],
) -> Vec<String> {
    let mut args: Vec<String> = vec!["diff".to_string()];
    args.extend(STABLE_DIFF_OPTIONS.iter().map(|s| s.to_string()));
    args.extend(params.iter().cloned());
    args.push(start.to_string());
    args.push(target.to_string());
    if !paths.is_empty() {
        args.push("--".to_string());
        args.extend(paths.iter().cloned());
    }
    args
}

/// Arguments for a zero-context diff of one file between two revisions,
/// as used by line migration.
pub fn migration_diff_args(original: &str, final_revision: &str, filename: &str) -> Vec<String> {
    let mut args: Vec<String> = vec!["diff".to_string(), "-U0".to_string()];
    args.extend(STABLE_DIFF_OPTIONS.iter().map(|s| s.to_string()));
    args.push(original.to_string());
    args.push(final_revision.to_string());
    args.push("--".to_string());
    args.push(filename.to_string());
    args
}
