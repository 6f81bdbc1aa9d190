pub(super) fn validate_tree_path(path: &str) -> anyhow::Result<()> {
    if path.is_empty() || path.len() > 64 {
        anyhow::bail!("tree path must be 1-64 characters");
    }
    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!("tree path may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/bin/linkdeck_server/validators_tests.rs"]
mod tests;
