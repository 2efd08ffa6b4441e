use anyhow::{anyhow, Context, Result};
use pod_racer_core::PilotConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Splits a comma-separated flag value, dropping blanks.
pub fn parse_csv_list(input: &str, flag: &str) -> Result<Vec<String>> {
    let items: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(anyhow!("{flag} resolved to empty list"));
    }
    Ok(items)
}

/// Loads a JSON `PilotConfig`; absent fields keep their defaults.
pub fn read_config(path: &Path) -> Result<PilotConfig> {
    let raw = fs::read(path)
        .with_context(|| format!("failed reading config {}", path.display()))?;
    let config: PilotConfig = serde_json::from_slice(&raw)
        .with_context(|| format!("failed parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

/// Every regular file in `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed listing {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(anyhow!("directory {} had no files", dir.display()));
    }
    Ok(files)
}

/// `raw` with anything but ASCII alphanumerics, `-` and `_` replaced by `-`.
pub fn safe_name(raw: &str) -> String {
    raw.replace(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_', "-")
}

/// File stem safe to splice into output file names.
pub fn safe_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    safe_name(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_list_drops_blanks() {
        let items = parse_csv_list(" pod-direct, ,pod-anticipate,", "--bots").expect("list");
        assert_eq!(items, vec!["pod-direct", "pod-anticipate"]);
        assert!(parse_csv_list(" , ", "--bots").is_err());
    }

    #[test]
    fn safe_stem_keeps_file_stem_only() {
        assert_eq!(safe_stem(Path::new("logs/race 01.txt")), "race-01");
        assert_eq!(safe_stem(Path::new("logs/lap_3")), "lap_3");
        assert_eq!(safe_name("config:tuned/fast.json"), "config-tuned-fast-json");
    }
}
