use crate::error::{GradeError, Result};
use crate::types::config::GradeConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "gitgrade.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".gitgrade/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/gitgrade/config.toml";

/// Loads an explicit file, or merges global, working-directory and local layers.
pub fn load_config(explicit: Option<&Path>) -> Result<GradeConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(GradeError::ConfigParse(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let cfg: GradeConfig = read_toml_value(path)?
            .try_into()
            .map_err(|e: toml::de::Error| GradeError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        return Ok(cfg);
    }

    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    let cwd = std::env::current_dir()?;
    load_layered(&cwd, global.as_deref())
}

pub(crate) fn load_layered(root: &Path, global_path: Option<&Path>) -> Result<GradeConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: GradeConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| GradeError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| GradeError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ProviderKind;
    use crate::types::score::CategoryBinding;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_layered_returns_defaults_when_no_files_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_layered(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.provider.kind, ProviderKind::Clone);
        assert_eq!(cfg.timeouts.tool_secs, 90);
    }

    #[test]
    fn load_layered_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[provider]
kind = "api"
token_env = "GH_PAT"

[timeouts]
http_secs = 5
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[provider]
kind = "clone"

[report]
binding = "distinct"
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".gitgrade")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[timeouts]
http_secs = 7
"#,
        )
        .expect("local override should write");

        let cfg = load_layered(root.path(), Some(&global_path)).expect("load should succeed");

        assert_eq!(cfg.provider.kind, ProviderKind::Clone);
        assert_eq!(cfg.provider.token_env, "GH_PAT");
        assert_eq!(cfg.timeouts.http_secs, 7);
        assert_eq!(cfg.report.binding, CategoryBinding::Distinct);
    }

    #[test]
    fn explicit_missing_file_is_an_input_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).expect_err("missing file should fail");
        assert!(matches!(err, GradeError::ConfigParse(_)));
    }

    #[test]
    fn invalid_layer_is_rejected() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[lint]\ncommand = []\n",
        )
        .expect("config should write");
        assert!(load_layered(dir.path(), None).is_err());
    }
}
