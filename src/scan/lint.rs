use super::tools::run_tool_with_env;
use crate::error::ToolFailure;
use crate::types::config::{ConfigFormat, LintConfig};
use crate::types::facts::{LintSummary, Probe};
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const LINT_TOOL: &str = "eslint";
const LINTABLE_EXTENSIONS: [&str; 4] = ["js", "jsx", "mjs", "cjs"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileResult {
    #[serde(default)]
    error_count: u32,
    #[serde(default)]
    warning_count: u32,
}

pub fn lintable_files(files: &[String]) -> Vec<&String> {
    files
        .iter()
        .filter(|path| {
            path.rsplit_once('.')
                .map(|(_, ext)| LINTABLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect()
}

/// Flat config module. `@eslint/js` and `globals` are resolved from the
/// engine's own install first, then from the linted project.
const FLAT_CONFIG_TEMPLATE: &str = r#""use strict";
const path = require("node:path");
const { createRequire } = require("node:module");

const options = __OPTIONS__;
const bases = [process.argv[1], path.join(process.cwd(), "noop.js")].filter(Boolean);

function load(name) {
  for (const base of bases) {
    try {
      return createRequire(base)(name);
    } catch (_) {}
  }
  return null;
}

const js = load("@eslint/js");
if (!js) {
  throw new Error("@eslint/js is not installed alongside eslint");
}
const globals = load("globals") || {};
const aliases = { es6: "es2015" };
const declared = Object.assign(
  {},
  ...options.environments.map((env) => globals[aliases[env] || env] || {}),
);

module.exports = [
  { ignores: ["node_modules/**"] },
  js.configs[options.preset],
  {
    files: options.files,
    languageOptions: {
      ecmaVersion: options.ecmaVersion,
      sourceType: options.sourceType,
      globals: declared,
      parserOptions: { ecmaFeatures: { jsx: true } },
    },
  },
];
"#;

/// Flat config module source for ESLint 9.
pub fn flat_config(config: &LintConfig) -> String {
    let preset = config
        .rule_set
        .strip_prefix("eslint:")
        .unwrap_or(&config.rule_set);
    let files = LINTABLE_EXTENSIONS
        .iter()
        .map(|ext| format!("**/*.{ext}"))
        .collect::<Vec<_>>();
    let options = json!({
        "preset": preset,
        "environments": config.environments,
        "files": files,
        "ecmaVersion": config.ecma_version,
        "sourceType": config.source_type.as_str(),
    });
    FLAT_CONFIG_TEMPLATE.replace("__OPTIONS__", &options.to_string())
}

/// Legacy `.eslintrc` configuration for ESLint 8 and older.
pub fn legacy_config(config: &LintConfig) -> serde_json::Value {
    let env = config
        .environments
        .iter()
        .map(|name| (name.clone(), serde_json::Value::Bool(true)))
        .collect::<serde_json::Map<_, _>>();
    json!({
        "root": true,
        "env": env,
        "extends": config.rule_set,
        "parserOptions": {
            "ecmaVersion": config.ecma_version,
            "sourceType": config.source_type.as_str(),
        },
    })
}

pub async fn lint(
    root: &Path,
    files: &[String],
    config: &LintConfig,
    deadline: Duration,
) -> Probe<LintSummary> {
    let targets = lintable_files(files);
    if targets.is_empty() {
        return Probe::Unavailable("no JavaScript sources to lint".to_string());
    }
    Probe::from_tool(run_engine(root, targets.len(), config, deadline).await)
}

/// Arguments appended to the configured command, plus the environment that
/// pins the engine to the matching configuration system.
fn engine_args(
    format: ConfigFormat,
    config_path: &str,
) -> (Vec<String>, &'static [(&'static str, &'static str)]) {
    match format {
        ConfigFormat::Flat => (
            vec![
                "-c".to_string(),
                config_path.to_string(),
                "--format".to_string(),
                "json".to_string(),
                ".".to_string(),
            ],
            &[("ESLINT_USE_FLAT_CONFIG", "true")],
        ),
        ConfigFormat::Legacy => (
            vec![
                "--no-eslintrc".to_string(),
                "-c".to_string(),
                config_path.to_string(),
                "--format".to_string(),
                "json".to_string(),
                "--ext".to_string(),
                LINTABLE_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(","),
                "--ignore-pattern".to_string(),
                "node_modules/".to_string(),
                ".".to_string(),
            ],
            &[("ESLINT_USE_FLAT_CONFIG", "false")],
        ),
    }
}

async fn run_engine(
    root: &Path,
    target_count: usize,
    config: &LintConfig,
    deadline: Duration,
) -> Result<LintSummary, ToolFailure> {
    let (suffix, contents) = match config.config_format {
        ConfigFormat::Flat => (".cjs", flat_config(config)),
        ConfigFormat::Legacy => (".json", legacy_config(config).to_string()),
    };
    let mut config_file = tempfile::Builder::new()
        .prefix("gitgrade-eslint")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| spawn_failure(e.to_string()))?;
    config_file
        .write_all(contents.as_bytes())
        .map_err(|e| spawn_failure(e.to_string()))?;

    let config_path = config_file.path().display().to_string();
    let (args, envs) = engine_args(config.config_format, &config_path);
    let mut argv = config.command.clone();
    argv.extend(args);

    let output = run_tool_with_env(&argv, root, envs, deadline).await?;
    // 0 = clean, 1 = findings; anything else is an engine failure.
    if output.status != 0 && output.status != 1 {
        return Err(ToolFailure::Exit {
            tool: LINT_TOOL.to_string(),
            status: output.status,
            stderr: output.stderr,
        });
    }
    let mut summary = parse_lint_output(&output.stdout)?;
    if summary.files_linted == 0 {
        summary.files_linted = target_count;
    }
    Ok(summary)
}

pub fn parse_lint_output(stdout: &str) -> Result<LintSummary, ToolFailure> {
    let results: Vec<EslintFileResult> =
        serde_json::from_str(stdout.trim()).map_err(|e| ToolFailure::Parse {
            tool: LINT_TOOL.to_string(),
            reason: e.to_string(),
        })?;
    Ok(LintSummary {
        error_count: results.iter().map(|file| file.error_count).sum(),
        warning_count: results.iter().map(|file| file.warning_count).sum(),
        files_linted: results.len(),
    })
}

fn spawn_failure(reason: String) -> ToolFailure {
    ToolFailure::Spawn {
        tool: LINT_TOOL.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::SourceType;
    use tempfile::TempDir;

    #[test]
    fn parse_lint_output_sums_per_file_counts() {
        let stdout = r#"[
            {"filePath":"/r/a.js","messages":[],"errorCount":2,"warningCount":1},
            {"filePath":"/r/b.js","messages":[],"errorCount":0,"warningCount":3}
        ]"#;
        let summary = parse_lint_output(stdout).expect("output should parse");
        assert_eq!(summary.error_count, 2);
        assert_eq!(summary.warning_count, 4);
        assert_eq!(summary.files_linted, 2);
    }

    #[test]
    fn parse_lint_output_rejects_garbage() {
        let result = parse_lint_output("Oops! Something went wrong!");
        assert!(matches!(result, Err(ToolFailure::Parse { .. })));
    }

    #[test]
    fn flat_config_embeds_preset_and_language_options() {
        let config = LintConfig {
            rule_set: "eslint:all".to_string(),
            environments: vec!["node".to_string()],
            ecma_version: 2022,
            ..LintConfig::default()
        };
        let module = flat_config(&config);
        assert!(!module.contains("__OPTIONS__"));
        assert!(module.contains(r#""preset":"all""#));
        assert!(module.contains(r#""environments":["node"]"#));
        assert!(module.contains(r#""ecmaVersion":2022"#));
        assert!(module.contains(r#""sourceType":"module""#));
        assert!(module.contains(r#""**/*.jsx""#));
        assert!(module.contains("module.exports"));
    }

    #[test]
    fn flat_mode_drops_legacy_only_flags() {
        let (args, envs) = engine_args(ConfigFormat::Flat, "/tmp/cfg.cjs");
        assert_eq!(args, vec!["-c", "/tmp/cfg.cjs", "--format", "json", "."]);
        assert!(!args.iter().any(|arg| arg == "--no-eslintrc" || arg == "--ext"));
        assert_eq!(envs, &[("ESLINT_USE_FLAT_CONFIG", "true")]);
    }

    #[test]
    fn legacy_mode_keeps_eslintrc_flags() {
        let (args, envs) = engine_args(ConfigFormat::Legacy, "/tmp/cfg.json");
        assert_eq!(args[0], "--no-eslintrc");
        assert!(args.contains(&".js,.jsx,.mjs,.cjs".to_string()));
        assert_eq!(envs, &[("ESLINT_USE_FLAT_CONFIG", "false")]);
    }

    #[test]
    fn legacy_config_reflects_options() {
        let config = LintConfig {
            environments: vec!["node".to_string()],
            ecma_version: 2018,
            source_type: SourceType::Script,
            ..LintConfig::default()
        };
        let rendered = legacy_config(&config);
        assert_eq!(rendered["env"]["node"], serde_json::Value::Bool(true));
        assert_eq!(rendered["parserOptions"]["ecmaVersion"], 2018);
        assert_eq!(rendered["parserOptions"]["sourceType"], "script");
        assert_eq!(rendered["extends"], "eslint:recommended");
    }

    #[tokio::test]
    async fn lint_is_unavailable_without_javascript() {
        let dir = TempDir::new().expect("temp dir should be created");
        let files = vec!["src/main.rs".to_string()];
        let probe = lint(
            dir.path(),
            &files,
            &LintConfig::default(),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(probe, Probe::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_engine_degrades_to_failed_probe() {
        let dir = TempDir::new().expect("temp dir should be created");
        let files = vec!["index.js".to_string()];
        let config = LintConfig {
            command: vec!["gitgrade-missing-eslint".to_string()],
            ..LintConfig::default()
        };
        let probe = lint(dir.path(), &files, &config, Duration::from_secs(5)).await;
        assert!(matches!(probe, Probe::Failed(_)));
    }
}
