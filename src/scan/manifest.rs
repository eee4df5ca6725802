use super::filesystem::absolute;
use crate::types::facts::{Manifest, ManifestKind, Probe};
use std::collections::BTreeSet;
use std::path::Path;

pub const MANIFEST_FILES: [(&str, ManifestKind); 4] = [
    ("package.json", ManifestKind::Npm),
    ("Cargo.toml", ManifestKind::Cargo),
    ("pyproject.toml", ManifestKind::Python),
    ("requirements.txt", ManifestKind::Python),
];

pub fn find_manifest(files: &[String]) -> Option<(&'static str, ManifestKind)> {
    MANIFEST_FILES
        .iter()
        .find(|(name, _)| files.iter().any(|path| path == name))
        .copied()
}

pub fn read_manifest(root: &Path, files: &[String]) -> Probe<Manifest> {
    let Some((name, kind)) = find_manifest(files) else {
        return Probe::Unavailable("no package manifest found".to_string());
    };
    let content = match std::fs::read_to_string(absolute(root, name)) {
        Ok(content) => content,
        Err(e) => return Probe::Failed(format!("{name}: {e}")),
    };
    match parse_manifest(name, kind, &content) {
        Ok(manifest) => Probe::Collected(manifest),
        Err(reason) => Probe::Failed(format!("{name}: {reason}")),
    }
}

pub fn parse_manifest(name: &str, kind: ManifestKind, content: &str) -> Result<Manifest, String> {
    let dependencies = match (kind, name) {
        (ManifestKind::Npm, _) => npm_dependencies(content)?,
        (ManifestKind::Cargo, _) => cargo_dependencies(content)?,
        (ManifestKind::Python, "pyproject.toml") => pyproject_dependencies(content)?,
        (ManifestKind::Python, _) => requirement_names(content.lines()),
    };
    Ok(Manifest {
        kind,
        path: name.to_string(),
        dependencies: dependencies.into_iter().collect(),
    })
}

fn npm_dependencies(content: &str) -> Result<BTreeSet<String>, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let mut names = BTreeSet::new();
    for section in ["dependencies", "devDependencies", "peerDependencies"] {
        if let Some(table) = value.get(section).and_then(|deps| deps.as_object()) {
            names.extend(table.keys().cloned());
        }
    }
    Ok(names)
}

fn cargo_dependencies(content: &str) -> Result<BTreeSet<String>, String> {
    let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut names = BTreeSet::new();
    for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
        if let Some(table) = value.get(section).and_then(|deps| deps.as_table()) {
            names.extend(table.keys().cloned());
        }
    }
    if let Some(table) = value
        .get("workspace")
        .and_then(|workspace| workspace.get("dependencies"))
        .and_then(|deps| deps.as_table())
    {
        names.extend(table.keys().cloned());
    }
    Ok(names)
}

fn pyproject_dependencies(content: &str) -> Result<BTreeSet<String>, String> {
    let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut names = BTreeSet::new();
    if let Some(list) = value
        .get("project")
        .and_then(|project| project.get("dependencies"))
        .and_then(|deps| deps.as_array())
    {
        names.extend(requirement_names(
            list.iter().filter_map(|entry| entry.as_str()),
        ));
    }
    if let Some(table) = value
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("dependencies"))
        .and_then(|deps| deps.as_table())
    {
        names.extend(table.keys().filter(|key| *key != "python").cloned());
    }
    Ok(names)
}

fn requirement_names<'a>(lines: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| {
            line.split(|c: char| "=<>~![; ".contains(c))
                .next()
                .map(|name| name.trim().to_lowercase())
        })
        .filter(|name| !name.is_empty())
        .collect()
}
