use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Manifest};

pub const MANIFEST_FILE: &str = "precedence.toml";
pub const MANIFEST_ENV: &str = "PRECEDENCE_MANIFEST";

/// Locate the manifest: explicit path, then `PRECEDENCE_MANIFEST`, then the
/// nearest `precedence.toml` at or above `start`.
pub fn resolve_manifest(
    start: impl AsRef<Path>,
    explicit: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return existing_file(start.as_ref().join(path));
    }

    if let Ok(path) = env::var(MANIFEST_ENV) {
        if !path.is_empty() {
            return existing_file(start.as_ref().join(path));
        }
    }

    find_manifest_from(start.as_ref())
}

/// Load `path` and everything it includes. Included steps follow the
/// including file's own steps; every file is read at most once.
pub fn load_manifest(path: &Path) -> Result<Manifest, ConfigError> {
    let mut loaded = HashSet::new();
    let mut manifest = Manifest::default();
    load_into(path, &mut loaded, &mut manifest)?;
    Ok(manifest)
}

pub fn parse_manifest(path: &Path, contents: &str) -> Result<Manifest, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => toml::from_str(contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("json") => serde_json::from_str(contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn load_into(
    path: &Path,
    loaded: &mut HashSet<PathBuf>,
    manifest: &mut Manifest,
) -> Result<(), ConfigError> {
    let path = existing_file(path.to_path_buf())?;
    if !loaded.insert(fs::canonicalize(&path)?) {
        return Ok(());
    }

    let contents = fs::read_to_string(&path)?;
    let parsed = parse_manifest(&path, &contents)?;
    for mut step in parsed.steps {
        step.source = Some(path.clone());
        manifest.steps.push(step);
    }
    manifest.include.extend(parsed.include.iter().cloned());

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for pattern in &parsed.include {
        for included in expand_include(base, pattern)? {
            load_into(&included, loaded, manifest)?;
        }
    }
    Ok(())
}

fn expand_include(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let full = base.join(pattern);
    let full = full.to_string_lossy();
    let entries = glob::glob(&full).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| ConfigError::Io(err.into_error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn existing_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::ConfigNotFound(path))
    }
}

fn find_manifest_from(start: &Path) -> Result<PathBuf, ConfigError> {
    for ancestor in start.ancestors() {
        let candidate = ancestor.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(ConfigError::ManifestNotFound)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::config::resolve::{load_manifest, parse_manifest, resolve_manifest};
    use crate::config::ConfigError;

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("precedence-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn step_names(root: &std::path::Path) -> Vec<String> {
        load_manifest(root)
            .expect("load manifest")
            .steps
            .into_iter()
            .map(|step| step.name)
            .collect()
    }

    #[test]
    fn finds_manifest_in_ancestor_directory() {
        let root = unique_temp_dir("resolve-ancestor");
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).expect("create nested dir");
        fs::write(root.join("precedence.toml"), "").expect("write manifest");

        let found = resolve_manifest(&nested, None).expect("resolve manifest");
        assert_eq!(found, root.join("precedence.toml"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_path_must_exist() {
        let root = unique_temp_dir("resolve-explicit");
        let err = resolve_manifest(&root, Some(PathBuf::from("missing.toml")))
            .expect_err("missing manifest");
        assert!(matches!(err, ConfigError::ConfigNotFound(path) if path.ends_with("missing.toml")));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn includes_are_appended_in_sorted_order_once() {
        let root = unique_temp_dir("resolve-include");
        fs::create_dir_all(root.join("steps")).expect("create steps dir");
        fs::write(
            root.join("precedence.toml"),
            "include = [\"steps/*\", \"steps/b.yaml\"]\n\n[[step]]\nname = \"root\"\n",
        )
        .expect("write root manifest");
        fs::write(
            root.join("steps").join("b.yaml"),
            "steps:\n  - name: from-yaml\n",
        )
        .expect("write yaml include");
        fs::write(
            root.join("steps").join("a.json"),
            r#"{"include": ["../precedence.toml"], "steps": [{"name": "from-json"}]}"#,
        )
        .expect("write json include");

        assert_eq!(
            step_names(&root.join("precedence.toml")),
            vec!["root", "from-json", "from-yaml"]
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_manifest(std::path::Path::new("steps.ini"), "").expect_err("ini");
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = parse_manifest(std::path::Path::new("broken.toml"), "[[step]]\nname = ")
            .expect_err("broken toml");
        assert!(err.to_string().contains("broken.toml"));
    }
}
