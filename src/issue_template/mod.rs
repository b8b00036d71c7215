//! Issue template refresh.
//!
//! The template ends with an example bug report that quotes the current
//! version. Everything after the last marker is regenerated on every
//! release, so the file stays stable when the version does not change.

mod markdown;

pub use markdown::{FormatOptions, MarkdownFormatter, PlaygroundExample, PlaygroundMarkdown};

use crate::config::TemplateSettings;
use crate::error::{BuildError, Result};
use crate::manifest::Manifest;
use crate::utils::fs;
use std::path::Path;

/// Replace everything after the last `marker` with `marker`, a blank line and `block`.
///
/// Returns `None` when the marker does not occur.
pub fn splice_example(template: &str, marker: &str, block: &str) -> Option<String> {
    let start = template.rfind(marker)?;
    let mut text = String::with_capacity(start + marker.len() + 2 + block.len());
    text.push_str(&template[..start]);
    text.push_str(marker);
    text.push_str("\n\n");
    text.push_str(block);
    Some(text)
}

/// Render the example block for `version`.
pub fn render_example<F: MarkdownFormatter>(
    formatter: &F,
    settings: &TemplateSettings,
    version: &str,
) -> String {
    let options = FormatOptions {
        parser: settings.parser.clone(),
    };
    formatter.format(&PlaygroundExample {
        input: &settings.snippet,
        output: &settings.snippet,
        second_output: "",
        version,
        url: &settings.playground_url,
        options: &options,
        flags: &settings.flags,
        full: settings.full,
    })
}

/// Rewrite the issue template under `root` in place.
///
/// The version is read from `manifest_path` on every call, not passed in,
/// so the template always quotes what is on disk. Returns `true` if the
/// file content changed.
pub async fn update_issue_template<F: MarkdownFormatter>(
    root: &Path,
    manifest_path: &Path,
    settings: &TemplateSettings,
    formatter: &F,
) -> Result<bool> {
    let path = root.join(&settings.path);
    let template = fs::read_to_string(&path).await?;

    let manifest_path = root.join(manifest_path);
    let manifest = Manifest::load(&manifest_path).await?;
    let version = manifest.require_version(&manifest_path)?;

    let block = render_example(formatter, settings, version);
    if block.contains(settings.marker.as_str()) {
        // The next run would cut inside the block
        return Err(BuildError::Config {
            reason: format!(
                "generated issue example contains the marker {:?}",
                settings.marker
            ),
        });
    }

    let updated = match splice_example(&template, &settings.marker, &block) {
        Some(updated) => updated,
        None => {
            log::warn!(
                "Marker {:?} not found in {}, leaving it unchanged",
                settings.marker,
                path.display()
            );
            template.clone()
        }
    };

    fs::write(&path, &updated).await?;
    log::info!("Updated {} for version {}", path.display(), version);
    Ok(updated != template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TEMPLATE: &str = "<!--\n  Please fill out the example below.\n-->\n\nold example for 1.0.0\n";

    #[test]
    fn splice_keeps_prefix_and_replaces_suffix() {
        let spliced = splice_example(TEMPLATE, "-->", "NEW").unwrap();
        assert_eq!(
            spliced,
            "<!--\n  Please fill out the example below.\n-->\n\nNEW"
        );
    }

    #[test]
    fn splice_uses_last_marker() {
        let template = "a --> b --> stale";
        assert_eq!(
            splice_example(template, "-->", "x").unwrap(),
            "a --> b -->\n\nx"
        );
    }

    #[test]
    fn splice_without_marker() {
        assert!(splice_example("no comment here", "-->", "x").is_none());
    }

    #[test]
    fn splice_is_idempotent() {
        let once = splice_example(TEMPLATE, "-->", "block\n").unwrap();
        let twice = splice_example(&once, "-->", "block\n").unwrap();
        assert_eq!(once, twice);
    }

    fn project(version: &str, template: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            format!(r#"{{"name":"prettier","version":"{version}"}}"#),
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join(".github")).unwrap();
        std::fs::write(dir.path().join(".github/ISSUE_TEMPLATE.md"), template).unwrap();
        dir
    }

    #[tokio::test]
    async fn update_embeds_manifest_version() {
        let dir = project("1.2.3", TEMPLATE);
        let settings = TemplateSettings::default();

        let changed = update_issue_template(
            dir.path(),
            &PathBuf::from("package.json"),
            &settings,
            &PlaygroundMarkdown,
        )
        .await
        .unwrap();
        assert!(changed);

        let text = std::fs::read_to_string(dir.path().join(".github/ISSUE_TEMPLATE.md")).unwrap();
        assert!(text.starts_with("<!--\n  Please fill out the example below.\n-->\n\n**Prettier 1.2.3**\n"));
        assert!(!text.contains("old example"));
    }

    #[tokio::test]
    async fn second_update_is_byte_identical() {
        let dir = project("1.2.3", TEMPLATE);
        let settings = TemplateSettings::default();
        let path = dir.path().join(".github/ISSUE_TEMPLATE.md");
        let manifest = PathBuf::from("package.json");

        update_issue_template(dir.path(), &manifest, &settings, &PlaygroundMarkdown)
            .await
            .unwrap();
        let first = std::fs::read(&path).unwrap();

        let changed = update_issue_template(dir.path(), &manifest, &settings, &PlaygroundMarkdown)
            .await
            .unwrap();
        assert!(!changed);
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[tokio::test]
    async fn missing_marker_leaves_file_untouched() {
        let dir = project("1.2.3", "plain template\n");

        let changed = update_issue_template(
            dir.path(),
            &PathBuf::from("package.json"),
            &TemplateSettings::default(),
            &PlaygroundMarkdown,
        )
        .await
        .unwrap();
        assert!(!changed);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".github/ISSUE_TEMPLATE.md")).unwrap(),
            "plain template\n"
        );
    }

    #[tokio::test]
    async fn block_containing_marker_is_rejected() {
        let dir = project("1.2.3", TEMPLATE);
        let settings = TemplateSettings {
            snippet: "<!-- a --> b".to_string(),
            ..TemplateSettings::default()
        };

        let err = update_issue_template(
            dir.path(),
            &PathBuf::from("package.json"),
            &settings,
            &PlaygroundMarkdown,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BuildError::Config { .. }));
    }

    #[tokio::test]
    async fn missing_version_is_an_error() {
        let dir = project("1.2.3", TEMPLATE);
        std::fs::write(dir.path().join("package.json"), r#"{"name":"prettier"}"#).unwrap();

        let err = update_issue_template(
            dir.path(),
            &PathBuf::from("package.json"),
            &TemplateSettings::default(),
            &PlaygroundMarkdown,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingField { field: "version", .. }));
    }
}
