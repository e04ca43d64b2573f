//! Shared path construction for conversion artifacts.
//!
//! This module is the single source of truth for the artifact naming
//! convention. All components must derive paths through it:
//!
//! - converter output: `{output_root}/{post_id}/{stem}.esob`
//! - servable artifact: `{viewer_public_root}/public/OUT/{post_id}/{stem}.esob`
//! - viewer-relative path: `public/OUT/{post_id}/{stem}.esob`
//!
//! Resolution returns `None` when the needed root is unconfigured (empty);
//! callers treat that as fatal for the task at hand, never as a panic.

use std::path::{Path, PathBuf};

use viewbridge_core::ConversionRoots;

/// Extension of every converted artifact, regardless of input type.
pub const TARGET_EXTENSION: &str = "esob";

const PUBLIC_DIR: &str = "public";
const OUT_DIR: &str = "OUT";

fn configured(root: &Path) -> Option<&Path> {
    if root.as_os_str().is_empty() {
        None
    } else {
        Some(root)
    }
}

/// Swap the final extension of `file_name` for the target extension.
///
/// The stem is preserved verbatim, embedded dots included; a name without
/// an extension simply gains the target one.
pub fn artifact_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) => format!("{}.{}", &file_name[..idx], TARGET_EXTENSION),
        None => format!("{}.{}", file_name, TARGET_EXTENSION),
    }
}

/// Absolute path of the original attachment inside the platform data root.
pub fn resolve_attachment_path(roots: &ConversionRoots, storage_path: &str) -> Option<PathBuf> {
    Some(configured(&roots.data_root)?.join(storage_path))
}

/// Where the external converter writes its artifact for this attachment.
pub fn resolve_converted_path(
    roots: &ConversionRoots,
    post_id: &str,
    file_name: &str,
) -> Option<PathBuf> {
    Some(
        configured(&roots.output_root)?
            .join(post_id)
            .join(artifact_file_name(file_name)),
    )
}

/// Final location the viewer web application serves the artifact from.
pub fn resolve_final_path(
    roots: &ConversionRoots,
    post_id: &str,
    file_name: &str,
) -> Option<PathBuf> {
    Some(
        configured(&roots.viewer_public_root)?
            .join(PUBLIC_DIR)
            .join(OUT_DIR)
            .join(post_id)
            .join(artifact_file_name(file_name)),
    )
}

/// Artifact path relative to the viewer root, as embedded in viewer URLs
/// (after the redirect builder strips the `public/` prefix).
pub fn relative_public_path(post_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        PUBLIC_DIR,
        OUT_DIR,
        post_id,
        artifact_file_name(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn roots() -> ConversionRoots {
        ConversionRoots {
            data_root: PathBuf::from("/data"),
            output_root: PathBuf::from("/out"),
            viewer_public_root: PathBuf::from("/viewer"),
        }
    }

    fn empty_roots() -> ConversionRoots {
        ConversionRoots {
            data_root: PathBuf::new(),
            output_root: PathBuf::new(),
            viewer_public_root: PathBuf::new(),
        }
    }

    #[test]
    fn artifact_name_swaps_extension() {
        assert_eq!(artifact_file_name("report.docx"), "report.esob");
        assert_eq!(artifact_file_name("test.PNG"), "test.esob");
    }

    #[test]
    fn artifact_name_preserves_embedded_dots() {
        assert_eq!(
            artifact_file_name("a_file.with.dots.png"),
            "a_file.with.dots.esob"
        );
    }

    #[test]
    fn artifact_name_handles_missing_extension() {
        assert_eq!(artifact_file_name("README"), "README.esob");
    }

    #[test]
    fn converted_path_is_keyed_by_post_id() {
        let path = resolve_converted_path(&roots(), "p1", "report.docx").unwrap();
        assert_eq!(path, PathBuf::from("/out/p1/report.esob"));
    }

    #[test]
    fn final_path_lands_under_viewer_public_tree() {
        let path = resolve_final_path(&roots(), "p1", "report.docx").unwrap();
        assert_eq!(path, PathBuf::from("/viewer/public/OUT/p1/report.esob"));
    }

    #[test]
    fn attachment_path_joins_data_root() {
        let path = resolve_attachment_path(&roots(), "20260806/f1/report.docx").unwrap();
        assert_eq!(path, PathBuf::from("/data/20260806/f1/report.docx"));
    }

    #[test]
    fn unconfigured_roots_resolve_to_none() {
        let roots = empty_roots();
        assert!(resolve_attachment_path(&roots, "a/b.png").is_none());
        assert!(resolve_converted_path(&roots, "p1", "b.png").is_none());
        assert!(resolve_final_path(&roots, "p1", "b.png").is_none());
    }

    #[test]
    fn relative_public_path_carries_public_prefix() {
        assert_eq!(
            relative_public_path("p1", "report.docx"),
            "public/OUT/p1/report.esob"
        );
    }
}
