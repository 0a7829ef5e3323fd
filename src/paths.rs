use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::SplitterError;

/// Expand `source` into the ordered input file list.
///
/// A folder source yields its immediate regular files in sorted filename
/// order; subfolders are not descended into. A file source is returned
/// as-is (readability is checked on first access).
pub fn resolve_input_files(source: &Path) -> Result<Vec<PathBuf>, SplitterError> {
    if !source.is_dir() {
        return Ok(vec![source.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(SplitterError::Configuration(format!(
            "no input files found in '{}'",
            source.display()
        )));
    }
    Ok(files)
}

/// Output filename template: a stem and optional extension with the
/// destination suffix inserted between them.
#[derive(Clone, Debug)]
pub struct OutputTemplate {
    stem: String,
    extension: Option<String>,
}

impl OutputTemplate {
    /// Template from an explicit filename override, split on the last `.`.
    pub fn from_override(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((stem, extension)) => Self {
                stem: stem.to_string(),
                extension: Some(extension.to_string()),
            },
            None => Self {
                stem: name.to_string(),
                extension: None,
            },
        }
    }

    /// Template derived from the source name: a folder source keeps its
    /// full name as the stem, a file source splits off the extension.
    pub fn from_source(source: &Path) -> Self {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string_lossy().into_owned());
        if source.is_dir() {
            Self {
                stem: name,
                extension: None,
            }
        } else {
            Self::from_override(&name)
        }
    }

    /// Filename for one destination suffix.
    pub fn file_name(&self, suffix: &str) -> String {
        match &self.extension {
            Some(extension) => format!("{}{}.{}", self.stem, suffix, extension),
            None => format!("{}{}", self.stem, suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_template_splits_on_the_last_dot() {
        let template = OutputTemplate::from_override("corpus.v2.conllu");
        assert_eq!(template.file_name("_train"), "corpus.v2_train.conllu");
    }

    #[test]
    fn extensionless_template_appends_the_suffix() {
        let template = OutputTemplate::from_override("corpus");
        assert_eq!(template.file_name("_test"), "corpus_test");
    }

    #[test]
    fn folder_source_keeps_its_full_name_as_stem() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("treebank.v1");
        fs::create_dir(&source).unwrap();
        let template = OutputTemplate::from_source(&source);
        assert_eq!(template.file_name("_dev"), "treebank.v1_dev");
    }

    #[test]
    fn file_source_splits_its_extension() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("corpus.conllu");
        fs::write(&source, "").unwrap();
        let template = OutputTemplate::from_source(&source);
        assert_eq!(template.file_name("_train"), "corpus_train.conllu");
    }

    #[test]
    fn folder_files_are_resolved_in_sorted_order() {
        let dir = tempdir().unwrap();
        for name in ["b.conllu", "a.conllu", "c.conllu"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d.conllu"), "").unwrap();

        let files = resolve_input_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Nested files are not included.
        assert_eq!(names, ["a.conllu", "b.conllu", "c.conllu"]);
    }

    #[test]
    fn empty_folder_is_a_configuration_error() {
        let dir = tempdir().unwrap();
        let err = resolve_input_files(dir.path()).unwrap_err();
        assert!(matches!(err, SplitterError::Configuration(_)));
    }

    #[test]
    fn file_source_resolves_to_itself() {
        let source = Path::new("corpus.conllu");
        assert_eq!(resolve_input_files(source).unwrap(), vec![source.to_path_buf()]);
    }
}
