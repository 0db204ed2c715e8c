use super::{resolve_selection, resolve_working_dir};
use crate::output::{ListResult, ListedFile};
use crate::selection::{select_files, SelectionOptions};
use anyhow::Result;
use std::path::Path;

/// List operation - the files a selection picks up, with totals.
///
/// `total_files` counts every file under the root (honouring `recursive`)
/// before globs, presets, search and size filters apply.
pub fn list_operation(selection: &SelectionOptions, working_dir: Option<&Path>) -> Result<ListResult> {
    let current_dir = resolve_working_dir(working_dir)?;
    let selection = resolve_selection(selection, &current_dir);

    let selected = select_files(&selection)?;
    let everything = SelectionOptions {
        recursive: selection.recursive,
        ..SelectionOptions::new(selection.root.clone())
    };
    let total_files = select_files(&everything)?.len();

    Ok(ListResult {
        root: selection.root,
        total_files,
        selected_files: selected.len(),
        total_size: selected.iter().map(|entry| entry.size).sum(),
        files: selected.iter().map(ListedFile::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FileCategory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_counts_and_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let photos = temp_dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        fs::write(photos.join("b.jpg"), vec![0u8; 1000]).unwrap();
        fs::write(photos.join("a.png"), vec![0u8; 24]).unwrap();
        fs::write(photos.join("notes.txt"), "notes").unwrap();

        let options = SelectionOptions {
            preset: Some(FileCategory::Image),
            ..SelectionOptions::new("./photos")
        };
        let result = list_operation(&options, Some(temp_dir.path())).unwrap();

        assert_eq!(result.root, photos);
        assert_eq!(result.total_files, 3);
        assert_eq!(result.selected_files, 2);
        assert_eq!(result.total_size, 1024);
        let names: Vec<_> = result.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
        assert_eq!(result.files[0].path, photos.join("a.png"));
    }

    #[test]
    fn test_list_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = list_operation(&SelectionOptions::new("nope"), Some(temp_dir.path())).unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }
}
