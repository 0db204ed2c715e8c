use quickren_core::plan::PLAN_VERSION;
use quickren_core::{
    apply_operation, history_operation, plan_operation, select_files, status_operation,
    undo_operation, FsErrorKind, HistoryKind, Numbering, OperationStatus, OsFileSystem,
    PatternDescriptor, PlanBuilder, PlanRequest, PlanStats, Preview, RenameError,
    RenameOperation, RenamePlan, SelectionOptions, Session,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_files(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), format!("contents of {}", name)).unwrap();
    }
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != ".quickren")
        .collect();
    names.sort();
    names
}

fn sequential(prefix: &str) -> PatternDescriptor {
    PatternDescriptor::Sequential {
        prefix: prefix.to_string(),
        numbering: Numbering::default(),
    }
}

fn request(root: &Path, pattern: PatternDescriptor) -> PlanRequest {
    PlanRequest {
        selection: SelectionOptions::new(root),
        pattern,
        preview: Preview::None,
        use_color: false,
    }
}

#[test]
fn test_apply_then_undo_restores_original_names() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["zebra.txt", "apple.txt", "mango.txt"]);

    let selection = select_files(&SelectionOptions::new(temp.path())).unwrap();
    let plan = PlanBuilder::new(&OsFileSystem)
        .with_case_insensitive(false)
        .build(&selection, &sequential("file_"))
        .unwrap();
    assert_eq!(plan.stats.total, 3);

    let mut session = Session::new();
    let result = session.apply(plan);
    assert!(result.is_success());
    assert_eq!(
        names_in(temp.path()),
        vec!["file_001.txt", "file_002.txt", "file_003.txt"]
    );
    // Selection order is by name, so apple gets the first number
    assert_eq!(
        fs::read_to_string(temp.path().join("file_001.txt")).unwrap(),
        "contents of apple.txt"
    );

    let undone = session.undo().unwrap();
    assert_eq!(undone.applied, 3);
    assert_eq!(
        names_in(temp.path()),
        vec!["apple.txt", "mango.txt", "zebra.txt"]
    );
    assert!(!session.can_undo());
}

#[test]
fn test_destination_created_after_planning_fails_only_that_rename() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.txt", "b.txt", "c.txt"]);

    let selection = select_files(&SelectionOptions::new(temp.path())).unwrap();
    let plan = PlanBuilder::new(&OsFileSystem)
        .with_case_insensitive(false)
        .build(&selection, &sequential("img_"))
        .unwrap();

    // Someone else grabs a planned name between preview and apply
    fs::write(temp.path().join("img_002.txt"), "intruder").unwrap();

    let mut session = Session::new();
    let result = session.apply(plan);

    assert_eq!(result.applied, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failures[0].kind, FsErrorKind::DestinationExists);
    assert_eq!(result.operations[1].status, OperationStatus::Failed);
    assert!(temp.path().join("b.txt").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("img_002.txt")).unwrap(),
        "intruder"
    );

    // Undo only reverses what actually happened
    let undone = session.undo().unwrap();
    assert_eq!(undone.applied, 2);
    assert_eq!(
        names_in(temp.path()),
        vec!["a.txt", "b.txt", "c.txt", "img_002.txt"]
    );
}

#[test]
fn test_chained_renames_within_selection() {
    let temp = TempDir::new().unwrap();
    // Sorted by name: 10.txt, 2.txt, 3.txt -> 2.txt, 3.txt, 4.txt
    write_files(temp.path(), &["2.txt", "3.txt", "10.txt"]);

    let selection = select_files(&SelectionOptions::new(temp.path())).unwrap();
    let pattern = PatternDescriptor::Sequential {
        prefix: String::new(),
        numbering: Numbering::new(2, 1),
    };
    let plan = PlanBuilder::new(&OsFileSystem)
        .with_case_insensitive(false)
        .build(&selection, &pattern)
        .unwrap();
    assert!(plan.staging_required);

    let mut session = Session::new();
    let result = session.apply(plan);
    assert!(result.is_success(), "{:?}", result.failures);
    assert_eq!(names_in(temp.path()), vec!["2.txt", "3.txt", "4.txt"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("2.txt")).unwrap(),
        "contents of 10.txt"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("4.txt")).unwrap(),
        "contents of 3.txt"
    );

    session.undo().unwrap();
    assert_eq!(names_in(temp.path()), vec!["10.txt", "2.txt", "3.txt"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("10.txt")).unwrap(),
        "contents of 10.txt"
    );
}

#[test]
fn test_undo_without_apply_is_unavailable() {
    let mut session = Session::new();
    assert!(matches!(session.undo(), Err(RenameError::UndoUnavailable)));
}

#[test]
fn test_plan_apply_undo_through_state_dir() {
    let temp = TempDir::new().unwrap();
    let photos = temp.path().join("photos");
    fs::create_dir(&photos).unwrap();
    write_files(&photos, &["IMG_9.jpg", "IMG_10.jpg"]);

    let (plan_result, preview) = plan_operation(
        &request(Path::new("photos"), sequential("holiday_")),
        None,
        false,
        Some(temp.path()),
    )
    .unwrap();
    assert!(preview.is_none());
    assert_eq!(plan_result.renames, 2);
    assert!(temp.path().join(".quickren/plan.json").exists());

    let status = status_operation(Some(temp.path())).unwrap();
    assert_eq!(status.pending_plan.as_ref().unwrap().renames, 2);
    assert!(status.undo_available.is_none());

    let applied = apply_operation(None, Some(temp.path())).unwrap();
    assert_eq!(applied.applied, 2);
    assert_eq!(names_in(&photos), vec!["holiday_001.jpg", "holiday_002.jpg"]);
    assert!(!temp.path().join(".quickren/plan.json").exists());
    assert!(temp.path().join(".quickren/undo.json").exists());
    assert!(temp
        .path()
        .join(format!(".quickren/logs/{}.log", applied.plan_id))
        .exists());

    let undone = undo_operation(Some(temp.path())).unwrap();
    assert_eq!(undone.applied, 2);
    assert_eq!(names_in(&photos), vec!["IMG_10.jpg", "IMG_9.jpg"]);
    assert!(!temp.path().join(".quickren/undo.json").exists());

    let history = history_operation(None, Some(temp.path())).unwrap();
    assert_eq!(history.entries.len(), 2);
    assert_eq!(history.entries[0].kind, HistoryKind::Undo);
    assert_eq!(history.entries[0].pattern, "holiday_{n:03}");
    assert_eq!(history.entries[1].kind, HistoryKind::Apply);

    // Only one level of undo is kept
    let err = undo_operation(Some(temp.path())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RenameError>(),
        Some(RenameError::UndoUnavailable)
    ));
}

#[test]
fn test_apply_without_plan_reports_missing_default() {
    let temp = TempDir::new().unwrap();
    let err = apply_operation(None, Some(temp.path())).unwrap_err();
    assert!(err.to_string().contains("no default plan found"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["one.txt", "two.txt"]);

    let (result, _) = plan_operation(
        &request(temp.path(), sequential("file_")),
        None,
        true,
        Some(temp.path()),
    )
    .unwrap();

    assert!(result.dry_run);
    assert!(result.plan.is_some());
    assert!(!temp.path().join(".quickren").exists());
    assert_eq!(names_in(temp.path()), vec!["one.txt", "two.txt"]);
}

#[test]
fn test_second_apply_replaces_undo_record() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.txt", "b.txt"]);

    plan_operation(&request(temp.path(), sequential("first_")), None, false, Some(temp.path()))
        .unwrap();
    apply_operation(None, Some(temp.path())).unwrap();

    plan_operation(&request(temp.path(), sequential("second_")), None, false, Some(temp.path()))
        .unwrap();
    apply_operation(None, Some(temp.path())).unwrap();
    assert_eq!(names_in(temp.path()), vec!["second_001.txt", "second_002.txt"]);

    // Undo goes back one step, not to the very beginning
    undo_operation(Some(temp.path())).unwrap();
    assert_eq!(names_in(temp.path()), vec!["first_001.txt", "first_002.txt"]);
}

#[test]
fn test_three_way_cycle_and_undo() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.txt", "b.txt", "c.txt"]);
    let path = |name: &str| temp.path().join(name);

    let operations = vec![
        RenameOperation::new(path("a.txt"), path("b.txt")),
        RenameOperation::new(path("b.txt"), path("c.txt")),
        RenameOperation::new(path("c.txt"), path("a.txt")),
    ];
    let plan = RenamePlan {
        id: "cycle00000000000".to_string(),
        created_at: chrono::Local::now().to_rfc3339(),
        version: PLAN_VERSION.to_string(),
        pattern: PatternDescriptor::default(),
        stats: PlanStats {
            total: operations.len(),
            ..PlanStats::default()
        },
        operations,
        unchanged: vec![],
        warnings: vec![],
        staging_required: true,
        case_insensitive: false,
    };

    let mut session = Session::new();
    let result = session.apply(plan);
    assert_eq!(result.applied, 3);
    assert_eq!(fs::read_to_string(path("b.txt")).unwrap(), "contents of a.txt");
    assert_eq!(fs::read_to_string(path("c.txt")).unwrap(), "contents of b.txt");
    assert_eq!(fs::read_to_string(path("a.txt")).unwrap(), "contents of c.txt");
    assert_eq!(names_in(temp.path()), vec!["a.txt", "b.txt", "c.txt"]);

    let undone = session.undo().unwrap();
    assert_eq!(undone.applied, 3);
    for name in ["a.txt", "b.txt", "c.txt"] {
        assert_eq!(
            fs::read_to_string(path(name)).unwrap(),
            format!("contents of {}", name)
        );
    }
}
