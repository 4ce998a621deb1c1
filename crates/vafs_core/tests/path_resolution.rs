use rusqlite::Connection;
use vafs_core::db::open_db_in_memory;
use vafs_core::{
    EntityKind, HierarchyRepository, PathResolver, ResolveError, SqliteHierarchyRepository,
};

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn created_folder_resolves_to_folder_kind_at_any_nesting_level() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();

    let docs = repo.create_folder("Root", "Docs").unwrap();
    let work = repo.create_folder("Root/Docs", "Work").unwrap();
    let deep = repo.create_folder("Root/Docs/Work", "Deep").unwrap();

    let resolver = PathResolver::new(&conn);
    let resolved = resolver.resolve("Root/Docs").unwrap();
    assert_eq!(resolved.id, docs.id);
    assert_eq!(resolved.kind, EntityKind::Folder);

    let resolved = resolver.resolve("Root/Docs/Work").unwrap();
    assert_eq!(resolved.id, work.id);
    assert_eq!(resolved.kind, EntityKind::Folder);

    let resolved = resolver.resolve("Root/Docs/Work/Deep").unwrap();
    assert_eq!(resolved.id, deep.id);
    assert_eq!(resolved.kind, EntityKind::Folder);
}

#[test]
fn created_file_resolves_to_file_kind() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();

    let file = repo.create_file("Root", "notes.txt", "hello").unwrap();

    let resolved = PathResolver::new(&conn).resolve("Root/notes.txt").unwrap();
    assert_eq!(resolved.id, file.id);
    assert_eq!(resolved.kind, EntityKind::File);
}

#[test]
fn root_path_is_protected_case_insensitively() {
    let conn = setup();
    let resolver = PathResolver::new(&conn);

    for path in ["Root", "root", "ROOT", "/Root/", "\"Root\""] {
        let err = resolver.resolve(path).unwrap_err();
        assert!(
            matches!(err, ResolveError::RootProtected),
            "`{path}` should be protected, got: {err}"
        );
    }
}

#[test]
fn malformed_paths_are_rejected() {
    let conn = setup();
    let resolver = PathResolver::new(&conn);

    for path in ["", "   ", "//", "Root//A", "Lonely"] {
        let err = resolver.resolve(path).unwrap_err();
        assert!(
            matches!(err, ResolveError::MalformedPath(_)),
            "`{path}` should be malformed, got: {err}"
        );
    }
}

#[test]
fn unresolved_parent_is_reported_with_name_and_depth() {
    let conn = setup();

    let err = PathResolver::new(&conn)
        .resolve("Root/Missing/target")
        .unwrap_err();
    match err {
        ResolveError::ParentNotFound { name, depth } => {
            assert_eq!(name, "Missing");
            assert_eq!(depth, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_terminal_under_existing_parent_is_not_found() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();
    repo.create_folder("Root", "Docs").unwrap();

    let err = PathResolver::new(&conn)
        .resolve("Root/Docs/absent")
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { name } if name == "absent"));
}

#[test]
fn folder_and_file_sharing_a_name_under_one_parent_is_ambiguous() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();

    repo.create_folder("Root", "Dup").unwrap();
    repo.create_file("Root", "Dup", "payload").unwrap();

    let err = PathResolver::new(&conn).resolve("Root/Dup").unwrap_err();
    assert!(matches!(err, ResolveError::AmbiguousEntity { name } if name == "Dup"));
}

// Parent lookup keys on (name, depth) globally, not on a per-segment walk:
// earlier path segments only contribute to the depth count.
#[test]
fn resolution_keys_on_parent_name_and_depth_not_on_full_path() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();

    repo.create_folder("Root", "Docs").unwrap();
    let work = repo.create_folder("Root/Docs", "Work").unwrap();

    let resolved = PathResolver::new(&conn).resolve("Whatever/Docs/Work").unwrap();
    assert_eq!(resolved.id, work.id);
    assert_eq!(resolved.kind, EntityKind::Folder);
}

#[test]
fn quoted_paths_and_segments_resolve() {
    let conn = setup();
    let repo = SqliteHierarchyRepository::try_new(&conn).unwrap();

    let docs = repo.create_folder("Root", "\"Docs\"").unwrap();
    assert_eq!(docs.name, "Docs");

    let resolver = PathResolver::new(&conn);
    let resolved = resolver.resolve("\"Root/Docs\"").unwrap();
    assert_eq!(resolved.id, docs.id);
    let resolved = resolver.resolve("Root/'Docs'").unwrap();
    assert_eq!(resolved.id, docs.id);
}
