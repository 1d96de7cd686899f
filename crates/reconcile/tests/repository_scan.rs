//! Push-driven scans against recording fakes.

mod support;

use reconcile::scan::{fetch_catalog, RepositoryScan};
use reconcile::{EntryKind, SyncError};
use support::*;

const HEAD: &str = "refs/heads/main";
const DIR: &str = "doc/adr";

#[tokio::test]
async fn new_adr_gets_one_discussion_one_label_and_one_comment() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(HEAD, DIR, &[("0001-x.md", EntryKind::File)])
        .with_file(HEAD, "doc/adr/0001-x.md", &adr("X", "Proposed"))
        .with_commit("doc/adr/0001-x.md", Some("octocat"), "https://example.test/c/1");
    let discussions = FakeDiscussions::new(&log);

    let outcomes = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].title, "0001-x.md");
    assert!(outcomes[0].result.created);

    let log = calls(&log);
    let count = |f: fn(&Call) -> bool| log.iter().filter(|c| f(c)).count();
    assert_eq!(count(|c| matches!(c, Call::CreateLabel { .. })), 1);
    assert_eq!(count(|c| matches!(c, Call::CreateDiscussion { .. })), 1);
    assert_eq!(count(|c| matches!(c, Call::AddLabel { .. })), 1);
    assert_eq!(count(|c| matches!(c, Call::AddComment { .. })), 1);
    assert_eq!(count(|c| matches!(c, Call::Close { .. } | Call::Reopen { .. })), 0);

    let discussion = discussions.discussion("0001-x.md").unwrap();
    assert_eq!(discussion.labels.len(), 1);
    assert_eq!(discussion.labels[0].name, "Proposed");
    assert!(!discussion.closed);
}

#[tokio::test]
async fn created_label_has_description_colour_and_status_name() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(HEAD, DIR, &[("0001-x.md", EntryKind::File)])
        .with_file(HEAD, "doc/adr/0001-x.md", &adr("X", "Proposed"));
    let discussions = FakeDiscussions::new(&log);

    RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap();

    let created = calls(&log)
        .into_iter()
        .find_map(|c| match c {
            Call::CreateLabel { name, color } => Some((name, color)),
            _ => None,
        })
        .unwrap();
    assert_eq!(created.0, "Proposed");
    assert_eq!(created.1.len(), 6);
    assert!(created.1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[tokio::test]
async fn documents_sharing_a_status_create_its_label_once() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(
            HEAD,
            DIR,
            &[("0001-a.md", EntryKind::File), ("0002-b.md", EntryKind::File)],
        )
        .with_file(HEAD, "doc/adr/0001-a.md", &adr("A", "Proposed"))
        .with_file(HEAD, "doc/adr/0002-b.md", &adr("B", "Proposed"));
    let discussions = FakeDiscussions::new(&log);

    let outcomes = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap();

    let titles: Vec<_> = outcomes.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, ["0001-a.md", "0002-b.md"]);
    let creations = calls(&log)
        .iter()
        .filter(|c| matches!(c, Call::CreateLabel { .. }))
        .count();
    assert_eq!(creations, 1);
    assert_eq!(discussions.repository_labels().len(), 1);
    assert_eq!(
        outcomes[0].result.label_to_add,
        outcomes[1].result.label_to_add
    );
}

#[tokio::test]
async fn only_markdown_files_directly_inside_are_synced() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(
            HEAD,
            DIR,
            &[
                ("0001-x.md", EntryKind::File),
                ("diagram.png", EntryKind::File),
                ("archive", EntryKind::Dir),
                ("linked.md", EntryKind::Symlink),
                ("README.md", EntryKind::File),
            ],
        )
        .with_file(HEAD, "doc/adr/0001-x.md", &adr_without_status("X"))
        .with_file(HEAD, "doc/adr/README.md", "# Decisions\n");
    let discussions = FakeDiscussions::new(&log);

    let outcomes = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap();

    let titles: Vec<_> = outcomes.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, ["0001-x.md", "README.md"]);
}

#[tokio::test]
async fn missing_category_is_a_configuration_mismatch() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log).with_dir(HEAD, DIR, &[]);
    let discussions = FakeDiscussions::new(&log).with_categories(&[("C_general", "General")]);

    let err = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap_err();

    match err {
        SyncError::ConfigurationMismatch { message } => {
            assert_eq!(message, "Could not find discussion category ADR")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn missing_directory_is_a_configuration_mismatch() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log);
    let discussions = FakeDiscussions::new(&log);

    let err = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, SyncError::ConfigurationMismatch { message } if message == "Could not find directory at doc/adr"),
        "{err:?}"
    );
}

#[tokio::test]
async fn file_in_place_of_directory_is_a_configuration_mismatch() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log).with_file_listing(HEAD, DIR);
    let discussions = FakeDiscussions::new(&log);

    let err = RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, SyncError::ConfigurationMismatch { message } if message == "Expected directory but found a file at doc/adr"),
        "{err:?}"
    );
}

#[tokio::test]
async fn catalog_follows_both_cursors_then_the_remaining_one() {
    let log = new_log();
    let discussions = FakeDiscussions::new(&log)
        .with_page_size(1)
        .with_label("L_1", "one")
        .with_label("L_2", "two")
        .with_label("L_3", "three");

    let catalog = fetch_catalog(&discussions).await.unwrap();

    let categories: Vec<_> = catalog.categories.iter().map(|c| c.name.as_str()).collect();
    let labels: Vec<_> = catalog.labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(categories, ["General", "ADR"]);
    assert_eq!(labels, ["one", "two", "three"]);
    assert_eq!(catalog.repository_id.as_str(), "R_repo");
    assert_eq!(
        discussions.reads(),
        ["catalog:-:-", "catalog:1:1", "labels:2"]
    );
}

#[tokio::test]
async fn existing_label_on_a_later_catalog_page_is_reused() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(HEAD, DIR, &[("0001-x.md", EntryKind::File)])
        .with_file(HEAD, "doc/adr/0001-x.md", &adr("X", "Proposed"));
    let discussions = FakeDiscussions::new(&log)
        .with_page_size(1)
        .with_label("L_bug", "bug")
        .with_label("L_docs", "docs")
        .with_label("L_proposed", "Proposed");

    RepositoryScan::new(&content, &discussions, &settings)
        .run(DIR, &git_ref(HEAD), None)
        .await
        .unwrap();

    let log = calls(&log);
    assert!(!log.iter().any(|c| matches!(c, Call::CreateLabel { .. })));
    assert!(log.contains(&Call::AddLabel {
        id: "D_1".into(),
        label: "L_proposed".into(),
    }));
}

#[tokio::test]
async fn rescan_of_converged_repository_is_silent() {
    let log = new_log();
    let settings = settings();
    let content = FakeContent::new(&log)
        .with_dir(
            HEAD,
            DIR,
            &[("0001-a.md", EntryKind::File), ("0002-b.md", EntryKind::File)],
        )
        .with_file(HEAD, "doc/adr/0001-a.md", &adr("A", "Accepted"))
        .with_file(HEAD, "doc/adr/0002-b.md", &adr("B", "Proposed"));
    let discussions = FakeDiscussions::new(&log);
    let scan = RepositoryScan::new(&content, &discussions, &settings);

    scan.run(DIR, &git_ref(HEAD), None).await.unwrap();
    clear(&log);
    let outcomes = scan.run(DIR, &git_ref(HEAD), None).await.unwrap();

    assert!(outcomes.iter().all(|o| o.result.is_noop()));
    assert!(calls(&log).is_empty());
}
