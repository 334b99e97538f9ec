use super::{status, task, title};
use crate::harness::{Assertion, Scenario};
use yurtle_core::{Term, TriplePattern};

#[test]
fn test_sync_reads_fixture() {
    Scenario::new("sync_reads_fixture")
        .from_fixture("default")
        .sync()
        .assert_sync_read(3)
        .assert(Assertion::LastSyncFailures(0))
        .assert(Assertion::TrackedFiles(3))
        .assert(Assertion::TotalTriples(12)) // 3 per document plus provenance
        .assert_resolves(task("task1"), "task1.md")
        .assert_resolves(task("task2"), "task2.md")
        .assert_resolves(Term::iri("urn:doc:project1"), "projects/project1.md")
        .assert_triple(task("task1"), title(), Term::plain("Task One"))
        .assert_triple(
            Term::iri("urn:doc:project1"),
            title(),
            Term::plain("Project One"),
        )
        .assert(Assertion::IndexExists)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_second_sync_reads_nothing() {
    Scenario::new("second_sync_reads_nothing")
        .from_fixture("default")
        .sync()
        .sync()
        .assert_sync_read(0)
        .assert(Assertion::LastSyncRemoved(0))
        .assert(Assertion::TotalTriples(12))
        .run()
        .unwrap();
}

#[test]
fn test_edit_is_written_to_owner_only() {
    Scenario::new("edit_is_written_to_owner_only")
        .from_fixture("default")
        .sync()
        .remove(TriplePattern::new(Some(task("task1")), Some(status()), None))
        .add(task("task1"), status(), Term::plain("done"))
        .assert_dirty("task1.md")
        .assert_clean("task2.md")
        .assert_dirty_count(1)
        // Nothing reaches the disk before a flush
        .assert_file_contains("task1.md", "\"pending\"")
        .flush()
        .assert_flush_wrote(1)
        .assert_dirty_count(0)
        .assert_file_contains("task1.md", "pm:status \"done\"")
        .assert_file_lacks("task1.md", "pending")
        .assert_file_contains("task1.md", "yurtle:title \"Task One\"")
        .assert(Assertion::FileEndsWith {
            path: "task1.md".into(),
            text: "---\n\n# Task One\n\nFirst task.\n".into(),
        })
        .assert_file_contains("task2.md", "pm:status \"completed\"")
        .run()
        .unwrap();
}

#[test]
fn test_own_writes_are_not_reread() {
    Scenario::new("own_writes_are_not_reread")
        .from_fixture("default")
        .sync()
        .add(task("task2"), status(), Term::plain("archived"))
        .flush()
        .sync()
        .assert_sync_read(0)
        .assert_triple(task("task2"), status(), Term::plain("archived"))
        .assert_triple(task("task2"), status(), Term::plain("completed"))
        .run()
        .unwrap();
}

#[test]
fn test_external_edit_replaces_file_triples() {
    Scenario::new("external_edit_replaces_file_triples")
        .from_fixture("default")
        .sync()
        .write_file(
            "task2.md",
            "---\n<urn:task:task2> pm:status \"blocked\" .\n---\n# Task Two\n",
        )
        .sync()
        .assert_sync_read(1)
        .assert_triple(task("task2"), status(), Term::plain("blocked"))
        .assert_no_triple(task("task2"), status(), Term::plain("completed"))
        .assert_no_triple(task("task2"), title(), Term::plain("Task Two"))
        .assert_triple(task("task1"), status(), Term::plain("pending"))
        .run()
        .unwrap();
}

#[test]
fn test_yaml_document_is_rewritten_as_turtle() {
    let project = Term::iri("urn:doc:project1");
    Scenario::new("yaml_document_is_rewritten_as_turtle")
        .from_fixture("default")
        .sync()
        .add(project.clone(), status(), Term::plain("active"))
        .assert_dirty("projects/project1.md")
        .flush()
        .assert_file_contains("projects/project1.md", "<urn:doc:project1>")
        .assert_file_contains("projects/project1.md", "pm:status \"active\"")
        .assert_file_contains("projects/project1.md", "yurtle:title \"Project One\"")
        .assert_file_lacks("projects/project1.md", "title: Project One")
        .assert(Assertion::FileEndsWith {
            path: "projects/project1.md".into(),
            text: "# Project One\n\nA project file.\n".into(),
        })
        .run()
        .unwrap();
}

#[test]
fn test_unanchored_subject_dirties_nothing() {
    Scenario::new("unanchored_subject_dirties_nothing")
        .from_fixture("default")
        .sync()
        .add(task("nobody"), title(), Term::plain("Orphan"))
        .assert_triple(task("nobody"), title(), Term::plain("Orphan"))
        .assert(Assertion::Unresolved(task("nobody")))
        .assert_dirty_count(0)
        .flush()
        .assert_flush_wrote(0)
        .run()
        .unwrap();
}

#[test]
fn test_yaml_key_with_space_reads_back_after_flush() {
    let notes = Term::iri("urn:doc:notes");
    Scenario::new("yaml_key_with_space_reads_back_after_flush")
        .with_file("notes.md", "---\ntitle: Notes\ndue date: friday\n---\nBody\n")
        .sync()
        .add(notes.clone(), status(), Term::plain("open"))
        .flush()
        .assert(Assertion::LastFlushFailures(0))
        .assert_file_contains("notes.md", "<https://yurtle.dev/schema/due%20date> \"friday\"")
        .restart()
        .sync()
        .assert(Assertion::LastSyncFailures(0))
        .assert_triple(notes.clone(), status(), Term::plain("open"))
        .assert_resolves(notes, "notes.md")
        .run()
        .unwrap();
}

#[test]
fn test_flush_keeps_owner_after_provenance_removal() {
    Scenario::new("flush_keeps_owner_after_provenance_removal")
        .from_fixture("default")
        .sync()
        .remove(TriplePattern::new(
            Some(task("task1")),
            Some(yurtle_core::namespaces::defined_in()),
            None,
        ))
        .assert(Assertion::Unresolved(task("task1")))
        .flush()
        .assert_flush_wrote(1)
        .assert_resolves(task("task1"), "task1.md")
        .add(task("task1"), status(), Term::plain("done"))
        .assert_dirty("task1.md")
        .run()
        .unwrap();
}
