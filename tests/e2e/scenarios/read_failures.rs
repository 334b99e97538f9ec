use super::{status, task, title};
use crate::harness::{Assertion, Scenario};
use yurtle_core::Term;

#[test]
fn test_parse_failure_keeps_previous_triples() {
    Scenario::new("parse_failure_keeps_previous_triples")
        .from_fixture("default")
        .sync()
        .write_file(
            "task2.md",
            "---\n<urn:task:task2> pm:status \"unterminated .\n---\n# Task Two\n",
        )
        .sync()
        .assert(Assertion::LastSyncFailures(1))
        .assert_sync_read(0)
        .assert_triple(task("task2"), status(), Term::plain("completed"))
        .assert_resolves(task("task2"), "task2.md")
        // Still broken, so it fails again
        .sync()
        .assert(Assertion::LastSyncFailures(1))
        .write_file(
            "task2.md",
            "---\n<urn:task:task2> pm:status \"fixed\" .\n---\n# Task Two\n",
        )
        .sync()
        .assert(Assertion::LastSyncFailures(0))
        .assert_sync_read(1)
        .assert_triple(task("task2"), status(), Term::plain("fixed"))
        .assert_no_triple(task("task2"), status(), Term::plain("completed"))
        .run()
        .unwrap();
}

#[test]
fn test_broken_files_do_not_stop_sync() {
    Scenario::new("broken_files_do_not_stop_sync")
        .from_fixture("default")
        .with_file("broken.md", "---\n<urn:x> undeclared:p \"v\" .\n---\n")
        .with_file("collection.md", "---\n<urn:y> yurtle:tag ( \"a\" \"b\" ) .\n---\n")
        .write_bytes("binary.md", b"---\n\xff\xfe\n---\n")
        .sync()
        .assert(Assertion::LastSyncFailures(3))
        .assert_sync_read(3)
        .assert(Assertion::TrackedFiles(3))
        .assert_triple(task("task1"), title(), Term::plain("Task One"))
        .run()
        .unwrap();
}

#[test]
fn test_bad_yaml_header_is_reported() {
    Scenario::new("bad_yaml_header_is_reported")
        .with_file("list.md", "---\n- just\n- a list\n---\nBody\n")
        .with_file("ok.md", "---\ntitle: Fine\n---\nBody\n")
        .sync()
        .assert(Assertion::LastSyncFailures(1))
        .assert_sync_read(1)
        .assert_triple(Term::iri("urn:doc:ok"), title(), Term::plain("Fine"))
        .run()
        .unwrap();
}

#[test]
fn test_plain_markdown_contributes_nothing() {
    Scenario::new("plain_markdown_contributes_nothing")
        .with_file("plain.md", "# Plain Document\n\nNo header here.\n")
        .sync()
        .assert_sync_read(1)
        .assert(Assertion::LastSyncFailures(0))
        .assert(Assertion::TotalTriples(0))
        .assert(Assertion::TrackedFiles(1))
        .run()
        .unwrap();
}
