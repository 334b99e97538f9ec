use super::{status, task, title};
use crate::harness::{Assertion, Scenario};
use yurtle_core::{Term, TriplePattern};

#[test]
fn test_add_writes_immediately() {
    Scenario::new("add_writes_immediately")
        .from_fixture("default")
        .auto_flush()
        .sync()
        .add(task("task1"), title(), Term::plain("Renamed"))
        .assert_flush_wrote(1)
        .assert_dirty_count(0)
        .assert_file_contains("task1.md", "\"Renamed\"")
        .assert_file_contains("task1.md", "\"Task One\"")
        .sync()
        .assert_sync_read(0)
        .run()
        .unwrap();
}

#[test]
fn test_remove_writes_immediately() {
    Scenario::new("remove_writes_immediately")
        .from_fixture("default")
        .auto_flush()
        .sync()
        .remove(TriplePattern::new(Some(task("task2")), Some(status()), None))
        .assert_flush_wrote(1)
        .assert_dirty_count(0)
        .assert_file_lacks("task2.md", "completed")
        .assert_file_contains("task1.md", "pending")
        .run()
        .unwrap();
}

#[test]
fn test_config_file_enables_auto_flush() {
    Scenario::new("config_file_enables_auto_flush")
        .from_fixture("default")
        .with_file("yurtle.toml", "auto_flush = true\n")
        .sync()
        .add(task("task2"), status(), Term::plain("reviewed"))
        .assert_dirty_count(0)
        .assert_file_contains("task2.md", "\"reviewed\"")
        .run()
        .unwrap();
}

#[test]
fn test_unanchored_add_writes_nothing() {
    Scenario::new("unanchored_add_writes_nothing")
        .from_fixture("default")
        .auto_flush()
        .sync()
        .add(task("elsewhere"), title(), Term::plain("Nowhere"))
        .assert_dirty_count(0)
        .assert(Assertion::Unresolved(task("elsewhere")))
        .run()
        .unwrap();
}
