use super::assertions::Assertion;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use yurtle_core::{FlushReport, SyncReport, Term, Triple, TriplePattern, YurtleStore};

/// Executes scenarios against a real store on a temporary workspace
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    store: Option<YurtleStore>,
    auto_flush: bool,
    index_path: PathBuf,
    current_step: usize,
    last_sync: Option<SyncReport>,
    last_flush: Option<FlushReport>,
}

impl ScenarioRunner {
    /// Create a new runner over an optional fixture plus initial files
    pub fn new(
        fixture: Option<&str>,
        initial_files: HashMap<String, Vec<u8>>,
        auto_flush: bool,
    ) -> Result<Self> {
        let workspace = match fixture {
            Some(name) => TestWorkspace::from_fixture(name, initial_files)?,
            None => TestWorkspace::with_files(initial_files)?,
        };
        let store = workspace.open_store(auto_flush)?;
        let index_path = store.index_path().to_path_buf();

        Ok(Self {
            workspace,
            store: Some(store),
            auto_flush,
            index_path,
            current_step: 0,
            last_sync: None,
            last_flush: None,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::WriteFile { path, content } => self.workspace.write_file(path, content),
            ScenarioStep::DeleteFile { path } => self.workspace.remove_file(path),

            ScenarioStep::Sync => self.handle_sync(),
            ScenarioStep::AddTriple { triple } => self.handle_add(triple),
            ScenarioStep::RemoveMatching { pattern } => self.handle_remove(pattern),
            ScenarioStep::Flush => self.handle_flush(),
            ScenarioStep::FlushOne { path } => self.handle_flush_one(path),
            ScenarioStep::Close => self.handle_close(),
            ScenarioStep::Destroy => self.store_mut()?.destroy().map_err(Into::into),

            ScenarioStep::Crash => self.handle_crash(),
            ScenarioStep::Restart => self.handle_restart(),

            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    fn store(&self) -> Result<&YurtleStore> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow!("Store not available (crashed or closed?)"))
    }

    fn store_mut(&mut self) -> Result<&mut YurtleStore> {
        self.store
            .as_mut()
            .ok_or_else(|| anyhow!("Store not available (crashed or closed?)"))
    }

    fn abs(&self, path: &str) -> Result<PathBuf> {
        Ok(self.store()?.root().join(path))
    }

    // ===== Store operations =====

    fn handle_sync(&mut self) -> Result<()> {
        let report = self.store_mut()?.sync()?;
        self.last_sync = Some(report);
        Ok(())
    }

    fn handle_add(&mut self, triple: &Triple) -> Result<()> {
        let report = self.store_mut()?.add(triple.clone())?;
        if let Some(flushed) = report.flushed {
            self.last_flush = Some(flushed);
        }
        Ok(())
    }

    fn handle_remove(&mut self, pattern: &TriplePattern) -> Result<()> {
        let report = self.store_mut()?.remove(pattern)?;
        if let Some(flushed) = report.flushed {
            self.last_flush = Some(flushed);
        }
        Ok(())
    }

    fn handle_flush(&mut self) -> Result<()> {
        let report = self.store_mut()?.flush()?;
        self.last_flush = Some(report);
        Ok(())
    }

    fn handle_flush_one(&mut self, path: &str) -> Result<()> {
        let path = self.abs(path)?;
        let report = self.store_mut()?.flush_one(&path)?;
        self.last_flush = Some(report);
        Ok(())
    }

    fn handle_close(&mut self) -> Result<()> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow!("Store not available"))?;
        self.last_flush = Some(store.close()?);
        Ok(())
    }

    // ===== Failure simulation =====

    fn handle_crash(&mut self) -> Result<()> {
        // Drop the store without flushing or saving the index
        self.store = None;
        Ok(())
    }

    fn handle_restart(&mut self) -> Result<()> {
        if self.store.is_some() {
            bail!("Cannot restart - store still open");
        }
        self.store = Some(self.workspace.open_store(self.auto_flush)?);
        self.last_sync = None;
        self.last_flush = None;
        Ok(())
    }

    // ===== Assertions =====

    fn handle_assertion(&mut self, assertion: &Assertion) -> Result<()> {
        match assertion {
            Assertion::TripleExists(triple) => {
                if !self.store()?.contains(triple) {
                    bail!("Expected triple {} to exist", triple);
                }
                Ok(())
            }
            Assertion::TripleAbsent(triple) => {
                if self.store()?.contains(triple) {
                    bail!("Expected triple {} to be absent", triple);
                }
                Ok(())
            }
            Assertion::MatchCount { pattern, count } => {
                let found = self.store()?.triples(pattern);
                expect_count("matching triples", *count, found.len())
            }
            Assertion::TotalTriples(n) => expect_count("triples", *n, self.store()?.len()),

            Assertion::ResolvesTo { subject, path } => {
                let expected = self.abs(path)?;
                match self.store()?.resolve_file(subject) {
                    Some(found) if found == expected => Ok(()),
                    Some(found) => bail!(
                        "Expected {} in {}, resolved to {}",
                        subject,
                        expected.display(),
                        found.display()
                    ),
                    None => bail!("Expected {} in {}, not resolved", subject, expected.display()),
                }
            }
            Assertion::Unresolved(subject) => self.assert_unresolved(subject),

            Assertion::FileDirty { path } => {
                let abs = self.abs(path)?;
                if !self.store()?.dirty_files().contains(&abs) {
                    bail!("Expected {} to be dirty", path);
                }
                Ok(())
            }
            Assertion::FileClean { path } => {
                let abs = self.abs(path)?;
                let store = self.store()?;
                if store.dirty_files().contains(&abs) {
                    bail!("Expected {} to be clean", path);
                }
                if store.file_state(&abs).map_or(false, |s| s.dirty) {
                    bail!("Record for {} is still marked dirty", path);
                }
                Ok(())
            }
            Assertion::DirtyCount(n) => {
                expect_count("dirty files", *n, self.store()?.dirty_files().len())
            }
            Assertion::TrackedFiles(n) => {
                expect_count("tracked files", *n, self.store()?.file_states().count())
            }

            Assertion::FileContains { path, text } => {
                let content = self.workspace.read_to_string(path)?;
                if !content.contains(text.as_str()) {
                    bail!("Expected {} to contain {:?}, got:\n{}", path, text, content);
                }
                Ok(())
            }
            Assertion::FileLacks { path, text } => {
                let content = self.workspace.read_to_string(path)?;
                if content.contains(text.as_str()) {
                    bail!("Expected {} not to contain {:?}, got:\n{}", path, text, content);
                }
                Ok(())
            }
            Assertion::FileEndsWith { path, text } => {
                let content = self.workspace.read_to_string(path)?;
                if !content.ends_with(text.as_str()) {
                    bail!("Expected {} to end with {:?}, got:\n{}", path, text, content);
                }
                Ok(())
            }
            Assertion::IndexExists => {
                if !self.index_path.exists() {
                    bail!("Expected index at {}", self.index_path.display());
                }
                Ok(())
            }
            Assertion::NoIndex => {
                if self.index_path.exists() {
                    bail!("Expected no index at {}", self.index_path.display());
                }
                Ok(())
            }

            Assertion::LastSyncRead(n) => expect_count("files read", *n, self.last_sync()?.read.len()),
            Assertion::LastSyncRehydrated(n) => {
                expect_count("files rehydrated", *n, self.last_sync()?.rehydrated)
            }
            Assertion::LastSyncRemoved(n) => {
                expect_count("files removed", *n, self.last_sync()?.removed.len())
            }
            Assertion::LastSyncFailures(n) => {
                expect_count("sync failures", *n, self.last_sync()?.failures.len())
            }
            Assertion::LastFlushWrote(n) => {
                expect_count("files written", *n, self.last_flush()?.written.len())
            }
            Assertion::LastFlushFailures(n) => {
                expect_count("flush failures", *n, self.last_flush()?.failures.len())
            }

            Assertion::Custom(f) => f(self.store_mut()?),
        }
    }

    fn assert_unresolved(&self, subject: &Term) -> Result<()> {
        if let Some(found) = self.store()?.resolve_file(subject) {
            bail!("Expected {} to be unresolved, found {}", subject, found.display());
        }
        Ok(())
    }

    fn last_sync(&self) -> Result<&SyncReport> {
        self.last_sync
            .as_ref()
            .ok_or_else(|| anyhow!("No sync has run"))
    }

    fn last_flush(&self) -> Result<&FlushReport> {
        self.last_flush
            .as_ref()
            .ok_or_else(|| anyhow!("No flush has run"))
    }
}

fn expect_count(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        bail!("Expected {} {}, found {}", expected, what, actual);
    }
    Ok(())
}
