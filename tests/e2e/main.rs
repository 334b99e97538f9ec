//! End-to-end scenarios for Yurtle workspaces.

mod harness;
mod scenarios;
