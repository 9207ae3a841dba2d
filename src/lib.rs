//! Workspace-level integration tests for fibwide live in `tests/`.
