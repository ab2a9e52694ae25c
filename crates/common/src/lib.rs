//! Cross-cutting helpers shared by the workspace binaries and tests.

pub mod utils;
