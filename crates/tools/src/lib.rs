//! Developer tooling: level inspector and enemy census.
//!
//! # Invariants
//! - Tools only read levels; they never modify them.

mod inspector;

pub use inspector::{LevelInspector, LevelSummary, RoomInfo};

pub fn crate_info() -> &'static str {
    "delve-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
