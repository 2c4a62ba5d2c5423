/*
   Copyright 2024 James Forster

   This file is part of intervalidus.

   intervalidus is free software: you can redistribute it and/or
   modify it under the terms of the GNU Affero General Public License
   as published by the Free Software Foundation, either version 3 of
   the License, or (at your option) any later version.

   intervalidus is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
   Affero General Public License for more details.

   You should have received a copy of the GNU Affero General Public
   License along with intervalidus. If not, see
   <https://www.gnu.org/licenses/>.
*/

/// Per-store tuning knobs and feature toggles.
///
/// Read once at construction; every store carries its own copy, so
/// changing the environment after a store exists has no effect on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Target payload count of a box search tree leaf before it
    /// subdivides. Defaults to 256, overridable through the
    /// `INTERVALIDUS_TREE_NODE_CAPACITY` environment variable.
    pub node_capacity: usize,
    /// Maximum box search tree depth. Colliding ordered hashes make
    /// subdivision futile past a point, so leaves at this depth absorb
    /// payloads beyond `node_capacity`. Defaults to 32, overridable
    /// through `INTERVALIDUS_TREE_DEPTH_LIMIT`.
    pub depth_limit: usize,
    /// Validate disjointness of records handed to constructors.
    pub require_disjoint: bool,
    /// Answer interval queries by scanning the ordered map instead of
    /// consulting the box search tree.
    pub no_search_tree: bool,
    /// Use the simple remove-and-reinsert implementation of `update`
    /// instead of the in-place one, for cross-checking.
    pub brute_force_update: bool,
    /// Log which experimental code paths each operation takes.
    pub print_experimental: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            node_capacity: env_override("INTERVALIDUS_TREE_NODE_CAPACITY", 256),
            depth_limit: env_override("INTERVALIDUS_TREE_DEPTH_LIMIT", 32),
            require_disjoint: false,
            no_search_tree: false,
            brute_force_update: false,
            print_experimental: false,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

fn env_override(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparseable {name}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.node_capacity, 256);
        assert_eq!(config.depth_limit, 32);
        assert!(!config.require_disjoint);
        assert!(!config.no_search_tree);
        assert!(!config.brute_force_update);
        assert!(!config.print_experimental);
    }
}
