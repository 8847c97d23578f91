// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! The taxonomy store: entity tables and relationship indexes
//!
//! Every relationship is keyed by surrogate ID so it survives renames.
//! Names are resolved to IDs once, at the edge of each mutation.

use crate::error::TaxonomyError;
use crate::types::{EcoId, RepoId, TagId, TaxonomyStats};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::trace;

/// Paired name → ID and ID → name tables for one entity kind
///
/// IDs come from a counter that only moves forward, so an ID is never
/// handed out twice, even after its name is removed.
#[derive(Debug, Clone)]
struct Interner<I> {
    last_id: u32,
    by_name: HashMap<String, I>,
    by_id: HashMap<I, String>,
}

impl<I> Default for Interner<I> {
    fn default() -> Self {
        Self {
            last_id: 0,
            by_name: HashMap::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<I: Copy + Eq + Hash + From<u32>> Interner<I> {
    fn get(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    fn name(&self, id: I) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    fn intern(&mut self, name: &str) -> I {
        if let Some(id) = self.get(name) {
            return id;
        }
        self.last_id += 1;
        let id = I::from(self.last_id);
        self.by_name.insert(name.to_owned(), id);
        self.by_id.insert(id, name.to_owned());
        id
    }

    /// Point `id` at a new name. The caller guarantees `to` is free.
    fn rename(&mut self, id: I, to: &str) {
        if let Some(old) = self.by_id.insert(id, to.to_owned()) {
            self.by_name.remove(&old);
        }
        self.by_name.insert(to.to_owned(), id);
    }

    fn remove(&mut self, id: I) {
        if let Some(name) = self.by_id.remove(&id) {
            self.by_name.remove(&name);
        }
    }

    fn len(&self) -> usize {
        self.by_name.len()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, I)> {
        self.by_name.iter().map(|(name, &id)| (name.as_str(), id))
    }
}

/// Insert into the set stored under `key`, creating it on first use
fn insert_into<K: Eq + Hash, V: Eq + Hash>(map: &mut HashMap<K, HashSet<V>>, key: K, value: V) {
    map.entry(key).or_default().insert(value);
}

/// Remove from the set stored under `key`, dropping the set once empty
fn remove_from<K: Eq + Hash, V: Eq + Hash>(map: &mut HashMap<K, HashSet<V>>, key: &K, value: &V) {
    if let Some(set) = map.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

/// The ecosystem taxonomy
///
/// Ecosystems form a general directed graph through the parent/child
/// indexes. Repositories and tags are interned by value and shared across
/// ecosystems; tags are attached to an (ecosystem, repository) pair.
///
/// Empty sets are never left behind in the indexes.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    ecosystems: Interner<EcoId>,
    repos: Interner<RepoId>,
    tags: Interner<TagId>,
    eco_repos: HashMap<EcoId, HashSet<RepoId>>,
    parent_children: HashMap<EcoId, HashSet<EcoId>>,
    child_parents: HashMap<EcoId, HashSet<EcoId>>,
    eco_repo_tags: HashMap<(EcoId, RepoId), HashSet<TagId>>,
    migration_count: usize,
}

impl Taxonomy {
    /// Create an empty taxonomy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Resolve a live ecosystem name
    #[must_use]
    pub fn eco_id(&self, name: &str) -> Option<EcoId> {
        self.ecosystems.get(name)
    }

    /// Current name of an ecosystem
    #[must_use]
    pub fn eco_name(&self, id: EcoId) -> Option<&str> {
        self.ecosystems.name(id)
    }

    /// Resolve a live repository URL
    #[must_use]
    pub fn repo_id(&self, url: &str) -> Option<RepoId> {
        self.repos.get(url)
    }

    /// Current URL of a repository
    #[must_use]
    pub fn repo_url(&self, id: RepoId) -> Option<&str> {
        self.repos.name(id)
    }

    /// Resolve a tag string
    #[must_use]
    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tags.get(tag)
    }

    /// Text of a tag
    #[must_use]
    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.name(id)
    }

    /// All live ecosystems, in no particular order
    pub fn ecosystems(&self) -> impl Iterator<Item = (&str, EcoId)> {
        self.ecosystems.iter()
    }

    /// Repositories directly attributed to an ecosystem
    #[must_use]
    pub fn repos_of(&self, eco: EcoId) -> Option<&HashSet<RepoId>> {
        self.eco_repos.get(&eco)
    }

    /// Direct children of an ecosystem
    #[must_use]
    pub fn children_of(&self, eco: EcoId) -> Option<&HashSet<EcoId>> {
        self.parent_children.get(&eco)
    }

    /// Direct parents of an ecosystem
    #[must_use]
    pub fn parents_of(&self, eco: EcoId) -> Option<&HashSet<EcoId>> {
        self.child_parents.get(&eco)
    }

    /// Tags recorded for a repository under one ecosystem
    #[must_use]
    pub fn tags_of(&self, eco: EcoId, repo: RepoId) -> Option<&HashSet<TagId>> {
        self.eco_repo_tags.get(&(eco, repo))
    }

    /// Number of migration files replayed into this taxonomy
    #[must_use]
    pub fn migration_count(&self) -> usize {
        self.migration_count
    }

    pub(crate) fn record_migration(&mut self) {
        self.migration_count += 1;
    }

    /// Summary counts
    #[must_use]
    pub fn stats(&self) -> TaxonomyStats {
        TaxonomyStats {
            migration_count: self.migration_count,
            eco_count: self.ecosystems.len(),
            repo_count: self.repos.len(),
            tag_count: self.tags.len(),
            eco_connections_count: self.parent_children.values().map(HashSet::len).sum(),
        }
    }

    fn require_eco(&self, name: &str, missing: fn(String) -> TaxonomyError) -> Result<EcoId, TaxonomyError> {
        self.eco_id(name).ok_or_else(|| missing(name.to_owned()))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create an ecosystem; a no-op if it already exists
    pub fn add_eco(&mut self, name: &str) -> EcoId {
        let id = self.ecosystems.intern(name);
        trace!(eco = name, %id, "ecosystem added");
        id
    }

    /// Attribute a repository to an ecosystem, tagging the pair
    ///
    /// # Errors
    ///
    /// [`TaxonomyError::InvalidEcosystem`] when `eco` does not exist.
    pub fn add_repo<S: AsRef<str>>(&mut self, eco: &str, url: &str, tags: &[S]) -> Result<RepoId, TaxonomyError> {
        let eco_id = self.require_eco(eco, TaxonomyError::InvalidEcosystem)?;
        let repo_id = self.repos.intern(url);
        insert_into(&mut self.eco_repos, eco_id, repo_id);

        for tag in tags {
            let tag_id = self.tags.intern(tag.as_ref());
            insert_into(&mut self.eco_repo_tags, (eco_id, repo_id), tag_id);
        }
        Ok(repo_id)
    }

    /// Add a parent → child edge
    ///
    /// # Errors
    ///
    /// [`TaxonomyError::InvalidParentEcosystem`] or
    /// [`TaxonomyError::InvalidChildEcosystem`] for an unknown name.
    pub fn connect_eco(&mut self, parent: &str, child: &str) -> Result<(), TaxonomyError> {
        let parent_id = self.require_eco(parent, TaxonomyError::InvalidParentEcosystem)?;
        let child_id = self.require_eco(child, TaxonomyError::InvalidChildEcosystem)?;

        insert_into(&mut self.parent_children, parent_id, child_id);
        insert_into(&mut self.child_parents, child_id, parent_id);
        Ok(())
    }

    /// Remove a parent → child edge if present
    ///
    /// # Errors
    ///
    /// Unknown parent or child, or [`TaxonomyError::ParentEcosystemHasNoChildren`]
    /// when the parent has no children at all.
    pub fn disconnect_eco(&mut self, parent: &str, child: &str) -> Result<(), TaxonomyError> {
        let parent_id = self.require_eco(parent, TaxonomyError::InvalidParentEcosystem)?;
        let child_id = self.require_eco(child, TaxonomyError::InvalidChildEcosystem)?;

        if !self.parent_children.contains_key(&parent_id) {
            return Err(TaxonomyError::ParentEcosystemHasNoChildren(parent.to_owned()));
        }
        remove_from(&mut self.parent_children, &parent_id, &child_id);
        remove_from(&mut self.child_parents, &child_id, &parent_id);
        Ok(())
    }

    /// Remove an ecosystem and everything keyed by it
    ///
    /// Edges in both directions, its repository set and its tag pairs all
    /// go. Repositories and tags themselves stay interned.
    ///
    /// # Errors
    ///
    /// [`TaxonomyError::InvalidEcosystem`] when `name` does not exist.
    pub fn remove_eco(&mut self, name: &str) -> Result<(), TaxonomyError> {
        let eco_id = self.require_eco(name, TaxonomyError::InvalidEcosystem)?;

        for parent_id in self.child_parents.remove(&eco_id).unwrap_or_default() {
            remove_from(&mut self.parent_children, &parent_id, &eco_id);
        }
        for child_id in self.parent_children.remove(&eco_id).unwrap_or_default() {
            remove_from(&mut self.child_parents, &child_id, &eco_id);
        }

        if let Some(repo_ids) = self.eco_repos.remove(&eco_id) {
            for repo_id in repo_ids {
                self.eco_repo_tags.remove(&(eco_id, repo_id));
            }
        }

        self.ecosystems.remove(eco_id);
        Ok(())
    }

    /// Rename a repository, or merge it into `dst` when `dst` already exists
    ///
    /// On merge every ecosystem listing `src` lists `dst` instead, the tags
    /// recorded for `(eco, src)` are folded into `(eco, dst)`, and `src`
    /// disappears from the URL tables.
    ///
    /// # Errors
    ///
    /// [`TaxonomyError::InvalidSourceRepo`] when `src` does not exist.
    pub fn move_repo(&mut self, src: &str, dst: &str) -> Result<(), TaxonomyError> {
        let src_id = self
            .repo_id(src)
            .ok_or_else(|| TaxonomyError::InvalidSourceRepo(src.to_owned()))?;

        match self.repo_id(dst) {
            Some(dst_id) if dst_id != src_id => {
                for (&eco_id, repo_set) in &mut self.eco_repos {
                    if !repo_set.remove(&src_id) {
                        continue;
                    }
                    repo_set.insert(dst_id);

                    if let Some(tags) = self.eco_repo_tags.remove(&(eco_id, src_id)) {
                        self.eco_repo_tags.entry((eco_id, dst_id)).or_default().extend(tags);
                    }
                }
                self.repos.remove(src_id);
            }
            Some(_) => {}
            None => self.repos.rename(src_id, dst),
        }
        Ok(())
    }

    /// Rename an ecosystem, keeping its ID and every relationship
    ///
    /// # Errors
    ///
    /// [`TaxonomyError::InvalidSourceEcosystem`] when `src` does not exist,
    /// [`TaxonomyError::DestinationEcosystemAlreadyExists`] when `dst` does.
    pub fn move_eco(&mut self, src: &str, dst: &str) -> Result<(), TaxonomyError> {
        let src_id = self.require_eco(src, TaxonomyError::InvalidSourceEcosystem)?;
        if self.eco_id(dst).is_some() {
            return Err(TaxonomyError::DestinationEcosystemAlreadyExists(dst.to_owned()));
        }
        self.ecosystems.rename(src_id, dst);
        Ok(())
    }

    /// Detach a repository from one ecosystem and drop the pair's tags
    ///
    /// # Errors
    ///
    /// Unknown ecosystem, [`TaxonomyError::EcosystemHasNoRepos`] when the
    /// ecosystem holds no repositories, or [`TaxonomyError::InvalidRepo`]
    /// for an unknown URL.
    pub fn remove_repo(&mut self, eco: &str, url: &str) -> Result<(), TaxonomyError> {
        let eco_id = self.require_eco(eco, TaxonomyError::InvalidEcosystem)?;
        if !self.eco_repos.contains_key(&eco_id) {
            return Err(TaxonomyError::EcosystemHasNoRepos(eco.to_owned()));
        }
        let repo_id = self
            .repo_id(url)
            .ok_or_else(|| TaxonomyError::InvalidRepo(url.to_owned()))?;

        remove_from(&mut self.eco_repos, &eco_id, &repo_id);
        self.eco_repo_tags.remove(&(eco_id, repo_id));
        Ok(())
    }
}
