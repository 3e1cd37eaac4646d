use crate::types::{KeySet, LayoutError, LayoutErrorKind};

use super::{Atom, AtomId, AtomKind, BranchId, BranchName};

/// Arena owning every atom of a formula.
///
/// All mutation goes through the tree so that it can keep the dirty flags,
/// the memoized caches and the change counter consistent. Rendering only
/// needs a shared reference.
#[derive(Debug, Default)]
pub struct AtomTree {
    atoms: Vec<Option<Atom>>,
    change_counter: u64,
}

impl AtomTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached atom and returns its id.
    pub fn add(&mut self, atom: Atom) -> AtomId {
        let id = AtomId(self.atoms.len());
        self.atoms.push(Some(atom));
        id
    }

    /// Looks up an atom.
    pub fn get(&self, id: AtomId) -> Result<&Atom, LayoutError> {
        self.atoms
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| LayoutErrorKind::UnknownAtom { atom: id }.into())
    }

    pub(super) fn get_mut(&mut self, id: AtomId) -> Result<&mut Atom, LayoutError> {
        self.atoms
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| LayoutErrorKind::UnknownAtom { atom: id }.into())
    }

    /// Whether `id` refers to a live atom.
    #[must_use]
    pub fn contains(&self, id: AtomId) -> bool {
        self.get(id).is_ok()
    }

    /// Monotonic counter, incremented by every mutation.
    #[must_use]
    pub const fn change_counter(&self) -> u64 {
        self.change_counter
    }

    /// The branch `name` of `id`, sentinel included.
    pub fn branch(&self, id: AtomId, name: BranchName) -> Result<Option<&[AtomId]>, LayoutError> {
        Ok(self.get(id)?.branch(name))
    }

    /// The branch of an array cell, sentinel included.
    pub fn cell(&self, id: AtomId, row: usize, col: usize) -> Result<Option<&[AtomId]>, LayoutError> {
        let atom = self.get(id)?;
        if !matches!(atom.kind, AtomKind::Array(_)) {
            return Err(LayoutError::at(LayoutErrorKind::NotAnArray { atom: id }, id));
        }
        Ok(atom
            .grid()
            .and_then(|grid| grid.get(row))
            .and_then(|cells| cells.get(col))
            .map(Vec::as_slice))
    }

    pub(super) fn add_sentinel(&mut self, mode: crate::types::Mode) -> AtomId {
        self.add(Atom::new(AtomKind::First).with_mode(mode))
    }

    pub(super) fn is_first(&self, id: AtomId) -> bool {
        self.get(id)
            .is_ok_and(|atom| matches!(atom.kind, AtomKind::First))
    }

    /// Checks that every atom of `children` can be attached below `parent`.
    pub(super) fn check_attachable(
        &self,
        parent: AtomId,
        children: &[AtomId],
    ) -> Result<(), LayoutError> {
        let mut seen = KeySet::default();
        for &child in children {
            let atom = self.get(child)?;
            if atom.parent.is_some() || !seen.insert(child) {
                return Err(LayoutError::at(
                    LayoutErrorKind::AlreadyAttached { atom: child },
                    child,
                ));
            }
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == child {
                    return Err(LayoutError::at(LayoutErrorKind::Cycle, child));
                }
                ancestor = self.get(current)?.parent;
            }
        }
        Ok(())
    }

    pub(super) fn attach(&mut self, parent: AtomId, branch: BranchId, child: AtomId) -> Result<(), LayoutError> {
        let atom = self.get_mut(child)?;
        atom.parent = Some(parent);
        atom.parent_branch = Some(branch);
        Ok(())
    }

    pub(super) fn detach_all(&mut self, ids: &[AtomId]) {
        for &id in ids {
            if let Ok(atom) = self.get_mut(id) {
                atom.parent = None;
                atom.parent_branch = None;
            }
        }
    }

    fn branchable(&self, id: AtomId, name: BranchName) -> Result<(), LayoutError> {
        if !name.is_script() && self.get(id)?.value.is_some() {
            return Err(LayoutError::at(
                LayoutErrorKind::ValueWithBranches { atom: id },
                id,
            ));
        }
        Ok(())
    }

    /// Replaces the branch `name` of `parent` with `children`.
    ///
    /// A `first` sentinel is prepended when `children` does not start with
    /// one. Atoms of the previous branch may be reused in `children`; the
    /// others are detached but stay in the arena. On error the previous
    /// branch is left in place.
    pub fn set_branch(
        &mut self,
        parent: AtomId,
        name: BranchName,
        children: Vec<AtomId>,
    ) -> Result<(), LayoutError> {
        self.branchable(parent, name)?;
        let previous = self.get_mut(parent)?.branches[name as usize].take();
        if let Some(previous) = &previous {
            self.detach_all(previous);
        }
        if let Err(err) = self.check_attachable(parent, &children) {
            if let Some(previous) = previous {
                self.install_branch(parent, name, previous)?;
            }
            return Err(err);
        }

        let mut list = children;
        if !list.first().is_some_and(|&first| self.is_first(first)) {
            let mode = self.get(parent)?.mode;
            list.insert(0, self.add_sentinel(mode));
        }
        self.install_branch(parent, name, list)?;
        self.mark_dirty(parent)
    }

    fn install_branch(
        &mut self,
        parent: AtomId,
        name: BranchName,
        list: Vec<AtomId>,
    ) -> Result<(), LayoutError> {
        for &child in &list {
            self.attach(parent, BranchId::Named(name), child)?;
        }
        self.get_mut(parent)?.branches[name as usize] = Some(list);
        Ok(())
    }

    /// Appends `child` to the branch `name`, creating the branch if needed.
    pub fn append(
        &mut self,
        parent: AtomId,
        name: BranchName,
        child: AtomId,
    ) -> Result<(), LayoutError> {
        self.branchable(parent, name)?;
        self.check_attachable(parent, &[child])?;
        if self.get(parent)?.branch(name).is_none() {
            return self.set_branch(parent, name, vec![child]);
        }

        self.attach(parent, BranchId::Named(name), child)?;
        if let Some(list) = self.get_mut(parent)?.branches[name as usize].as_mut() {
            list.push(child);
        }
        self.mark_dirty(parent)
    }

    fn sibling_list_mut(
        &mut self,
        parent: AtomId,
        branch: BranchId,
    ) -> Result<&mut Vec<AtomId>, LayoutError> {
        let atom = self.get_mut(parent)?;
        let list = match branch {
            BranchId::Named(name) => atom.branches[name as usize].as_mut(),
            BranchId::Cell { row, col } => atom
                .grid
                .as_mut()
                .and_then(|grid| grid.get_mut(row))
                .and_then(|cells| cells.get_mut(col)),
        };
        list.ok_or_else(|| {
            LayoutError::at(
                LayoutErrorKind::MissingBranch {
                    atom: parent,
                    branch,
                },
                parent,
            )
        })
    }

    fn location(&self, id: AtomId) -> Result<(AtomId, BranchId), LayoutError> {
        let atom = self.get(id)?;
        match (atom.parent, atom.parent_branch) {
            (Some(parent), Some(branch)) => Ok((parent, branch)),
            _ => Err(LayoutError::at(LayoutErrorKind::NotAttached { atom: id }, id)),
        }
    }

    /// Inserts `child` right after `sibling`, in the same branch.
    pub fn insert_after(&mut self, sibling: AtomId, child: AtomId) -> Result<(), LayoutError> {
        let (parent, branch) = self.location(sibling)?;
        self.check_attachable(parent, &[child])?;

        let list = self.sibling_list_mut(parent, branch)?;
        let index = list
            .iter()
            .position(|&id| id == sibling)
            .map_or(list.len(), |pos| pos + 1);
        list.insert(index, child);
        self.attach(parent, branch, child)?;
        self.mark_dirty(parent)
    }

    /// Detaches `child` from its parent.
    ///
    /// The atom and its subtree stay in the arena until [`Self::discard`].
    /// The `first` atom of a branch cannot be removed.
    pub fn remove(&mut self, child: AtomId) -> Result<(), LayoutError> {
        let (parent, branch) = self.location(child)?;
        if self.is_first(child) {
            return Err(LayoutError::at(
                LayoutErrorKind::SentinelRemoval { atom: child },
                child,
            ));
        }
        self.sibling_list_mut(parent, branch)?
            .retain(|&id| id != child);
        self.detach_all(&[child]);
        self.mark_dirty(parent)
    }

    /// Releases a detached atom and its whole subtree.
    pub fn discard(&mut self, id: AtomId) -> Result<(), LayoutError> {
        if self.get(id)?.parent.is_some() {
            return Err(LayoutError::at(
                LayoutErrorKind::AlreadyAttached { atom: id },
                id,
            ));
        }
        let mut doomed = Vec::new();
        self.collect_descendants(id, &mut doomed);
        doomed.push(id);
        for gone in doomed {
            if let Some(slot) = self.atoms.get_mut(gone.0) {
                *slot = None;
            }
        }
        self.change_counter += 1;
        Ok(())
    }

    /// Replaces the value of a value-bearing atom.
    pub fn set_value(&mut self, id: AtomId, value: &str) -> Result<(), LayoutError> {
        let atom = self.get_mut(id)?;
        if atom.has_content_branches() {
            return Err(LayoutError::at(
                LayoutErrorKind::ValueWithBranches { atom: id },
                id,
            ));
        }
        atom.value = Some(value.to_owned());
        self.mark_dirty(id)
    }

    /// Replaces the style overrides of an atom.
    pub fn set_style(&mut self, id: AtomId, style: super::AtomStyle) -> Result<(), LayoutError> {
        self.get_mut(id)?.style = style;
        self.mark_dirty(id)
    }

    /// Marks `id` and all of its ancestors dirty and drops their caches.
    pub(super) fn mark_dirty(&mut self, id: AtomId) -> Result<(), LayoutError> {
        let mut current = Some(id);
        while let Some(atom_id) = current {
            let atom = self.get_mut(atom_id)?;
            atom.dirty = true;
            atom.children_cache.take();
            atom.serialized.take();
            current = atom.parent;
        }
        self.change_counter += 1;
        Ok(())
    }

    /// Whether `id` changed since it was last marked clean.
    pub fn is_dirty(&self, id: AtomId) -> Result<bool, LayoutError> {
        Ok(self.get(id)?.dirty)
    }

    /// Clears the dirty flag of `id` and its whole subtree.
    pub fn mark_clean(&mut self, id: AtomId) -> Result<(), LayoutError> {
        let mut subtree = Vec::new();
        self.collect_descendants(id, &mut subtree);
        subtree.push(id);
        for atom_id in subtree {
            self.get_mut(atom_id)?.dirty = false;
        }
        Ok(())
    }

    /// Flattened list of all descendants of `id`.
    ///
    /// Branches are visited in [`BranchName`] order, then the grid in
    /// row-major order. Each child's own descendants come before the child.
    /// The list is memoized until the next mutation below `id`.
    pub fn children(&self, id: AtomId) -> Result<&[AtomId], LayoutError> {
        let atom = self.get(id)?;
        Ok(atom.children_cache.get_or_init(|| {
            let mut out = Vec::new();
            self.collect_descendants(id, &mut out);
            out
        }))
    }

    fn collect_descendants(&self, id: AtomId, out: &mut Vec<AtomId>) {
        let Ok(atom) = self.get(id) else {
            return;
        };
        let named = atom.branches.iter().flatten();
        let cells = atom.grid.iter().flatten().flatten();
        for list in named.chain(cells) {
            for &child in list {
                self.collect_descendants(child, out);
                out.push(child);
            }
        }
    }

    /// Whether `id` renders as a single glyph.
    ///
    /// Scripts attached to a character box skip the drop corrections, and an
    /// accent over one uses the glyph's skew.
    pub fn is_character_box(&self, id: AtomId) -> bool {
        let Ok(atom) = self.get(id) else {
            return false;
        };
        match &atom.kind {
            AtomKind::Ord
            | AtomKind::Bin
            | AtomKind::Rel
            | AtomKind::Open
            | AtomKind::Close
            | AtomKind::Punct
            | AtomKind::Inner => atom
                .value()
                .is_some_and(|value| value.chars().count() == 1),
            AtomKind::Group => match atom.branch(BranchName::Body) {
                Some([_, only]) => self.is_character_box(*only),
                _ => false,
            },
            _ => false,
        }
    }
}
