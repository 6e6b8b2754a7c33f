//! The pool of address blocks carved out of the base network.
//!
//! The pool starts as the whole base network. Each step either consumes a block as-is or
//! splits it into equal children and hands the unassigned children back. Nothing is
//! ever merged, so free fragments plus assigned blocks always tile the base network.

use crate::models::{AddressBlock, BlockRun, Fragment};
use std::cmp::Reverse;

/// Ordered set of free and consumed fragments, private to one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPool {
    fragments: Vec<Fragment>,
}

impl FragmentPool {
    /// Pool holding exactly one free fragment: the base network.
    pub fn new(base: AddressBlock) -> FragmentPool {
        FragmentPool {
            fragments: vec![Fragment::free(BlockRun::single(base))],
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn snapshot(&self) -> Vec<Fragment> {
        self.fragments.clone()
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// Index of the fragment that should host a block of `target_prefix`.
    ///
    /// Only free fragments at least as large as the target qualify. The lowest network
    /// address wins; on an address tie the smaller block (larger prefix) wins.
    pub fn find_best_fit(&self, target_prefix: u8) -> Option<usize> {
        self.fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.used && f.prefix() <= target_prefix)
            .min_by_key(|(_, f)| (f.block().addr, Reverse(f.prefix())))
            .map(|(i, _)| i)
    }

    /// Remove the lowest block of fragment `index` and split it into children of
    /// `target_prefix`, ordered by ascending address.
    pub fn subdivide(&mut self, index: usize, target_prefix: u8) -> BlockRun {
        let parent = self.take_block(index);
        BlockRun::children_of(parent, target_prefix)
    }

    /// Mark the lowest block of fragment `index` as used, without splitting it.
    pub fn consume(&mut self, index: usize) -> AddressBlock {
        let fragment = self.fragments[index];
        if fragment.run.count == 1 {
            self.fragments[index].used = true;
            return fragment.block();
        }
        let block = self.take_block(index);
        self.fragments.push(Fragment {
            run: BlockRun::single(block),
            used: true,
        });
        block
    }

    /// Return every child except `except_index` to the pool as free fragments.
    pub fn reinsert(&mut self, children: BlockRun, except_index: u64) {
        self.fragments
            .extend(children.without(except_index).into_iter().map(Fragment::free));
    }

    /// Used fragments last; free ones by ascending address, larger block first on a tie.
    pub fn reorder(&mut self) {
        self.fragments
            .sort_by_key(|f| (f.used, f.block().addr, f.prefix()));
    }

    #[cfg(test)]
    fn free_runs(&self) -> impl Iterator<Item = &BlockRun> {
        self.fragments.iter().filter(|f| !f.used).map(|f| &f.run)
    }

    /// Detach the lowest block of fragment `index`, dropping the entry when it empties.
    fn take_block(&mut self, index: usize) -> AddressBlock {
        let run = self.fragments[index].run;
        match run.get(1) {
            Some(next) => {
                self.fragments[index].run = BlockRun {
                    first: next,
                    count: run.count - 1,
                };
            }
            None => {
                self.fragments.remove(index);
            }
        }
        run.first
    }
}
