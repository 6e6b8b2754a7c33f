//! Tracked address blocks of the allocation pool.

use super::ipv4::{block_size, AddressBlock};
use serde::Serialize;

/// `count` contiguous sibling blocks sharing one prefix, starting at `first`.
///
/// Splitting a /1 into /30s yields 2^29 siblings; holding them as a run keeps that
/// cheap while still addressing each sibling by position.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRun {
    pub first: AddressBlock,
    pub count: u64,
}

impl BlockRun {
    pub fn single(block: AddressBlock) -> BlockRun {
        BlockRun {
            first: block,
            count: 1,
        }
    }

    /// All children of `parent` with prefix `prefix`, in ascending address order.
    pub fn children_of(parent: AddressBlock, prefix: u8) -> BlockRun {
        debug_assert!(prefix >= parent.prefix);
        BlockRun {
            first: AddressBlock {
                addr: parent.addr,
                prefix,
            },
            count: 1u64 << (prefix - parent.prefix),
        }
    }

    pub fn prefix(&self) -> u8 {
        self.first.prefix
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sibling at position `index`.
    pub fn get(&self, index: u64) -> Option<AddressBlock> {
        if index >= self.count {
            return None;
        }
        Some(AddressBlock {
            addr: (self.first.addr as u64 + index * block_size(self.prefix())) as u32,
            prefix: self.prefix(),
        })
    }

    pub fn last(&self) -> Option<AddressBlock> {
        self.count.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Addresses covered by the whole run.
    pub fn size(&self) -> u64 {
        self.count * block_size(self.prefix())
    }

    /// One past the last covered address.
    pub fn end(&self) -> u64 {
        self.first.addr as u64 + self.size()
    }

    pub fn iter(&self) -> impl Iterator<Item = AddressBlock> + '_ {
        (0..self.count).filter_map(move |i| self.get(i))
    }

    /// The run without the sibling at `index`, as at most two runs (before and after).
    pub fn without(&self, index: u64) -> Vec<BlockRun> {
        let mut rest = Vec::with_capacity(2);
        if index > 0 {
            rest.push(BlockRun {
                first: self.first,
                count: index.min(self.count),
            });
        }
        if let Some(next) = self.get(index + 1) {
            rest.push(BlockRun {
                first: next,
                count: self.count - index - 1,
            });
        }
        rest
    }
}

impl std::fmt::Display for BlockRun {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.count, self.last()) {
            (1, _) => write!(f, "{}", self.first),
            (_, Some(last)) => write!(f, "{}..{} (x{})", self.first, last, self.count),
            _ => write!(f, "-"),
        }
    }
}

/// A pool entry: a run of equal-sized blocks, either free or consumed.
///
/// Consumed fragments are always single blocks and are never split again.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fragment {
    pub run: BlockRun,
    pub used: bool,
}

impl Fragment {
    pub fn free(run: BlockRun) -> Fragment {
        Fragment { run, used: false }
    }

    /// Lowest block of the fragment, the one best-fit selection looks at.
    pub fn block(&self) -> AddressBlock {
        self.run.first
    }

    pub fn prefix(&self) -> u8 {
        self.run.prefix()
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.used {
            write!(f, "{} [used]", self.run)
        } else {
            write!(f, "{}", self.run)
        }
    }
}
