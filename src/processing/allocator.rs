//! VLSM allocation engine.
//!
//! Requirements are placed largest first. For each one the engine sizes the subnet,
//! picks the lowest free fragment that can hold it, splits that fragment when it is
//! larger than needed and records a trace step. All work happens on a pool owned by
//! the call, so a failure leaves nothing behind.

use super::fragment_pool::FragmentPool;
use crate::error::{PlanError, Result};
use crate::models::{
    minimal_prefix_for, to_dotted, AddressBlock, Allocation, AllocationResult, AllocationStep,
    BlockRun, Requirement, Strategy, MAX_PREFIX, MIN_PREFIX,
};
use itertools::Itertools;

/// Carve `base` into one subnet per positive entry of `host_counts`.
///
/// # Arguments
/// * `base` - Network to carve, prefix must be within /1../30
/// * `host_counts` - Hosts needed per subnet; zero and negative entries are dropped
/// * `strategy` - Which child of a split block is assigned
///
/// # Returns
/// * `Ok(Allocation)` - Results sorted by ascending prefix plus the processing trace
/// * `Err(PlanError)` - Nothing was allocated
pub fn allocate(base: AddressBlock, host_counts: &[i64], strategy: Strategy) -> Result<Allocation> {
    let base = validate_base(base)?;
    let requirements = Requirement::from_host_counts(host_counts)?;
    allocate_requirements(base, &requirements, strategy)
}

/// Same as [`allocate`] for requirements that were already built.
pub fn allocate_requirements(
    base: AddressBlock,
    requirements: &[Requirement],
    strategy: Strategy,
) -> Result<Allocation> {
    let base = validate_base(base)?;
    if requirements.is_empty() {
        return Err(PlanError::NoValidRequirements);
    }
    log::info!(
        "Allocating {} subnet(s) in {} with strategy '{}'",
        requirements.len(),
        base,
        strategy
    );

    // Stable sort keeps input order among equal host counts
    let ordered = requirements
        .iter()
        .sorted_by(|a, b| b.host_count.cmp(&a.host_count));

    let mut pool = FragmentPool::new(base);
    let mut results = Vec::with_capacity(requirements.len());
    let mut steps = Vec::with_capacity(requirements.len());

    for requirement in ordered {
        let step = place(&mut pool, *requirement, strategy)?;
        log::debug!(
            "#{} ({} hosts): /{} from {} -> {} (child {} of {})",
            requirement.label,
            requirement.host_count,
            step.target_prefix,
            step.parent_block,
            step.assigned_block(),
            step.chosen_child_index + 1,
            step.all_child_blocks.len()
        );
        results.push(AllocationResult::new(step.assigned_block(), *requirement));
        steps.push(step);
    }

    results.sort_by_key(|r| (r.prefix(), r.requirement.original_index));

    let allocation = Allocation {
        base,
        strategy,
        results,
        steps,
        pool: pool.into_fragments(),
    };
    log::info!(
        "Allocated {} of {} addresses ({:.1}%)",
        allocation.total_allocated(),
        base.size(),
        allocation.utilisation() * 100.0
    );
    Ok(allocation)
}

/// Check the prefix range and clear any host bits of the base address.
fn validate_base(base: AddressBlock) -> Result<AddressBlock> {
    if !(MIN_PREFIX..=MAX_PREFIX).contains(&base.prefix) {
        return Err(PlanError::InvalidBaseNetwork {
            input: format!("{}/{}", to_dotted(base.addr), base.prefix),
            reason: format!("prefix must be between /{MIN_PREFIX} and /{MAX_PREFIX}"),
        });
    }
    let normalised = AddressBlock::new(base.addr, base.prefix)?;
    if normalised != base {
        log::warn!(
            "Base {}/{} has host bits set, using {}",
            to_dotted(base.addr),
            base.prefix,
            normalised
        );
    }
    Ok(normalised)
}

/// Place one requirement into the pool and describe what happened.
fn place(
    pool: &mut FragmentPool,
    requirement: Requirement,
    strategy: Strategy,
) -> Result<AllocationStep> {
    let target_prefix = minimal_prefix_for(requirement.host_count)?;
    let pool_before = pool.snapshot();

    let index = pool
        .find_best_fit(target_prefix)
        .ok_or(PlanError::InsufficientSpace {
            label: requirement.label,
            hosts: requirement.host_count,
            prefix: target_prefix,
        })?;
    let parent_block = pool.fragments()[index].block();

    let (all_child_blocks, chosen_child_index) = if parent_block.prefix == target_prefix {
        let block = pool.consume(index);
        (BlockRun::single(block), 0)
    } else {
        let children = pool.subdivide(index, target_prefix);
        let chosen = match strategy {
            Strategy::First => 0,
            Strategy::Last => children.len() - 1,
        };
        pool.reinsert(children, chosen);
        (children, chosen)
    };
    pool.reorder();

    Ok(AllocationStep {
        requirement,
        parent_block,
        parent_prefix: parent_block.prefix,
        target_prefix,
        pool_before,
        pool_after: pool.snapshot(),
        all_child_blocks,
        chosen_child_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> AddressBlock {
        s.parse().unwrap()
    }

    fn assigned(allocation: &Allocation) -> Vec<String> {
        allocation
            .results
            .iter()
            .map(|r| r.assigned_block.to_string())
            .collect()
    }

    #[test]
    fn test_allocate_first() {
        let allocation = allocate(block("192.168.1.0/24"), &[50, 30, 10], Strategy::First).unwrap();
        assert_eq!(
            assigned(&allocation),
            vec!["192.168.1.0/26", "192.168.1.64/27", "192.168.1.96/28"]
        );
        let usable: Vec<u64> = allocation.results.iter().map(|r| r.usable_host_count).collect();
        assert_eq!(usable, vec![62, 30, 14]);
    }

    #[test]
    fn test_allocate_last() {
        let allocation = allocate(block("192.168.1.0/24"), &[50, 30, 10], Strategy::Last).unwrap();
        assert_eq!(
            assigned(&allocation),
            vec!["192.168.1.192/26", "192.168.1.32/27", "192.168.1.16/28"]
        );
    }

    #[test]
    fn test_results_sorted_by_prefix_then_input_position() {
        let allocation = allocate(block("10.0.0.0/24"), &[10, 50, 12, 30], Strategy::First).unwrap();
        let order: Vec<(u8, usize)> = allocation
            .results
            .iter()
            .map(|r| (r.prefix(), r.requirement.original_index))
            .collect();
        assert_eq!(order, vec![(26, 1), (27, 3), (28, 0), (28, 2)]);
    }

    #[test]
    fn test_steps_in_processing_order() {
        let allocation = allocate(block("10.0.0.0/24"), &[10, 50, 10, 30], Strategy::First).unwrap();
        let labels: Vec<usize> = allocation.steps.iter().map(|s| s.requirement.label).collect();
        // equal host counts keep input order
        assert_eq!(labels, vec![2, 4, 1, 3]);

        let first = &allocation.steps[0];
        assert_eq!(first.parent_block, block("10.0.0.0/24"));
        assert_eq!(first.borrowed_bits(), 2);
        assert_eq!(first.all_child_blocks.len(), 4);
        assert_eq!(first.chosen_child_index, 0);
        assert_eq!(first.pool_before.len(), 1);
        assert_eq!(first.pool_after.len(), 1);
        assert_eq!(first.pool_after[0].run.count, 3);
    }

    #[test]
    fn test_exact_fit_consumes_without_split() {
        let allocation = allocate(block("10.0.0.0/26"), &[60], Strategy::Last).unwrap();
        let step = &allocation.steps[0];
        assert!(!step.was_split());
        assert_eq!(step.all_child_blocks.len(), 1);
        assert_eq!(step.assigned_block(), block("10.0.0.0/26"));
        assert!(allocation.free_blocks().is_empty());
        assert_eq!(allocation.pool.len(), 1);
        assert!(allocation.pool[0].used);
    }

    #[test]
    fn test_insufficient_space() {
        let err = allocate(block("192.168.1.0/30"), &[100], Strategy::First).unwrap_err();
        assert_eq!(
            err,
            PlanError::InsufficientSpace {
                label: 1,
                hosts: 100,
                prefix: 25
            }
        );
    }

    #[test]
    fn test_insufficient_space_after_partial_fill() {
        let err = allocate(block("10.0.0.0/24"), &[120, 120, 2], Strategy::First).unwrap_err();
        assert!(matches!(err, PlanError::InsufficientSpace { label: 3, .. }));
    }

    #[test]
    fn test_invalid_entries_discarded() {
        let allocation = allocate(block("10.0.0.0/24"), &[0, -5, 20], Strategy::First).unwrap();
        assert_eq!(allocation.results.len(), 1);
        assert_eq!(allocation.results[0].requirement.host_count, 20);
        assert_eq!(allocation.results[0].requirement.original_index, 2);
        assert_eq!(allocation.results[0].assigned_block, block("10.0.0.0/27"));
    }

    #[test]
    fn test_invalid_base_network() {
        let base = AddressBlock { addr: 0, prefix: 31 };
        assert!(matches!(
            allocate(base, &[2], Strategy::First),
            Err(PlanError::InvalidBaseNetwork { .. })
        ));
        let base = AddressBlock { addr: 0, prefix: 0 };
        assert!(matches!(
            allocate(base, &[2], Strategy::First),
            Err(PlanError::InvalidBaseNetwork { .. })
        ));
    }

    #[test]
    fn test_unaligned_base_is_normalised() {
        let base = AddressBlock {
            addr: 0xC0A80105,
            prefix: 24,
        };
        let allocation = allocate(base, &[10], Strategy::First).unwrap();
        assert_eq!(allocation.base, block("192.168.1.0/24"));
        let result = &allocation.results[0];
        assert_eq!(result.assigned_block, block("192.168.1.0/28"));
        assert_eq!(result.network_address.to_string(), "192.168.1.0");
        assert_eq!(result.broadcast.to_string(), "192.168.1.15");
        assert_eq!(result.first_usable.to_string(), "192.168.1.1");
        assert_eq!(result.last_usable.to_string(), "192.168.1.14");
    }

    #[test]
    fn test_allocate_requirements_checks_base() {
        let requirement = Requirement {
            host_count: 2,
            original_index: 0,
            label: 1,
        };
        let base = AddressBlock { addr: 0, prefix: 31 };
        assert!(matches!(
            allocate_requirements(base, &[requirement], Strategy::First),
            Err(PlanError::InvalidBaseNetwork { .. })
        ));

        let base = AddressBlock {
            addr: 0x0A000042,
            prefix: 26,
        };
        let allocation = allocate_requirements(base, &[requirement], Strategy::Last).unwrap();
        assert_eq!(allocation.results[0].assigned_block, block("10.0.0.124/30"));
    }

    #[test]
    fn test_no_valid_requirements() {
        assert_eq!(
            allocate(block("10.0.0.0/24"), &[0, -1], Strategy::First).unwrap_err(),
            PlanError::NoValidRequirements
        );
    }

    #[test]
    fn test_unsatisfiable_host_count() {
        assert_eq!(
            allocate(block("0.0.0.0/1"), &[1 << 31], Strategy::First).unwrap_err(),
            PlanError::UnsatisfiableHostCount { hosts: 1 << 31 }
        );
    }

    #[test]
    fn test_huge_split_stays_cheap() {
        let allocation = allocate(block("0.0.0.0/1"), &[2, 2], Strategy::Last).unwrap();
        assert_eq!(
            assigned(&allocation),
            vec!["127.255.255.252/30", "0.0.0.0/30"]
        );
        assert_eq!(allocation.steps[0].all_child_blocks.len(), 1 << 29);
    }

    #[test]
    fn test_last_strategy_second_step_uses_sibling_size() {
        // Second requirement lands in the lowest free /26, not in a larger block
        let allocation = allocate(block("10.0.0.0/24"), &[60, 10], Strategy::Last).unwrap();
        assert_eq!(assigned(&allocation), vec!["10.0.0.192/26", "10.0.0.48/28"]);
    }
}
