//! Exhaustive subset enumeration for small pools.
//!
//! Every non-empty subset of up to `max_missions` missions is listed once,
//! in lexicographic order over positions. The caller maps positions back
//! to pool indices and hands each subset to the worker harness; at eight
//! missions and a five-stop budget that is a few hundred units, cheap
//! enough to evaluate outright.

/// Lists every non-empty subset of `0..pool` with at most `max_missions`
/// members.
pub(crate) fn enumerate_subsets(pool: usize, max_missions: usize) -> Vec<Vec<usize>> {
    let cap = pool.min(max_missions);
    let mut subsets = Vec::new();
    if cap == 0 {
        return subsets;
    }
    let mut stack = Vec::with_capacity(cap);
    extend(0, pool, cap, &mut stack, &mut subsets);
    subsets
}

fn extend(
    start: usize,
    pool: usize,
    cap: usize,
    stack: &mut Vec<usize>,
    subsets: &mut Vec<Vec<usize>>,
) {
    for position in start..pool {
        stack.push(position);
        subsets.push(stack.clone());
        if stack.len() < cap {
            extend(position + 1, pool, cap, stack, subsets);
        }
        stack.pop();
    }
}
