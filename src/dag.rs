//! Constraint dependency graph and level scheduling.
//!
//! Each constraint is a node. A node depends on the nodes that resolve the
//! wires it reads. Nodes are grouped into levels such that every node's
//! parents live in strictly earlier levels; nodes of a level are independent
//! and can be solved in parallel. Each level is then packed into tasks of
//! bounded cumulative weight, so that workers receive comparable chunks.

use crate::config::SchedulerConfig;
use crate::r1cs::{CompiledR1cs, HintInput};

use ark_ff::PrimeField;
use std::time::Instant;
use tracing::{debug, info};

/// Weight added per hint input and output.
const HINT_WEIGHT: usize = 10;
/// Weight added when a constraint has to solve for a wire.
const SOLVE_WEIGHT: usize = 20;
const UNRESOLVED: usize = usize::MAX;

/// A group of nodes solved sequentially by one worker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Task {
    /// Constraint ids, in solving order.
    pub nodes: Vec<usize>,
    /// Sum of node weights.
    pub weight: usize,
}

/// Independent tasks that may run concurrently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    /// Tasks of the level.
    pub tasks: Vec<Task>,
}

impl Level {
    /// Iterates over every node of the level.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.tasks.iter().flat_map(|t| t.nodes.iter().copied())
    }
}

/// Ordered levels covering every constraint exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<Level>,
    level_of: Vec<usize>,
}

impl Levels {
    /// The levels, in execution order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of scheduled nodes.
    pub fn num_nodes(&self) -> usize {
        self.level_of.len()
    }

    /// Level index of a constraint.
    pub fn level_of(&self, node: usize) -> usize {
        self.level_of[node]
    }

    /// Iterates over the levels.
    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }
}

impl<'a> IntoIterator for &'a Levels {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

/// Arena of nodes indexed by constraint id.
#[derive(Debug, Default)]
struct Dag {
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    visited: Vec<usize>,
}

impl Dag {
    fn with_capacity(n: usize) -> Self {
        Self {
            parents: Vec::with_capacity(n),
            children: Vec::with_capacity(n),
            visited: Vec::with_capacity(n),
        }
    }

    fn len(&self) -> usize {
        self.parents.len()
    }

    /// Adds the next node with the given parents, which must be sorted in
    /// decreasing order without duplicates.
    fn add_node(&mut self, mut parents: Vec<usize>, reduce: bool) -> usize {
        let node = self.len();
        if reduce && parents.len() > 1 {
            self.reduce_parents(node, &mut parents);
        }
        for &p in &parents {
            self.children[p].push(node);
        }
        self.parents.push(parents);
        self.children.push(Vec::new());
        self.visited.push(0);
        node
    }

    /// Drops every parent that is an ancestor of another parent.
    fn reduce_parents(&mut self, node: usize, parents: &mut Vec<usize>) {
        let stamp = node + 1;
        let mut i = 0;
        while i < parents.len() {
            let mut rest = parents.split_off(i + 1);
            self.remove_ancestors(parents[i], &mut rest, stamp);
            parents.append(&mut rest);
            i += 1;
        }
    }

    /// Removes from `set` every ancestor of `start`. `set` is sorted in
    /// decreasing order; ancestors older than its minimum are not explored.
    fn remove_ancestors(&mut self, start: usize, set: &mut Vec<usize>, stamp: usize) {
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            for j in 0..self.parents[n].len() {
                let Some(&min) = set.last() else {
                    return;
                };
                let p = self.parents[n][j];
                if self.visited[p] == stamp {
                    continue;
                }
                self.visited[p] = stamp;
                if p < min {
                    continue;
                }
                if let Some(pos) = set.iter().position(|&s| s == p) {
                    set.remove(pos);
                }
                stack.push(p);
            }
        }
    }

    /// Frontier sweep: level 0 holds the parentless nodes, level k the nodes
    /// whose parents are all in levels below k.
    fn levels(&self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut solved = vec![false; n];
        let mut visited = vec![usize::MAX; n];
        let mut levels: Vec<Vec<usize>> = Vec::new();
        let mut current = Vec::new();
        let mut next = Vec::new();

        let entry: Vec<usize> = (0..n).filter(|&i| self.parents[i].is_empty()).collect();
        for &node in &entry {
            solved[node] = true;
            current.extend_from_slice(&self.children[node]);
        }
        if !entry.is_empty() {
            levels.push(entry);
        }

        let mut level = 0;
        while !current.is_empty() {
            level += 1;
            let mut members = Vec::new();
            next.clear();
            for &node in &current {
                if visited[node] == level || solved[node] {
                    continue;
                }
                visited[node] = level;
                if self.parents[node].iter().any(|&p| !solved[p]) {
                    next.push(node);
                    continue;
                }
                members.push(node);
                next.extend_from_slice(&self.children[node]);
            }
            if members.is_empty() {
                panic!("constraint dependency graph has a cycle");
            }
            for &m in &members {
                solved[m] = true;
            }
            levels.push(members);
            std::mem::swap(&mut current, &mut next);
        }

        let placed: usize = levels.iter().map(Vec::len).sum();
        if placed != n {
            panic!(
                "level clustering placed {} of {} constraints; the dependency graph has a cycle",
                placed, n
            );
        }
        levels
    }
}

/// Builds the solving schedule of a compiled constraint system.
///
/// # Panics
///
/// Panics if a hint reads a non-input wire that is neither resolved by an
/// earlier constraint nor produced by another hint, if hints read each
/// other's outputs in a cycle, or if the dependency graph has a cycle. All
/// indicate a malformed compiler output.
pub fn build_levels<F: PrimeField>(cs: &CompiledR1cs<F>, config: &SchedulerConfig) -> Levels {
    let start = Instant::now();
    let n = cs.num_constraints();
    let num_inputs = cs.num_inputs();
    let max_weight = config.max_task_weight;

    let mut dag = Dag::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    let mut custom = Vec::with_capacity(n);
    let mut resolved_by = vec![UNRESOLVED; cs.num_wires()];

    let mut pending = Vec::new();
    for (node, c) in cs.constraints().iter().enumerate() {
        let mut cost = NodeCost::default();

        for t in c.terms() {
            let w = t.wire();
            cost.weight += 1;
            if w < num_inputs {
                continue;
            }
            let r = resolved_by[w];
            if r != UNRESOLVED {
                if r != node {
                    cost.deps.push(r);
                }
                continue;
            }
            if let Some((hid, _)) = cs.hint_for_wire(w) {
                resolve_hint(cs, hid, node, &mut resolved_by, &mut pending, &mut cost);
                continue;
            }
            cost.weight += SOLVE_WEIGHT;
            resolved_by[w] = node;
        }

        let NodeCost {
            mut deps,
            mut weight,
            has_custom_hint,
        } = cost;
        if has_custom_hint {
            weight = weight.max(max_weight);
        }
        deps.sort_unstable_by(|a, b| b.cmp(a));
        deps.dedup();
        dag.add_node(deps, config.reduce_transitive_edges);
        weights.push(weight);
        custom.push(has_custom_hint);
    }

    let raw = dag.levels();
    let mut level_of = vec![0; n];
    let mut levels = Vec::with_capacity(raw.len());
    for (idx, members) in raw.into_iter().enumerate() {
        for &node in &members {
            level_of[node] = idx;
        }
        let level = pack(members, &weights, &custom, max_weight);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let max = level.tasks.iter().map(|t| t.weight).max().unwrap_or(0);
            let total: usize = level.tasks.iter().map(|t| t.weight).sum();
            debug!(
                level = idx,
                tasks = level.tasks.len(),
                max_weight = max,
                avg_weight = total / level.tasks.len().max(1),
                "packed level"
            );
        }
        levels.push(level);
    }

    info!(
        constraints = n,
        levels = levels.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "built constraint levels"
    );

    Levels { levels, level_of }
}

#[derive(Default)]
struct NodeCost {
    deps: Vec<usize>,
    weight: usize,
    has_custom_hint: bool,
}

/// Marks the outputs of hint `hid` as resolved by `node`. Hints whose outputs
/// it reads and that no earlier node resolved are resolved by `node` first.
fn resolve_hint<F: PrimeField>(
    cs: &CompiledR1cs<F>,
    hid: usize,
    node: usize,
    resolved_by: &mut [usize],
    pending: &mut Vec<usize>,
    cost: &mut NodeCost,
) {
    let hint = &cs.hints()[hid];
    let first = hint.wires[0];
    if pending.contains(&hid) {
        panic!("hint for wire {} reads its own outputs through other hints", first);
    }
    pending.push(hid);

    cost.weight += (hint.inputs.len() + hint.wires.len()) * HINT_WEIGHT;
    cost.has_custom_hint |= hint.kind.is_custom();
    for input in &hint.inputs {
        let HintInput::WireReference(le) = input else {
            continue;
        };
        for t in le {
            let iw = t.wire();
            if iw < cs.num_inputs() {
                continue;
            }
            match resolved_by[iw] {
                UNRESOLVED => match cs.hint_for_wire(iw) {
                    Some((dep, _)) => resolve_hint(cs, dep, node, resolved_by, pending, cost),
                    None => panic!(
                        "hint for wire {} reads wire {} before any constraint resolves it",
                        first, iw
                    ),
                },
                r if r != node => cost.deps.push(r),
                _ => {}
            }
        }
    }
    for &hw in &hint.wires {
        resolved_by[hw] = node;
    }
    pending.pop();
}

/// Packs a level's nodes, in order, into tasks. A task is closed once its
/// weight exceeds `max_weight`; nodes carrying a custom hint run alone.
fn pack(members: Vec<usize>, weights: &[usize], custom: &[bool], max_weight: usize) -> Level {
    let mut tasks = Vec::new();
    let mut task = Task::default();
    let mut task_is_custom = false;
    for node in members {
        let close = !task.nodes.is_empty()
            && (task.weight > max_weight || task_is_custom || custom[node]);
        if close {
            tasks.push(std::mem::take(&mut task));
        }
        task_is_custom = custom[node];
        task.weight += weights[node];
        task.nodes.push(node);
    }
    if !task.nodes.is_empty() {
        tasks.push(task);
    }
    Level { tasks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::{CoeffTable, Hint, HintKind, R1c, Term, COEFF_ONE};
    use ark_bn254::Fr;
    use proptest::prelude::*;

    fn mul(l: usize, r: usize, o: usize) -> R1c {
        R1c {
            l: vec![Term::new(COEFF_ONE, l)],
            r: vec![Term::new(COEFF_ONE, r)],
            o: vec![Term::new(COEFF_ONE, o)],
        }
    }

    fn compile(
        num_public: usize,
        num_secret: usize,
        num_internal: usize,
        constraints: Vec<R1c>,
        hints: Vec<Hint<Fr>>,
        config: &SchedulerConfig,
    ) -> CompiledR1cs<Fr> {
        CompiledR1cs::new(
            num_public,
            num_secret,
            num_internal,
            constraints,
            CoeffTable::<Fr>::new().into_values(),
            hints,
            config,
        )
        .unwrap()
    }

    /// Secret inputs at 1..=k, internal chain after them.
    fn chain(len: usize) -> Vec<R1c> {
        let x = 1;
        let first = 2;
        (0..len)
            .map(|i| {
                let input = if i == 0 { x } else { first + i - 1 };
                mul(input, 0, first + i)
            })
            .collect()
    }

    fn assert_parents_in_earlier_levels(cs: &CompiledR1cs<Fr>) {
        let levels = cs.levels();
        let mut resolved_by = vec![UNRESOLVED; cs.num_wires()];
        for (node, c) in cs.constraints().iter().enumerate() {
            for t in c.terms() {
                let w = t.wire();
                if w < cs.num_inputs() {
                    continue;
                }
                match resolved_by[w] {
                    UNRESOLVED => resolved_by[w] = node,
                    p if p != node => assert!(levels.level_of(p) < levels.level_of(node)),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn independent_constraints_share_one_level() {
        // Four constraints over inputs only.
        let constraints = vec![mul(1, 2, 3), mul(2, 3, 4), mul(3, 4, 1), mul(4, 1, 2)];
        let cs = compile(1, 4, 0, constraints, vec![], &SchedulerConfig::default());
        let levels = cs.levels();
        assert_eq!(levels.num_levels(), 1);
        assert_eq!(levels.levels()[0].tasks.len(), 1);
        assert_eq!(levels.levels()[0].nodes().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(levels.levels()[0].tasks[0].weight, 12);
    }

    #[test]
    fn chain_gets_one_level_per_constraint() {
        let cs = compile(1, 1, 5, chain(5), vec![], &SchedulerConfig::default());
        let levels = cs.levels();
        assert_eq!(levels.num_levels(), 5);
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.nodes().collect::<Vec<_>>(), vec![i]);
        }
    }

    #[test]
    fn diamond_places_join_after_both_branches() {
        // x -> a ; a -> b ; a -> c ; (b, c) -> d
        let constraints = vec![mul(1, 0, 2), mul(2, 0, 3), mul(2, 0, 4), mul(3, 4, 5)];
        let cs = compile(1, 1, 4, constraints, vec![], &SchedulerConfig::default());
        let levels = cs.levels();
        assert_eq!(levels.num_levels(), 3);
        assert_eq!(levels.level_of(1), 1);
        assert_eq!(levels.level_of(2), 1);
        assert_eq!(levels.level_of(3), 2);
    }

    #[test]
    fn transitive_reduction_keeps_levels_valid() {
        // node 2 reads wires of node 0 and node 1, and node 1 depends on node 0.
        let constraints = vec![mul(1, 0, 2), mul(2, 0, 3), mul(2, 3, 4)];
        for reduce in [false, true] {
            let config = SchedulerConfig {
                reduce_transitive_edges: reduce,
                ..SchedulerConfig::default()
            };
            let cs = compile(1, 1, 3, constraints.clone(), vec![], &config);
            assert_eq!(cs.levels().num_levels(), 3);
            assert_parents_in_earlier_levels(&cs);
        }
    }

    #[test]
    fn hint_outputs_are_resolved_by_first_reader() {
        // wire 2 = x², wire 3 = IsZero(x) via hint, read by constraint 1 and 2.
        let hint = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 1)])],
            wires: vec![3],
        };
        let constraints = vec![mul(1, 1, 2), mul(3, 1, 4), mul(3, 4, 5)];
        let cs = compile(1, 1, 4, constraints, vec![hint], &SchedulerConfig::default());
        let levels = cs.levels();
        // Constraint 1 resolves the hint and wire 4; constraint 2 reads both.
        assert_eq!(levels.level_of(0), 0);
        assert_eq!(levels.level_of(1), 0);
        assert_eq!(levels.level_of(2), 1);
    }

    #[test]
    fn hint_reading_internal_wire_depends_on_its_resolver() {
        let hint = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 2)])],
            wires: vec![3],
        };
        let constraints = vec![mul(1, 1, 2), mul(3, 0, 3)];
        let cs = compile(1, 1, 2, constraints, vec![hint], &SchedulerConfig::default());
        assert_eq!(cs.levels().level_of(1), 1);
    }

    #[test]
    #[should_panic(expected = "before any constraint resolves it")]
    fn hint_reading_unresolved_wire_panics() {
        let hint = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 3)])],
            wires: vec![2],
        };
        let constraints = vec![mul(2, 1, 1), mul(1, 1, 3)];
        compile(1, 1, 2, constraints, vec![hint], &SchedulerConfig::default());
    }

    /// y = Custom(1)(x), z = IsZero(y); constraint 0 reads y and z in the given order.
    fn chained_hints(first: usize, second: usize) -> CompiledR1cs<Fr> {
        let y = Hint {
            kind: HintKind::Custom(1),
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 1)])],
            wires: vec![2],
        };
        let z = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 2)])],
            wires: vec![3],
        };
        let constraints = vec![mul(first, second, 4), mul(1, 2, 0)];
        compile(1, 1, 3, constraints, vec![y, z], &SchedulerConfig::default())
    }

    #[test]
    fn hint_reading_another_hint_resolves_both_in_one_node() {
        for (first, second) in [(2, 3), (3, 2)] {
            let cs = chained_hints(first, second);
            let levels = cs.levels();
            assert_eq!(levels.num_levels(), 2);
            assert_eq!(levels.level_of(0), 0);
            assert_eq!(levels.level_of(1), 1);
            // Both hints are folded into node 0, which carries a custom hint.
            assert_eq!(levels.levels()[0].tasks[0].weight, SchedulerConfig::DEFAULT_MAX_TASK_WEIGHT);
        }
    }

    #[test]
    #[should_panic(expected = "reads its own outputs")]
    fn hints_reading_each_other_panic() {
        let a = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 3)])],
            wires: vec![2],
        };
        let b = Hint {
            kind: HintKind::IsZero,
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 2)])],
            wires: vec![3],
        };
        let constraints = vec![mul(2, 3, 1)];
        compile(1, 1, 2, constraints, vec![a, b], &SchedulerConfig::default());
    }

    #[test]
    fn custom_hint_nodes_run_alone() {
        let hint = Hint {
            kind: HintKind::Custom(7),
            inputs: vec![HintInput::WireReference(vec![Term::new(COEFF_ONE, 1)])],
            wires: vec![3],
        };
        let constraints = vec![mul(1, 2, 1), mul(3, 0, 1), mul(2, 2, 2)];
        let cs = compile(1, 2, 1, constraints, vec![hint], &SchedulerConfig::default());
        let level = &cs.levels().levels()[0];
        assert_eq!(level.tasks.len(), 3);
        assert_eq!(level.tasks[1].nodes, vec![1]);
        assert!(level.tasks[1].weight >= SchedulerConfig::DEFAULT_MAX_TASK_WEIGHT);
    }

    #[test]
    fn small_weight_bound_splits_level() {
        let config = SchedulerConfig {
            max_task_weight: 3,
            ..SchedulerConfig::default()
        };
        let constraints = vec![mul(1, 2, 3), mul(2, 3, 4), mul(3, 4, 1), mul(4, 1, 2)];
        let cs = compile(1, 4, 0, constraints, vec![], &config);
        let level = &cs.levels().levels()[0];
        // Each node weighs 3: a task closes once it exceeds 3, i.e. after two nodes.
        assert_eq!(level.tasks.len(), 2);
        assert!(level.tasks.iter().all(|t| t.weight == 6));
    }

    fn random_system() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        // Each internal wire i is defined from two earlier wires.
        (1usize..4, 1usize..40).prop_flat_map(|(inputs, len)| {
            let picks: Vec<_> = (0..len)
                .map(|i| (0..inputs + 1 + i, 0..inputs + 1 + i))
                .collect();
            (Just(inputs), picks)
        })
    }

    fn build_random(inputs: usize, picks: &[(usize, usize)], config: &SchedulerConfig) -> CompiledR1cs<Fr> {
        // Secret inputs at 1..=inputs; internal wire i at inputs + 1 + i.
        let mut constraints: Vec<R1c> = picks
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| mul(a, b, inputs + 1 + i))
            .collect();
        for x in 1..=inputs {
            constraints.push(mul(x, 0, x));
        }
        compile(1, inputs, picks.len(), constraints, vec![], config)
    }

    proptest! {
        #[test]
        fn parents_always_precede_children((inputs, picks) in random_system(), reduce in any::<bool>()) {
            let config = SchedulerConfig { reduce_transitive_edges: reduce, ..SchedulerConfig::default() };
            let cs = build_random(inputs, &picks, &config);
            let levels = cs.levels();
            prop_assert_eq!(levels.num_nodes(), cs.num_constraints());
            let total: usize = levels.iter().map(|l| l.nodes().count()).sum();
            prop_assert_eq!(total, cs.num_constraints());
            assert_parents_in_earlier_levels(&cs);
        }

        #[test]
        fn leveling_is_deterministic((inputs, picks) in random_system()) {
            let config = SchedulerConfig::default();
            let a = build_random(inputs, &picks, &config);
            let b = build_random(inputs, &picks, &config);
            prop_assert_eq!(a.levels(), b.levels());
        }

        #[test]
        fn tasks_respect_weight_bound((inputs, picks) in random_system(), bound in 1usize..60) {
            let config = SchedulerConfig { max_task_weight: bound, ..SchedulerConfig::default() };
            let cs = build_random(inputs, &picks, &config);
            // Heaviest node: 3 terms plus one solved wire.
            let max_node = 3 + SOLVE_WEIGHT;
            for level in cs.levels() {
                for task in &level.tasks {
                    prop_assert!(!task.nodes.is_empty());
                    prop_assert!(task.weight <= bound + max_node);
                }
            }
        }
    }
}
