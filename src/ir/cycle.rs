//! Cycle detection over the targets reachable from a goal.

use std::collections::HashMap;

use super::TargetSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Search the graph reachable from `root` for a prerequisite cycle.
///
/// Tokens that do not name a target are file prerequisites and end the walk
/// along that edge.
pub(super) fn find_cycle(targets: &TargetSet, root: &str) -> Option<Vec<String>> {
    CycleDetector::new(targets).visit(root)
}

struct CycleDetector<'a> {
    targets: &'a TargetSet,
    stack: Vec<&'a str>,
    states: HashMap<&'a str, VisitState>,
}

impl<'a> CycleDetector<'a> {
    fn new(targets: &'a TargetSet) -> Self {
        Self {
            targets,
            stack: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn visit(&mut self, key: &'a str) -> Option<Vec<String>> {
        match self.states.get(key) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => {
                let idx = self.stack.iter().position(|k| *k == key).unwrap_or(0);
                let mut cycle: Vec<String> = self
                    .stack
                    .iter()
                    .skip(idx)
                    .map(|k| (*k).to_owned())
                    .collect();
                cycle.push(key.to_owned());
                return Some(canonicalize_cycle(cycle));
            }
            None => {
                self.states.insert(key, VisitState::Visiting);
            }
        }

        self.stack.push(key);
        let targets = self.targets;
        if let Some(target) = targets.get(key) {
            for dep in &target.prerequisites {
                if !targets.contains(dep) {
                    continue;
                }
                if let Some(cycle) = self.visit(dep) {
                    return Some(cycle);
                }
            }
        }
        self.stack.pop();
        self.states.insert(key, VisitState::Visited);
        None
    }
}

/// Rotate a closed cycle so it starts at its smallest key.
fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        *slot = first;
    }
    cycle
}
