//! Directed graph of battle phases.
//!
//! States are declared once, edges are declared in priority order per source
//! state, and the whole graph advances exactly once per frame: update the
//! active state, then walk its edges in declaration order and take the first
//! transition whose predicate holds. Given identical predicate truth-values
//! across frames, the visited state sequence is identical on repeated runs.

mod state;

pub use state::{BattleState, PhaseKind};

use crate::context::{BattleContext, DrawSink};

/// Index of a state in the graph's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(usize);

/// Guarded, priority-ranked link between two states. Priority rank is
/// declaration order.
struct Edge {
    from: StateId,
    to: StateId,
    predicate: Box<dyn Fn(&BattleContext) -> bool>,
}

/// Owns the battle's states and the currently active one.
#[derive(Default)]
pub struct BattleStateGraph {
    states: Vec<Box<dyn BattleState>>,
    edges: Vec<Edge>,
    active: Option<StateId>,
}

impl BattleStateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state to the graph and returns its id. States live for the
    /// whole battle session.
    pub fn add_state(&mut self, state: impl BattleState + 'static) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(Box::new(state));
        id
    }

    /// Declares a transition. Edges from the same source are evaluated in
    /// the order they were added; the first true predicate wins. Predicates
    /// must be pure and total over the context — a panic propagates.
    pub fn add_edge(
        &mut self,
        from: StateId,
        to: StateId,
        predicate: impl Fn(&BattleContext) -> bool + 'static,
    ) {
        self.edges.push(Edge {
            from,
            to,
            predicate: Box::new(predicate),
        });
    }

    /// Kicks off the graph at the designated entry state.
    pub fn start(&mut self, entry: StateId, ctx: &mut BattleContext) {
        debug_assert!(self.active.is_none(), "state graph already started");
        self.active = Some(entry);
        self.states[entry.0].on_start(ctx, None);
    }

    /// Advances one frame: update the active state, then resolve at most one
    /// transition.
    pub fn tick(&mut self, ctx: &mut BattleContext, dt: f64) {
        let Some(active) = self.active else {
            return;
        };

        self.states[active.0].on_update(ctx, dt);

        let next = self
            .edges
            .iter()
            .filter(|edge| edge.from == active)
            .find(|edge| (edge.predicate)(ctx))
            .map(|edge| edge.to);

        // A state reachable from itself is legal and a no-op.
        if let Some(next) = next
            && next != active
        {
            let previous_kind = self.states[active.0].kind();
            let next_kind = self.states[next.0].kind();

            self.states[active.0].on_end(ctx, next_kind);
            self.active = Some(next);
            self.states[next.0].on_start(ctx, Some(previous_kind));
        }
    }

    /// Draw pass for the active state. The sink is handed through unmodified.
    pub fn draw(&self, ctx: &BattleContext, sink: &mut dyn DrawSink) {
        if let Some(active) = self.active {
            self.states[active.0].on_draw(ctx, sink);
        }
    }

    pub fn active_kind(&self) -> Option<PhaseKind> {
        self.active.map(|id| self.states[id.0].kind())
    }

    pub fn active_is_terminal(&self) -> bool {
        self.active
            .is_some_and(|id| self.states[id.0].is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{CombatRole, Field, Team};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Lifecycle spy standing in for a real phase.
    struct SpyState {
        kind: PhaseKind,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SpyState {
        fn new(kind: PhaseKind, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                kind,
                log: Rc::clone(log),
            }
        }
    }

    impl BattleState for SpyState {
        fn kind(&self) -> PhaseKind {
            self.kind
        }

        fn on_start(&mut self, _ctx: &mut BattleContext, previous: Option<PhaseKind>) {
            self.log
                .borrow_mut()
                .push(format!("{}:start<{previous:?}", self.kind));
        }

        fn on_update(&mut self, _ctx: &mut BattleContext, _dt: f64) {
            self.log.borrow_mut().push(format!("{}:update", self.kind));
        }

        fn on_end(&mut self, _ctx: &mut BattleContext, next: PhaseKind) {
            self.log
                .borrow_mut()
                .push(format!("{}:end>{next}", self.kind));
        }
    }

    fn test_context() -> BattleContext {
        let mut field = Field::new();
        let primary = field.spawn(Team::Red, CombatRole::Fighter, 100);
        BattleContext::new(field, primary)
    }

    #[test]
    fn stays_until_predicate_fires_then_pairs_end_and_start() {
        // Intro holds for five frames of `connected == false`, then moves to
        // combat on the sixth with exactly one end/start pair.
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = BattleStateGraph::new();
        let intro = graph.add_state(SpyState::new(PhaseKind::Connect, &log));
        let combat = graph.add_state(SpyState::new(PhaseKind::Combat, &log));
        graph.add_edge(intro, combat, |ctx| ctx.remote.connected);

        let mut ctx = test_context();
        graph.start(intro, &mut ctx);

        for _ in 0..5 {
            graph.tick(&mut ctx, 1.0 / 60.0);
            assert_eq!(graph.active_kind(), Some(PhaseKind::Connect));
        }

        ctx.remote.connected = true;
        graph.tick(&mut ctx, 1.0 / 60.0);
        assert_eq!(graph.active_kind(), Some(PhaseKind::Combat));

        let entries = log.borrow();
        let ends: Vec<_> = entries.iter().filter(|e| e.contains(":end")).collect();
        let starts: Vec<_> = entries.iter().filter(|e| e.contains(":start")).collect();
        assert_eq!(ends, vec!["connect:end>combat"]);
        assert_eq!(
            starts,
            vec!["connect:start<None", "combat:start<Some(Connect)"]
        );
    }

    #[test]
    fn first_true_edge_wins_by_declaration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = BattleStateGraph::new();
        let a = graph.add_state(SpyState::new(PhaseKind::Combat, &log));
        let b = graph.add_state(SpyState::new(PhaseKind::Reward, &log));
        let c = graph.add_state(SpyState::new(PhaseKind::Defeat, &log));

        // Both predicates true: the earlier declaration must win.
        graph.add_edge(a, b, |_| true);
        graph.add_edge(a, c, |_| true);

        let mut ctx = test_context();
        graph.start(a, &mut ctx);
        graph.tick(&mut ctx, 0.0);

        assert_eq!(graph.active_kind(), Some(PhaseKind::Reward));
    }

    #[test]
    fn self_edge_is_a_no_op() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut graph = BattleStateGraph::new();
        let a = graph.add_state(SpyState::new(PhaseKind::Combat, &log));
        graph.add_edge(a, a, |_| true);

        let mut ctx = test_context();
        graph.start(a, &mut ctx);
        graph.tick(&mut ctx, 0.0);

        assert_eq!(graph.active_kind(), Some(PhaseKind::Combat));
        // One start from graph entry, no end.
        let entries = log.borrow();
        assert_eq!(entries.iter().filter(|e| e.contains(":end")).count(), 0);
        assert_eq!(entries.iter().filter(|e| e.contains(":start")).count(), 1);
    }

    #[test]
    fn visited_sequence_is_a_pure_function_of_predicate_values() {
        // Drive the same scripted truth-values twice and compare the visited
        // state sequences.
        let script = [false, false, true, false, true];

        let run = |script: &[bool]| -> Vec<Option<PhaseKind>> {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut graph = BattleStateGraph::new();
            let a = graph.add_state(SpyState::new(PhaseKind::CardSelect, &log));
            let b = graph.add_state(SpyState::new(PhaseKind::Combo, &log));
            graph.add_edge(a, b, |ctx| ctx.cards_confirmed);
            graph.add_edge(b, a, |ctx| !ctx.cards_confirmed);

            let mut ctx = test_context();
            graph.start(a, &mut ctx);

            script
                .iter()
                .map(|&value| {
                    ctx.cards_confirmed = value;
                    graph.tick(&mut ctx, 1.0 / 60.0);
                    graph.active_kind()
                })
                .collect()
        };

        assert_eq!(run(&script), run(&script));
    }
}
