//! PVP battle session: graph wiring, signal application, frame stepping.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use tracing::{debug, info, warn};

use battle_core::{
    BattleConfig, BattleContext, BattleStateGraph, CardId, CardIntent, CardSelectPhase,
    CombatPhase, CombatRole, CombatantId, ComboPhase, ConnectPhase, DefeatPhase, DiscardPolicy,
    DrawSink, ExecutionPhase, Field, Intent, IntentHandler, IntentKind, InputFlags, MoveIntent,
    NetSignal, PhaseKind, PriorityClass, RewardPhase, Team, TimeFreezePhase,
    connection_established,
};

use crate::error::SessionError;

/// Session-level configuration injected at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub battle: BattleConfig,
    /// Cards whose use freezes time for the rest of the field.
    pub time_freeze_cards: BTreeSet<CardId>,
    pub player_health: i32,
    pub remote_health: i32,
}

impl SessionConfig {
    pub const DEFAULT_HEALTH: i32 = 1000;
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::pvp(),
            time_freeze_cards: BTreeSet::new(),
            player_health: Self::DEFAULT_HEALTH,
            remote_health: Self::DEFAULT_HEALTH,
        }
    }
}

/// Read-only outbound snapshot the synchronization layer polls once per
/// frame to decide what to transmit. The session never calls transport
/// functions itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutboundReport {
    pub player_won: bool,
    pub player_lost: bool,
    pub has_time_freeze: bool,
    pub health: i32,
    /// The handshake should be (re)sent this frame.
    pub resync: bool,
}

/// An intent the queue ran through a lifecycle phase, recorded for the
/// presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutedIntent {
    pub combatant: CombatantId,
    pub intent: Intent,
    pub phase: ExecutionPhase,
}

/// Handler registered for every kind on every combatant's queue: records
/// executions into the session's shared outbox so animation/audio layers can
/// replay them.
struct RecordingHandler {
    combatant: CombatantId,
    outbox: Rc<RefCell<Vec<ExecutedIntent>>>,
}

impl IntentHandler for RecordingHandler {
    fn execute(&mut self, intent: &Intent, phase: ExecutionPhase) {
        self.outbox.borrow_mut().push(ExecutedIntent {
            combatant: self.combatant,
            intent: *intent,
            phase,
        });
    }
}

/// One networked battle from connect to battle-over.
///
/// Owns the authoritative [`BattleContext`] and the state graph. Per frame:
/// queued signals are applied first, then the graph advances once, then the
/// outbound report is produced.
pub struct BattleSession {
    graph: BattleStateGraph,
    ctx: BattleContext,
    remote_id: Option<CombatantId>,
    inbox: VecDeque<NetSignal>,
    outbox: Rc<RefCell<Vec<ExecutedIntent>>>,
    config: SessionConfig,
}

impl BattleSession {
    pub fn new(config: SessionConfig) -> Self {
        let outbox = Rc::new(RefCell::new(Vec::new()));

        let mut field = Field::new();
        let primary = field.spawn(Team::Red, CombatRole::Fighter, config.player_health);
        register_all_kinds(
            &mut field.combatant_mut(primary).expect("just spawned").queue,
            primary,
            &outbox,
        );

        let mut ctx = BattleContext::new(field, primary);

        let mut combat = CombatPhase::new(&config.battle);
        combat.register_subcombat(PhaseKind::TimeFreeze);

        // States first, then transitions in order of priority.
        let mut graph = BattleStateGraph::new();
        let connect = graph.add_state(ConnectPhase::new());
        let card_select = graph.add_state(CardSelectPhase::new());
        let combo = graph.add_state(ComboPhase::new(&config.battle));
        let combat = graph.add_state(combat);
        let time_freeze = graph.add_state(TimeFreezePhase::new(&config.battle));
        let reward = graph.add_state(RewardPhase::new());
        let defeat = graph.add_state(DefeatPhase::new());

        graph.add_edge(connect, card_select, connection_established);
        graph.add_edge(card_select, combo, |ctx| ctx.cards_confirmed);
        graph.add_edge(combo, combat, |ctx| {
            ctx.combo_done && ctx.local_ready && ctx.remote.ready
        });
        graph.add_edge(combat, reward, BattleContext::player_won);
        graph.add_edge(combat, defeat, BattleContext::player_lost);
        graph.add_edge(combat, card_select, |ctx| ctx.card_select_requested);
        graph.add_edge(combat, time_freeze, BattleContext::has_time_freeze);
        graph.add_edge(time_freeze, combat, |ctx| ctx.freeze_over);

        graph.start(connect, &mut ctx);

        Self {
            graph,
            ctx,
            remote_id: None,
            inbox: VecDeque::new(),
            outbox,
            config,
        }
    }

    /// Deposits a validated signal for the next frame step.
    pub fn queue_signal(&mut self, signal: NetSignal) {
        self.inbox.push_back(signal);
    }

    /// Advances one frame: applies queued signals, steps the graph, and
    /// produces the outbound snapshot.
    pub fn advance(&mut self, dt: f64, input: InputFlags) -> OutboundReport {
        self.ctx.input = input;
        self.apply_inbox();

        // While resyncing we (re)announce readiness; the transport resends
        // the handshake based on the report.
        if self.ctx.resync && !self.ctx.local_ready {
            debug!("announcing local ready");
            self.ctx.local_ready = true;
        }

        // The transition into the freeze consumes the flag this same frame;
        // snapshot it first so the announcement still goes out.
        let has_time_freeze = self.ctx.has_time_freeze();

        self.graph.tick(&mut self.ctx, dt);

        for event in self.ctx.events.drain(..) {
            debug!(?event, "battle event");
        }

        OutboundReport {
            player_won: self.ctx.player_won(),
            player_lost: self.ctx.player_lost(),
            has_time_freeze,
            health: self.ctx.primary_health(),
            resync: self.ctx.resync,
        }
    }

    /// Local card use, mirrored to the primary combatant's queue.
    pub fn use_card(&mut self, card: CardId, timestamp: u64) -> Result<(), SessionError> {
        if self.ctx.battle_over {
            return Err(SessionError::BattleOver);
        }

        let primary = self.ctx.primary;
        self.queue_for(primary, CardIntent { card, timestamp }.into())?;

        if self.config.time_freeze_cards.contains(&card) && !self.ctx.round_cleared() {
            self.ctx.time_freeze = true;
        }
        Ok(())
    }

    /// Queues any local intent on the primary combatant with an explicit
    /// priority and discard policy.
    pub fn queue_intent(
        &mut self,
        intent: Intent,
        priority: PriorityClass,
        discard: DiscardPolicy,
    ) -> Result<(), SessionError> {
        if self.ctx.battle_over {
            return Err(SessionError::BattleOver);
        }

        let primary = self.ctx.primary;
        let combatant = self
            .ctx
            .field
            .combatant_mut(primary)
            .expect("primary combatant is never removed");
        combatant.queue.add(intent, priority, discard)?;
        Ok(())
    }

    /// Draw pass for the active phase; the sink is handed through unmodified.
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.graph.draw(&self.ctx, sink);
    }

    /// Intents the queues executed since the last drain, in order.
    pub fn drain_executed(&mut self) -> Vec<ExecutedIntent> {
        self.outbox.borrow_mut().drain(..).collect()
    }

    pub fn active_phase(&self) -> Option<PhaseKind> {
        self.graph.active_kind()
    }

    pub fn is_over(&self) -> bool {
        self.ctx.battle_over || self.graph.active_is_terminal()
    }

    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    /// The hosting scene may mutate shared battle data directly (damage,
    /// combo counters); it owns the session.
    pub fn context_mut(&mut self) -> &mut BattleContext {
        &mut self.ctx
    }

    pub fn remote_id(&self) -> Option<CombatantId> {
        self.remote_id
    }

    fn apply_inbox(&mut self) {
        while let Some(signal) = self.inbox.pop_front() {
            self.apply_signal(signal);
        }
    }

    fn apply_signal(&mut self, signal: NetSignal) {
        // Guard clauses mirror the wire protocol: most signals are
        // meaningless (and dropped) before a connection exists.
        match signal {
            NetSignal::RemoteConnected(navi) => {
                if self.ctx.remote.connected {
                    debug!(?navi, "duplicate connect ignored");
                    return;
                }

                let id =
                    self.ctx
                        .field
                        .spawn(Team::Blue, CombatRole::Fighter, self.config.remote_health);
                register_all_kinds(
                    &mut self
                        .ctx
                        .field
                        .combatant_mut(id)
                        .expect("just spawned")
                        .queue,
                    id,
                    &self.outbox,
                );

                self.ctx.remote.connected = true;
                self.ctx.remote.navi = Some(navi);
                self.ctx.remote.health = self.config.remote_health;
                self.remote_id = Some(id);
                info!(?navi, combatant = ?id, "remote connected");
            }
            NetSignal::RemoteReady => {
                self.ctx.remote.ready = true;
                debug!("remote ready");
            }
            NetSignal::RemoteHealth(health) => {
                if !self.guard_connected("health") {
                    return;
                }
                self.ctx.remote.health = health;
                if let Some(id) = self.remote_id
                    && let Some(combatant) = self.ctx.field.combatant_mut(id)
                {
                    combatant.health = health;
                }
            }
            NetSignal::RemoteDirection(direction) => {
                if !self.guard_connected("direction") {
                    return;
                }
                self.ctx.remote.direction = direction;
                if let Some(id) = self.remote_id {
                    // Replicated movement is discardable input, not a commitment.
                    if let Err(error) = self.queue_for_id(
                        id,
                        MoveIntent { direction }.into(),
                        PriorityClass::Voluntary,
                        DiscardPolicy::UntilEndOfFrame,
                    ) {
                        warn!(%error, "dropping replicated movement");
                    }
                }
            }
            NetSignal::RemoteFormSelect(form) => {
                if !self.guard_connected("form select") {
                    return;
                }
                self.ctx.remote.selected_form = (form >= 0).then_some(form);
                debug!(form, "remote form select");
            }
            NetSignal::RemoteCardUse { card, timestamp } => {
                if !self.guard_connected("card use") {
                    return;
                }
                if let Some(id) = self.remote_id {
                    if let Err(error) = self.queue_for_id(
                        id,
                        CardIntent { card, timestamp }.into(),
                        PriorityClass::Voluntary,
                        DiscardPolicy::UntilResolved,
                    ) {
                        warn!(%error, "dropping replicated card use");
                    }
                }
                if self.config.time_freeze_cards.contains(&card) && !self.ctx.round_cleared() {
                    self.ctx.time_freeze = true;
                }
                debug!(?card, timestamp, "remote card use");
            }
            NetSignal::RemoteLoser => {
                if !self.guard_connected("loser") {
                    return;
                }
                self.ctx.remote.lost = true;
                if let Some(id) = self.remote_id.take() {
                    self.ctx.field.remove(id);
                }
                info!("remote reports defeat");
            }
        }
    }

    fn guard_connected(&self, what: &str) -> bool {
        if !self.ctx.remote.connected {
            warn!("dropping remote {what} signal before connection");
        }
        self.ctx.remote.connected
    }

    fn queue_for(&mut self, id: CombatantId, intent: Intent) -> Result<(), SessionError> {
        self.queue_for_id(
            id,
            intent,
            PriorityClass::Voluntary,
            DiscardPolicy::UntilResolved,
        )
    }

    fn queue_for_id(
        &mut self,
        id: CombatantId,
        intent: Intent,
        priority: PriorityClass,
        discard: DiscardPolicy,
    ) -> Result<(), SessionError> {
        let Some(combatant) = self.ctx.field.combatant_mut(id) else {
            // Removed mid-frame (defeat); nothing left to queue onto.
            return Ok(());
        };
        combatant.queue.add(intent, priority, discard)?;
        Ok(())
    }
}

/// Binds the full registered-kinds table on one combatant's queue.
fn register_all_kinds(
    queue: &mut battle_core::ActionQueue,
    combatant: CombatantId,
    outbox: &Rc<RefCell<Vec<ExecutedIntent>>>,
) {
    for kind in [
        IntentKind::Movement,
        IntentKind::CardUse,
        IntentKind::SpecialAbility,
        IntentKind::BusterShot,
        IntentKind::PeekCard,
    ] {
        queue
            .register(
                kind,
                RecordingHandler {
                    combatant,
                    outbox: Rc::clone(outbox),
                },
            )
            .expect("kinds are registered once per queue");
    }
}
