//! End-to-end battle flow over scripted signals.
//!
//! Drives a full PVP session the way a hosting scene would: deposit the
//! frame's validated signals, advance once, poll the outbound report.

use battle_core::{
    BattleConfig, BusterIntent, CardId, DiscardPolicy, ExecutionPhase, InputFlags, Intent,
    IntentKind, NaviId, NetSignal, PhaseKind, PriorityClass,
};
use session::{BattleSession, SessionConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_config() -> SessionConfig {
    SessionConfig {
        battle: BattleConfig {
            custom_duration: 10.0,
            combo_duration: 0.1,
            freeze_duration: 0.2,
            pausing_enabled: false,
        },
        time_freeze_cards: [CardId(7)].into_iter().collect(),
        ..SessionConfig::default()
    }
}

/// Drives a fresh session up to the combat phase.
fn session_in_combat() -> BattleSession {
    let mut session = BattleSession::new(test_config());

    session.queue_signal(NetSignal::RemoteConnected(NaviId(2)));
    session.queue_signal(NetSignal::RemoteReady);
    session.advance(1.0 / 60.0, InputFlags::empty());
    assert_eq!(session.active_phase(), Some(PhaseKind::CardSelect));

    session.advance(1.0 / 60.0, InputFlags::CONFIRM);
    assert_eq!(session.active_phase(), Some(PhaseKind::Combo));

    // Card selection forced a resync; the remote re-readies during combo.
    session.queue_signal(NetSignal::RemoteReady);
    session.advance(0.05, InputFlags::empty());
    session.advance(0.05, InputFlags::empty());
    assert_eq!(session.active_phase(), Some(PhaseKind::Combat));

    session
}

#[test]
fn connect_to_combat_to_reward() {
    init_tracing();
    let mut session = session_in_combat();

    // A few uneventful combat frames.
    for _ in 0..3 {
        let report = session.advance(1.0, InputFlags::empty());
        assert!(!report.player_won);
        assert!(!report.player_lost);
        assert_eq!(session.active_phase(), Some(PhaseKind::Combat));
    }

    session.queue_signal(NetSignal::RemoteLoser);
    let report = session.advance(1.0 / 60.0, InputFlags::empty());

    assert!(report.player_won);
    assert!(!report.player_lost);
    assert_eq!(session.active_phase(), Some(PhaseKind::Reward));
    assert!(session.is_over());
}

#[test]
fn primary_death_leads_to_defeat() {
    init_tracing();
    let mut session = session_in_combat();

    let primary = session.context().primary;
    session
        .context_mut()
        .field
        .combatant_mut(primary)
        .unwrap()
        .health = 0;

    let report = session.advance(1.0 / 60.0, InputFlags::empty());

    assert!(report.player_lost);
    assert_eq!(report.health, 0);
    assert_eq!(session.active_phase(), Some(PhaseKind::Defeat));
    assert!(session.is_over());
}

#[test]
fn time_freeze_interrupts_combat_without_resetting_the_gauge() {
    init_tracing();
    let mut session = session_in_combat();

    for _ in 0..3 {
        session.advance(1.0, InputFlags::empty());
    }

    session.use_card(CardId(7), 1234).unwrap();
    let report = session.advance(1.0 / 60.0, InputFlags::empty());
    assert!(report.has_time_freeze);
    assert_eq!(session.active_phase(), Some(PhaseKind::TimeFreeze));

    session.advance(0.2, InputFlags::empty());
    assert_eq!(session.active_phase(), Some(PhaseKind::Combat));
    assert!(!session.context().time_freeze);

    // Roughly three seconds elapsed before the freeze; seven more fill the
    // gauge because the nested interruption kept it.
    for _ in 0..7 {
        session.advance(1.0, InputFlags::empty());
    }
    assert!(session.context().gauge_full);
}

#[test]
fn full_gauge_and_menu_press_reopen_card_select() {
    init_tracing();
    let mut session = session_in_combat();

    for _ in 0..10 {
        session.advance(1.0, InputFlags::empty());
    }
    assert!(session.context().gauge_full);
    assert_eq!(session.active_phase(), Some(PhaseKind::Combat));

    session.advance(1.0 / 60.0, InputFlags::CUST_MENU);
    assert_eq!(session.active_phase(), Some(PhaseKind::CardSelect));
}

#[test]
fn signals_before_connection_are_dropped() {
    init_tracing();
    let mut session = BattleSession::new(test_config());

    session.queue_signal(NetSignal::RemoteHealth(500));
    session.queue_signal(NetSignal::RemoteDirection(battle_core::Direction::Left));
    session.advance(1.0 / 60.0, InputFlags::empty());

    assert!(!session.context().remote.connected);
    assert_eq!(session.remote_id(), None);
    assert_eq!(session.active_phase(), Some(PhaseKind::Connect));
}

#[test]
fn executed_intents_are_recorded_for_presentation() {
    init_tracing();
    let mut session = session_in_combat();

    session
        .queue_intent(
            Intent::BusterShot(BusterIntent { charged: false }),
            PriorityClass::Voluntary,
            DiscardPolicy::UntilResolved,
        )
        .unwrap();
    session.advance(1.0 / 60.0, InputFlags::empty());

    let executed = session.drain_executed();
    let primary = session.context().primary;
    assert!(executed.iter().any(|e| {
        e.combatant == primary
            && e.intent.kind() == IntentKind::BusterShot
            && e.phase == ExecutionPhase::Reserve
    }));
    assert!(
        executed
            .iter()
            .any(|e| e.phase == ExecutionPhase::Process && e.combatant == primary)
    );
}

#[test]
fn remote_card_use_replicates_onto_the_remote_queue() {
    init_tracing();
    let mut session = session_in_combat();

    session.queue_signal(NetSignal::RemoteCardUse {
        card: CardId(3),
        timestamp: 99,
    });
    session.advance(1.0 / 60.0, InputFlags::empty());

    let remote = session.remote_id().unwrap();
    let executed = session.drain_executed();
    assert!(
        executed
            .iter()
            .any(|e| e.combatant == remote && e.intent.kind() == IntentKind::CardUse)
    );
}
