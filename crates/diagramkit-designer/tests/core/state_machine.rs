use diagramkit_designer::state_machine::is_legal;
use diagramkit_designer::{InteractionState, InteractionStateMachine};

#[test]
fn test_every_absent_edge_leaves_state_unchanged() {
    for from in InteractionState::ALL {
        for to in InteractionState::ALL {
            if is_legal(from, to) {
                continue;
            }
            let mut machine = InteractionStateMachine::default();
            if !from.is_idle() {
                machine.transition(from).unwrap();
            }
            assert!(machine.transition(to).is_err(), "{} -> {}", from, to);
            assert_eq!(machine.state(), from);
        }
    }
}

#[test]
fn test_every_state_returns_to_idle() {
    for state in InteractionState::ALL.into_iter().filter(|s| !s.is_idle()) {
        let mut machine = InteractionStateMachine::default();
        machine.transition(state).unwrap();
        machine.transition(InteractionState::Idle).unwrap();
        assert!(machine.is_idle());
    }
}

#[test]
fn test_transition_history_records_sequence() {
    let mut machine = InteractionStateMachine::new(8);
    machine.transition(InteractionState::PlacingConnectionSource).unwrap();
    machine.transition(InteractionState::PlacingConnectionTarget).unwrap();
    machine.transition(InteractionState::Idle).unwrap();

    let states: Vec<_> = machine.history().map(|r| r.to).collect();
    assert_eq!(
        states,
        vec![
            InteractionState::PlacingConnectionSource,
            InteractionState::PlacingConnectionTarget,
            InteractionState::Idle,
        ]
    );
}
