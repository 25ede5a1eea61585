//! # Lifecycle Scenarios
//!
//! End-to-end runs of the assembled hub:
//!
//! 1. **Dispute window**: a packet stays pending until the window of the
//!    update covering it elapses, then finalizes and its handler runs once.
//! 2. **Fraud revert**: fraud inside the window reverts the packet in the
//!    same block, freezes the chain and blocks further submissions.
//! 3. **Listener failure**: a failing listener stops dispatch to later
//!    listeners and the transition is retried next block.

use super::fixtures::*;
use hub_01_packet_store::{PacketStatus, PacketType};
use hub_02_state_updates::{LedgerError, TrustStatus};
use hub_03_light_client::{ClientHeader, FraudReason, VerificationOutcome};
use hub_04_delayed_ack::DelayedAckEvent;
use node_runtime::wiring::canonical_state_root;
use node_runtime::HubError;
use shared_types::SECS_PER_DAY;
use std::sync::{Arc, Mutex};

const WEEK: u64 = 7 * SECS_PER_DAY;

// =============================================================================
// SCENARIO 1: DISPUTE WINDOW
// =============================================================================

#[test]
fn test_packet_waits_for_dispute_window() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let p1 = relay(&mut app, 120, 1);
    app.end_block().unwrap();

    let report = app.produce_block(6 * SECS_PER_DAY).unwrap();
    assert_eq!(report.finalized, 0);
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Pending);
    assert!(handler.calls().is_empty());

    let report = app.produce_block(WEEK + 1).unwrap();
    assert_eq!(report.finalized, 1);
    assert!(matches!(
        report.events.first(),
        Some(DelayedAckEvent::StateUpdateFinalized { start_height: 100, end_height: 150, .. })
    ));

    let packet = app.packet(&p1).unwrap();
    assert_eq!(packet.status, PacketStatus::Finalized);
    assert!(packet.acknowledgement.unwrap().is_success());
    assert_eq!(packet.status_updated_at, Some(WEEK + 1));
    assert_eq!(handler.calls(), vec![packet_data(120, 1)]);
    assert_eq!(app.record(&rollapp()).unwrap().finalized_height, 150);

    // Later blocks never touch the packet again
    app.produce_block(WEEK + 100).unwrap();
    assert_eq!(handler.calls().len(), 1);
    assert_eq!(RecordingHandler::executions(app.store(), &packet_data(120, 1)), 1);
}

#[test]
fn test_packet_above_covered_range_waits_for_next_update() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let inside = relay(&mut app, 150, 1);
    let above = relay(&mut app, 151, 2);
    app.end_block().unwrap();

    app.produce_block(WEEK).unwrap();
    assert_eq!(app.packet(&inside).unwrap().status, PacketStatus::Finalized);
    assert_eq!(app.packet(&above).unwrap().status, PacketStatus::Pending);
    assert_eq!(handler.calls(), vec![packet_data(150, 1)]);
}

// =============================================================================
// SCENARIO 2: FRAUD REVERT
// =============================================================================

#[test]
fn test_fraud_reverts_packet_and_freezes_chain() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let p1 = relay(&mut app, 120, 1);
    app.end_block().unwrap();

    app.begin_block(3 * SECS_PER_DAY).unwrap();
    let outcome = app
        .submit_fraud(&rollapp(), 110, "equivocation at 110")
        .unwrap();
    assert!(matches!(
        outcome,
        VerificationOutcome::Fraudulent(FraudReason::Evidence { height: 110, .. })
    ));
    let report = app.end_block().unwrap();

    assert_eq!(report.reverted, 1);
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Reverted);

    let record = app.record(&rollapp()).unwrap();
    assert!(record.frozen);
    assert_eq!(record.fraud_height, Some(110));
    assert_eq!(
        app.updates(&rollapp()).unwrap()[0].trust_status,
        TrustStatus::Fraudulent
    );

    let err = app
        .submit_state_update(&rollapp(), 151, 160, proof(151, 160, 3 * SECS_PER_DAY))
        .unwrap_err();
    assert!(matches!(err, HubError::Ledger(LedgerError::ChainFrozen(_))));

    let err = app
        .submit_packet(rollapp(), PacketType::OnRecv, 130, 9, vec![], None)
        .unwrap_err();
    assert!(matches!(err, HubError::Ledger(LedgerError::ChainFrozen(_))));

    // The window elapsing later does not resurrect anything
    app.produce_block(WEEK + 1).unwrap();
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Reverted);
    assert!(handler.calls().is_empty());
}

#[test]
fn test_packet_below_fraud_height_is_not_reverted() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let below = relay(&mut app, 105, 1);
    let above = relay(&mut app, 120, 2);
    app.submit_fraud(&rollapp(), 110, "bad root").unwrap();
    let report = app.end_block().unwrap();

    assert_eq!(report.reverted_keys().len(), 1);
    assert_eq!(app.packet(&above).unwrap().status, PacketStatus::Reverted);
    // Its update is fraudulent, so it can never finalize either
    assert_eq!(app.packet(&below).unwrap().status, PacketStatus::Pending);
    app.produce_block(2 * WEEK).unwrap();
    assert_eq!(app.packet(&below).unwrap().status, PacketStatus::Pending);
    assert!(handler.calls().is_empty());
}

#[test]
fn test_queued_header_proves_fraud_on_reverification() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let header = ClientHeader::new(rollapp(), 155, [0xEE; 32]);
    assert_eq!(app.submit_header(header).unwrap(), VerificationOutcome::Unknown);
    let low = relay(&mut app, 152, 1);
    let high = relay(&mut app, 158, 2);
    app.end_block().unwrap();

    app.begin_block(10).unwrap();
    app.submit_state_update(&rollapp(), 151, 160, proof(151, 160, 10))
        .unwrap();
    let report = app.end_block().unwrap();

    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, DelayedAckEvent::ChainFrozen { fraud_height: 155, .. })));
    assert!(app.record(&rollapp()).unwrap().frozen);
    assert_eq!(app.packet(&high).unwrap().status, PacketStatus::Reverted);
    assert_eq!(app.packet(&low).unwrap().status, PacketStatus::Pending);
    assert!(handler.calls().is_empty());
}

#[test]
fn test_matching_header_does_not_finalize() {
    let (mut app, handler) = hub(WEEK, vec![]);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 100, 150, proof(100, 150, 0))
        .unwrap();
    let p1 = relay(&mut app, 120, 1);
    let header = ClientHeader::new(rollapp(), 150, canonical_state_root(&rollapp(), 150));
    assert_eq!(app.submit_header(header).unwrap(), VerificationOutcome::Valid);
    app.end_block().unwrap();

    assert_eq!(app.record(&rollapp()).unwrap().last_verified_height, 150);
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Pending);
    assert!(handler.calls().is_empty());
}

// =============================================================================
// SCENARIO 3: LISTENER FAILURE
// =============================================================================

#[test]
fn test_failing_listener_blocks_later_listeners_and_retries() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let hooks = vec![FlakyHook::boxed("A", 1, &log), FlakyHook::boxed("B", 0, &log)];
    let (mut app, handler) = hub(100, hooks);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 1, 10, proof(1, 10, 0))
        .unwrap();
    let p1 = relay(&mut app, 5, 1);
    app.end_block().unwrap();

    let report = app.produce_block(100).unwrap();
    assert_eq!(report.deferred, 1);
    assert_eq!(report.finalized, 0);
    assert_eq!(*log.lock().unwrap(), vec!["A:5:finalized".to_string()]);
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Pending);
    // The attempted execution was rolled back with the unit
    assert_eq!(RecordingHandler::executions(app.store(), &packet_data(5, 1)), 0);

    let report = app.produce_block(101).unwrap();
    assert_eq!(report.finalized, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "A:5:finalized".to_string(),
            "A:5:finalized".to_string(),
            "B:5:finalized".to_string(),
        ]
    );
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Finalized);
    assert_eq!(handler.calls().len(), 2);
    assert_eq!(RecordingHandler::executions(app.store(), &packet_data(5, 1)), 1);
}

#[test]
fn test_listener_failure_on_revert_still_reverts() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let hooks = vec![FlakyHook::boxed("A", 1, &log), FlakyHook::boxed("B", 0, &log)];
    let (mut app, handler) = hub(100, hooks);

    app.begin_block(0).unwrap();
    app.submit_state_update(&rollapp(), 1, 10, proof(1, 10, 0))
        .unwrap();
    let p1 = relay(&mut app, 5, 1);
    app.submit_fraud(&rollapp(), 3, "bad root").unwrap();
    let report = app.end_block().unwrap();

    assert_eq!(report.reverted, 1);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, DelayedAckEvent::RevertHookFailed { .. })));
    assert_eq!(app.packet(&p1).unwrap().status, PacketStatus::Reverted);
    assert_eq!(*log.lock().unwrap(), vec!["A:5:reverted".to_string()]);
    assert!(handler.calls().is_empty());
}
