//! # Lifecycle Properties
//!
//! Randomized checks over packet sets, fraud heights and block times:
//!
//! - **Causal order**: handlers of one chain run by ascending
//!   `(proof_height, sequence)`.
//! - **Fraud safety**: packets at or above the fraud height revert and their
//!   handler never runs.
//! - **Monotonicity**: terminal packets never change status again.
//! - **Dispute window**: nothing finalizes before the window elapses.

use super::fixtures::*;
use hub_01_packet_store::PacketStatus;
use proptest::prelude::*;
use std::collections::BTreeSet;

const PERIOD: u64 = 1_000;

fn packet_set() -> impl Strategy<Value = BTreeSet<(u64, u64)>> {
    prop::collection::btree_set((1u64..=50, 0u64..5), 1..25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_handlers_run_in_causal_order(packets in packet_set()) {
        let (mut app, handler) = hub(PERIOD, vec![]);
        app.begin_block(0).unwrap();
        app.submit_state_update(&rollapp(), 1, 50, proof(1, 50, 0)).unwrap();
        // Admission order is deliberately reversed
        for &(height, sequence) in packets.iter().rev() {
            relay(&mut app, height, sequence);
        }
        app.end_block().unwrap();

        let report = app.produce_block(PERIOD).unwrap();

        let expected: Vec<Vec<u8>> = packets.iter().map(|&(h, s)| packet_data(h, s)).collect();
        prop_assert_eq!(report.finalized, packets.len());
        prop_assert_eq!(handler.calls(), expected);
    }

    #[test]
    fn prop_fraud_reverts_everything_at_or_above_fraud_height(
        packets in packet_set(),
        fraud_height in 21u64..=50,
    ) {
        let (mut app, handler) = hub(PERIOD, vec![]);
        app.begin_block(0).unwrap();
        app.submit_state_update(&rollapp(), 1, 20, proof(1, 20, 0)).unwrap();
        for &(height, sequence) in &packets {
            relay(&mut app, height, sequence);
        }
        app.end_block().unwrap();

        app.begin_block(PERIOD / 2).unwrap();
        app.submit_state_update(&rollapp(), 21, 50, proof(21, 50, PERIOD / 2)).unwrap();
        app.end_block().unwrap();

        // First update's window elapses in the same block the fraud lands in
        app.begin_block(PERIOD).unwrap();
        app.submit_fraud(&rollapp(), fraud_height, "bad root").unwrap();
        app.end_block().unwrap();

        let calls = handler.calls();
        for &(height, sequence) in &packets {
            let packet = app.packet(&packet_id(height, sequence)).unwrap();
            let ran = calls.contains(&packet_data(height, sequence));
            if height >= fraud_height {
                prop_assert_eq!(packet.status, PacketStatus::Reverted);
                prop_assert!(!ran);
            } else if height <= 20 {
                prop_assert_eq!(packet.status, PacketStatus::Finalized);
                prop_assert!(ran);
            } else {
                prop_assert_eq!(packet.status, PacketStatus::Pending);
                prop_assert!(!ran);
            }
        }

        // Monotonicity: more blocks change nothing
        let before: Vec<PacketStatus> = packets
            .iter()
            .map(|&(h, s)| app.packet(&packet_id(h, s)).unwrap().status)
            .collect();
        app.produce_block(3 * PERIOD).unwrap();
        app.produce_block(10 * PERIOD).unwrap();
        let after: Vec<PacketStatus> = packets
            .iter()
            .map(|&(h, s)| app.packet(&packet_id(h, s)).unwrap().status)
            .collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(handler.calls().len(), calls.len());
    }

    #[test]
    fn prop_nothing_finalizes_inside_dispute_window(
        packets in packet_set(),
        elapsed in prop::collection::vec(0u64..PERIOD, 1..5),
    ) {
        let (mut app, handler) = hub(PERIOD, vec![]);
        app.begin_block(0).unwrap();
        app.submit_state_update(&rollapp(), 1, 50, proof(1, 50, 0)).unwrap();
        for &(height, sequence) in &packets {
            relay(&mut app, height, sequence);
        }
        app.end_block().unwrap();

        let mut times = elapsed;
        times.sort_unstable();
        for time in times {
            let report = app.produce_block(time).unwrap();
            prop_assert_eq!(report.finalized, 0);
        }
        prop_assert!(handler.calls().is_empty());
    }

    #[test]
    fn prop_each_packet_executes_once(packets in packet_set(), extra_blocks in 1usize..4) {
        let (mut app, _handler) = hub(PERIOD, vec![]);
        app.begin_block(0).unwrap();
        app.submit_state_update(&rollapp(), 1, 50, proof(1, 50, 0)).unwrap();
        for &(height, sequence) in &packets {
            relay(&mut app, height, sequence);
        }
        app.end_block().unwrap();

        for i in 0..=extra_blocks {
            app.produce_block(PERIOD + i as u64).unwrap();
        }

        for &(height, sequence) in &packets {
            prop_assert_eq!(
                RecordingHandler::executions(app.store(), &packet_data(height, sequence)),
                1
            );
        }
    }
}
