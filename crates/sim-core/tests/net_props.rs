//! Property tests for net masking and write accounting.

use proptest::prelude::*;
use sim_core::Net;

proptest! {
    /// A stored value is always the written value masked to the width.
    #[test]
    fn standard_write_is_masked(width in 1u32..=24, value: u32) {
        let mut net = Net::bus(width);
        net.write(value);
        let mask = (1u32 << width) - 1;
        prop_assert_eq!(net.read(), value & mask);
    }

    /// Exactly one write never flags; two or more always do.
    #[test]
    fn conflict_iff_multiple_writes(values in prop::collection::vec(any::<u32>(), 0..5)) {
        let mut net = Net::bus(8);
        for &v in &values {
            net.write(v);
        }
        prop_assert_eq!(net.has_conflict(), values.len() > 1);
    }

    /// Open-collector reads are the AND of every written value.
    #[test]
    fn collector_is_wired_and(values in prop::collection::vec(any::<u32>(), 1..6)) {
        let mut net = Net::open_collector(8);
        net.reset();
        for &v in &values {
            net.write(v);
        }
        let expected = values.iter().fold(0xFFu32, |acc, &v| acc & v & 0xFF);
        prop_assert_eq!(net.read(), expected);
        prop_assert!(!net.has_conflict());
    }

    /// A divided clock completes one full period every `2 * period` advances.
    #[test]
    fn clock_period_round_trip(period in 1u64..32, cycles in 1u64..8) {
        let mut net = Net::clock(true, period);
        for _ in 0..(2 * period * cycles) {
            net.advance();
        }
        prop_assert!(net.is_high());
    }
}
