//! Turn order properties over many speed pairs.

use buffbrawl::scheduler::{interleave, SchedulerConfig, TurnOwner, TurnScheduler};

fn speed_pairs() -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for p in [1, 2, 3, 7, 10, 15, 16, 33, 100] {
        for m in [1, 2, 5, 8, 10, 12, 15, 97] {
            pairs.push((p, m));
        }
    }
    pairs.push((u32::MAX, 1));
    pairs.push((1, u32::MAX));
    pairs
}

#[test]
fn test_turn_share_follows_speed() {
    let n = 2000;
    for (p, m) in speed_pairs() {
        let order = interleave(p, m, n).unwrap();
        let players = order.iter().filter(|o| **o == TurnOwner::Player).count();
        let share = players as f64 / n as f64;
        let expected = f64::from(p) / (f64::from(p) + f64::from(m));
        assert!(
            (share - expected).abs() < 0.005,
            "speeds {p}/{m}: player share {share}, expected {expected}"
        );
    }
}

#[test]
fn test_incremental_queue_equals_full_recompute() {
    for (p, m) in speed_pairs() {
        let mut scheduler = TurnScheduler::new(p, m, SchedulerConfig::default()).unwrap();
        for _ in 0..1000 {
            scheduler.advance();
        }
        let queue = scheduler.queue();
        assert_eq!(
            queue,
            interleave(p, m, queue.len()).unwrap().as_slice(),
            "speeds {p}/{m}"
        );
    }
}

#[test]
fn test_odd_batch_sizes_equal_full_recompute() {
    let config = SchedulerConfig {
        initial_batch: 1,
        refill_threshold: 7,
        refill_batch: 3,
    };
    let mut scheduler = TurnScheduler::new(13, 4, config).unwrap();
    for _ in 0..250 {
        scheduler.advance();
    }
    assert!(scheduler.remaining() >= 7);
    let queue = scheduler.queue();
    assert_eq!(queue, interleave(13, 4, queue.len()).unwrap().as_slice());
}

#[test]
fn test_speed_change_only_affects_new_entries() {
    let mut scheduler = TurnScheduler::new(10, 10, SchedulerConfig::default()).unwrap();
    for _ in 0..5 {
        scheduler.advance();
    }
    let before = scheduler.queue().to_vec();
    scheduler.set_speeds(30, 10).unwrap();
    for _ in 0..200 {
        scheduler.advance();
    }
    assert_eq!(&scheduler.queue()[..before.len()], before.as_slice());

    let tail = &scheduler.queue()[before.len()..];
    let players = tail.iter().filter(|o| **o == TurnOwner::Player).count();
    assert!(players * 4 >= tail.len() * 3 - 4);
}

#[test]
fn test_cursor_never_outruns_queue() {
    let mut scheduler = TurnScheduler::new(1, u32::MAX, SchedulerConfig::default()).unwrap();
    for _ in 0..500 {
        scheduler.advance();
        assert!(scheduler.remaining() >= 3);
        assert_eq!(scheduler.upcoming(5).len(), 5);
    }
}
