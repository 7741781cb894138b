use std::collections::HashMap;

use super::*;

fn wait_all<T: Send + 'static>(executor: &mut TaskExecutor<T>) -> Vec<(TaskId, T)> {
  let mut out = Vec::new();
  while let Some(done) = executor.wait() {
    out.push(done);
  }
  out
}

#[test]
fn test_spawn_and_wait() {
  let mut executor = TaskExecutor::new();
  let id = executor.spawn(|| 42i32);
  let results = wait_all(&mut executor);
  assert_eq!(results, vec![(id, 42)]);
  assert_eq!(executor.outstanding(), 0);
}

#[test]
fn test_multiple_tasks_tagged_by_id() {
  let mut executor = TaskExecutor::new();
  let ids: Vec<_> = (0..10).map(|i| (executor.spawn(move || i * 2), i * 2)).collect();

  let results: HashMap<TaskId, i32> = wait_all(&mut executor).into_iter().collect();
  assert_eq!(results.len(), 10);
  for (id, expected) in ids {
    assert_eq!(results[&id], expected);
  }
}

#[test]
fn test_wait_on_idle_executor() {
  let mut executor: TaskExecutor<u8> = TaskExecutor::new();
  assert!(executor.wait().is_none());
  assert!(executor.try_drain().is_empty());
}

#[test]
fn test_heavy_computation() {
  let mut executor = TaskExecutor::new();
  executor.spawn(|| {
    let mut sum = 0u64;
    for i in 0..1_000_000u64 {
      sum = sum.wrapping_add(i);
    }
    sum
  });
  let results = wait_all(&mut executor);
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].1, 499_999_500_000);
}

#[test]
fn test_try_drain_eventually_collects_everything() {
  let mut executor = TaskExecutor::new();
  for i in 0..4u32 {
    executor.spawn(move || i);
  }
  let mut seen = Vec::new();
  for _ in 0..5000 {
    seen.extend(executor.try_drain().into_iter().map(|(_, v)| v));
    if seen.len() == 4 {
      break;
    }
    std::thread::sleep(std::time::Duration::from_millis(1));
  }
  seen.sort();
  assert_eq!(seen, vec![0, 1, 2, 3]);
}

/// `wait` returns `None` exactly when every spawned result was received,
/// even while workers are still between sending and finishing.
#[test]
fn test_repeated_batches_never_hang() {
  let (done_tx, done_rx) = crossbeam_channel::bounded(1);
  std::thread::spawn(move || {
    let mut executor = TaskExecutor::new();
    let mut received = 0usize;
    for round in 0..2000usize {
      let batch = 1 + round % 16;
      for i in 0..batch {
        executor.spawn(move || i);
      }
      let results = wait_all(&mut executor);
      assert_eq!(results.len(), batch);
      assert_eq!(executor.outstanding(), 0);
      received += results.len();
    }
    let _ = done_tx.send(received);
  });

  let received = done_rx
    .recv_timeout(std::time::Duration::from_secs(60))
    .expect("executor hung waiting for results");
  assert_eq!(received, (0..2000).map(|r| 1 + r % 16).sum::<usize>());
}

/// Results drained by `try_drain` are no longer waited for.
#[test]
fn test_try_drain_then_wait() {
  let mut executor = TaskExecutor::new();
  for i in 0..8u32 {
    executor.spawn(move || i);
  }
  let mut seen: Vec<u32> = Vec::new();
  while seen.is_empty() {
    seen.extend(executor.try_drain().into_iter().map(|(_, v)| v));
    std::thread::yield_now();
  }
  assert_eq!(executor.outstanding(), 8 - seen.len());
  seen.extend(wait_all(&mut executor).into_iter().map(|(_, v)| v));
  seen.sort();
  assert_eq!(seen, (0..8).collect::<Vec<_>>());
  assert!(executor.wait().is_none());
}

#[test]
fn test_num_threads() {
  let executor: TaskExecutor<()> = TaskExecutor::default();
  assert!(executor.num_threads() >= 1);
}
