//! 周期性清理任务。
//!
//! 每个内存表配一个后台任务，由 [`SweepHandle`] 持有；handle 被 drop 时任务会被中止，
//! 正常退出时调用 [`SweepHandle::shutdown`] 等待任务结束。

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub struct SweepHandle {
    name: &'static str,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// 每隔 `period` 调用一次 `sweep`，首次调用在 `period` 之后
pub fn spawn_sweep<F>(name: &'static str, period: Duration, mut sweep: F) -> SweepHandle
where
    F: FnMut() -> usize + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = sweep();
                    tracing::debug!("{} sweep removed {} expired entries", name, removed);
                }
                _ = &mut shutdown_rx => break,
            }
        }

        tracing::debug!("{} sweep stopped", name);
    });

    SweepHandle {
        name,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    }
}

impl SweepHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 通知任务退出并等待其结束
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("{} sweep task ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_period() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = spawn_sweep("test", Duration::from_secs(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(26)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_shutdown() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = spawn_sweep("test", Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        });

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = spawn_sweep("test", Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        });

        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
