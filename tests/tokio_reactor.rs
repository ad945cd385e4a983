use std::fs;
use std::rc::Rc;
use std::time::Duration;
use evlog::{log_at, Logger, TokioReactor};
use tempfile::tempdir;
use tokio::task::LocalSet;

#[tokio::test(start_paused = true)]
async fn buffered_lines_land_after_one_interval() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tokio.log");

    let local = LocalSet::new();
    local.run_until(async {
        let logger = Logger::new(Some(&path), 3);
        logger.attach(Rc::new(TokioReactor::new()));

        log_at!(logger, 0, "first");
        log_at!(logger, 0, "second");
        assert!(logger.has_pending_flush());

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert!(!logger.has_pending_flush());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().next().unwrap().ends_with(" first"));

        logger.detach();
        logger.teardown();
    }).await;
}

#[tokio::test(start_paused = true)]
async fn detach_beats_the_timer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("detach.log");

    let local = LocalSet::new();
    local.run_until(async {
        let logger = Logger::new(Some(&path), 3);
        logger.attach(Rc::new(TokioReactor::new()));
        log_at!(logger, 0, "flushed by detach");
        logger.detach();

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert_eq!(logger.stats().writes, 1);
    }).await;
}
