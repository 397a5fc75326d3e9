#[cfg(test)]
mod tests {
    use crate::utils::{self, RecordingQueue, UnreliableStore};
    use chrono::{Duration, Utc};
    use engine_core::error::{ConfigError, OpError};
    use engine_runtime::{
        batch::{config::BatchCopyConfig, copy::BatchCopy, driver::Termination},
        context::ExecutionContext,
        error::BatchError,
    };
    use model::core::value::Value;
    use std::sync::Arc;
    use storage::memory::MemoryStore;

    fn copy_a_to_b() -> BatchCopyConfig {
        BatchCopyConfig::new(utils::all_rows("example_a"), "example_b")
    }

    #[tokio::test]
    async fn copies_every_row_page_by_page() {
        let store = Arc::new(utils::seeded_store(350));
        let ctx = utils::context(&store);

        let summary = BatchCopy::new(copy_a_to_b(), ctx).run().await.unwrap();

        assert_eq!(summary.examined, 350);
        assert_eq!(summary.dispatched, 350);
        assert_eq!(summary.termination, Termination::Exhausted);
        assert_eq!(store.row_count("example_b"), 350);
        // Sources stay put unless deletion was asked for.
        assert_eq!(store.row_count("example_a"), 350);
    }

    #[tokio::test]
    async fn limit_caps_the_run_at_exactly_that_many_rows() {
        for page_size in [15, 100] {
            let store = Arc::new(utils::seeded_store(350));
            let ctx = utils::context(&store);
            let config = copy_a_to_b().page_size(page_size).limit(50);

            let summary = BatchCopy::new(config, ctx).run().await.unwrap();

            assert_eq!(summary.dispatched, 50);
            assert_eq!(summary.termination, Termination::LimitReached);
            assert_eq!(store.row_count("example_b"), 50);
            // The 51st row is examined, trips the ceiling and is not dispatched.
            assert_eq!(summary.examined, 51);
        }
    }

    #[tokio::test]
    async fn filters_restrict_the_copied_set() {
        let store = Arc::new(utils::seeded_store(20));
        let ctx = utils::context(&store);
        let config = BatchCopyConfig::new(
            utils::all_rows("example_a").filter("b", Value::Boolean(true)),
            "example_b",
        );

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.dispatched, 10);
        assert_eq!(store.row_count("example_b"), 10);
        for row in store.rows_of("example_b") {
            assert_eq!(row.get_value("b"), Value::Boolean(true));
        }
    }

    #[tokio::test]
    async fn delete_source_moves_rows_instead_of_duplicating() {
        let store = Arc::new(utils::seeded_store(40));
        let ctx = utils::context(&store);
        let config = copy_a_to_b().delete_source();

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.dispatched, 40);
        assert_eq!(store.row_count("example_b"), 40);
        assert_eq!(store.row_count("example_a"), 0);
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_skipped_unless_asked_for() {
        let store = Arc::new(utils::seeded_store(3));
        store.insert("example_a", "id", utils::soft_deleted_row(4));
        let ctx = utils::context(&store);

        let summary = BatchCopy::new(copy_a_to_b(), ctx.clone()).run().await.unwrap();
        assert_eq!(summary.dispatched, 3);
        assert_eq!(store.row_count("example_b"), 3);

        let config = BatchCopyConfig::new(
            utils::all_rows("example_a").with_deleted(),
            "example_b",
        );
        let summary = BatchCopy::new(config, ctx).run().await.unwrap();
        assert_eq!(summary.dispatched, 4);
        assert_eq!(store.row_count("example_b"), 4);
    }

    #[tokio::test]
    async fn copies_carry_the_attribute_set_verbatim() {
        let store = Arc::new(utils::seeded_store(0));
        store.insert("example_a", "id", utils::soft_deleted_row(7));
        let ctx = utils::context(&store);
        let config = BatchCopyConfig::new(
            utils::all_rows("example_a").with_deleted(),
            "example_b",
        );

        BatchCopy::new(config, ctx).run().await.unwrap();

        let copied = &store.rows_of("example_b")[0];
        assert_eq!(copied.get_value("id"), Value::Int(7));
        assert_eq!(copied.get_value("name"), Value::String("row-7".into()));
        assert_eq!(
            copied.get_value("deleted_at"),
            Value::Timestamp(utils::timestamp(7))
        );
        assert_eq!(
            copied.get_value("created_at"),
            Value::Timestamp(utils::timestamp(7))
        );
        assert_eq!(
            copied.get_value("updated_at"),
            Value::Timestamp(utils::timestamp(7))
        );
    }

    #[tokio::test]
    async fn job_dispatch_enqueues_one_job_per_row() {
        let store = Arc::new(utils::seeded_store(6));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());
        let config = copy_a_to_b().as_jobs();

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.dispatched, 6);
        let pushed = queue.pushed();
        assert_eq!(pushed.len(), 6);
        // Without a rate there is nothing to delay.
        assert!(pushed.iter().all(|p| p.delay.is_none()));
        // No job ran, so nothing was written.
        assert_eq!(store.row_count("example_b"), 0);
    }

    #[tokio::test]
    async fn rate_spreads_job_delays_across_the_minute() {
        let store = Arc::new(utils::seeded_store(5));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());
        let config = copy_a_to_b().as_jobs().rate(3);

        BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(queue.delays_in_secs(), vec![20, 40, 60, 80, 100]);
    }

    #[tokio::test]
    async fn high_rates_round_delays_down_to_whole_seconds() {
        let store = Arc::new(utils::seeded_store(5));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());
        let config = copy_a_to_b().as_jobs().rate(100);

        BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(queue.delays_in_secs(), vec![0, 1, 1, 2, 3]);
    }

    #[tokio::test]
    async fn deadline_stops_dispatch_once_delays_overrun_it() {
        let store = Arc::new(utils::seeded_store(100));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());
        // Rate 3 schedules row N at +20*N seconds. The guard looks at the
        // previously scheduled dispatch, so row 16 (scheduled +320s) still
        // goes out while row 15's +300s is within the deadline; row 17 does
        // not. The deadline sits between those to absorb clock skew between
        // this line and the run's own start-of-run timestamp.
        let config = copy_a_to_b()
            .as_jobs()
            .rate(3)
            .process_before(Utc::now() + Duration::seconds(310));

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.termination, Termination::DeadlineExceeded);
        assert_eq!(summary.dispatched, 16);
        assert_eq!(queue.pushed().len(), 16);
    }

    #[tokio::test]
    async fn inline_runs_ignore_the_deadline_while_ops_guard_expiry() {
        // Synchronous dispatch computes no schedule, so the driver-level
        // deadline never arms; a deadline already in the past instead turns
        // every operation into a no-op at execution time.
        let store = Arc::new(utils::seeded_store(30));
        let ctx = utils::context(&store);
        let config = copy_a_to_b().process_before(Utc::now() - Duration::minutes(1));

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.termination, Termination::Exhausted);
        assert_eq!(summary.dispatched, 30);
        assert_eq!(store.row_count("example_b"), 0);
    }

    #[tokio::test]
    async fn routes_jobs_to_the_named_queue() {
        let store = Arc::new(utils::seeded_store(4));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());
        let config = copy_a_to_b().as_jobs().on_queue("relocations");

        BatchCopy::new(config, ctx).run().await.unwrap();

        assert!(queue
            .pushed()
            .iter()
            .all(|p| p.queue.as_deref() == Some("relocations")));
    }

    #[tokio::test]
    async fn bad_pacing_is_rejected_before_any_row_is_read() {
        // An empty store: any attempt to read a page would fail loudly.
        let store = Arc::new(MemoryStore::new());
        let ctx = utils::context(&store);

        let err = BatchCopy::new(copy_a_to_b().page_size(1), ctx.clone())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::InvalidPageSize(1))
        ));

        let err = BatchCopy::new(copy_a_to_b().page_size(-3), ctx.clone())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::InvalidPageSize(-3))
        ));

        let err = BatchCopy::new(copy_a_to_b().limit(-3), ctx.clone())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::InvalidLimit(-3))
        ));

        let err = BatchCopy::new(copy_a_to_b().rate(0), ctx.clone())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::InvalidRate(0))
        ));

        let err = BatchCopy::new(copy_a_to_b().as_jobs(), ctx)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::QueueRequired)
        ));
    }

    #[tokio::test]
    async fn unknown_entities_are_rejected_up_front() {
        let store = Arc::new(MemoryStore::new());
        let ctx = utils::context(&store);

        let config = BatchCopyConfig::new(utils::all_rows("example_a"), "nowhere");
        let err = BatchCopy::new(config, ctx.clone()).run().await.unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::UnknownDestination(_))
        ));

        let config = BatchCopyConfig::new(utils::all_rows("nowhere"), "example_b");
        let err = BatchCopy::new(config, ctx).run().await.unwrap_err();
        assert!(matches!(
            err,
            BatchError::Config(ConfigError::UnknownEntity(_))
        ));
    }

    #[tokio::test]
    async fn schema_mismatch_names_exactly_the_missing_columns() {
        let store = Arc::new(utils::seeded_store(1));
        let ctx = utils::context(&store);
        let config = BatchCopyConfig::new(utils::all_rows("example_a"), "example_c");

        let err = BatchCopy::new(config, ctx).run().await.unwrap_err();

        match err {
            BatchError::Op(OpError::MissingColumns { table, columns, .. }) => {
                assert_eq!(table, "example_c");
                assert_eq!(columns, ["b", "created_at", "deleted_at", "updated_at"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lost_writes_surface_as_verification_errors() {
        let store = Arc::new(UnreliableStore::dropping_upserts(utils::seeded_store(10)));
        let ctx = ExecutionContext::new(store, Arc::new(utils::registry()));

        let err = BatchCopy::new(copy_a_to_b(), ctx).run().await.unwrap_err();

        assert!(matches!(
            err,
            BatchError::Op(OpError::CopyNotConfirmed { .. })
        ));
    }

    #[tokio::test]
    async fn pages_on_the_explicit_order_column_when_configured() {
        let store = Arc::new(utils::seeded_store(0));
        for id in 1..=30 {
            store.insert("example_d", "id", {
                let mut row = utils::sample_row(id);
                row.entity = "example_d".to_string();
                row
            });
        }
        let ctx = utils::context(&store);
        let config =
            BatchCopyConfig::new(utils::all_rows("example_d"), "example_b").page_size(10);

        let summary = BatchCopy::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.dispatched, 30);
        assert_eq!(store.row_count("example_b"), 30);
    }
}
