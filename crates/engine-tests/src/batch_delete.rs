#[cfg(test)]
mod tests {
    use crate::utils::{self, RecordingQueue, UnreliableStore};
    use engine_core::{error::OpError, queue::Job};
    use engine_runtime::{
        batch::{config::BatchDeleteConfig, delete::BatchDelete, driver::Termination},
        context::ExecutionContext,
        error::BatchError,
    };
    use model::core::value::Value;
    use std::sync::Arc;

    fn delete_a() -> BatchDeleteConfig {
        BatchDeleteConfig::new(utils::all_rows("example_a"))
    }

    #[tokio::test]
    async fn deletes_every_matching_row() {
        let store = Arc::new(utils::seeded_store(120));
        let ctx = utils::context(&store);

        let summary = BatchDelete::new(delete_a().page_size(50), ctx)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.dispatched, 120);
        assert_eq!(summary.termination, Termination::Exhausted);
        assert_eq!(store.row_count("example_a"), 0);
    }

    #[tokio::test]
    async fn limit_leaves_the_rest_untouched() {
        let store = Arc::new(utils::seeded_store(120));
        let ctx = utils::context(&store);

        let summary = BatchDelete::new(delete_a().limit(30), ctx)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.dispatched, 30);
        assert_eq!(summary.termination, Termination::LimitReached);
        assert_eq!(store.row_count("example_a"), 90);
    }

    #[tokio::test]
    async fn filters_restrict_the_deleted_set() {
        let store = Arc::new(utils::seeded_store(20));
        let ctx = utils::context(&store);
        let config =
            BatchDeleteConfig::new(utils::all_rows("example_a").filter("b", Value::Boolean(true)));

        let summary = BatchDelete::new(config, ctx).run().await.unwrap();

        assert_eq!(summary.dispatched, 10);
        assert_eq!(store.row_count("example_a"), 10);
        // Only the non-matching rows survive.
        for row in store.rows_of("example_a") {
            assert_eq!(row.get_value("b"), Value::Boolean(false));
        }
    }

    #[tokio::test]
    async fn soft_deleted_rows_need_an_explicit_opt_in() {
        let store = Arc::new(utils::seeded_store(2));
        store.insert("example_a", "id", utils::soft_deleted_row(3));
        let ctx = utils::context(&store);

        BatchDelete::new(delete_a(), ctx.clone()).run().await.unwrap();
        // The soft-deleted row was invisible to the scan.
        assert_eq!(store.row_count("example_a"), 1);

        let config = BatchDeleteConfig::new(utils::all_rows("example_a").with_deleted());
        BatchDelete::new(config, ctx).run().await.unwrap();
        assert_eq!(store.row_count("example_a"), 0);
    }

    #[tokio::test]
    async fn job_dispatch_enqueues_one_delete_per_row() {
        let store = Arc::new(utils::seeded_store(4));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());

        let summary = BatchDelete::new(delete_a().as_jobs(), ctx)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.dispatched, 4);
        let pushed = queue.pushed();
        assert_eq!(pushed.len(), 4);
        assert!(pushed.iter().all(|p| p.delay.is_none()));
        match &pushed[0].job {
            Job::Delete(op) => {
                assert_eq!(op.source.entity, "example_a");
                assert_eq!(op.source.key, Value::Int(1));
            }
            other => panic!("unexpected job: {other:?}"),
        }
        // Nothing ran, nothing was deleted.
        assert_eq!(store.row_count("example_a"), 4);
    }

    #[tokio::test]
    async fn rate_spreads_delete_job_delays() {
        let store = Arc::new(utils::seeded_store(5));
        let queue = Arc::new(RecordingQueue::new());
        let ctx = utils::context(&store).with_queue(queue.clone());

        BatchDelete::new(delete_a().as_jobs().rate(100), ctx)
            .run()
            .await
            .unwrap();

        assert_eq!(queue.delays_in_secs(), vec![0, 1, 1, 2, 3]);
    }

    #[tokio::test]
    async fn lost_deletes_surface_as_verification_errors() {
        let store = Arc::new(UnreliableStore::dropping_deletes(utils::seeded_store(5)));
        let ctx = ExecutionContext::new(store, Arc::new(utils::registry()));

        let err = BatchDelete::new(delete_a(), ctx).run().await.unwrap_err();

        assert!(matches!(
            err,
            BatchError::Op(OpError::DeleteNotConfirmed { .. })
        ));
    }
}
