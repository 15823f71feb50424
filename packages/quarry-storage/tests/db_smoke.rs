//! Postgres round trips. Requires a reachable server; run with
//! `QUARRY_PG_DSN=postgres://... cargo test -- --ignored`.

use quarry_config::Postgres;
use quarry_storage::{catalog, db::Db};
use quarry_testkit::{TestDatabase, env_dsn};

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let db = Db::connect(&Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 })
		.await
		.expect("Failed to connect to the test database.");

	db.ensure_schema().await.expect("Failed to apply the schema.");

	db
}

async fn seed(db: &Db) -> (i64, i64) {
	let thesis_id = sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO content (user_id, file_name, file_type, file_size, chunk_count)
VALUES ('51', 'thesis.pdf', 'pdf', 2048, 2)
RETURNING id",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to insert content.");
	let notes_id = sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO content (user_id, file_name, file_type, file_size, chunk_count)
VALUES ('51', 'notes.md', 'md', 512, 1)
RETURNING id",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to insert content.");

	for (content_id, order, text, embedding_id) in [
		(thesis_id, 0, "first section", Some(101_i64)),
		(thesis_id, 1, "second section", Some(102)),
		(notes_id, 0, "scratch note", None),
	] {
		sqlx::query(
			"\
INSERT INTO content_chunk (content_id, chunk_order, chunk_text, embedding_id)
VALUES ($1, $2, $3, $4)",
		)
		.bind(content_id)
		.bind(order)
		.bind(text)
		.bind(embedding_id)
		.execute(&db.pool)
		.await
		.expect("Failed to insert chunk.");
	}

	(thesis_id, notes_id)
}

#[ignore]
#[tokio::test]
async fn ensure_schema_is_idempotent() {
	let Some(dsn) = env_dsn() else {
		panic!("QUARRY_PG_DSN is not set.");
	};

	quarry_testkit::with_test_db(&dsn, async |test_db| {
		let db = bootstrap(test_db).await;

		// A second pass must be a no-op, not a failure.
		db.ensure_schema().await.expect("Schema reapply failed.");

		Ok(())
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[ignore]
#[tokio::test]
async fn catalog_scopes_by_owner_and_narrows_by_content() {
	let Some(dsn) = env_dsn() else {
		panic!("QUARRY_PG_DSN is not set.");
	};

	quarry_testkit::with_test_db(&dsn, async |test_db| {
		let db = bootstrap(test_db).await;
		let (thesis_id, notes_id) = seed(&db).await;
		let mut all = catalog::content_ids(&db.pool, "51", None)
			.await
			.expect("Failed to list content ids.");

		all.sort_unstable();

		let mut expected = vec![thesis_id, notes_id];

		expected.sort_unstable();

		assert_eq!(all, expected);

		let narrowed = catalog::content_ids(&db.pool, "51", Some(notes_id))
			.await
			.expect("Failed to narrow content ids.");

		assert_eq!(narrowed, vec![notes_id]);

		// Ownership wins over the filter.
		let crossed = catalog::content_ids(&db.pool, "90", Some(thesis_id))
			.await
			.expect("Failed to query with a foreign owner.");

		assert!(crossed.is_empty());

		Ok(())
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[ignore]
#[tokio::test]
async fn embedded_chunks_skip_rows_without_embeddings() {
	let Some(dsn) = env_dsn() else {
		panic!("QUARRY_PG_DSN is not set.");
	};

	quarry_testkit::with_test_db(&dsn, async |test_db| {
		let db = bootstrap(test_db).await;
		let (thesis_id, notes_id) = seed(&db).await;
		let mut chunks = catalog::embedded_chunks(&db.pool, &[thesis_id, notes_id])
			.await
			.expect("Failed to list embedded chunks.");

		chunks.sort_unstable_by_key(|chunk| chunk.embedding_id);

		assert_eq!(chunks.len(), 2);
		assert_eq!(chunks[0].embedding_id, 101);
		assert_eq!(chunks[1].embedding_id, 102);

		let none = catalog::embedded_chunks(&db.pool, &[notes_id])
			.await
			.expect("Failed to list embedded chunks.");

		assert!(none.is_empty());

		Ok(())
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[ignore]
#[tokio::test]
async fn chunk_details_join_back_to_the_owning_file() {
	let Some(dsn) = env_dsn() else {
		panic!("QUARRY_PG_DSN is not set.");
	};

	quarry_testkit::with_test_db(&dsn, async |test_db| {
		let db = bootstrap(test_db).await;
		let (thesis_id, _) = seed(&db).await;
		let chunks = catalog::embedded_chunks(&db.pool, &[thesis_id])
			.await
			.expect("Failed to list embedded chunks.");
		let chunk_ids: Vec<i64> = chunks.iter().map(|chunk| chunk.chunk_id).collect();
		let details = catalog::chunk_details(&db.pool, &chunk_ids)
			.await
			.expect("Failed to fetch chunk details.");

		assert_eq!(details.len(), 2);

		for detail in &details {
			assert_eq!(detail.content_id, thesis_id);
			assert_eq!(detail.file_name, "thesis.pdf");
		}

		let content = catalog::content_by_id(&db.pool, thesis_id)
			.await
			.expect("Failed to fetch content.")
			.expect("Content should exist.");

		assert_eq!(content.user_id, "51");

		let chunk = catalog::chunk_by_id(&db.pool, chunk_ids[0])
			.await
			.expect("Failed to fetch chunk.")
			.expect("Chunk should exist.");

		assert_eq!(chunk.content_id, thesis_id);

		Ok(())
	})
	.await
	.expect("Test database lifecycle failed.");
}
