//! End-to-end: index a small set of 768-d embeddings, query, re-index,
//! reset, and check diagnostics along the way.

use chunkvault::config::StoreConfig;
use chunkvault::domain::entities::vector_record::VectorRecord;
use chunkvault::ChunkVault;
use tempfile::TempDir;

const D: usize = 768;

fn embedding(seed: usize) -> Vec<f32> {
    (0..D)
        .map(|i| (((i * 31 + seed * 17) % 97) as f32 / 97.0) - 0.5)
        .collect()
}

fn setup() -> (TempDir, ChunkVault) {
    let dir = TempDir::new().unwrap();
    let vault = ChunkVault::new(StoreConfig::new(dir.path().join("vectors"))).unwrap();
    (dir, vault)
}

#[tokio::test]
async fn test_full_pipeline() {
    let (_dir, vault) = setup();
    vault.ensure_collection().await.unwrap();
    assert!(vault.check_health().await);

    // 1. Nothing indexed yet: quiet empty results.
    let q = embedding(1);
    assert!(vault.search(&q, 5).await.unwrap().is_empty());

    // 2. Index a batch from the extraction pipeline.
    let json = serde_json::json!([
        {
            "id": "component:ContactList",
            "vector": embedding(1),
            "payload": {
                "filePath": "src/contacts/ContactList.tsx",
                "type": "component",
                "name": "ContactList",
                "startLine": 10,
                "endLine": 150,
                "content": "export function ContactList() { return <List /> }"
            }
        },
        {
            "id": "function:formatName",
            "vector": embedding(2),
            "payload": {
                "filePath": "src/contacts/formatName.ts",
                "elementType": "function",
                "name": "formatName",
                "startLine": 1,
                "endLine": 4,
                "content": "export const formatName = (c) => c.first + ' ' + c.last;"
            }
        }
    ]);
    let records: Vec<VectorRecord> = serde_json::from_value(json).unwrap();
    vault.upsert(&records).await.unwrap();

    let info = vault.collection_info().await.unwrap();
    assert_eq!(info.record_count, 2);
    assert_eq!(info.vector_size, D);

    // 3. The closer record comes back first with a perfect score.
    let results = vault.search(&q, 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].record.id, "component:ContactList");
    assert!((results[0].score - 1.0).abs() < 1e-6);

    let functions = vault.search_by_type(&q, "function", 10).await.unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].record.payload.name, "formatName");
    assert!(functions[0].score < 1.0);

    // 4. Re-index one element: record count is unchanged.
    let mut moved = records[0].clone();
    moved.payload.start_line = 12;
    moved.payload.end_line = 160;
    vault.upsert(&[moved]).await.unwrap();
    assert_eq!(vault.health_details().await.record_count, 2);
    let results = vault.search(&q, 1).await.unwrap();
    assert_eq!(results[0].record.payload.start_line, 12);

    // 5. Full reset.
    vault.clear_collection().await.unwrap();
    assert!(vault.search(&q, 10).await.unwrap().is_empty());
    assert!(!vault.health_details().await.collection_exists);
}

#[tokio::test]
async fn test_search_results_serialize_for_cli() {
    let (_dir, vault) = setup();
    let record = VectorRecord::new(
        "hook:useContacts",
        embedding(3),
        chunkvault::domain::entities::vector_record::ChunkPayload {
            file_path: "src/hooks/useContacts.ts".into(),
            element_type: "hook".into(),
            name: "useContacts".into(),
            start_line: 3,
            end_line: 30,
            content: "export function useContacts() {}".into(),
        },
    );
    vault.upsert(&[record]).await.unwrap();

    let results = vault.search(&embedding(3), 1).await.unwrap();
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["record"]["id"], "hook:useContacts");
    assert_eq!(json[0]["record"]["payload"]["elementType"], "hook");
    assert_eq!(json[0]["record"]["payload"]["startLine"], 3);
    assert!(json[0]["score"].as_f64().unwrap() > 0.999);
}
