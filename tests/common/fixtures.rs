use serde_json::{Value, json};

/// The two-item document used throughout the query examples
pub fn items() -> Value {
    json!({
        "items": [
            {"id": 1, "tag": "a"},
            {"id": 2, "tag": "b"}
        ]
    })
}

/// A small cloud inventory with nested lists and mixed value types
pub fn inventory() -> Value {
    json!({
        "region": "eu-west",
        "servers": [
            {
                "name": "web-1",
                "status": "ACTIVE",
                "cpus": 2,
                "metadata": {"owner": "alice", "tier": "frontend"},
                "security_groups": [{"name": "default"}, {"name": "http"}],
                "addresses": {"private": [{"addr": "10.0.0.4", "version": 4}]}
            },
            {
                "name": "web-2",
                "status": "SHUTOFF",
                "cpus": 4,
                "metadata": {"owner": "bob"},
                "security_groups": [{"name": "default"}],
                "addresses": {"private": [{"addr": "10.0.0.5", "version": 4}]}
            },
            {
                "name": "db-1",
                "status": "ACTIVE",
                "cpus": 8.5,
                "metadata": {"owner": null, "tier": "backend"},
                "security_groups": [{"name": "ssh"}, {"name": "default"}],
                "addresses": {"private": [
                    {"addr": "10.0.1.9", "version": 4},
                    {"addr": "fd00::9", "version": 6}
                ]}
            }
        ],
        "allowed_groups": ["default", "http", "ssh"]
    })
}

/// Generate `count` records for throughput-style tests
pub fn generate_records(count: usize) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Record {}", i),
                "tags": [format!("t{}", i % 3), "all"],
                "nested": {"value": i * 10, "flag": i % 2 == 0}
            })
        })
        .collect();
    json!({ "records": records })
}
