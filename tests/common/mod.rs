//! Common test utilities and helpers for ckrate tests
//!
//! Builders for dataframes and a writer for directories of saved API
//! responses, so tests can drive the whole pipeline through `FileSource`.

use ckrate::types::{Dataframe, RatedResource, UsageRecord};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

/// Services used across tests
#[allow(dead_code)]
pub const TEST_SERVICES: &[&str] = &["compute", "volume", "network.bw.out", "image"];

/// Builder for creating test Dataframe instances
pub struct DataframeBuilder {
    begin: String,
    tenant_id: Option<String>,
    resources: Vec<RatedResource>,
}

#[allow(dead_code)]
impl DataframeBuilder {
    /// Create a new builder for a frame starting at `begin`
    pub fn new(begin: &str) -> Self {
        Self {
            begin: begin.to_string(),
            tenant_id: None,
            resources: Vec::new(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: &str) -> Self {
        self.tenant_id = Some(tenant_id.to_string());
        self
    }

    /// Add a rated resource with a numeric rating
    pub fn with_rating(self, service: &str, rating: f64) -> Self {
        self.with_raw_rating(service, json!(rating))
    }

    /// Add a rated resource with an arbitrary JSON rating
    pub fn with_raw_rating(mut self, service: &str, rating: Value) -> Self {
        self.resources.push(RatedResource {
            service: service.to_string(),
            rating,
        });
        self
    }

    pub fn build(self) -> Dataframe {
        Dataframe {
            begin: self.begin,
            end: None,
            tenant_id: self.tenant_id,
            resources: self.resources,
        }
    }
}

/// Create a usage record with a numeric rating
#[allow(dead_code)]
pub fn record(service: &str, begin: &str, rating: f64) -> UsageRecord {
    UsageRecord::new(service, begin, json!(rating))
}

/// Directory of saved rating API responses
pub struct RatingDump {
    dir: TempDir,
}

#[allow(dead_code)]
impl RatingDump {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, name: &str, body: Value) {
        std::fs::write(self.dir.path().join(name), body.to_string())
            .expect("Failed to write fixture");
    }

    pub fn with_dataframes(self, dataframes: &[Dataframe]) -> Self {
        self.write(
            "dataframes.json",
            json!({ "dataframes": serde_json::to_value(dataframes).unwrap() }),
        );
        self
    }

    pub fn with_summary(self, results: Value) -> Self {
        self.write("summary.json", json!({ "results": results }));
        self
    }

    pub fn with_projects(self, projects: &[(&str, &str)]) -> Self {
        let projects: Vec<Value> = projects
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();
        self.write("projects.json", json!({ "projects": projects }));
        self
    }
}

/// A small cloud: two projects, three services, January 2024
#[allow(dead_code)]
pub fn sample_dump() -> RatingDump {
    RatingDump::new()
        .with_dataframes(&[
            DataframeBuilder::new("2024-01-01T00:00:00")
                .with_tenant("p1")
                .with_rating("compute", 1.5)
                .with_rating("volume", 0.25)
                .build(),
            DataframeBuilder::new("2024-01-01T02:00:00")
                .with_tenant("p2")
                .with_rating("compute", 0.5)
                .build(),
            DataframeBuilder::new("2024-01-01T03:00:00")
                .with_tenant("p1")
                .with_raw_rating("image", json!("0.1"))
                .build(),
            DataframeBuilder::new("2024-02-01T00:00:00")
                .with_tenant("p1")
                .with_rating("compute", 9.0)
                .build(),
        ])
        .with_summary(json!([
            {"project_id": "p1", "type": "instance", "user_id": "u1", "id": "vm-1", "rate": 1.5},
            {"project_id": "p1", "type": "volume", "user_id": "u1", "id": "vol-1", "rate": 0.25},
            {"project_id": "p1", "type": "image", "user_id": "u2", "id": "img-1", "rate": "0.1"},
            {"project_id": "p2", "type": "instance", "user_id": "u3", "id": "vm-2", "rate": 0.5}
        ]))
        .with_projects(&[("p1", "alpha")])
}
