//! Benchmarks for the manifest checkers
//!
//! Both checkers are linear in container and volume counts; this measures
//! them across pod specs of increasing width.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

use ocp_core::{ComplianceValidator, Manifest, PolicyLogger, SecurityChecker};

struct NullLogger;

impl PolicyLogger for NullLogger {
    fn warn(&self, _message: &str) {}
}

fn wide_manifest(width: usize) -> Manifest {
    let containers: Vec<Value> = (0..width)
        .map(|i| {
            json!({
                "name": format!("c{}", i),
                "imagePullPolicy": if i % 2 == 0 { "Always" } else { "IfNotPresent" },
                "securityContext": {"privileged": i % 5 == 0},
                "resources": {"limits": {"cpu": "1"}}
            })
        })
        .collect();
    let volumes: Vec<Value> = (0..width)
        .map(|i| {
            if i % 3 == 0 {
                json!({"name": format!("v{}", i), "hostPath": {"path": "/var/log"}})
            } else {
                json!({"name": format!("v{}", i), "emptyDir": {}})
            }
        })
        .collect();

    Manifest::new(json!({
        "kind": "Deployment",
        "metadata": {"name": "bench", "labels": {"app": "bench"}},
        "spec": {"template": {"spec": {
            "hostNetwork": true,
            "containers": containers,
            "volumes": volumes
        }}}
    }))
}

fn bench_checkers(c: &mut Criterion) {
    let checker = SecurityChecker::with_logger(Arc::new(NullLogger));
    let validator = ComplianceValidator::new();
    let mut group = c.benchmark_group("checkers");

    for width in [1, 10, 100] {
        let manifest = wide_manifest(width);

        group.bench_with_input(BenchmarkId::new("security", width), &manifest, |b, m| {
            b.iter(|| checker.check(black_box(m)))
        });
        group.bench_with_input(BenchmarkId::new("compliance", width), &manifest, |b, m| {
            b.iter(|| validator.validate(black_box(m)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_checkers);
criterion_main!(benches);
