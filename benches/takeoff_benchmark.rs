use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use qto::aggregate::aggregate;
use qto::scene::{COLLADA_NAMESPACE, parse_scene, prune_scene, write_scene_string};
use qto::{Dataset, MatchedIds, PatternMatcher, QuantityField};
use std::hint::black_box;

const KINDS: [&str; 5] = ["Wall-A", "Wall-B", "Door-A", "Window-C", "Slab-200"];

/// Generate an element table with `rows` rows
fn generate_csv(rows: usize) -> String {
    let mut csv = String::from(",Type,Area,Volume\n");
    for i in 0..rows {
        let kind = KINDS[i % KINDS.len()];
        csv.push_str(&format!("{},{},{}.{} m²,{}\n", i, kind, i % 97, i % 10, i % 13));
    }
    csv
}

/// Generate a scene with one node and one geometry per element
fn generate_dae(elements: usize) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<COLLADA xmlns=\"{}\" version=\"1.4.1\">\n  <library_geometries>\n",
        COLLADA_NAMESPACE
    );
    for i in 0..elements {
        xml.push_str(&format!(
            "    <geometry id=\"g{i}\">\n      <mesh>\n        <source id=\"s{i}\"><float_array count=\"9\">0 0 0 1 0 0 0 1 0</float_array></source>\n        <triangles count=\"1\"><p>0 1 2</p></triangles>\n      </mesh>\n    </geometry>\n"
        ));
    }
    xml.push_str("  </library_geometries>\n  <library_visual_scenes>\n    <visual_scene id=\"Scene\">\n");
    for i in 0..elements {
        xml.push_str(&format!(
            "      <node id=\"{i}\">\n        <instance_geometry url=\"#g{i}\"/>\n      </node>\n"
        ));
    }
    xml.push_str("    </visual_scene>\n  </library_visual_scenes>\n</COLLADA>\n");
    xml
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for rows in [100, 1_000, 10_000] {
        let csv = generate_csv(rows);
        let dataset = Dataset::from_reader(csv.as_bytes(), usize::MAX).unwrap();
        let matcher = PatternMatcher::new("all").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| {
                let mask = matcher.mask(dataset.column("Type").unwrap());
                let result = aggregate(dataset, &mask, "Type", QuantityField::Area);
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_load_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_dataset");

    for rows in [1_000, 10_000] {
        let csv = generate_csv(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| {
                let dataset = Dataset::from_reader(black_box(csv.as_bytes()), usize::MAX);
                black_box(dataset)
            });
        });
    }

    group.finish();
}

fn bench_prune_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("prune_scene");
    group.sample_size(20); // Reduce sample size for large documents

    for elements in [100, 1_000, 5_000] {
        let xml = generate_dae(elements);
        let ids: MatchedIds = (0..elements).step_by(3).map(|i| i.to_string()).collect();

        group.bench_with_input(BenchmarkId::from_parameter(elements), &xml, |b, xml| {
            b.iter(|| {
                let mut doc = parse_scene(black_box(xml)).unwrap();
                prune_scene(&mut doc, &ids).unwrap();
                black_box(write_scene_string(&doc).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_load_dataset, bench_prune_scene);
criterion_main!(benches);
