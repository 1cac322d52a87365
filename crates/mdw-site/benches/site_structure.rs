//! Benchmarks for site structure operations.

use std::fs;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mdw_site::{BuildContext, NavigationNode, SiteIndex, SiteOptions, sort_pages};

/// Create a site structure with specified depth and breadth.
fn create_site_structure(root: &Path, depth: usize, breadth: usize) {
    fn create_level(dir: &Path, current_depth: usize, max_depth: usize, breadth: usize) {
        if current_depth > max_depth {
            return;
        }

        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("index.md"),
            format!("/*\nTitle: Level {current_depth}\nOrder: {breadth}\n*/\nContent at depth {current_depth}."),
        )
        .unwrap();

        if current_depth > 0 {
            for i in 0..breadth {
                fs::write(
                    dir.join(format!("page-{i}.md")),
                    format!("/*\nTitle: Page {i}\nDate: 2016-02-0{}\n*/\nBody.", i % 9 + 1),
                )
                .unwrap();
            }
        }

        for i in 0..breadth {
            let child_dir = dir.join(format!("section-{i}"));
            create_level(&child_dir, current_depth + 1, max_depth, breadth);
        }
    }

    create_level(root, 0, depth, breadth);
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for (depth, breadth) in [(2, 5), (3, 5), (4, 3)] {
        let temp_dir = tempfile::tempdir().unwrap();
        let source_dir = temp_dir.path().join("content");
        create_site_structure(&source_dir, depth, breadth);
        let ctx = BuildContext::new(source_dir, SiteOptions::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{depth}_b{breadth}")),
            &ctx,
            |b, ctx| b.iter(|| NavigationNode::build(ctx).unwrap()),
        );
    }

    group.finish();
}

fn bench_site_index(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let source_dir = temp_dir.path().join("content");
    create_site_structure(&source_dir, 3, 5);
    let ctx = BuildContext::new(source_dir, SiteOptions::default()).unwrap();
    let root = NavigationNode::build(&ctx).unwrap();
    let index = SiteIndex::flatten(&root);

    let mut group = c.benchmark_group("site_index");

    group.bench_function("flatten", |b| b.iter(|| SiteIndex::flatten(&root)));

    group.bench_function("lookup_hit", |b| {
        b.iter(|| index.lookup("/section-0/section-1/page-2"))
    });

    group.bench_function("lookup_miss", |b| b.iter(|| index.lookup("nonexistent/path")));

    group.bench_function("sort_by_date", |b| {
        b.iter(|| sort_pages(index.pages(), "date", Some(10), true))
    });

    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_site_index);
criterion_main!(benches);
