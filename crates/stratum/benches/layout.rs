use criterion::{Criterion, black_box, criterion_group, criterion_main};
use stratum::{EdgeLabel, Graph, GraphLabel, NodeLabel, layout};

/// A topic-tree shaped graph: `fanout` children per node, `depth` levels, plus a few
/// cross links between siblings.
fn topic_tree(fanout: usize, depth: usize) -> Graph {
    let mut g = Graph::new(GraphLabel {
        nodesep: 96.0,
        ranksep: 144.0,
        edgesep: 60.0,
        ..Default::default()
    });
    g.set_node("n", NodeLabel::sized(180.0, 60.0));
    let mut frontier = vec!["n".to_string()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            for i in 0..fanout {
                let id = format!("{parent}.{i}");
                g.set_node(id.clone(), NodeLabel::sized(140.0, 48.0));
                g.set_edge(parent, &id, EdgeLabel::weighted(2.0));
                next.push(id);
            }
        }
        for pair in next.chunks(2) {
            if let [a, b] = pair {
                g.set_edge(b, a, EdgeLabel::default());
            }
        }
        frontier = next;
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let base = topic_tree(4, 3);
    c.bench_function("layout_topic_tree_4x3", |b| {
        b.iter(|| {
            let mut g = base.clone();
            layout(black_box(&mut g));
            g
        })
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
