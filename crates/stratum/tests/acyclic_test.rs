use stratum::{EdgeLabel, Graph, NodeLabel, acyclic};

fn has_cycle(g: &Graph) -> bool {
    let n = g.node_count();
    let mut indegree = vec![0usize; n];
    for e in g.edges().iter().filter(|e| !e.is_self_loop()) {
        indegree[e.w] += 1;
    }
    let mut ready: Vec<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut seen = 0;
    while let Some(v) = ready.pop() {
        seen += 1;
        for e in g.edges().iter().filter(|e| e.v == v && !e.is_self_loop()) {
            indegree[e.w] -= 1;
            if indegree[e.w] == 0 {
                ready.push(e.w);
            }
        }
    }
    seen < n
}

#[test]
fn acyclic_leaves_a_dag_untouched() {
    let mut g = Graph::default();
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    acyclic::run(&mut g);
    assert!(g.edges().iter().all(|e| !e.label.reversed));
    assert!(g.has_edge("a", "b") && g.has_edge("c", "d"));
}

#[test]
fn acyclic_breaks_a_simple_cycle() {
    let mut g = Graph::default();
    g.set_path(&["a", "b", "c", "a"]);
    acyclic::run(&mut g);
    assert!(!has_cycle(&g));
    assert_eq!(g.edges().iter().filter(|e| e.label.reversed).count(), 1);
}

#[test]
fn acyclic_breaks_nested_cycles_and_undo_restores_direction() {
    let mut g = Graph::default();
    g.set_path(&["a", "b", "c", "d", "a"]);
    g.set_path(&["b", "e", "b"]);
    let before: Vec<(usize, usize)> = g.edges().iter().map(|e| (e.v, e.w)).collect();

    acyclic::run(&mut g);
    assert!(!has_cycle(&g));

    acyclic::undo(&mut g);
    let after: Vec<(usize, usize)> = g.edges().iter().map(|e| (e.v, e.w)).collect();
    assert_eq!(before, after);
    assert!(g.edges().iter().all(|e| !e.label.reversed));
}

#[test]
fn acyclic_ignores_self_loops() {
    let mut g = Graph::default();
    g.set_node("a", NodeLabel::default());
    g.set_edge("a", "a", EdgeLabel::default());
    acyclic::run(&mut g);
    assert!(!g.edges()[0].label.reversed);
}
