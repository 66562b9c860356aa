use stratum::{EdgeLabel, Graph, GraphLabel, Ranker, acyclic, rank};

fn gansner(ranker: Ranker) -> Graph {
    let mut g = Graph::new(GraphLabel {
        ranker,
        ..Default::default()
    });
    g.set_path(&["a", "b", "c", "d", "h"]);
    g.set_path(&["a", "e", "g", "h"]);
    g.set_path(&["a", "f", "g"]);
    g
}

fn rank_of(g: &Graph, id: &str) -> i32 {
    g.node(id).and_then(|n| n.rank).unwrap()
}

fn assert_respects_minlen(g: &Graph) {
    for e in g.edges() {
        let rv = g.node_by_ix(e.v).rank.unwrap();
        let rw = g.node_by_ix(e.w).rank.unwrap();
        assert!(
            rw - rv >= e.label.minlen as i32,
            "edge {:?} -> {:?} violates minlen",
            g.node_id(e.v),
            g.node_id(e.w)
        );
    }
}

fn total_length(g: &Graph) -> i32 {
    g.edges()
        .iter()
        .map(|e| g.node_by_ix(e.w).rank.unwrap() - g.node_by_ix(e.v).rank.unwrap())
        .sum()
}

#[test]
fn every_ranker_respects_minlen() {
    for ranker in [Ranker::LongestPath, Ranker::TightTree, Ranker::NetworkSimplex] {
        let mut g = gansner(ranker);
        rank::rank(&mut g);
        assert_respects_minlen(&g);
        assert_eq!(rank_of(&g, "a"), 0, "{ranker:?}");
    }
}

#[test]
fn network_simplex_minimizes_total_edge_length() {
    let mut g = gansner(Ranker::NetworkSimplex);
    rank::rank(&mut g);
    assert_eq!(total_length(&g), 10);
    assert_eq!(rank_of(&g, "h"), 4);
    assert_eq!(rank_of(&g, "g"), 2);

    let mut lp = gansner(Ranker::LongestPath);
    rank::rank(&mut lp);
    assert_eq!(total_length(&lp), 11);
}

#[test]
fn minlen_is_honored() {
    let mut g = Graph::default();
    g.set_path(&["a", "b"]);
    g.set_node("c", Default::default());
    g.set_edge(
        "a",
        "c",
        EdgeLabel {
            minlen: 3,
            ..Default::default()
        },
    );
    rank::rank(&mut g);
    assert_eq!(rank_of(&g, "c") - rank_of(&g, "a"), 3);
    assert_eq!(rank_of(&g, "b") - rank_of(&g, "a"), 1);
}

#[test]
fn each_component_starts_at_rank_zero() {
    let mut g = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["x", "y"]);
    g.set_node("lonely", Default::default());
    rank::rank(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "x"), 0);
    assert_eq!(rank_of(&g, "y"), 1);
    assert_eq!(rank_of(&g, "lonely"), 0);
    assert_eq!(rank::max_rank(&g), Some(2));
}

#[test]
fn heavier_edges_are_kept_short() {
    // The heavy e -> d edge pulls e down next to d instead of leaving it under a.
    let mut g = Graph::default();
    g.set_path(&["a", "b", "c", "d"]);
    g.set_node("e", Default::default());
    g.set_edge("e", "d", EdgeLabel::weighted(5.0));
    g.set_edge("a", "e", EdgeLabel::weighted(1.0));
    rank::rank(&mut g);
    assert_eq!(rank_of(&g, "d") - rank_of(&g, "e"), 1);
}

#[test]
fn ranking_after_cycle_breaking_is_feasible() {
    let mut g = Graph::default();
    g.set_path(&["a", "b", "c", "a"]);
    acyclic::run(&mut g);
    rank::rank(&mut g);
    assert_respects_minlen(&g);
}
