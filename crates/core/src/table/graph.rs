//! Undirected graph over line endpoints.
//!
//! Nodes are distinct endpoints (exact coordinates), edges are lines.
//! Junction nodes join lines that cross away from their endpoints. The
//! extractor only uses it to count disjoint stroke groups: a page whose lines
//! split into several components most likely holds more than one table.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::geometry::{Line, Point};

#[derive(Clone, Debug, Default)]
pub struct LineGraph {
    nodes: Vec<Point>,
    index: FxHashMap<(u64, u64), usize>,
    adjacency: Vec<Vec<usize>>,
}

impl LineGraph {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Self {
        let mut graph = Self::default();
        for line in lines {
            let a = graph.node(line.start);
            let b = graph.node(line.finish);
            graph.connect(a, b);
        }
        graph
    }

    fn node(&mut self, p: Point) -> usize {
        if let Some(&id) = self.index.get(&p.key()) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(p);
        self.adjacency.push(Vec::new());
        self.index.insert(p.key(), id);
        id
    }

    fn connect(&mut self, a: usize, b: usize) {
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    /// Join every line passing through `at` via a junction node.
    pub fn add_junction<'a>(&mut self, at: Point, lines: impl IntoIterator<Item = &'a Line>) {
        let junction = self.node(at);
        for line in lines {
            let a = self.node(line.start);
            let b = self.node(line.finish);
            self.connect(junction, a);
            self.connect(junction, b);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Connected components by breadth-first search, in node order.
    ///
    /// Lines that cross without sharing an endpoint stay in separate
    /// components unless a junction joins them.
    pub fn components(&self) -> Vec<Vec<Point>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        let mut out = Vec::new();
        for start in 0..self.nodes.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            queue.push_back(start);
            let mut group = Vec::new();
            while let Some(id) = queue.pop_front() {
                group.push(self.nodes[id]);
                for &n in &self.adjacency[id] {
                    if !visited[n] {
                        visited[n] = true;
                        queue.push_back(n);
                    }
                }
            }
            out.push(group);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn square_is_one_component() {
        let lines = [
            line(0.0, 0.0, 10.0, 0.0),
            line(10.0, 0.0, 10.0, 10.0),
            line(10.0, 10.0, 0.0, 10.0),
            line(0.0, 10.0, 0.0, 0.0),
        ];
        let graph = LineGraph::from_lines(&lines);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.components().len(), 1);
    }

    #[test]
    fn separate_boxes_are_separate_components() {
        let lines = [
            line(0.0, 0.0, 10.0, 0.0),
            line(10.0, 0.0, 0.0, 0.0),
            line(100.0, 100.0, 110.0, 100.0),
        ];
        let graph = LineGraph::from_lines(&lines);
        assert_eq!(graph.edge_count(), 2);
        let components = graph.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[1], vec![Point::new(100.0, 100.0), Point::new(110.0, 100.0)]);
    }

    #[test]
    fn junction_joins_crossing_lines() {
        let h = line(0.0, 5.0, 10.0, 5.0);
        let v = line(5.0, 0.0, 5.0, 10.0);
        let mut graph = LineGraph::from_lines([&h, &v]);
        assert_eq!(graph.components().len(), 2);
        graph.add_junction(Point::new(5.0, 5.0), [&h, &v]);
        assert_eq!(graph.components().len(), 1);
        assert_eq!(graph.node_count(), 5);
    }
}
