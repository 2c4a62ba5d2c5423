/*
   Copyright 2024 James Forster

   This file is part of intervalidus.

   intervalidus is free software: you can redistribute it and/or
   modify it under the terms of the GNU Affero General Public License
   as published by the Free Software Foundation, either version 3 of
   the License, or (at your option) any later version.

   intervalidus is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
   Affero General Public License for more details.

   You should have received a copy of the GNU Affero General Public
   License along with intervalidus. If not, see
   <https://www.gnu.org/licenses/>.
*/

use crate::geometry::DataBox;

/// A payload with its conservative bounding box. When a payload
/// straddles several children of a branch it is stored once per
/// child, clipped, with `parent_box` carrying the pre-split box so
/// the copies can be told apart from genuinely distinct payloads.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxedPayload<A> {
    bbox: DataBox,
    payload: A,
    parent_box: Option<DataBox>,
}

impl<A> BoxedPayload<A> {
    pub fn new(bbox: DataBox, payload: A) -> Self {
        Self {
            bbox,
            payload,
            parent_box: None,
        }
    }

    pub fn bbox(&self) -> &DataBox {
        &self.bbox
    }

    pub fn payload(&self) -> &A {
        &self.payload
    }

    /// The box this payload was inserted with, before any splitting.
    pub fn original_box(&self) -> &DataBox {
        self.parent_box.as_ref().unwrap_or(&self.bbox)
    }
}

impl<A: Clone> BoxedPayload<A> {
    fn split_to(&self, piece: DataBox) -> Self {
        Self {
            bbox: piece,
            payload: self.payload.clone(),
            parent_box: Some(*self.original_box()),
        }
    }

    fn reconstituted(&self) -> Self {
        Self {
            bbox: *self.original_box(),
            payload: self.payload.clone(),
            parent_box: None,
        }
    }
}

#[derive(Clone, Debug)]
enum Node<A> {
    Leaf {
        boundary: DataBox,
        items: Vec<BoxedPayload<A>>,
    },
    Branch {
        boundary: DataBox,
        children: Vec<Node<A>>,
    },
}

impl<A> Node<A> {
    fn boundary(&self) -> &DataBox {
        match self {
            Node::Leaf { boundary, .. } | Node::Branch { boundary, .. } => boundary,
        }
    }
}

/// A mutable spatial index over boxed payloads: a binary tree in one
/// dimension, a quadtree in two, an octree in three.
///
/// Leaves hold up to `node_capacity` payloads and subdivide on
/// overflow by bisecting their boundary on every axis; `depth_limit`
/// bounds subdivision, because payloads with colliding ordered hashes
/// can never be separated spatially. Queries return a superset of the
/// matching payloads, possibly with duplicates from splitting; the
/// caller filters by exact interval intersection.
#[derive(Clone, Debug)]
pub struct BoxTree<A> {
    root: Node<A>,
    node_capacity: usize,
    depth_limit: usize,
}

impl<A: Clone + PartialEq> BoxTree<A> {
    pub fn new(dim: usize, node_capacity: usize, depth_limit: usize) -> Self {
        let unit = vec![1.0; dim];
        let boundary = DataBox::from_bounds(
            &unit.iter().map(|x| -x).collect::<Vec<_>>(),
            &unit,
        );
        Self {
            root: Node::Leaf {
                boundary,
                items: Vec::new(),
            },
            node_capacity: node_capacity.max(1),
            depth_limit,
        }
    }

    pub fn insert(&mut self, payload: BoxedPayload<A>) {
        if let Node::Branch { boundary, .. } = &self.root {
            if !boundary.contains_box(payload.original_box()) {
                self.grow(payload);
                return;
            }
        }
        let (capacity, limit) = (self.node_capacity, self.depth_limit);
        Self::insert_node(&mut self.root, payload, 0, capacity, limit);
    }

    /// Removes every copy of a payload by its originating box and
    /// payload identity, ignoring any split clipping.
    pub fn remove(&mut self, original_box: &DataBox, payload: &A) {
        Self::remove_node(&mut self.root, original_box, payload);
    }

    /// All payloads whose box intersects the query. The result may
    /// hold split duplicates and ordered-hash false positives.
    pub fn query(&self, query: &DataBox) -> Vec<&BoxedPayload<A>> {
        let mut found = Vec::new();
        Self::query_node(&self.root, query, &mut found);
        found
    }

    /// Distinct payloads, reconstituted to their pre-split boxes.
    pub fn originals(&self) -> Vec<BoxedPayload<A>> {
        let mut out: Vec<BoxedPayload<A>> = Vec::new();
        Self::collect_node(&self.root, &mut out);
        out
    }

    /// The whole tree is rebuilt around a boundary covering both the
    /// old content and the stray payload.
    fn grow(&mut self, payload: BoxedPayload<A>) {
        let mut originals = self.originals();
        originals.push(payload.reconstituted());
        let boundary = originals
            .iter()
            .fold(*self.root.boundary(), |acc, item| acc.hull(&item.bbox));
        log::debug!("box tree outgrown, rebuilding around {boundary:?}");
        self.root = Node::Leaf {
            boundary,
            items: Vec::new(),
        };
        let (capacity, limit) = (self.node_capacity, self.depth_limit);
        for item in originals {
            Self::insert_node(&mut self.root, item, 0, capacity, limit);
        }
    }

    fn insert_node(
        node: &mut Node<A>,
        payload: BoxedPayload<A>,
        depth: usize,
        capacity: usize,
        limit: usize,
    ) {
        match node {
            Node::Leaf { boundary, items } => {
                if items.len() < capacity || depth >= limit {
                    items.push(payload);
                    return;
                }
                // cover any content the initial boundary never saw
                let full = items
                    .iter()
                    .chain(Some(&payload))
                    .fold(*boundary, |acc, item| acc.hull(&item.bbox));
                if full.too_small_to_subdivide() {
                    items.push(payload);
                    return;
                }
                let children = full
                    .subdivide()
                    .into_iter()
                    .map(|boundary| Node::Leaf {
                        boundary,
                        items: Vec::new(),
                    })
                    .collect();
                let prior = std::mem::take(items);
                *node = Node::Branch {
                    boundary: full,
                    children,
                };
                for item in prior {
                    Self::insert_node(node, item, depth, capacity, limit);
                }
                Self::insert_node(node, payload, depth, capacity, limit);
            }
            Node::Branch { children, .. } => {
                for child in children {
                    if let Some(piece) = child.boundary().intersection(&payload.bbox) {
                        let clipped = if piece == payload.bbox {
                            payload.clone()
                        } else {
                            payload.split_to(piece)
                        };
                        Self::insert_node(child, clipped, depth + 1, capacity, limit);
                    }
                }
            }
        }
    }

    fn remove_node(node: &mut Node<A>, original_box: &DataBox, payload: &A) {
        match node {
            Node::Leaf { items, .. } => {
                items.retain(|item| {
                    item.payload != *payload || item.original_box() != original_box
                });
            }
            Node::Branch { children, .. } => {
                for child in children {
                    if child.boundary().intersects(original_box) {
                        Self::remove_node(child, original_box, payload);
                    }
                }
            }
        }
    }

    fn query_node<'a>(node: &'a Node<A>, query: &DataBox, found: &mut Vec<&'a BoxedPayload<A>>) {
        match node {
            Node::Leaf { items, .. } => {
                found.extend(items.iter().filter(|item| item.bbox.intersects(query)));
            }
            Node::Branch { children, .. } => {
                for child in children {
                    if child.boundary().intersects(query) {
                        Self::query_node(child, query, found);
                    }
                }
            }
        }
    }

    fn collect_node(node: &Node<A>, out: &mut Vec<BoxedPayload<A>>) {
        match node {
            Node::Leaf { items, .. } => {
                for item in items {
                    let original = item.reconstituted();
                    if !out.contains(&original) {
                        out.push(original);
                    }
                }
            }
            Node::Branch { children, .. } => {
                for child in children {
                    Self::collect_node(child, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b1(lo: f64, hi: f64) -> DataBox {
        DataBox::from_bounds(&[lo], &[hi])
    }

    fn payloads(tree: &BoxTree<usize>, query: &DataBox) -> Vec<usize> {
        let mut ids: Vec<usize> = tree.query(query).iter().map(|p| *p.payload()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    #[test]
    fn query_finds_only_intersecting_payloads() {
        let mut tree = BoxTree::new(1, 4, 8);
        for i in 0..20usize {
            let lo = i as f64 * 10.0;
            tree.insert(BoxedPayload::new(b1(lo, lo + 5.0), i));
        }
        assert_eq!(payloads(&tree, &b1(12.0, 27.0)), vec![1, 2]);
        assert_eq!(payloads(&tree, &b1(500.0, 600.0)), Vec::<usize>::new());
        // endpoints are closed
        assert_eq!(payloads(&tree, &b1(15.0, 15.0)), vec![1]);
    }

    #[test]
    fn straddling_payloads_are_split_and_deduplicated() {
        let mut tree = BoxTree::new(1, 2, 8);
        for i in 0..8usize {
            tree.insert(BoxedPayload::new(b1(0.0, 100.0), i));
        }
        // every payload straddles everything, so raw queries see
        // split copies, while originals() reconstitutes them
        let raw = tree.query(&b1(0.0, 100.0)).len();
        assert!(raw >= 8);
        let originals = tree.originals();
        assert_eq!(originals.len(), 8);
        assert!(originals.iter().all(|p| *p.bbox() == b1(0.0, 100.0)));
    }

    #[test]
    fn identical_boxes_stop_at_the_depth_limit() {
        let mut tree = BoxTree::new(1, 2, 6);
        for i in 0..50usize {
            tree.insert(BoxedPayload::new(b1(42.0, 42.0), i));
        }
        assert_eq!(payloads(&tree, &b1(42.0, 42.0)), (0..50).collect::<Vec<_>>());
        assert_eq!(payloads(&tree, &b1(43.0, 44.0)), Vec::<usize>::new());
    }

    #[test]
    fn growth_rebuilds_around_new_content() {
        let mut tree = BoxTree::new(1, 2, 8);
        for i in 0..6usize {
            let lo = i as f64;
            tree.insert(BoxedPayload::new(b1(lo, lo + 0.5), i));
        }
        // far outside the subdivided root
        tree.insert(BoxedPayload::new(b1(1e6, 1e6 + 1.0), 99));
        assert_eq!(payloads(&tree, &b1(1e6, 1e6)), vec![99]);
        assert_eq!(payloads(&tree, &b1(0.0, 10.0)), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn removal_erases_every_split_copy() {
        let mut tree = BoxTree::new(1, 2, 8);
        for i in 0..8usize {
            tree.insert(BoxedPayload::new(b1(0.0, 100.0), i));
        }
        tree.remove(&b1(0.0, 100.0), &3);
        assert_eq!(payloads(&tree, &b1(0.0, 100.0)), vec![0, 1, 2, 4, 5, 6, 7]);
        assert_eq!(tree.originals().len(), 7);
    }
}
