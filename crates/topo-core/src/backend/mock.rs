//! [`InMemoryBackend`]: a reference [`TopologyBackend`] good enough to back
//! this crate's own tests and small single-process embeddings. Linear-scan
//! bbox/proximity queries — a real back end would use a spatial index, but
//! indexing beyond bounding-box queries is out of scope for this crate.

use std::collections::HashMap;

use super::TopologyBackend;
use crate::error::TopoError;
use crate::geometry::line::BoundingBox;
use crate::geometry::point::Point2d;
use crate::model::{Edge, EdgeFields, Face, FaceFields, Node, NodeFields, NodeId, EdgeId, FaceId, SignedEdgeId};

#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    srid: i32,
    precision: f64,
    has_z: bool,
    next_node_id: i64,
    next_edge_id: i64,
    next_face_id: i64,
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    faces: HashMap<FaceId, Face>,
}

impl InMemoryBackend {
    pub fn new(srid: i32, precision: f64, has_z: bool) -> Self {
        Self {
            srid,
            precision,
            has_z,
            next_node_id: 1,
            next_edge_id: 1,
            next_face_id: 1,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            faces: HashMap::new(),
        }
    }

}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(0, 0.0, false)
    }
}

impl TopologyBackend for InMemoryBackend {
    fn srid(&self) -> i32 {
        self.srid
    }

    fn precision(&self) -> f64 {
        self.precision
    }

    fn has_z(&self) -> bool {
        self.has_z
    }

    fn get_node_by_id(&self, ids: &[NodeId], _fields: NodeFields) -> Result<Vec<Node>, TopoError> {
        Ok(ids.iter().filter_map(|id| self.nodes.get(id).copied()).collect())
    }

    fn get_edge_by_id(&self, ids: &[EdgeId], _fields: EdgeFields) -> Result<Vec<Edge>, TopoError> {
        Ok(ids.iter().filter_map(|id| self.edges.get(id).cloned()).collect())
    }

    fn get_face_by_id(&self, ids: &[FaceId], _fields: FaceFields) -> Result<Vec<Face>, TopoError> {
        Ok(ids.iter().filter_map(|id| self.faces.get(id).copied()).collect())
    }

    fn get_node_within_box2d(
        &self,
        bbox: BoundingBox,
        _fields: NodeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Node>, TopoError> {
        let mut out: Vec<Node> = self
            .nodes
            .values()
            .filter(|n| bbox.contains_point(&n.geom))
            .copied()
            .collect();
        out.sort_by_key(|n| n.node_id);
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn get_edge_within_box2d(
        &self,
        bbox: BoundingBox,
        _fields: EdgeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Edge>, TopoError> {
        let mut out: Vec<Edge> = self
            .edges
            .values()
            .filter(|e| bbox.intersects(&e.geom.bounding_box()))
            .cloned()
            .collect();
        out.sort_by_key(|e| e.edge_id);
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn get_face_within_box2d(
        &self,
        bbox: BoundingBox,
        _fields: FaceFields,
        limit: Option<usize>,
    ) -> Result<Vec<Face>, TopoError> {
        let mut out: Vec<Face> = self
            .faces
            .values()
            .filter(|f| bbox.intersects(&f.mbr))
            .copied()
            .collect();
        out.sort_by_key(|f| f.face_id);
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn get_node_within_distance2d(
        &self,
        point: Point2d,
        distance: f64,
        _fields: NodeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Node>, TopoError> {
        let mut out: Vec<Node> = self
            .nodes
            .values()
            .filter(|n| n.geom.distance_to(&point) <= distance)
            .copied()
            .collect();
        out.sort_by(|a, b| {
            a.geom
                .distance_to(&point)
                .partial_cmp(&b.geom.distance_to(&point))
                .unwrap()
                .then(a.node_id.cmp(&b.node_id))
        });
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn get_edge_within_distance2d(
        &self,
        point: Point2d,
        distance: f64,
        _fields: EdgeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Edge>, TopoError> {
        let mut out: Vec<(f64, Edge)> = self
            .edges
            .values()
            .filter_map(|e| {
                let d = e
                    .geom
                    .points()
                    .windows(2)
                    .map(|w| {
                        let (a, b) = (w[0], w[1]);
                        let ab = b - a;
                        let len2 = ab.length_squared();
                        let t = if len2 < 1e-300 {
                            0.0
                        } else {
                            ((point - a).dot(&ab) / len2).clamp(0.0, 1.0)
                        };
                        (a + ab * t).distance_to(&point)
                    })
                    .fold(f64::INFINITY, f64::min);
                (d <= distance).then_some((d, e.clone()))
            })
            .collect();
        out.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap().then(x.1.edge_id.cmp(&y.1.edge_id)));
        let mut out: Vec<Edge> = out.into_iter().map(|(_, e)| e).collect();
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn get_edge_by_node(&self, node_ids: &[NodeId], _fields: EdgeFields) -> Result<Vec<Edge>, TopoError> {
        Ok(self
            .edges
            .values()
            .filter(|e| node_ids.contains(&e.start_node) || node_ids.contains(&e.end_node))
            .cloned()
            .collect())
    }

    fn get_edge_by_face(
        &self,
        face_ids: &[FaceId],
        _fields: EdgeFields,
        bbox: Option<BoundingBox>,
    ) -> Result<Vec<Edge>, TopoError> {
        Ok(self
            .edges
            .values()
            .filter(|e| {
                (face_ids.contains(&e.face_left) || face_ids.contains(&e.face_right))
                    && bbox.map(|b| b.intersects(&e.geom.bounding_box())).unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    fn get_node_by_face(
        &self,
        face_ids: &[FaceId],
        _fields: NodeFields,
        bbox: Option<BoundingBox>,
    ) -> Result<Vec<Node>, TopoError> {
        Ok(self
            .nodes
            .values()
            .filter(|n| {
                n.containing_face.map(|f| face_ids.contains(&f)).unwrap_or(false)
                    && bbox.map(|b| b.contains_point(&n.geom)).unwrap_or(true)
            })
            .copied()
            .collect())
    }

    fn get_face_containing_point(&self, _point: Point2d) -> Result<Option<FaceId>, TopoError> {
        // The mock backend has no general point-in-polygon index over
        // stored faces; callers needing this predicate for non-universe
        // faces should use `GeometryKernel::covers` against an explicitly
        // reconstructed face geometry instead. Reporting "universe" is
        // the conservative default this mock makes available.
        Ok(None)
    }

    fn get_ring_edges(
        &self,
        start: SignedEdgeId,
        limit: Option<usize>,
    ) -> Result<Vec<SignedEdgeId>, TopoError> {
        let mut out = Vec::new();
        let mut current = start;
        let cap = limit.unwrap_or(10_000);
        loop {
            out.push(current);
            let edge = self
                .edges
                .get(&current.edge_id())
                .ok_or_else(|| TopoError::corrupted(format!("dangling ring edge {current}")))?;
            current = edge.next_along_left_of(current);
            if current == start {
                break;
            }
            if out.len() >= cap {
                return Err(TopoError::corrupted("ring walk did not close within limit"));
            }
        }
        Ok(out)
    }

    fn get_next_edge_id(&mut self) -> Result<EdgeId, TopoError> {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        Ok(id)
    }

    fn insert_nodes(&mut self, rows: Vec<Node>) -> Result<Vec<NodeId>, TopoError> {
        let mut ids = Vec::with_capacity(rows.len());
        for mut row in rows {
            let id = NodeId(self.next_node_id);
            self.next_node_id += 1;
            row.node_id = id;
            ids.push(id);
            self.nodes.insert(id, row);
        }
        Ok(ids)
    }

    fn insert_edges(&mut self, rows: Vec<Edge>) -> Result<Vec<EdgeId>, TopoError> {
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.edge_id;
            ids.push(id);
            self.edges.insert(id, row);
            if id.0 >= self.next_edge_id {
                self.next_edge_id = id.0 + 1;
            }
        }
        Ok(ids)
    }

    fn insert_faces(&mut self, rows: Vec<Face>) -> Result<Vec<FaceId>, TopoError> {
        let mut ids = Vec::with_capacity(rows.len());
        for mut row in rows {
            let id = FaceId(self.next_face_id);
            self.next_face_id += 1;
            row.face_id = id;
            ids.push(id);
            self.faces.insert(id, row);
        }
        Ok(ids)
    }

    fn update_nodes_by_id(&mut self, rows: Vec<Node>) -> Result<(), TopoError> {
        for row in rows {
            self.nodes.insert(row.node_id, row);
        }
        Ok(())
    }

    fn update_edges_by_id(&mut self, rows: Vec<Edge>) -> Result<(), TopoError> {
        for row in rows {
            self.edges.insert(row.edge_id, row);
        }
        Ok(())
    }

    fn update_faces_by_id(&mut self, rows: Vec<Face>) -> Result<(), TopoError> {
        for row in rows {
            self.faces.insert(row.face_id, row);
        }
        Ok(())
    }

    fn delete_nodes_by_id(&mut self, ids: &[NodeId]) -> Result<(), TopoError> {
        for id in ids {
            self.nodes.remove(id);
        }
        Ok(())
    }

    fn delete_edges_by_id(&mut self, ids: &[EdgeId]) -> Result<(), TopoError> {
        for id in ids {
            self.edges.remove(id);
        }
        Ok(())
    }

    fn delete_faces_by_id(&mut self, ids: &[FaceId]) -> Result<(), TopoError> {
        for id in ids {
            self.faces.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::line::Line2d;
    use crate::model::SignedEdgeId;

    #[test]
    fn test_insert_and_fetch_node() {
        let mut be = InMemoryBackend::default();
        let ids = be
            .insert_nodes(vec![Node::new(NodeId(0), None, Point2d::new(1.0, 2.0))])
            .unwrap();
        let fetched = be.get_node_by_id(&ids, NodeFields::ALL).unwrap();
        assert_eq!(fetched[0].geom, Point2d::new(1.0, 2.0));
    }

    #[test]
    fn test_ring_walk_self_loop() {
        let mut be = InMemoryBackend::default();
        let edge = Edge {
            edge_id: EdgeId(1),
            start_node: NodeId(1),
            end_node: NodeId(2),
            face_left: FaceId(0),
            face_right: FaceId(0),
            next_left: SignedEdgeId::new(EdgeId(1), false),
            next_right: SignedEdgeId::new(EdgeId(1), true),
            geom: Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)]),
        };
        be.insert_edges(vec![edge]).unwrap();
        let ring = be.get_ring_edges(SignedEdgeId::new(EdgeId(1), true), None).unwrap();
        assert_eq!(ring, vec![SignedEdgeId::new(EdgeId(1), true)]);
    }
}
