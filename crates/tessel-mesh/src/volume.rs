//! Volume (tetrahedral) mesh: a [`RawVolumeMesh`] record wired into an
//! [`ArrayGroup`].
//!
//! Unlike the planar record, the volume library allocates and frees
//! the record's buffers itself, so every array here is borrowed: the
//! wrapper observes pointers and counts in place and never frees what
//! the library allocated. Facets are structured elements and are
//! exposed read-only.

use std::os::raw::c_int;

use tessel_array::{ArrayGroup, ArrayId, RawSlots};
use tessel_core::ArrayError;

use crate::record::{RawFacet, RawVolumeMesh};

#[derive(Clone, Copy, Debug)]
struct VolumeIds {
    points: ArrayId<f64>,
    point_attributes: ArrayId<f64>,
    point_metric_tensors: ArrayId<f64>,
    point_markers: ArrayId<i32>,
    elements: ArrayId<i32>,
    element_attributes: ArrayId<f64>,
    element_volumes: ArrayId<f64>,
    neighbors: ArrayId<i32>,
    facets: ArrayId<RawFacet>,
    facet_markers: ArrayId<i32>,
    holes: ArrayId<f64>,
    regions: ArrayId<f64>,
    faces: ArrayId<i32>,
    adjacent_elements: ArrayId<i32>,
    face_markers: ArrayId<i32>,
    edges: ArrayId<i32>,
    edge_markers: ArrayId<i32>,
}

/// A volume mesh: exchange record plus the array group that keeps its
/// pointer and count fields coherent.
pub struct VolumeMesh {
    // Declared before `record` so the group (which holds raw pointers
    // into the record) tears down first.
    group: ArrayGroup,
    ids: VolumeIds,
    record: Box<RawVolumeMesh>,
}

impl VolumeMesh {
    /// Create an empty volume mesh with tetrahedra of four corners.
    pub fn new() -> Result<Self, ArrayError> {
        let mut record = Box::new(RawVolumeMesh::default());
        let corners = record.number_of_corners.max(0) as u32;

        let mut group = ArrayGroup::new();
        let r = &mut *record;

        let points = group.insert_borrowed(
            "points",
            unsafe { RawSlots::new(&mut r.point_list, &mut r.number_of_points) },
            3,
        )?;
        let point_attributes = group.insert_slave(
            "point_attributes",
            unsafe { RawSlots::new(&mut r.point_attribute_list, &mut r.number_of_points) },
            0,
            points,
        )?;
        let point_metric_tensors = group.insert_slave(
            "point_metric_tensors",
            unsafe { RawSlots::new(&mut r.point_mtr_list, &mut r.number_of_points) },
            0,
            points,
        )?;
        let point_markers = group.insert_slave(
            "point_markers",
            unsafe { RawSlots::new(&mut r.point_marker_list, &mut r.number_of_points) },
            1,
            points,
        )?;

        let elements = group.insert_borrowed(
            "elements",
            unsafe { RawSlots::new(&mut r.tetrahedron_list, &mut r.number_of_tetrahedra) },
            corners,
        )?;
        let element_attributes = group.insert_slave(
            "element_attributes",
            unsafe {
                RawSlots::new(
                    &mut r.tetrahedron_attribute_list,
                    &mut r.number_of_tetrahedra,
                )
            },
            0,
            elements,
        )?;
        let element_volumes = group.insert_slave(
            "element_volumes",
            unsafe { RawSlots::new(&mut r.tetrahedron_volume_list, &mut r.number_of_tetrahedra) },
            1,
            elements,
        )?;
        let neighbors = group.insert_slave(
            "neighbors",
            unsafe { RawSlots::new(&mut r.neighbor_list, &mut r.number_of_tetrahedra) },
            4,
            elements,
        )?;

        let facets = group.insert_borrowed(
            "facets",
            unsafe { RawSlots::new(&mut r.facet_list, &mut r.number_of_facets) },
            1,
        )?;
        let facet_markers = group.insert_slave(
            "facet_markers",
            unsafe { RawSlots::new(&mut r.facet_marker_list, &mut r.number_of_facets) },
            1,
            facets,
        )?;

        let holes = group.insert_borrowed(
            "holes",
            unsafe { RawSlots::new(&mut r.hole_list, &mut r.number_of_holes) },
            3,
        )?;
        let regions = group.insert_borrowed(
            "regions",
            unsafe { RawSlots::new(&mut r.region_list, &mut r.number_of_regions) },
            5,
        )?;

        let faces = group.insert_borrowed(
            "faces",
            unsafe { RawSlots::new(&mut r.tri_face_list, &mut r.number_of_tri_faces) },
            3,
        )?;
        let adjacent_elements = group.insert_slave(
            "adjacent_elements",
            unsafe { RawSlots::new(&mut r.adj_tet_list, &mut r.number_of_tri_faces) },
            2,
            faces,
        )?;
        let face_markers = group.insert_slave(
            "face_markers",
            unsafe { RawSlots::new(&mut r.tri_face_marker_list, &mut r.number_of_tri_faces) },
            1,
            faces,
        )?;

        let edges = group.insert_borrowed(
            "edges",
            unsafe { RawSlots::new(&mut r.edge_list, &mut r.number_of_edges) },
            2,
        )?;
        let edge_markers = group.insert_slave(
            "edge_markers",
            unsafe { RawSlots::new(&mut r.edge_marker_list, &mut r.number_of_edges) },
            1,
            edges,
        )?;

        Ok(Self {
            group,
            ids: VolumeIds {
                points,
                point_attributes,
                point_metric_tensors,
                point_markers,
                elements,
                element_attributes,
                element_volumes,
                neighbors,
                facets,
                facet_markers,
                holes,
                regions,
                faces,
                adjacent_elements,
                face_markers,
                edges,
                edge_markers,
            },
            record,
        })
    }

    /// The array group backing this mesh.
    pub fn group(&self) -> &ArrayGroup {
        &self.group
    }

    /// Mutable access to the array group.
    pub fn group_mut(&mut self) -> &mut ArrayGroup {
        &mut self.group
    }

    /// Point coordinates, three per point. Master of the point family.
    pub fn points(&self) -> ArrayId<f64> {
        self.ids.points
    }

    /// Per-point attributes.
    pub fn point_attributes(&self) -> ArrayId<f64> {
        self.ids.point_attributes
    }

    /// Per-point metric tensors for adaptive sizing.
    pub fn point_metric_tensors(&self) -> ArrayId<f64> {
        self.ids.point_metric_tensors
    }

    /// Per-point boundary markers.
    pub fn point_markers(&self) -> ArrayId<i32> {
        self.ids.point_markers
    }

    /// Tetrahedron connectivity. Master of the element family.
    pub fn elements(&self) -> ArrayId<i32> {
        self.ids.elements
    }

    /// Per-element attributes.
    pub fn element_attributes(&self) -> ArrayId<f64> {
        self.ids.element_attributes
    }

    /// Per-element maximum-volume constraints.
    pub fn element_volumes(&self) -> ArrayId<f64> {
        self.ids.element_volumes
    }

    /// Per-element neighbor indices.
    pub fn neighbors(&self) -> ArrayId<i32> {
        self.ids.neighbors
    }

    /// Boundary facets (structured, read-only). Master of the facet
    /// family.
    pub fn facets(&self) -> ArrayId<RawFacet> {
        self.ids.facets
    }

    /// Per-facet boundary markers.
    pub fn facet_markers(&self) -> ArrayId<i32> {
        self.ids.facet_markers
    }

    /// Hole seed coordinates.
    pub fn holes(&self) -> ArrayId<f64> {
        self.ids.holes
    }

    /// Region descriptors: seed point, regional attribute, volume
    /// bound.
    pub fn regions(&self) -> ArrayId<f64> {
        self.ids.regions
    }

    /// Boundary triangle faces. Master of the face family.
    pub fn faces(&self) -> ArrayId<i32> {
        self.ids.faces
    }

    /// The two elements adjacent to each face.
    pub fn adjacent_elements(&self) -> ArrayId<i32> {
        self.ids.adjacent_elements
    }

    /// Per-face boundary markers.
    pub fn face_markers(&self) -> ArrayId<i32> {
        self.ids.face_markers
    }

    /// Edge endpoint indices. Master of the edge family.
    pub fn edges(&self) -> ArrayId<i32> {
        self.ids.edges
    }

    /// Per-edge boundary markers.
    pub fn edge_markers(&self) -> ArrayId<i32> {
        self.ids.edge_markers
    }

    /// Read-only view of one boundary facet.
    pub fn facet(&self, index: usize) -> Result<&RawFacet, ArrayError> {
        self.group.array(self.ids.facets)?.get_ref(index)
    }

    /// Corners per element (4, or 10 for quadratic elements).
    pub fn element_vertex_count(&self) -> u32 {
        self.record.number_of_corners.max(0) as u32
    }

    /// Number of attributes carried per point.
    pub fn point_attribute_count(&self) -> u32 {
        self.record.number_of_point_attributes.max(0) as u32
    }

    /// Width of the per-point metric tensors.
    pub fn point_metric_count(&self) -> u32 {
        self.record.number_of_point_mtrs.max(0) as u32
    }

    /// Number of attributes carried per element.
    pub fn element_attribute_count(&self) -> u32 {
        self.record.number_of_tetrahedron_attributes.max(0) as u32
    }

    /// Change the per-point attribute width. Reallocates the attribute
    /// array at the current point count; contents are not preserved.
    pub fn set_point_attribute_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.point_attributes, count)?;
        self.record.number_of_point_attributes = count as c_int;
        Ok(())
    }

    /// Change the per-point metric tensor width.
    pub fn set_point_metric_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.point_metric_tensors, count)?;
        self.record.number_of_point_mtrs = count as c_int;
        Ok(())
    }

    /// Change the per-element attribute width.
    pub fn set_element_attribute_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.element_attributes, count)?;
        self.record.number_of_tetrahedron_attributes = count as c_int;
        Ok(())
    }

    /// Change the corners-per-element width. Reallocates the
    /// connectivity array at the current element count.
    pub fn set_element_vertex_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.elements, count)?;
        self.record.number_of_corners = count as c_int;
        Ok(())
    }

    /// Read-only view of the exchange record.
    pub fn record(&self) -> &RawVolumeMesh {
        &self.record
    }

    /// Raw pointer to the exchange record, for handing to a foreign
    /// entry point. Call [`finish_output`](Self::finish_output) after
    /// the foreign call returns.
    pub fn as_raw(&mut self) -> *mut RawVolumeMesh {
        &mut *self.record
    }

    /// Reconcile the group after a foreign call populated the record:
    /// drop retained buffers the callee replaced and adopt the row
    /// widths it reported.
    pub fn finish_output(&mut self) -> Result<(), ArrayError> {
        self.group.resync_all();
        let corners = self.record.number_of_corners.max(0) as u32;
        let point_attrs = self.record.number_of_point_attributes.max(0) as u32;
        let point_mtrs = self.record.number_of_point_mtrs.max(0) as u32;
        let element_attrs = self.record.number_of_tetrahedron_attributes.max(0) as u32;
        self.group.fix_unit(self.ids.elements, corners)?;
        self.group.fix_unit(self.ids.point_attributes, point_attrs)?;
        self.group.fix_unit(self.ids.point_metric_tensors, point_mtrs)?;
        self.group.fix_unit(self.ids.element_attributes, element_attrs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_reads_the_default_corner_count() {
        let mesh = VolumeMesh::new().unwrap();
        assert_eq!(mesh.element_vertex_count(), 4);
        assert_eq!(mesh.group().unit(mesh.elements()).unwrap(), 4);
    }

    #[test]
    fn borrowed_wiring_starts_unallocated_at_count_zero() {
        let mesh = VolumeMesh::new().unwrap();
        assert_eq!(mesh.group().size(mesh.points()).unwrap(), 0);
        assert!(!mesh.group().is_allocated(mesh.points()).unwrap());
        assert!(!mesh.group().is_allocated(mesh.facets()).unwrap());
    }

    #[test]
    fn metric_width_setter_updates_record_and_unit() {
        let mut mesh = VolumeMesh::new().unwrap();
        let metrics = mesh.point_metric_tensors();
        let points = mesh.points();
        mesh.group_mut().set_size(points, 2).unwrap();
        mesh.set_point_metric_count(1).unwrap();
        assert_eq!(mesh.record().number_of_point_mtrs, 1);
        assert_eq!(mesh.group().unit(metrics).unwrap(), 1);
        assert_eq!(mesh.group().array(metrics).unwrap().extent(), 2);
    }
}
