//! Planar triangulation mesh: a [`RawPlanarMesh`] record wired into an
//! [`ArrayGroup`].
//!
//! Wiring follows the record's field families. Points, elements,
//! facets (segments), holes, regions and faces are owned standalone
//! arrays; per-family attribute, marker, constraint, neighbor and
//! normal arrays are slaved to them so that resizing a family resizes
//! the whole family coherently.

use std::os::raw::c_int;

use tessel_array::{ArrayGroup, ArrayId, RawSlots};
use tessel_core::ArrayError;

use crate::record::RawPlanarMesh;

/// Handles for every array wired over the planar record.
#[derive(Clone, Copy, Debug)]
struct PlanarIds {
    points: ArrayId<f64>,
    point_attributes: ArrayId<f64>,
    point_markers: ArrayId<i32>,
    elements: ArrayId<i32>,
    element_attributes: ArrayId<f64>,
    element_volumes: ArrayId<f64>,
    neighbors: ArrayId<i32>,
    facets: ArrayId<i32>,
    facet_markers: ArrayId<i32>,
    holes: ArrayId<f64>,
    regions: ArrayId<f64>,
    faces: ArrayId<i32>,
    face_markers: ArrayId<i32>,
    normals: ArrayId<f64>,
}

/// A planar mesh: exchange record plus the array group that keeps its
/// pointer and count fields coherent.
pub struct PlanarMesh {
    // Declared before `record` so the group (which holds raw pointers
    // into the record) tears down first.
    group: ArrayGroup,
    ids: PlanarIds,
    record: Box<RawPlanarMesh>,
}

impl PlanarMesh {
    /// Create an empty planar mesh with triangles of three corners.
    pub fn new() -> Result<Self, ArrayError> {
        let mut record = Box::new(RawPlanarMesh::default());
        record.number_of_corners = 3;

        let mut group = ArrayGroup::new();
        let r = &mut *record;

        let points = group.insert_owned(
            "points",
            unsafe { RawSlots::new(&mut r.point_list, &mut r.number_of_points) },
            2,
        )?;
        let point_attributes = group.insert_slave(
            "point_attributes",
            unsafe { RawSlots::new(&mut r.point_attribute_list, &mut r.number_of_points) },
            0,
            points,
        )?;
        let point_markers = group.insert_slave(
            "point_markers",
            unsafe { RawSlots::new(&mut r.point_marker_list, &mut r.number_of_points) },
            1,
            points,
        )?;

        let elements = group.insert_owned(
            "elements",
            unsafe { RawSlots::new(&mut r.triangle_list, &mut r.number_of_triangles) },
            3,
        )?;
        let element_attributes = group.insert_slave(
            "element_attributes",
            unsafe { RawSlots::new(&mut r.triangle_attribute_list, &mut r.number_of_triangles) },
            0,
            elements,
        )?;
        let element_volumes = group.insert_slave(
            "element_volumes",
            unsafe { RawSlots::new(&mut r.triangle_area_list, &mut r.number_of_triangles) },
            1,
            elements,
        )?;
        let neighbors = group.insert_slave(
            "neighbors",
            unsafe { RawSlots::new(&mut r.neighbor_list, &mut r.number_of_triangles) },
            3,
            elements,
        )?;

        let facets = group.insert_owned(
            "facets",
            unsafe { RawSlots::new(&mut r.segment_list, &mut r.number_of_segments) },
            2,
        )?;
        let facet_markers = group.insert_slave(
            "facet_markers",
            unsafe { RawSlots::new(&mut r.segment_marker_list, &mut r.number_of_segments) },
            1,
            facets,
        )?;

        let holes = group.insert_owned(
            "holes",
            unsafe { RawSlots::new(&mut r.hole_list, &mut r.number_of_holes) },
            2,
        )?;
        let regions = group.insert_owned(
            "regions",
            unsafe { RawSlots::new(&mut r.region_list, &mut r.number_of_regions) },
            4,
        )?;

        let faces = group.insert_owned(
            "faces",
            unsafe { RawSlots::new(&mut r.edge_list, &mut r.number_of_edges) },
            2,
        )?;
        let face_markers = group.insert_slave(
            "face_markers",
            unsafe { RawSlots::new(&mut r.edge_marker_list, &mut r.number_of_edges) },
            1,
            faces,
        )?;
        let normals = group.insert_slave(
            "normals",
            unsafe { RawSlots::new(&mut r.norm_list, &mut r.number_of_edges) },
            2,
            faces,
        )?;

        Ok(Self {
            group,
            ids: PlanarIds {
                points,
                point_attributes,
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
                face_markers,
                normals,
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

    /// Point coordinates, two per point. Master of the point family.
    pub fn points(&self) -> ArrayId<f64> {
        self.ids.points
    }

    /// Per-point attributes; width set by
    /// [`set_point_attribute_count`](Self::set_point_attribute_count).
    pub fn point_attributes(&self) -> ArrayId<f64> {
        self.ids.point_attributes
    }

    /// Per-point boundary markers.
    pub fn point_markers(&self) -> ArrayId<i32> {
        self.ids.point_markers
    }

    /// Triangle connectivity. Master of the element family.
    pub fn elements(&self) -> ArrayId<i32> {
        self.ids.elements
    }

    /// Per-element attributes.
    pub fn element_attributes(&self) -> ArrayId<f64> {
        self.ids.element_attributes
    }

    /// Per-element maximum-area constraints.
    pub fn element_volumes(&self) -> ArrayId<f64> {
        self.ids.element_volumes
    }

    /// Per-element neighbor indices.
    pub fn neighbors(&self) -> ArrayId<i32> {
        self.ids.neighbors
    }

    /// Segment endpoint indices. Master of the segment family.
    pub fn facets(&self) -> ArrayId<i32> {
        self.ids.facets
    }

    /// Per-segment boundary markers.
    pub fn facet_markers(&self) -> ArrayId<i32> {
        self.ids.facet_markers
    }

    /// Hole seed coordinates.
    pub fn holes(&self) -> ArrayId<f64> {
        self.ids.holes
    }

    /// Region descriptors: seed point, regional attribute, area bound.
    pub fn regions(&self) -> ArrayId<f64> {
        self.ids.regions
    }

    /// Edge endpoint indices. Master of the edge family.
    pub fn faces(&self) -> ArrayId<i32> {
        self.ids.faces
    }

    /// Per-edge boundary markers.
    pub fn face_markers(&self) -> ArrayId<i32> {
        self.ids.face_markers
    }

    /// Outward normals for infinite Voronoi rays.
    pub fn normals(&self) -> ArrayId<f64> {
        self.ids.normals
    }

    /// Corners per element (3, or 6 for quadratic elements).
    pub fn element_vertex_count(&self) -> u32 {
        self.record.number_of_corners.max(0) as u32
    }

    /// Number of attributes carried per point.
    pub fn point_attribute_count(&self) -> u32 {
        self.record.number_of_point_attributes.max(0) as u32
    }

    /// Number of attributes carried per element.
    pub fn element_attribute_count(&self) -> u32 {
        self.record.number_of_triangle_attributes.max(0) as u32
    }

    /// Change the per-point attribute width. Reallocates the attribute
    /// array at the current point count; contents are not preserved.
    pub fn set_point_attribute_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.point_attributes, count)?;
        self.record.number_of_point_attributes = count as c_int;
        Ok(())
    }

    /// Change the per-element attribute width.
    pub fn set_element_attribute_count(&mut self, count: u32) -> Result<(), ArrayError> {
        self.group.set_unit(self.ids.element_attributes, count)?;
        self.record.number_of_triangle_attributes = count as c_int;
        Ok(())
    }

    /// Read-only view of the exchange record.
    pub fn record(&self) -> &RawPlanarMesh {
        &self.record
    }

    /// Raw pointer to the exchange record, for handing to a foreign
    /// entry point. Call [`finish_output`](Self::finish_output) after
    /// the foreign call returns.
    pub fn as_raw(&mut self) -> *mut RawPlanarMesh {
        &mut *self.record
    }

    /// Reconcile the group after a foreign call populated the record.
    ///
    /// Drops retained buffers the callee replaced, detaches the hole
    /// and region lists (the callee copies those pointers from its
    /// input record, so they must not be freed or read through here),
    /// and adopts the row widths the callee reported.
    pub fn finish_output(&mut self) -> Result<(), ArrayError> {
        self.group.resync_all();
        self.group.set_size(self.ids.holes, 0)?;
        self.group.set_size(self.ids.regions, 0)?;
        let corners = self.record.number_of_corners.max(0) as u32;
        let point_attrs = self.record.number_of_point_attributes.max(0) as u32;
        let element_attrs = self.record.number_of_triangle_attributes.max(0) as u32;
        self.group.fix_unit(self.ids.elements, corners)?;
        self.group.fix_unit(self.ids.point_attributes, point_attrs)?;
        self.group.fix_unit(self.ids.element_attributes, element_attrs)?;
        Ok(())
    }

    /// Deep value copy of every array and width from another mesh.
    pub fn assign_from(&mut self, other: &PlanarMesh) -> Result<(), ArrayError> {
        self.record.number_of_corners = other.record.number_of_corners;
        self.record.number_of_point_attributes = other.record.number_of_point_attributes;
        self.record.number_of_triangle_attributes = other.record.number_of_triangle_attributes;

        let src = &other.ids;
        let dst = self.ids;
        self.group.copy_array(dst.points, &other.group, src.points)?;
        self.group
            .copy_array(dst.point_attributes, &other.group, src.point_attributes)?;
        self.group
            .copy_array(dst.point_markers, &other.group, src.point_markers)?;
        self.group
            .copy_array(dst.elements, &other.group, src.elements)?;
        self.group
            .copy_array(dst.element_attributes, &other.group, src.element_attributes)?;
        self.group
            .copy_array(dst.element_volumes, &other.group, src.element_volumes)?;
        self.group
            .copy_array(dst.neighbors, &other.group, src.neighbors)?;
        self.group.copy_array(dst.facets, &other.group, src.facets)?;
        self.group
            .copy_array(dst.facet_markers, &other.group, src.facet_markers)?;
        self.group.copy_array(dst.holes, &other.group, src.holes)?;
        self.group
            .copy_array(dst.regions, &other.group, src.regions)?;
        self.group.copy_array(dst.faces, &other.group, src.faces)?;
        self.group
            .copy_array(dst.face_markers, &other.group, src.face_markers)?;
        self.group
            .copy_array(dst.normals, &other.group, src.normals)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_family_shares_one_count_field() {
        let mut mesh = PlanarMesh::new().unwrap();
        let points = mesh.points();
        let markers = mesh.point_markers();
        mesh.group_mut().set_size(points, 5).unwrap();
        assert_eq!(mesh.record().number_of_points, 5);
        assert_eq!(mesh.group().size(markers).unwrap(), 5);
    }

    #[test]
    fn attribute_width_change_reallocates_at_the_current_count() {
        let mut mesh = PlanarMesh::new().unwrap();
        let points = mesh.points();
        let attrs = mesh.point_attributes();
        mesh.group_mut().set_size(points, 4).unwrap();
        assert!(!mesh.group().is_allocated(attrs).unwrap());

        mesh.set_point_attribute_count(2).unwrap();
        assert_eq!(mesh.record().number_of_point_attributes, 2);
        assert!(mesh.group().is_allocated(attrs).unwrap());
        assert_eq!(mesh.group().array(attrs).unwrap().extent(), 8);
    }

    #[test]
    fn default_element_family_is_three_cornered() {
        let mesh = PlanarMesh::new().unwrap();
        assert_eq!(mesh.element_vertex_count(), 3);
        assert_eq!(mesh.group().unit(mesh.elements()).unwrap(), 3);
        assert_eq!(mesh.group().unit(mesh.neighbors()).unwrap(), 3);
    }
}
