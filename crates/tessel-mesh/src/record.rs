//! C-layout exchange records.
//!
//! These mirror the flat records that planar (Triangle-compatible) and
//! volume (TetGen-compatible) mesh generators exchange data through:
//! one pointer field plus a shared count field per logical array
//! family. The wrappers in [`planar`](crate::planar) and
//! [`volume`](crate::volume) never hand these to callers directly;
//! they exist so a foreign entry point can be invoked on the exact
//! struct layout it expects.

use std::os::raw::c_int;
use std::ptr;

use tessel_core::Element;

/// Exchange record for planar triangulation.
///
/// Field order matches the C `triangulateio` declaration; do not
/// reorder.
#[repr(C)]
#[derive(Debug)]
pub struct RawPlanarMesh {
    /// Point coordinates, two per point.
    pub point_list: *mut f64,
    /// Point attributes, `number_of_point_attributes` per point.
    pub point_attribute_list: *mut f64,
    /// One marker per point.
    pub point_marker_list: *mut c_int,
    /// Shared count for the point family.
    pub number_of_points: c_int,
    /// Row width of `point_attribute_list`.
    pub number_of_point_attributes: c_int,

    /// Triangle corner indices, `number_of_corners` per triangle.
    pub triangle_list: *mut c_int,
    /// Triangle attributes.
    pub triangle_attribute_list: *mut f64,
    /// Maximum-area constraint per triangle (input only).
    pub triangle_area_list: *mut f64,
    /// Three neighbor triangle indices per triangle (output only).
    pub neighbor_list: *mut c_int,
    /// Shared count for the triangle family.
    pub number_of_triangles: c_int,
    /// Corners per triangle: 3, or 6 for quadratic elements.
    pub number_of_corners: c_int,
    /// Row width of `triangle_attribute_list`.
    pub number_of_triangle_attributes: c_int,

    /// Segment endpoint indices, two per segment.
    pub segment_list: *mut c_int,
    /// One marker per segment.
    pub segment_marker_list: *mut c_int,
    /// Shared count for the segment family.
    pub number_of_segments: c_int,

    /// Hole seed coordinates, two per hole (input only).
    pub hole_list: *mut f64,
    /// Number of hole seeds.
    pub number_of_holes: c_int,

    /// Region descriptors, four per region (input only).
    pub region_list: *mut f64,
    /// Number of region descriptors.
    pub number_of_regions: c_int,

    /// Edge endpoint indices, two per edge (output only).
    pub edge_list: *mut c_int,
    /// One marker per edge (output only).
    pub edge_marker_list: *mut c_int,
    /// Outward normals for infinite Voronoi rays, two per edge.
    pub norm_list: *mut f64,
    /// Shared count for the edge family.
    pub number_of_edges: c_int,
}

impl Default for RawPlanarMesh {
    fn default() -> Self {
        Self {
            point_list: ptr::null_mut(),
            point_attribute_list: ptr::null_mut(),
            point_marker_list: ptr::null_mut(),
            number_of_points: 0,
            number_of_point_attributes: 0,
            triangle_list: ptr::null_mut(),
            triangle_attribute_list: ptr::null_mut(),
            triangle_area_list: ptr::null_mut(),
            neighbor_list: ptr::null_mut(),
            number_of_triangles: 0,
            number_of_corners: 0,
            number_of_triangle_attributes: 0,
            segment_list: ptr::null_mut(),
            segment_marker_list: ptr::null_mut(),
            number_of_segments: 0,
            hole_list: ptr::null_mut(),
            number_of_holes: 0,
            region_list: ptr::null_mut(),
            number_of_regions: 0,
            edge_list: ptr::null_mut(),
            edge_marker_list: ptr::null_mut(),
            norm_list: ptr::null_mut(),
            number_of_edges: 0,
        }
    }
}

/// One polygon of a facet: a vertex-index loop.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawPolygon {
    /// Vertex indices around the polygon.
    pub vertex_list: *mut c_int,
    /// Number of vertices in the loop.
    pub number_of_vertices: c_int,
}

impl Default for RawPolygon {
    fn default() -> Self {
        Self {
            vertex_list: ptr::null_mut(),
            number_of_vertices: 0,
        }
    }
}

/// A volume-mesh boundary facet: polygons plus facet-local holes.
///
/// Structured element: the external library manages the interior
/// pointers, so facet arrays are observed read-only — [`Element`]
/// without the scalar get/set capability.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawFacet {
    /// The facet's polygon loops.
    pub polygon_list: *mut RawPolygon,
    /// Number of polygons.
    pub number_of_polygons: c_int,
    /// Facet-local hole seeds, three coordinates each.
    pub hole_list: *mut f64,
    /// Number of facet-local holes.
    pub number_of_holes: c_int,
}

impl Default for RawFacet {
    fn default() -> Self {
        Self {
            polygon_list: ptr::null_mut(),
            number_of_polygons: 0,
            hole_list: ptr::null_mut(),
            number_of_holes: 0,
        }
    }
}

impl Element for RawFacet {}

/// Exchange record for volume (tetrahedral) meshing — the
/// representative subset of the C `tetgenio` field families this
/// wrapper exchanges.
///
/// Field order matches the external declaration; do not reorder.
#[repr(C)]
#[derive(Debug)]
pub struct RawVolumeMesh {
    /// Point coordinates, three per point.
    pub point_list: *mut f64,
    /// Point attributes.
    pub point_attribute_list: *mut f64,
    /// Metric tensors used for adaptive sizing.
    pub point_mtr_list: *mut f64,
    /// One marker per point.
    pub point_marker_list: *mut c_int,
    /// Shared count for the point family.
    pub number_of_points: c_int,
    /// Row width of `point_attribute_list`.
    pub number_of_point_attributes: c_int,
    /// Row width of `point_mtr_list`.
    pub number_of_point_mtrs: c_int,

    /// Tetrahedron corner indices, `number_of_corners` per element.
    pub tetrahedron_list: *mut c_int,
    /// Element attributes.
    pub tetrahedron_attribute_list: *mut f64,
    /// Maximum-volume constraint per element (input only).
    pub tetrahedron_volume_list: *mut f64,
    /// Four neighbor indices per element (output only).
    pub neighbor_list: *mut c_int,
    /// Shared count for the element family.
    pub number_of_tetrahedra: c_int,
    /// Corners per element: 4, or 10 for quadratic elements.
    pub number_of_corners: c_int,
    /// Row width of `tetrahedron_attribute_list`.
    pub number_of_tetrahedron_attributes: c_int,

    /// Boundary facets (input only; structured elements).
    pub facet_list: *mut RawFacet,
    /// One marker per facet.
    pub facet_marker_list: *mut c_int,
    /// Shared count for the facet family.
    pub number_of_facets: c_int,

    /// Hole seed coordinates, three per hole (input only).
    pub hole_list: *mut f64,
    /// Number of hole seeds.
    pub number_of_holes: c_int,

    /// Region descriptors, five per region (input only).
    pub region_list: *mut f64,
    /// Number of region descriptors.
    pub number_of_regions: c_int,

    /// Boundary triangle faces, three indices each (output only).
    pub tri_face_list: *mut c_int,
    /// One marker per face (output only).
    pub tri_face_marker_list: *mut c_int,
    /// The two elements adjacent to each face (output only).
    pub adj_tet_list: *mut c_int,
    /// Shared count for the face family.
    pub number_of_tri_faces: c_int,

    /// Edge endpoint indices, two per edge (output only).
    pub edge_list: *mut c_int,
    /// One marker per edge (output only).
    pub edge_marker_list: *mut c_int,
    /// Shared count for the edge family.
    pub number_of_edges: c_int,
}

impl Default for RawVolumeMesh {
    fn default() -> Self {
        Self {
            point_list: ptr::null_mut(),
            point_attribute_list: ptr::null_mut(),
            point_mtr_list: ptr::null_mut(),
            point_marker_list: ptr::null_mut(),
            number_of_points: 0,
            number_of_point_attributes: 0,
            number_of_point_mtrs: 0,
            tetrahedron_list: ptr::null_mut(),
            tetrahedron_attribute_list: ptr::null_mut(),
            tetrahedron_volume_list: ptr::null_mut(),
            neighbor_list: ptr::null_mut(),
            number_of_tetrahedra: 0,
            number_of_corners: 4,
            number_of_tetrahedron_attributes: 0,
            facet_list: ptr::null_mut(),
            facet_marker_list: ptr::null_mut(),
            number_of_facets: 0,
            hole_list: ptr::null_mut(),
            number_of_holes: 0,
            region_list: ptr::null_mut(),
            number_of_regions: 0,
            tri_face_list: ptr::null_mut(),
            tri_face_marker_list: ptr::null_mut(),
            adj_tet_list: ptr::null_mut(),
            number_of_tri_faces: 0,
            edge_list: ptr::null_mut(),
            edge_marker_list: ptr::null_mut(),
            number_of_edges: 0,
        }
    }
}
