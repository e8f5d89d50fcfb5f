//! End-to-end behavior of array groups over a record, exercised the
//! way a mesh wrapper drives them: wire masters and slaves over
//! shared count slots, resize, cascade, materialize lazily, and copy
//! between records.

use std::os::raw::c_int;
use std::ptr;

use tessel_array::{ArrayError, ArrayGroup, ArrayId, RawSlots};

/// A miniature exchange record: points with two dependent arrays
/// sharing the point count, plus an independent field.
#[repr(C)]
struct Record {
    point_list: *mut f64,
    point_attr_list: *mut f64,
    point_marker_list: *mut i32,
    number_of_points: c_int,
    hole_list: *mut f64,
    number_of_holes: c_int,
}

impl Record {
    fn new() -> Self {
        Self {
            point_list: ptr::null_mut(),
            point_attr_list: ptr::null_mut(),
            point_marker_list: ptr::null_mut(),
            number_of_points: 0,
            hole_list: ptr::null_mut(),
            number_of_holes: 0,
        }
    }
}

struct Wired {
    points: ArrayId<f64>,
    attrs: ArrayId<f64>,
    markers: ArrayId<i32>,
}

/// Wire the usual master/slave family over a record: points own the
/// count, attributes (unit 0) and markers (unit 1) mirror it.
fn wire(group: &mut ArrayGroup, rec: &mut Record) -> Wired {
    let points = group
        .insert_owned(
            "points",
            unsafe { RawSlots::new(&mut rec.point_list, &mut rec.number_of_points) },
            2,
        )
        .unwrap();
    let attrs = group
        .insert_slave(
            "point_attributes",
            unsafe { RawSlots::new(&mut rec.point_attr_list, &mut rec.number_of_points) },
            0,
            points,
        )
        .unwrap();
    let markers = group
        .insert_slave(
            "point_markers",
            unsafe { RawSlots::new(&mut rec.point_marker_list, &mut rec.number_of_points) },
            1,
            points,
        )
        .unwrap();
    Wired {
        points,
        attrs,
        markers,
    }
}

#[test]
fn master_resize_updates_slave_counts_immediately() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 5).unwrap();
    assert_eq!(group.size(w.points).unwrap(), 5);
    assert_eq!(group.size(w.markers).unwrap(), 5);
    assert_eq!(group.size(w.attrs).unwrap(), 5);

    // Never set up: logically sized, physically unallocated.
    assert!(!group.is_allocated(w.markers).unwrap());
    assert!(group.is_allocated(w.points).unwrap());
}

#[test]
fn setup_materializes_a_deferred_slave() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 5).unwrap();
    group.setup(w.markers).unwrap();
    assert!(group.is_allocated(w.markers).unwrap());

    let markers = group.array(w.markers).unwrap();
    assert_eq!(markers.get(4).unwrap(), 0);
    assert_eq!(
        markers.get(5),
        Err(ArrayError::OutOfRange {
            index: 5,
            extent: 5
        })
    );
}

#[test]
fn slave_resize_always_fails_and_changes_nothing() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    group.set_size(w.points, 3).unwrap();
    group.setup(w.markers).unwrap();

    let err = group.set_size(w.markers, 7).unwrap_err();
    assert_eq!(
        err,
        ArrayError::invalid("sizes of slave arrays cannot be changed")
    );
    assert_eq!(group.size(w.markers).unwrap(), 3);
    assert!(group.is_allocated(w.markers).unwrap());
}

#[test]
fn setup_on_a_non_slave_fails() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    assert_eq!(
        group.setup(w.points).unwrap_err(),
        ArrayError::invalid("cannot setup non-slave array")
    );
}

#[test]
fn notifying_a_non_slave_fails() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    assert!(matches!(
        group.notify_size_change(w.points, w.markers, 4),
        Err(ArrayError::InvalidOperation { .. })
    ));
    // Wrong master is rejected too.
    assert!(matches!(
        group.notify_size_change(w.markers, w.attrs, 4),
        Err(ArrayError::InvalidOperation { .. })
    ));
}

#[test]
fn materialized_slaves_reallocate_on_cascade() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 2).unwrap();
    group.setup(w.markers).unwrap();
    group.array_mut(w.markers).unwrap().set(1, 42).unwrap();

    group.set_size(w.points, 6).unwrap();
    let markers = group.array(w.markers).unwrap();
    assert_eq!(markers.size(), 6);
    assert!(markers.is_allocated());
    // Reallocated, not preserved.
    assert_eq!(markers.get(1).unwrap(), 0);
}

#[test]
fn cascade_is_transitive_through_materialized_slaves() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    // Chain a second-level slave under the markers.
    let shadow = group
        .insert_slave(
            "marker_shadow",
            unsafe { RawSlots::new(&mut rec.hole_list, &mut rec.number_of_holes) },
            1,
            w.markers,
        )
        .unwrap();

    group.set_size(w.points, 2).unwrap();
    group.setup(w.markers).unwrap();

    // A materialized middle slave relays the cascade; the deferred
    // leaf only mirrors the count until its own setup.
    group.set_size(w.points, 4).unwrap();
    assert_eq!(group.size(shadow).unwrap(), 4);
    assert!(!group.is_allocated(shadow).unwrap());
    group.setup(shadow).unwrap();
    assert_eq!(group.array(shadow).unwrap().as_slice().unwrap().len(), 4);

    // Once materialized, further master resizes reach it physically.
    group.set_size(w.points, 3).unwrap();
    assert_eq!(group.array(shadow).unwrap().as_slice().unwrap().len(), 3);
}

#[test]
fn allocated_extent_always_matches_size_times_unit() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    for n in [0usize, 1, 5, 2] {
        group.set_size(w.points, n).unwrap();
        let points = group.array(w.points).unwrap();
        if points.is_allocated() {
            assert_eq!(points.as_slice().unwrap().len(), points.extent());
        } else {
            assert_eq!(points.extent(), 0);
        }
    }
}

#[test]
fn unit_round_trip_covers_every_cell_and_rejects_the_row_edge() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 4).unwrap();
    group.set_unit(w.attrs, 3).unwrap();
    assert_eq!(group.unit(w.attrs).unwrap(), 3);

    let attrs = group.array_mut(w.attrs).unwrap();
    for row in 0..4 {
        for col in 0..3 {
            attrs.set_sub(row, col, (row * 3 + col) as f64).unwrap();
        }
    }
    for row in 0..4 {
        for col in 0..3 {
            assert_eq!(attrs.get_sub(row, col).unwrap(), (row * 3 + col) as f64);
        }
        assert_eq!(
            attrs.get_sub(row, 3),
            Err(ArrayError::OutOfRange {
                index: 3,
                extent: 3
            })
        );
    }
}

#[test]
fn flat_and_sub_addressing_agree() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 2).unwrap();
    group.set_unit(w.attrs, 3).unwrap();
    let attrs = group.array_mut(w.attrs).unwrap();
    attrs.set(5, 8.25).unwrap();
    assert_eq!(attrs.get_sub(1, 2).unwrap(), 8.25);
    assert!(matches!(
        attrs.get_sub(1, 3),
        Err(ArrayError::OutOfRange { .. })
    ));
}

#[test]
fn borrowed_array_with_fixed_unit_reads_foreign_data_in_place() {
    let mut rec = Record::new();
    // The "external library" populated nine elements as three rows.
    let mut foreign: Vec<f64> = (1..=9).map(f64::from).collect();
    rec.point_list = foreign.as_mut_ptr();
    rec.number_of_points = 3;

    let mut group = ArrayGroup::new();
    let points = group
        .insert_borrowed(
            "points",
            unsafe { RawSlots::new(&mut rec.point_list, &mut rec.number_of_points) },
            1,
        )
        .unwrap();
    group.fix_unit(points, 3).unwrap();

    let arr = group.array(points).unwrap();
    assert_eq!(arr.size(), 3);
    for row in 0..3 {
        for col in 0..3 {
            assert_eq!(arr.get_sub(row, col).unwrap(), (row * 3 + col + 1) as f64);
        }
    }
    // No reallocation happened: the record still points at the
    // foreign buffer.
    drop(group);
    assert_eq!(rec.point_list, foreign.as_mut_ptr());
    assert_eq!(rec.number_of_points, 3);
}

#[test]
fn removing_a_slave_detaches_it_from_later_cascades() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);

    group.set_size(w.points, 2).unwrap();
    group.setup(w.attrs).unwrap();
    group.remove(w.attrs).unwrap();
    assert!(rec.point_attr_list.is_null());

    // The removed slave receives nothing; the rest of the family
    // still cascades.
    group.set_size(w.points, 8).unwrap();
    assert!(rec.point_attr_list.is_null());
    assert_eq!(group.size(w.markers).unwrap(), 8);
    assert!(group.array(w.attrs).is_err());
    assert!(group.lookup("point_attributes").is_none());
}

#[test]
fn removing_a_master_with_live_slaves_is_rejected() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    assert!(matches!(
        group.remove(w.points),
        Err(ArrayError::InvalidOperation { .. })
    ));
    group.remove(w.attrs).unwrap();
    group.remove(w.markers).unwrap();
    group.remove(w.points).unwrap();
    assert!(group.is_empty());
}

#[test]
fn deep_copy_is_a_value_copy() {
    let mut src_rec = Record::new();
    let mut dst_rec = Record::new();
    let mut src_group = ArrayGroup::new();
    let mut dst_group = ArrayGroup::new();
    let src = wire(&mut src_group, &mut src_rec);
    let dst = wire(&mut dst_group, &mut dst_rec);

    src_group.set_size(src.points, 3).unwrap();
    let arr = src_group.array_mut(src.points).unwrap();
    for i in 0..6 {
        arr.set(i, i as f64 * 0.5).unwrap();
    }

    dst_group
        .copy_array(dst.points, &src_group, src.points)
        .unwrap();
    assert_eq!(dst_group.size(dst.points).unwrap(), 3);
    assert_eq!(
        dst_group.array(dst.points).unwrap().as_slice().unwrap(),
        src_group.array(src.points).unwrap().as_slice().unwrap()
    );
    // Slaves of the destination saw the resize.
    assert_eq!(dst_group.size(dst.markers).unwrap(), 3);

    // Mutating the copy leaves the source alone.
    dst_group
        .array_mut(dst.points)
        .unwrap()
        .set(0, 99.0)
        .unwrap();
    assert_eq!(src_group.array(src.points).unwrap().get(0).unwrap(), 0.0);
}

#[test]
fn deep_copy_from_an_unallocated_source_clears_the_destination() {
    let mut src_rec = Record::new();
    let mut dst_rec = Record::new();
    let mut src_group = ArrayGroup::new();
    let mut dst_group = ArrayGroup::new();
    let src = wire(&mut src_group, &mut src_rec);
    let dst = wire(&mut dst_group, &mut dst_rec);

    src_group.set_size(src.points, 4).unwrap();
    src_group.deallocate(src.points).unwrap();

    dst_group.set_size(dst.points, 2).unwrap();
    dst_group
        .copy_array(dst.points, &src_group, src.points)
        .unwrap();
    assert_eq!(dst_group.size(dst.points).unwrap(), 4);
    assert!(!dst_group.is_allocated(dst.points).unwrap());
}

#[test]
fn group_drop_resets_owned_slots_and_frees_wrapper_memory() {
    let mut rec = Record::new();
    {
        let mut group = ArrayGroup::new();
        let w = wire(&mut group, &mut rec);
        group.set_size(w.points, 3).unwrap();
        group.setup(w.markers).unwrap();
        assert!(!rec.point_list.is_null());
        assert_eq!(rec.number_of_points, 3);
    }
    assert!(rec.point_list.is_null());
    assert!(rec.point_marker_list.is_null());
    assert_eq!(rec.number_of_points, 0);
}

#[test]
fn deallocate_leaves_the_count_in_place() {
    let mut rec = Record::new();
    let mut group = ArrayGroup::new();
    let w = wire(&mut group, &mut rec);
    group.set_size(w.points, 5).unwrap();
    group.deallocate(w.points).unwrap();
    assert!(!group.is_allocated(w.points).unwrap());
    assert_eq!(group.size(w.points).unwrap(), 5);
    assert_eq!(
        group.array(w.points).unwrap().get(0),
        Err(ArrayError::UnallocatedAccess)
    );
}
