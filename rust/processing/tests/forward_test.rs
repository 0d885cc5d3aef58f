// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC → .bim conversion over in-memory sources.

use approx::assert_relative_eq;
use dotbim_ifc_core::guid::new_global_id;
use dotbim_ifc_core::{Color, SCHEMA_VERSION};
use dotbim_ifc_geometry::{matrix_from_compact, Placement, SurfaceMaterial};
use dotbim_ifc_processing::{
    ConvertConfig, Error, FileHeader, IfcToDotbim, MemorySource, PropertySet, RepresentationContext,
    ShapeRecord, SourceElement,
};

/// Unit cube: 8 corners, 12 triangles
fn cuboid(guid: &str, geometry_id: &str) -> ShapeRecord {
    let vertices = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
    ];
    let faces = vec![
        0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, //
        1, 2, 6, 1, 6, 5, 2, 3, 7, 2, 7, 6, 3, 0, 4, 3, 4, 7,
    ];
    ShapeRecord::new(guid, geometry_id, vertices, faces)
}

fn header() -> FileHeader {
    FileHeader {
        author: vec!["Jane".into(), "Doe".into()],
        time_stamp: "2024-03-01T10:00:00".into(),
    }
}

fn source_with(elements: Vec<(SourceElement, ShapeRecord)>) -> MemorySource {
    let mut source = MemorySource::new(header());
    for (element, shape) in elements {
        source.add_element(element);
        source.add_shape(shape);
    }
    source
}

#[test]
fn test_single_wall_without_materials() {
    let guid = new_global_id();
    let source = source_with(vec![(
        SourceElement::new(17, "IfcWall", guid.as_str()).with_attribute("Name", "Wall-01"),
        cuboid(&guid, "geom-1"),
    )]);
    let config = ConvertConfig::defaults();

    let (document, stats) = IfcToDotbim::new(&source, &config).execute_with_stats().unwrap();

    assert_eq!(document.schema_version, SCHEMA_VERSION);
    assert_eq!(document.meshes.len(), 1);
    assert_eq!(document.meshes[0].mesh_id, 0);
    assert_eq!(document.meshes[0].vertex_count(), 8);
    assert_eq!(document.meshes[0].triangle_count(), 12);

    let element = &document.elements[0];
    assert_eq!(element.mesh_id, 0);
    assert_eq!(element.color, Color::WHITE);
    assert_eq!(element.element_type, "IfcWall");
    assert_eq!(element.info["Name"], "Wall-01");
    assert_eq!(element.info["type"], "IfcWall");
    assert_eq!(element.info["id"], "17");
    assert_eq!(element.guid.len(), 36);
    assert_eq!(element.guid.matches('-').count(), 4);

    assert_eq!(document.info["Author"], "Jane Doe");
    assert_eq!(document.info["Date"], "2024-03-01T10:00:00");
    assert_eq!(stats.shapes, 1);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn test_shared_geometry_yields_one_mesh() {
    let (a, b) = (new_global_id(), new_global_id());
    // 90 degrees about z, shifted along x
    let turned = [0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 5.0, 0.0, 0.0];

    let source = source_with(vec![
        (SourceElement::new(1, "IfcColumn", a.as_str()), cuboid(&a, "shared")),
        (
            SourceElement::new(2, "IfcColumn", b.as_str()),
            cuboid(&b, "shared").with_matrix(turned),
        ),
    ]);
    let config = ConvertConfig::defaults();
    let document = IfcToDotbim::new(&source, &config).execute().unwrap();

    assert_eq!(document.meshes.len(), 1);
    assert_eq!(document.elements.len(), 2);
    assert!(document.elements.iter().all(|e| e.mesh_id == 0));
    assert_relative_eq!(document.elements[0].vector.x, 0.0);
    assert_relative_eq!(document.elements[1].vector.x, 5.0);

    let (first, second) = (&document.elements[0].rotation, &document.elements[1].rotation);
    assert_ne!(first, second);
    assert_relative_eq!(first.qw, 1.0, epsilon = 1e-9);
    assert_relative_eq!(second.qz.abs(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
    assert_relative_eq!(second.qw.abs(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
}

#[test]
fn test_annotations_and_openings_are_skipped() {
    let ids: Vec<String> = (0..3).map(|_| new_global_id()).collect();
    let source = source_with(vec![
        (SourceElement::new(1, "IfcAnnotation", ids[0].as_str()), cuboid(&ids[0], "g0")),
        (SourceElement::new(2, "IfcOpeningElement", ids[1].as_str()), cuboid(&ids[1], "g1")),
        (SourceElement::new(3, "IfcSlab", ids[2].as_str()), cuboid(&ids[2], "g2")),
    ]);
    let config = ConvertConfig::defaults();
    let (document, stats) = IfcToDotbim::new(&source, &config).execute_with_stats().unwrap();

    assert_eq!(document.elements.len(), 1);
    assert_eq!(document.elements[0].element_type, "IfcSlab");
    // skipped records never reach the catalog
    assert_eq!(document.meshes.len(), 1);
    assert_eq!(document.elements[0].mesh_id, 0);
    assert_eq!(stats.skipped, 2);
}

#[test]
fn test_dominant_material_colors_mesh() {
    let guid = new_global_id();
    let materials = vec![
        SurfaceMaterial::new("Glass", [0.2, 0.4, 0.6]).with_transparency(0.5),
        SurfaceMaterial::new("Frame", [1.0, 1.0, 0.0]),
    ];
    let mut ids = vec![0; 8];
    ids.extend([1; 4]);
    let source = source_with(vec![(
        SourceElement::new(5, "IfcWindow", guid.as_str()),
        cuboid(&guid, "win").with_materials(materials, ids),
    )]);
    let config = ConvertConfig::defaults();
    let document = IfcToDotbim::new(&source, &config).execute().unwrap();

    let color = document.elements[0].color;
    assert_eq!((color.r, color.g, color.b), (51, 102, 153));
    assert_eq!(color.a, 127);
}

#[test]
fn test_material_index_out_of_range_is_fatal() {
    let guid = new_global_id();
    let source = source_with(vec![(
        SourceElement::new(5, "IfcWall", guid.as_str()),
        cuboid(&guid, "bad").with_materials(vec![SurfaceMaterial::new("Only", [1.0, 0.0, 0.0])], vec![3; 12]),
    )]);
    let config = ConvertConfig::defaults();
    let result = IfcToDotbim::new(&source, &config).execute();
    assert!(matches!(result, Err(Error::Geometry(_))));
}

#[test]
fn test_invalid_guid_is_fatal() {
    let source = source_with(vec![(
        SourceElement::new(1, "IfcWall", "not-a-guid"),
        cuboid("not-a-guid", "g"),
    )]);
    let config = ConvertConfig::defaults();
    let result = IfcToDotbim::new(&source, &config).execute();
    assert!(matches!(result, Err(Error::Core(_))));
}

#[test]
fn test_missing_element_is_fatal() {
    let mut source = MemorySource::new(header());
    source.add_shape(cuboid(&new_global_id(), "g"));
    let config = ConvertConfig::defaults();
    let result = IfcToDotbim::new(&source, &config).execute();
    assert!(matches!(result, Err(Error::ElementNotFound(_))));
}

#[test]
fn test_empty_model_still_carries_file_info() {
    let source = MemorySource::new(header());
    let config = ConvertConfig::defaults();
    let (document, stats) = IfcToDotbim::new(&source, &config).execute_with_stats().unwrap();

    assert!(document.meshes.is_empty());
    assert!(document.elements.is_empty());
    assert_eq!(document.info["Author"], "Jane Doe");
    assert_eq!(stats.shapes, 0);
}

#[test]
fn test_only_body_context_geometry_is_converted() {
    let (body, axis) = (new_global_id(), new_global_id());
    let mut source = source_with(vec![
        (SourceElement::new(1, "IfcWall", body.as_str()), cuboid(&body, "g-body").with_context(11)),
        (SourceElement::new(2, "IfcWall", axis.as_str()), cuboid(&axis, "g-axis").with_context(12)),
    ]);
    source.add_context(RepresentationContext {
        id: 10,
        context_type: Some("Plan".into()),
        identifier: None,
        is_sub_context: false,
    });
    source.add_context(RepresentationContext {
        id: 11,
        context_type: Some("Model".into()),
        identifier: Some("Body".into()),
        is_sub_context: true,
    });
    source.add_context(RepresentationContext {
        id: 12,
        context_type: Some("Model".into()),
        identifier: Some("Axis".into()),
        is_sub_context: true,
    });

    let config = ConvertConfig::defaults();
    let document = IfcToDotbim::new(&source, &config).execute().unwrap();
    assert_eq!(document.elements.len(), 1);
    assert_eq!(document.elements[0].info["id"], "1");
}

#[test]
fn test_properties_flow_into_info() {
    let guid = new_global_id();
    let element = SourceElement::new(3, "IfcDoor", guid.as_str()).with_property_set(
        PropertySet::new(30, "Pset_DoorCommon")
            .with("IsExternal", false)
            .with("FireExit", true),
    );
    let source = source_with(vec![(element, cuboid(&guid, "door"))]);
    let config = ConvertConfig::defaults();
    let document = IfcToDotbim::new(&source, &config).execute().unwrap();

    let info = &document.elements[0].info;
    assert_eq!(info["Pset_DoorCommon-IsExternal"], "False");
    assert_eq!(info["Pset_DoorCommon-FireExit"], "True");
    assert_eq!(info["Pset_DoorCommon-id"], "30");
    assert_eq!(info["GlobalId"], guid);
}

#[test]
fn test_placement_matches_source_matrix() {
    let guid = new_global_id();
    let (s, c) = (0.6_f64, 0.8_f64);
    // rotation about z by atan2(0.6, 0.8), translated
    let matrix = [c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0, 2.0, -3.0, 4.5];
    let source = source_with(vec![(
        SourceElement::new(1, "IfcBeam", guid.as_str()),
        cuboid(&guid, "beam").with_matrix(matrix),
    )]);
    let config = ConvertConfig::defaults();
    let document = IfcToDotbim::new(&source, &config).execute().unwrap();

    let element = &document.elements[0];
    let rebuilt = Placement::from_parts(&element.vector, &element.rotation).to_matrix();
    assert_relative_eq!(rebuilt, matrix_from_compact(&matrix), epsilon = 1e-9);
}
