//! Shared fixtures for integration tests
//!
//! The dataset and the scene describe the same four elements: two Wall-A
//! instances, one Wall-B instance with a missing area and one Door-A.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use qto::Dataset;

/// Element table with an unnamed leading id column
pub const HOUSE_CSV: &str = "\
,Type,Area,Volume,Width,Length
101,Wall-A,10.0 m²,1.5,0.2,5
102,Wall-A,2.5,0.5,0.2,1
103,Door-A,2,0.1,0.9,0.05
104,Wall-B,n/a,2.0,0.3,4
";

/// Scene holding one geometry per element
pub const HOUSE_DAE: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <asset>
    <up_axis>Z_UP</up_axis>
  </asset>
  <library_geometries>
    <geometry id="geom-101" name="Wall-A">
      <mesh>
        <source id="geom-101-positions"><float_array id="a101" count="3">0 0 0</float_array></source>
      </mesh>
    </geometry>
    <geometry id="geom-102" name="Wall-A">
      <mesh>
        <source id="geom-102-positions"><float_array id="a102" count="3">1 0 0</float_array></source>
      </mesh>
    </geometry>
    <geometry id="geom-103" name="Door-A">
      <mesh>
        <source id="geom-103-positions"><float_array id="a103" count="3">2 0 0</float_array></source>
      </mesh>
    </geometry>
    <geometry id="geom-104" name="Wall-B">
      <mesh>
        <source id="geom-104-positions"><float_array id="a104" count="3">3 0 0</float_array></source>
      </mesh>
    </geometry>
  </library_geometries>
  <library_visual_scenes>
    <visual_scene id="Scene" name="Scene">
      <node id="101" name="Wall-A">
        <instance_geometry url="#geom-101"/>
      </node>
      <node id="102" name="Wall-A">
        <instance_geometry url="#geom-102"/>
      </node>
      <node id="103" name="Door-A">
        <instance_geometry url="#geom-103"/>
      </node>
      <node id="104" name="Wall-B">
        <instance_geometry url="#geom-104"/>
      </node>
    </visual_scene>
  </library_visual_scenes>
  <scene>
    <instance_visual_scene url="#Scene"/>
  </scene>
</COLLADA>
"##;

/// Parse [`HOUSE_CSV`]
pub fn house_dataset() -> Dataset {
    Dataset::from_reader(HOUSE_CSV.as_bytes(), usize::MAX).expect("fixture dataset parses")
}

/// Write `contents` to `dir/name` and return the full path
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture written");
    path
}

/// Names of the files directly inside `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("directory readable")
        .map(|entry| {
            entry
                .expect("directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
