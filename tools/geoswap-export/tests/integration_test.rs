//! Integration tests for geoswap-export
//!
//! Drives the `geoswap` binary end to end: write input files -> run a
//! command -> verify the output.

use geoswap_common::{
    BinarySerializable, CollisionMesh, CullingSphere, MobyRecord, ShrubModel, TextureConfig,
    formats::ShrubPassthrough,
};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn geoswap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geoswap"))
        .args(args)
        .output()
        .expect("Failed to run geoswap")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn sample_shrub() -> ShrubModel {
    ShrubModel {
        id: 7,
        culling: CullingSphere {
            x: 0.0,
            y: 1.0,
            z: 0.0,
            radius: 2.0,
        },
        size_scale: 1.0,
        texture_configs: vec![TextureConfig::new(3, 0x80, 0x100, 1)],
        vertex_buffer: vec![
            -1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, //
            0.0, 2.0, 0.5, 0.0, 1.0, 0.0, 0.5, 1.0,
        ],
        index_buffer: vec![0, 1, 2],
        passthrough: ShrubPassthrough::default(),
    }
}

/// Test OBJ -> collision chunk conversion
#[test]
fn test_obj_to_collision() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("triangle.obj");
    let col_path = dir.path().join("triangle.col");
    std::fs::write(&obj_path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

    let out = geoswap(&["collision", path_str(&obj_path), "-o", path_str(&col_path)]);
    assert!(out.status.success(), "geoswap collision command failed");

    let data = std::fs::read(&col_path).expect("Failed to read collision file");
    assert_eq!(data.len(), 0x90);
    assert_eq!(&data[0x80..0x84], &[0x00, 0x01, 0x02, 0x1F]);

    let mesh = CollisionMesh::decode(&data).expect("Failed to decode collision output");
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.index_buffer, vec![0, 1, 2]);
}

/// Output path defaults to the input with a .col extension
#[test]
fn test_collision_default_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    std::fs::write(&obj_path, "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nf 1 2 3 4\n").unwrap();

    let out = geoswap(&["collision", path_str(&obj_path)]);
    assert!(out.status.success());

    let data = std::fs::read(dir.path().join("quad.col")).expect("Missing default output");
    let mesh = CollisionMesh::decode(&data).unwrap();
    assert_eq!(mesh.face_count(), 2);
}

#[test]
fn test_collision_missing_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = geoswap(&["collision", path_str(&dir.path().join("missing.obj"))]);
    assert!(!out.status.success());
}

/// Header and body in one file, body at a 0x80-aligned position
#[test]
fn test_shrub_contiguous_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let shrub_path = dir.path().join("shrub.bin");

    let model = sample_shrub();
    let mut image = model.serialize_head(0x100).unwrap();
    image.resize(0x100, 0);
    image.extend(model.serialize_body().unwrap());
    std::fs::write(&shrub_path, &image).unwrap();

    let out = geoswap(&["shrub", path_str(&shrub_path), "--offset", "0x0", "--faces", "1"]);
    assert!(out.status.success(), "geoswap shrub command failed");

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("Invalid JSON");
    assert_eq!(json["id"], 7);
    assert_eq!(json["vertex_count"], 3);
    assert_eq!(json["face_count"], 1);
    assert_eq!(json["texture_configs"][0]["size"], 0x100);
    assert_eq!(json["bounds"][1][1], 2.0);
}

/// Header and body in separate files
#[test]
fn test_shrub_separate_body() {
    let dir = tempdir().expect("Failed to create temp dir");
    let head_path = dir.path().join("head.bin");
    let body_path = dir.path().join("body.bin");
    let json_path = dir.path().join("shrub.json");

    let model = sample_shrub();
    let mut heads = vec![0u8; 0x40];
    heads.extend(model.serialize_head(0).unwrap());
    std::fs::write(&head_path, &heads).unwrap();
    std::fs::write(&body_path, model.serialize_body().unwrap()).unwrap();

    let out = geoswap(&[
        "shrub",
        path_str(&head_path),
        "--offset",
        "40",
        "--faces",
        "1",
        "--body",
        path_str(&body_path),
        "-o",
        path_str(&json_path),
    ]);
    assert!(out.status.success(), "geoswap shrub command failed");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["culling"]["radius"], 2.0);
}

#[test]
fn test_shrub_truncated_header_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let shrub_path = dir.path().join("short.bin");
    std::fs::write(&shrub_path, [0u8; 63]).unwrap();

    let out = geoswap(&["shrub", path_str(&shrub_path), "--faces", "0"]);
    assert!(!out.status.success());
}

fn write_moby_dump(path: &Path) {
    let record = MobyRecord {
        state: 2,
        moby_type: 0x01F4,
        pvars: 0x00C0_0000,
        ..MobyRecord::default()
    };
    let mut dump = vec![0u8; 0x300];
    record.serialize_into(&mut dump, 0x200).unwrap();
    std::fs::write(path, dump).unwrap();
}

#[test]
fn test_moby_at_address() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dump_path = dir.path().join("dump.bin");
    write_moby_dump(&dump_path);

    let out = geoswap(&[
        "moby",
        path_str(&dump_path),
        "--at",
        "0x1200",
        "--base",
        "0x1000",
    ]);
    assert!(out.status.success(), "geoswap moby command failed");

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("Invalid JSON");
    assert_eq!(json["type"], 0x01F4);
    assert_eq!(json["state"], 2);
    assert_eq!(json["pvars"], 0x00C0_0000);
}

#[test]
fn test_moby_at_named_address() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dump_path = dir.path().join("dump.bin");
    let profiles_path = dir.path().join("profiles.toml");
    write_moby_dump(&dump_path);
    std::fs::write(
        &profiles_path,
        "[[profile]]\ntitle_id = \"TEST00001\"\nname = \"Test\"\n\n[profile.addresses]\nplayer_moby = 0x200\n",
    )
    .unwrap();

    let out = geoswap(&[
        "moby",
        path_str(&dump_path),
        "--at",
        "player_moby",
        "--game",
        "TEST00001",
        "--profiles",
        path_str(&profiles_path),
    ]);
    assert!(out.status.success(), "geoswap moby command failed");

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("Invalid JSON");
    assert_eq!(json["type"], 0x01F4);
}

#[test]
fn test_moby_past_end_of_dump() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dump_path = dir.path().join("dump.bin");
    write_moby_dump(&dump_path);

    let out = geoswap(&["moby", path_str(&dump_path), "--at", "0x280"]);
    assert!(!out.status.success());
}

#[test]
fn test_builtin_profiles() {
    let out = geoswap(&["profiles"]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("NPEA00385"));
    assert!(stdout.contains("n_gold_bolts_collected"));
    assert!(stdout.contains("0x00aff000"));
}
