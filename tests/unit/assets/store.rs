use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_store").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("masks")).unwrap();
    dir
}

fn entry(id: &str, path: &str, scale: Option<f64>) -> MaskEntry {
    MaskEntry {
        id: id.to_string(),
        name: format!("mask {id}"),
        path: path.to_string(),
        scale,
    }
}

#[test]
fn entry_paths_are_canonicalized_under_root() {
    let store = MaskStore::new(
        ".",
        vec![
            entry("a", "a\\b.png", None),
            entry("b", "./masks//1.png", None),
            entry("c", "deep/./dir/c.webp", None),
        ],
    )
    .unwrap();
    assert_eq!(store.get("a").unwrap().path, "a/b.png");
    assert_eq!(store.get("b").unwrap().path, "masks/1.png");
    assert_eq!(store.get("c").unwrap().path, "deep/dir/c.webp");
}

#[test]
fn entry_paths_must_stay_inside_root_and_name_an_image() {
    for bad in ["../x.png", "masks/../../x.png", "/abs.png", "", ".", "masks/readme.txt", "masks/noext"] {
        let err = MaskStore::new(".", vec![entry("m", bad, None)]).unwrap_err();
        assert!(matches!(err, PhotomaskError::Config(_)), "{bad}: {err}");
        assert!(err.to_string().contains("mask 'm'"), "{bad}: {err}");
    }
}

#[test]
fn builtin_store_has_full_width_mask() {
    let store = MaskStore::builtin("assets");
    assert_eq!(store.entries().len(), 1);
    let e = store.resolve("1");
    assert_eq!(e.path, "masks/1.png");
    assert_eq!(e.scale, Some(1.0));
}

#[test]
fn resolve_falls_back_to_first_entry() {
    let store = MaskStore::new(
        ".",
        vec![entry("1", "masks/1.png", None), entry("square", "masks/sq.png", Some(0.5))],
    )
    .unwrap();
    assert_eq!(store.resolve("square").id, "square");
    assert_eq!(store.resolve("stories").id, "1");
    assert!(store.get("stories").is_none());
}

#[test]
fn new_rejects_duplicates_bad_scales_and_bad_paths() {
    assert!(MaskStore::new(".", vec![]).is_err());
    assert!(
        MaskStore::new(".", vec![entry("a", "x.png", None), entry("a", "y.png", None)]).is_err()
    );
    assert!(MaskStore::new(".", vec![entry("a", "x.png", Some(0.0))]).is_err());
    assert!(MaskStore::new(".", vec![entry("a", "../x.png", None)]).is_err());
}

#[test]
fn load_reads_bytes_and_scale() {
    let dir = scratch_dir("load");
    std::fs::write(dir.join("masks").join("frame.png"), b"png-bytes").unwrap();
    let store = MaskStore::new(&dir, vec![entry("frame", "masks/frame.png", Some(0.6))]).unwrap();

    let asset = store.load("frame").unwrap();
    assert_eq!(asset.id, "frame");
    assert_eq!(asset.bytes.as_slice(), b"png-bytes");
    assert_eq!(asset.scale, Some(0.6));
}

#[test]
fn missing_file_or_id_is_asset_not_found() {
    let dir = scratch_dir("missing");
    let store = MaskStore::new(&dir, vec![entry("gone", "masks/gone.png", None)]).unwrap();

    let err = store.load("gone").unwrap_err();
    assert!(matches!(err, PhotomaskError::AssetNotFound(_)), "{err}");
    let err = store.load("nope").unwrap_err();
    assert!(matches!(err, PhotomaskError::AssetNotFound(_)), "{err}");
    let err = OverlayAsset::from_path(&dir.join("masks").join("gone.png"), None).unwrap_err();
    assert!(matches!(err, PhotomaskError::AssetNotFound(_)), "{err}");
}

#[test]
fn manifest_paths_resolve_against_manifest_dir() {
    let dir = scratch_dir("manifest");
    std::fs::write(dir.join("masks").join("a.png"), b"a").unwrap();
    let manifest = dir.join("masks.json");
    std::fs::write(
        &manifest,
        r#"[{"id":"a","name":"A","path":"masks/a.png","scale":0.9},{"id":"b","name":"B","path":"masks/b.png"}]"#,
    )
    .unwrap();

    let store = MaskStore::from_manifest(&manifest).unwrap();
    assert_eq!(store.root(), dir.as_path());
    assert_eq!(store.entries().len(), 2);
    assert_eq!(store.get("b").unwrap().scale, None);
    assert_eq!(store.load("a").unwrap().bytes.as_slice(), b"a");

    std::fs::write(&manifest, "{not json").unwrap();
    assert!(matches!(
        MaskStore::from_manifest(&manifest),
        Err(PhotomaskError::Config(_))
    ));
}
