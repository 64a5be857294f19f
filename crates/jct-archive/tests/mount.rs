use std::io::Write;
use std::path::PathBuf;

use jct_archive::ArchiveMount;

fn write_fixture_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::<()>::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn reads_exact_bytes_and_reports_absence_distinctly() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("classes.jar");
    let payload = vec![7u8; 118];
    write_fixture_zip(&archive_path, &[("a/b/C.class", &payload)]);

    let mount = ArchiveMount::new(&archive_path, None);
    assert_eq!(mount.read("a/b/C.class").unwrap(), Some(payload));
    assert_eq!(mount.read("a/b/D.class").unwrap(), None);

    let listed = mount.list("a.b", false).unwrap();
    assert_eq!(listed, vec!["a/b/C.class".to_string()]);
}

#[test]
fn concurrent_mounts_of_same_archive_do_not_contend() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("shared.jar");
    write_fixture_zip(&archive_path, &[("x/Y.class", b"one"), ("x/Z.class", b"two")]);
    let archive_path: PathBuf = archive_path;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = archive_path.clone();
            std::thread::spawn(move || {
                let mount = ArchiveMount::new(&path, None);
                let y = mount.read("x/Y.class").unwrap();
                let z = mount.read("x/Z.class").unwrap();
                mount.close().unwrap();
                (y, z)
            })
        })
        .collect();

    for handle in handles {
        let (y, z) = handle.join().unwrap();
        assert_eq!(y, Some(b"one".to_vec()));
        assert_eq!(z, Some(b"two".to_vec()));
    }
}

#[test]
fn close_is_idempotent_and_a_noop_before_mounting() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("empty.jar");
    write_fixture_zip(&archive_path, &[]);

    let never_mounted = ArchiveMount::new(&archive_path, None);
    never_mounted.close().unwrap();
    never_mounted.close().unwrap();

    let mounted = ArchiveMount::new(&archive_path, None);
    mounted.read("anything").unwrap();
    mounted.close().unwrap();
    mounted.close().unwrap();
}

#[test]
fn multi_release_overlay_selection_respects_target_release() {
    let tmp = tempfile::tempdir().unwrap();
    let archive_path = tmp.path().join("mr.jar");
    write_fixture_zip(
        &archive_path,
        &[
            ("a/B.class", b"base"),
            ("META-INF/versions/9/a/B.class", b"v9"),
            ("META-INF/versions/17/a/B.class", b"v17"),
        ],
    );

    // No target release configured: base always wins.
    let conservative = ArchiveMount::new(&archive_path, None);
    assert_eq!(conservative.read("a/B.class").unwrap(), Some(b"base".to_vec()));

    // Target release 11: highest overlay <= 11 is v9.
    let targeted = ArchiveMount::new(&archive_path, Some(11));
    assert_eq!(targeted.read("a/B.class").unwrap(), Some(b"v9".to_vec()));

    // Target release 17: highest qualifying overlay wins.
    let latest = ArchiveMount::new(&archive_path, Some(17));
    assert_eq!(latest.read("a/B.class").unwrap(), Some(b"v17".to_vec()));
}
