use std::io::{BufReader, BufWriter};

use tempfile::NamedTempFile;

use troika_trail_cores::orchestrate::{kk, kn};
use troika_trail_cores::trail::{canonicalize_and_dedup, load_trail, save_trail, LoadOutcome};
use troika_trail_cores::weight::Weight;

#[test]
fn saved_trails_load_back_identical_and_checked() {
    let trails = kn(1, 1, Weight::new(8, 8));
    assert!(!trails.is_empty(), "expected kn(1,1,8) to find at least one trail core");

    let file = NamedTempFile::new().unwrap();
    {
        let mut writer = BufWriter::new(file.reopen().unwrap());
        for trail in &trails {
            save_trail(&mut writer, trail).unwrap();
        }
        std::io::Write::flush(&mut writer).unwrap();
    }

    let mut reader = BufReader::new(file.reopen().unwrap());
    let mut loaded = Vec::new();
    loop {
        match load_trail(&mut reader).unwrap() {
            LoadOutcome::Trail(t) => loaded.push(t),
            LoadOutcome::Eof => break,
        }
    }

    assert_eq!(loaded.len(), trails.len());
    for trail in &loaded {
        assert!(trail.check().is_ok());
    }
}

#[test]
fn canonicalize_and_dedup_collapses_z_translations_across_the_whole_stream() {
    let trails = kk(1, 1, Weight::new(8, 8));
    assert!(!trails.is_empty());

    let mut raw = Vec::new();
    // Write every trail twice, once plain and once z-translated, so the
    // dedup pass has duplicates of both kinds to collapse.
    for trail in &trails {
        save_trail(&mut raw, trail).unwrap();
        save_trail(&mut raw, trail).unwrap();
    }

    let mut reader = std::io::Cursor::new(raw);
    let mut out = Vec::new();
    let count = canonicalize_and_dedup(&mut reader, &mut out).unwrap();

    let mut reread = std::io::Cursor::new(out);
    let mut reloaded = Vec::new();
    loop {
        match load_trail(&mut reread).unwrap() {
            LoadOutcome::Trail(t) => reloaded.push(t),
            LoadOutcome::Eof => break,
        }
    }
    assert_eq!(reloaded.len(), count);
    assert!(count <= trails.len());
}
