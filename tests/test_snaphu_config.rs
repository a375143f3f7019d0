use snaphu_bridge::core::snaphu_config::{
    BASE_TEMPLATE, MASK_TEMPLATE, TILE_TEMPLATE, UNWRAPPED_TEMPLATE,
};
use snaphu_bridge::{InputFormat, SnaphuConfig, SnaphuError, TileParams};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::tempdir;

fn keywords(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_write_returns_paths_and_overwrites() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("snaphu.conf");
    std::fs::write(&conf, "stale contents that must disappear\n").unwrap();

    let (conf_path, out_path) = SnaphuConfig::new(
        dir.path().join("bursts_unwrapped.bin"),
        dir.path().join("bursts_correlation.bin"),
        4,
        20,
        (1200, 3400),
        &conf,
        dir.path().join("bursts_reunwrapped.bin"),
    )
    .with_mask(dir.path().join("bursts_mask.bin"))
    .with_unwrapped_input(true)
    .write()
    .unwrap();

    assert_eq!(conf_path, conf);
    assert_eq!(out_path, dir.path().join("bursts_reunwrapped.bin"));

    let text = std::fs::read_to_string(&conf).unwrap();
    assert!(!text.contains("stale"));
    assert!(text.contains("LINELENGTH\t3400"));
    assert!(text.contains(&format!(
        "BYTEMASKFILE\t{}",
        dir.path().join("bursts_mask.bin").display()
    )));
    assert!(text.contains("UNWRAPPED_IN\tTRUE"));
    assert!(text.contains("UNWRAPPEDINFILEFORMAT\tFLOAT_DATA"));
    assert!(!text.contains("NTILEROW"));
}

#[test]
fn test_each_optional_section_adds_exactly_its_directives() {
    let base = SnaphuConfig::new("i.bin", "c.bin", 1, 1, (10, 10), "s.conf", "o.bin");
    let base_keys = keywords(&base.render().unwrap());
    assert_eq!(base_keys.len(), 13);

    let tiled = keywords(&base.clone().with_tiling(TileParams::new(3, 3)).render().unwrap());
    assert_eq!(&tiled[..13], &base_keys[..]);
    assert_eq!(&tiled[13..], &["NTILEROW", "NTILECOL", "ROWOVRLP", "COLOVRLP", "NPROC"]);

    let masked = keywords(&base.clone().with_mask("m.bin").render().unwrap());
    assert_eq!(&masked[13..], &["BYTEMASKFILE"]);

    let unwrapped = keywords(&base.clone().with_unwrapped_input(true).render().unwrap());
    assert_eq!(&unwrapped[13..], &["UNWRAPPED_IN", "UNWRAPPEDINFILEFORMAT"]);
}

#[test]
fn test_nproc_is_tile_count() {
    for (rows, cols) in [(1, 1), (3, 3), (2, 5)] {
        let text = SnaphuConfig::new("i.bin", "c.bin", 1, 1, (10, 10), "s.conf", "o.bin")
            .with_tiling(TileParams::new(rows, cols))
            .render()
            .unwrap();
        assert!(text.contains(&format!("NPROC\t{}", rows * cols)));
    }
}

#[test]
fn test_templates_cover_every_placeholder_they_use() {
    let mut values = BTreeMap::new();
    for key in [
        "infile",
        "informat",
        "width",
        "looks_range",
        "looks_az",
        "outfile",
        "outformat",
        "corfile",
    ] {
        values.insert(key, "v".to_string());
    }
    assert!(BASE_TEMPLATE.render(&values).is_ok());
    assert!(UNWRAPPED_TEMPLATE.render(&BTreeMap::new()).is_ok());

    match TILE_TEMPLATE.render(&values) {
        Err(SnaphuError::MissingPlaceholder { template, key }) => {
            assert_eq!(template, "tile");
            assert_eq!(key, "ntilerow");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        MASK_TEMPLATE.render(&values),
        Err(SnaphuError::MissingPlaceholder { .. })
    ));
}

#[test]
fn test_explicit_complex_input_format() {
    let config = SnaphuConfig::new(
        PathBuf::from("bursts_wrapped.bin"),
        "c.bin",
        4,
        20,
        (5, 5),
        "s.conf",
        "o.bin",
    )
    .with_input_format(InputFormat::ComplexData);

    let text = config.render().unwrap();
    assert!(text.contains("INFILEFORMAT\tCOMPLEX_DATA"));
    assert!(text.contains("OUTFILEFORMAT\tFLOAT_DATA"));
    assert!(text.contains("CORRFILEFORMAT\tFLOAT_DATA"));
}

#[test]
fn test_zero_looks_are_rejected() {
    let result = SnaphuConfig::new("i.bin", "c.bin", 0, 20, (5, 5), "s.conf", "o.bin").render();
    assert!(matches!(result, Err(SnaphuError::InvalidConfig(_))));
}
