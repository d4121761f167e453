use image::ImageFormat;
use std::path::PathBuf;
use thumbnailer::config::{ClassifyMode, Configuration, Mode, ResizeFilter};

#[test]
fn defaults_match_legacy_script() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.dir, PathBuf::from("data/images"));
    assert_eq!(cfg.max_size, 128);
    assert_eq!(cfg.output_ext, "png");
    assert_eq!(cfg.mode, Mode::Replace);
    assert_eq!(cfg.classify, ClassifyMode::Strict);
    assert_eq!(cfg.resize_filter, ResizeFilter::CatmullRom);
    assert!(cfg.atomic_writes);
    assert!(cfg.overwrite);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
dir: "/photos"
max-size: 256
output-ext: webp
mode: legacy
classify: substring
resize-filter: lanczos3
atomic-writes: false
overwrite: false
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.dir, PathBuf::from("/photos"));
    assert_eq!(cfg.max_size, 256);
    assert_eq!(cfg.output_ext, "webp");
    assert_eq!(cfg.mode, Mode::Legacy);
    assert_eq!(cfg.classify, ClassifyMode::Substring);
    assert_eq!(cfg.resize_filter, ResizeFilter::Lanczos3);
    assert!(!cfg.atomic_writes);
    assert!(!cfg.overwrite);
}

#[test]
fn unknown_mode_is_rejected() {
    let err = serde_yaml::from_str::<Configuration>("mode: shred\n").unwrap_err();
    assert!(err.to_string().contains("shred"), "{err}");
}

#[test]
fn validated_normalizes_extension() {
    let cfg = Configuration {
        output_ext: " .PNG".into(),
        ..Configuration::default()
    }
    .validated()
    .unwrap();
    assert_eq!(cfg.output_ext, "png");
    assert_eq!(cfg.output_format().unwrap(), ImageFormat::Png);
}

#[test]
fn validated_accepts_jpeg_alias() {
    let cfg = Configuration {
        output_ext: "jpg".into(),
        ..Configuration::default()
    }
    .validated()
    .unwrap();
    assert_eq!(cfg.output_format().unwrap(), ImageFormat::Jpeg);
}

#[test]
fn zero_max_size_is_rejected() {
    let err = Configuration {
        max_size: 0,
        ..Configuration::default()
    }
    .validated()
    .unwrap_err();
    assert!(err.to_string().contains("max-size"), "{err}");
}

#[test]
fn unknown_extension_is_rejected() {
    for ext in ["", "txt", "tiff"] {
        let res = Configuration {
            output_ext: ext.into(),
            ..Configuration::default()
        }
        .validated();
        assert!(res.is_err(), "expected {ext:?} to be rejected");
    }
}

#[test]
fn from_yaml_file_reads_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("thumbnailer.yaml");
    std::fs::write(&path, "max-size: 64\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.max_size, 64);
    assert!(Configuration::from_yaml_file(tmp.path().join("missing.yaml")).is_err());
}
