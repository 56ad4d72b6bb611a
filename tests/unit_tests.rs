use std::fs;

use synth2yolo::error::{ConversionError, IoFailure, Stage};
use synth2yolo::{
    convert_dataset, convert_image_labels, normalize, read_label_file, read_manifest,
    write_label_file, write_label_name_index, ConvertOptions, ImageLabels, ImageSize, RawBox,
};

#[test]
fn test_normalize_reference_boxes() {
    let bbox = normalize(&RawBox::new(0, 0, 0, 10, 20), ImageSize::new(100, 200)).unwrap();
    assert_eq!(
        (bbox.x_center, bbox.y_center, bbox.width, bbox.height),
        (0.05, 0.05, 0.1, 0.1)
    );

    let bbox = normalize(&RawBox::new(0, 5, 5, 3, 3), ImageSize::new(10, 10)).unwrap();
    assert_eq!(
        (bbox.x_center, bbox.y_center, bbox.width, bbox.height),
        (0.6, 0.6, 0.3, 0.3)
    );
}

#[test]
fn test_empty_image_produces_empty_label_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    let records = convert_image_labels(&[], ImageSize::new(640, 480)).unwrap();
    assert!(records.is_empty());

    let path = write_label_file(&records, "rgb_0", temp_dir.path()).unwrap();
    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_label_file_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let boxes = vec![
        RawBox::new(0, 13, 7, 101, 33),
        RawBox::new(4, -12, 300, 45, 81),
        RawBox::new(2, 0, 0, 1920, 1080),
        RawBox::new(1, 959, 539, 1, 1),
    ];
    let records = convert_image_labels(&boxes, ImageSize::new(1920, 1080)).unwrap();

    let path = write_label_file(&records, "rgb_42", temp_dir.path()).unwrap();
    let read_back = read_label_file(&path).unwrap();

    assert_eq!(read_back, records);

    let content = fs::read_to_string(&path).unwrap();
    for (line, record) in content.lines().zip(&records) {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].parse::<u32>().unwrap(), record.label_id);
        assert_eq!(fields[1].parse::<f64>().unwrap(), record.bbox.x_center);
        assert_eq!(fields[4].parse::<f64>().unwrap(), record.bbox.height);
    }
}

#[test]
fn test_label_name_index_order() {
    let temp_dir = tempfile::tempdir().unwrap();

    write_label_name_index(&["car", "tree", "sign"], temp_dir.path()).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("object_names.txt")).unwrap();
    let names: Vec<&str> = content.lines().collect();
    assert_eq!(names, vec!["car", "tree", "sign"]);
}

#[test]
fn test_convert_dataset_aborts_when_name_index_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be cannot become a directory
    let blocker = temp_dir.path().join("labels");
    fs::write(&blocker, "not a directory").unwrap();
    let output_dir = blocker.join("out");
    let images = vec![ImageLabels {
        stem: "rgb_2".to_string(),
        boxes: vec![RawBox::new(0, 0, 0, 10, 20)],
        size: ImageSize::new(100, 200),
    }];

    let err = convert_dataset(&images, &["car"], &output_dir, &ConvertOptions::default())
        .unwrap_err();

    match err {
        ConversionError::NameIndex(io_err) => {
            assert_eq!(io_err.kind, IoFailure::NotFound);
            assert_eq!(io_err.path, output_dir.join("object_names.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output_dir.join("rgb_2.txt").exists());
}

#[test]
fn test_convert_dataset_reports_failing_image() {
    let temp_dir = tempfile::tempdir().unwrap();
    let images = vec![
        ImageLabels {
            stem: "rgb_2".to_string(),
            boxes: vec![RawBox::new(0, 0, 0, 10, 20)],
            size: ImageSize::new(100, 200),
        },
        ImageLabels {
            stem: "rgb_3".to_string(),
            boxes: vec![RawBox::new(0, 0, 0, 10, 20)],
            size: ImageSize::new(0, 200),
        },
    ];

    let err = convert_dataset(&images, &["car"], temp_dir.path(), &ConvertOptions::default())
        .unwrap_err();

    match err {
        ConversionError::Image(failure) => {
            assert_eq!(failure.stem, "rgb_3");
            assert_eq!(failure.stage(), Stage::Normalize);
            assert!(failure.to_string().contains("`rgb_3` failed to normalize"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Files written before the failure are left in place by default
    assert!(temp_dir.path().join("rgb_2.txt").exists());
    assert!(temp_dir.path().join("object_names.txt").exists());
}

#[test]
fn test_manifest_to_labels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let manifest_path = temp_dir.path().join("manifest.json");
    fs::write(
        &manifest_path,
        r#"{
            "names": ["car", "tree", "sign"],
            "images": [
                {"filename": "RGBabc/rgb_2.png", "width": 100, "height": 200,
                 "boxes": [{"label_id": 2, "x": 0, "y": 0, "width": 10, "height": 20}]},
                {"filename": "RGBabc/rgb_3.png", "width": 100, "height": 200, "boxes": []}
            ]
        }"#,
    )
    .unwrap();
    let output_dir = temp_dir.path().join("YoloSrc");
    fs::create_dir(&output_dir).unwrap();

    let manifest = read_manifest(&manifest_path, None).unwrap();
    let stats = convert_dataset(
        &manifest.images,
        &manifest.names,
        &output_dir,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(stats.images, 2);
    assert_eq!(
        fs::read_to_string(output_dir.join("rgb_2.txt")).unwrap(),
        "2 0.05 0.05 0.1 0.1\n"
    );
    assert_eq!(fs::read_to_string(output_dir.join("rgb_3.txt")).unwrap(), "");
    assert_eq!(
        fs::read_to_string(output_dir.join("object_names.txt")).unwrap(),
        "car\ntree\nsign\n"
    );
}
