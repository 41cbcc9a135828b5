use std::fs;
use std::path::Path;

use draw2matrix::{
    BuildDatasetJob, DatasetConfig, Draw2Matrix, Draw2MatrixError, ExportTarget, JobSample,
    Region,
};
use draw2matrix::{CropPadding, RasterError, SessionSnapshot};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// White capture with the left half inked.
fn left_half(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| if x < width / 2 { BLACK } else { WHITE })
}

fn save_png(img: &RgbaImage, path: &Path) {
    img.save(path).expect("save png");
}

fn full_frame(img: &RgbaImage) -> Region {
    CropPadding::default().region_covering(img.width(), img.height())
}

#[test]
fn session_writes_flat_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blank = RgbaImage::from_pixel(200, 160, WHITE);

    let mut session = Draw2Matrix::new();
    session
        .lock(DatasetConfig {
            matlab_format: false,
            ..DatasetConfig::for_matrix_size(3, 3)
        })
        .expect("lock");
    session
        .add_capture(&blank, &full_frame(&blank), "A")
        .expect("add");
    let paths = session.save(&ExportTarget::new(dir.path())).expect("save");

    let text = fs::read_to_string(paths.data).expect("read");
    assert_eq!(text, "Input,Target\r\n[0 0 0 0 0 0 0 0 0],A\r\n");
}

#[test]
fn session_writes_one_hot_matlab_pair() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ink = RgbaImage::from_pixel(100, 100, BLACK);
    let blank = RgbaImage::from_pixel(100, 100, WHITE);

    let mut session = Draw2Matrix::new();
    session
        .lock(DatasetConfig {
            one_hot_encode: true,
            ..DatasetConfig::for_matrix_size(2, 2)
        })
        .expect("lock");
    session.add_capture(&ink, &full_frame(&ink), "on").expect("add");
    session
        .add_capture(&blank, &full_frame(&blank), "off")
        .expect("add");
    session.add_capture(&ink, &full_frame(&ink), "on").expect("add");

    let paths = session.save(&ExportTarget::new(dir.path())).expect("save");
    let data = fs::read_to_string(&paths.data).expect("data");
    assert_eq!(data, "[ 1 0 1 ;\n1 0 1 ;\n1 0 1 ;\n1 0 1 ]");
    let target = fs::read_to_string(paths.target.expect("target")).expect("target");
    assert_eq!(target, "[ 1 0 1 ;\n0 1 0 ]");
}

#[test]
fn job_file_builds_dataset_with_extras() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_png(&left_half(160, 120), &dir.path().join("left.png"));
    save_png(&RgbaImage::from_pixel(160, 120, WHITE), &dir.path().join("blank.png"));

    let job = BuildDatasetJob {
        config: DatasetConfig {
            matlab_use_named_variable: true,
            ..DatasetConfig::for_matrix_size(4, 4)
        },
        padding: CropPadding::default(),
        output: ExportTarget::with_names("out", "inputs", "labels"),
        session_path: Some("session.json".into()),
        preview_dir: Some("previews".into()),
        preview_scale: 2,
        samples: vec![
            JobSample {
                image_path: "left.png".into(),
                label: "left".to_string(),
                region: None,
            },
            JobSample {
                image_path: "blank.png".into(),
                label: "blank".to_string(),
                region: None,
            },
        ],
    };
    let job_path = dir.path().join("job.json");
    job.write_json(&job_path).expect("write job");
    fs::create_dir(dir.path().join("out")).expect("out dir");

    let loaded = BuildDatasetJob::load_json(&job_path).expect("load job");
    assert_eq!(loaded.samples[0].image_path, dir.path().join("left.png"));
    let report = loaded.run().expect("run");

    assert_eq!(report.samples, 2);
    assert_eq!(report.data_path, dir.path().join("out").join("inputs.m"));
    assert!(report.overwritten.is_empty());
    assert_eq!(report.previews.len(), 2);
    assert!(report.previews.iter().all(|p| p.exists()));

    let data = fs::read_to_string(&report.data_path).expect("data");
    assert!(data.starts_with("inputs_variable = [ "));
    assert!(data.ends_with(" ];"));
    // 16 feature rows, two samples each.
    assert_eq!(data.matches(";\n").count(), 15);
    let labels = fs::read_to_string(report.target_path.expect("target")).expect("labels");
    assert_eq!(labels, "labels_variable = [left blank];");

    let snap = SessionSnapshot::load_json(dir.path().join("session.json")).expect("snapshot");
    assert_eq!(snap.sample_count, 2);
    assert!(snap.saved);
    // Left half inked: every row starts with ink and ends blank.
    for row in snap.inputs[0].chunks(4) {
        assert_eq!(row[0], 1, "row {row:?}");
        assert_eq!(row[3], 0, "row {row:?}");
    }
    assert!(snap.inputs[1].iter().all(|&v| v == 0));
}

#[test]
fn job_reports_failing_sample() {
    let dir = tempfile::tempdir().expect("tempdir");
    let job = BuildDatasetJob {
        config: DatasetConfig::default(),
        padding: CropPadding::default(),
        output: ExportTarget::new(dir.path()),
        session_path: None,
        preview_dir: None,
        preview_scale: 1,
        samples: vec![JobSample {
            image_path: dir.path().join("missing.png"),
            label: "x".to_string(),
            region: None,
        }],
    };
    let err = job.run().unwrap_err();
    match err {
        Draw2MatrixError::Sample { index, source, .. } => {
            assert_eq!(index, 0);
            assert!(matches!(*source, Draw2MatrixError::LoadImage { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("data.txt").exists());
}

#[test]
fn job_rejects_oversized_preview_scale() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_png(&left_half(80, 80), &dir.path().join("a.png"));
    let job = BuildDatasetJob {
        config: DatasetConfig::for_matrix_size(19, 19),
        padding: CropPadding::default(),
        output: ExportTarget::new(dir.path()),
        session_path: None,
        preview_dir: Some(dir.path().join("previews")),
        preview_scale: 300_000_000,
        samples: vec![JobSample {
            image_path: dir.path().join("a.png"),
            label: "a".to_string(),
            region: None,
        }],
    };
    match job.run().unwrap_err() {
        Draw2MatrixError::Sample { source, .. } => assert!(matches!(
            *source,
            Draw2MatrixError::Raster(RasterError::PreviewTooLarge { .. })
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("data.txt").exists());
}

#[test]
fn job_rejects_overlong_labels() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_png(&RgbaImage::from_pixel(50, 50, WHITE), &dir.path().join("a.png"));
    let json = format!(
        r#"{{
            "output": {{ "dir": "." }},
            "samples": [{{ "image_path": "a.png", "label": "{}" }}]
        }}"#,
        "x".repeat(21)
    );
    let job_path = dir.path().join("job.json");
    fs::write(&job_path, json).expect("write");

    let job = BuildDatasetJob::load_json(&job_path).expect("load");
    assert_eq!(job.config, DatasetConfig::default());
    assert_eq!(job.preview_scale, 8);
    assert!(matches!(
        job.run(),
        Err(Draw2MatrixError::Sample { .. })
    ));
}
