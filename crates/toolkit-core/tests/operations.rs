//! End-to-end scenarios over the public API

mod common;

use common::{letter_pdf, load, media_boxes, png, rotations};
use pdf_toolkit_core::{
    execute, image_to_pdf, merge_documents, package_archive, page_count, read_outline, rotate_pdf,
    split_job, split_pdf, Command, InputDocument, PageRange, RotationAngle, RotationDirection,
    SplitEntry, SplitJob, TocEntry, ToolkitError,
};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};

// ============================================================
// Merge
// ============================================================

#[test]
fn merge_appends_pages_and_points_toc_at_second_document() {
    let a = letter_pdf(3);
    let b = letter_pdf(2);

    let merged = merge_documents(&[
        InputDocument::new("A.pdf", a.clone()),
        InputDocument::new("B.pdf", b.clone()),
    ])
    .unwrap();

    let expected = page_count(&a).unwrap() + page_count(&b).unwrap();
    assert_eq!(page_count(&merged.bytes).unwrap(), expected);
    assert_eq!(merged.toc[1].page, page_count(&a).unwrap() + 1);
}

#[test]
fn merge_intro_and_cover_builds_expected_toc() {
    let merged = merge_documents(&[
        InputDocument::new("Intro.pdf", letter_pdf(2)),
        InputDocument::new("Cover.png", png(800, 600)),
    ])
    .unwrap();

    assert_eq!(merged.page_count, 3);
    assert_eq!(
        read_outline(&merged.bytes).unwrap(),
        vec![
            TocEntry {
                level: 1,
                title: "Intro.pdf".to_string(),
                page: 1
            },
            TocEntry {
                level: 1,
                title: "Cover.png".to_string(),
                page: 3
            },
        ]
    );
}

#[test]
fn merged_image_page_is_letter_sized() {
    let merged = merge_documents(&[InputDocument::new("scan.jpeg", black_jpeg())]).unwrap();
    assert_eq!(media_boxes(&merged.bytes), vec![vec![0.0, 0.0, 612.0, 792.0]]);
}

#[test]
fn merge_with_nothing_usable_fails() {
    let result = merge_documents(&[InputDocument::new("readme.md", b"# hi".to_vec())]);
    assert!(matches!(result, Err(ToolkitError::NoInputs)));
}

fn black_jpeg() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(120, 90));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Jpeg)
        .unwrap();
    buffer
}

// ============================================================
// Convert
// ============================================================

#[test]
fn image_to_pdf_gives_one_letter_page() {
    let pdf = image_to_pdf(&png(1024, 768)).unwrap();
    assert_eq!(page_count(&pdf).unwrap(), 1);
    assert_eq!(media_boxes(&pdf), vec![vec![0.0, 0.0, 612.0, 792.0]]);
}

#[test]
fn image_to_pdf_rejects_non_image() {
    let result = image_to_pdf(&letter_pdf(1));
    assert!(matches!(result, Err(ToolkitError::UnsupportedOrCorruptInput(_))));
}

// ============================================================
// Split
// ============================================================

#[test]
fn split_first_two_pages() {
    let outputs = split_pdf(&letter_pdf(5), &[SplitEntry::new("1-2", "a.pdf")]).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].output_name, "a.pdf");
    assert_eq!(load(&outputs[0].bytes).get_pages().len(), 2);
}

#[test]
fn split_rejects_inverted_and_zero_ranges() {
    assert!(matches!(
        PageRange::parse("5-3", 10),
        Err(ToolkitError::InvalidRangeSyntax(_))
    ));
    assert!(matches!(
        split_pdf(&letter_pdf(4), &[SplitEntry::new("0-2", "a.pdf")]),
        Err(ToolkitError::InvalidRangeSyntax(_))
    ));
}

#[test]
fn split_job_then_archive() {
    let job = SplitJob::parse("1-3: Part1.pdf\n4-5: Part2.pdf\n6: CoverPage.pdf\nnonsense");
    let report = split_job(&letter_pdf(6), &job).unwrap();
    assert_eq!(report.skipped, vec!["nonsense".to_string()]);

    let entries: Vec<(&str, &[u8])> = report
        .outputs
        .iter()
        .map(|o| (o.output_name.as_str(), o.bytes.as_slice()))
        .collect();
    let archive = package_archive(&entries).unwrap();

    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut found = Vec::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        found.push((file.name().to_string(), load(&content).get_pages().len()));
    }

    assert_eq!(
        found,
        vec![
            ("Part1.pdf".to_string(), 3),
            ("Part2.pdf".to_string(), 2),
            ("CoverPage.pdf".to_string(), 1),
        ]
    );
}

// ============================================================
// Rotate
// ============================================================

#[test]
fn rotate_right_then_left_restores() {
    let pdf = letter_pdf(3);
    let right = rotate_pdf(&pdf, RotationAngle::Deg90, RotationDirection::Right).unwrap();
    assert_eq!(rotations(&right.bytes), vec![90, 90, 90]);

    let back = rotate_pdf(&right.bytes, RotationAngle::Deg90, RotationDirection::Left).unwrap();
    assert_eq!(rotations(&back.bytes), rotations(&pdf));
}

#[test]
fn rotate_single_page_left_gives_270() {
    let rotated =
        rotate_pdf(&letter_pdf(1), RotationAngle::Deg90, RotationDirection::Left).unwrap();
    assert_eq!(rotated.pages_rotated, 1);
    assert_eq!(rotations(&rotated.bytes), vec![270]);
}

#[test]
fn rotation_magnitude_must_be_quarter_turn() {
    assert!(matches!(
        RotationAngle::try_from(45i64),
        Err(ToolkitError::InvalidRotation(45))
    ));
}

// ============================================================
// Dispatcher
// ============================================================

#[test]
fn command_from_json_runs_rotation() {
    let json = serde_json::json!({
        "type": "Rotate",
        "file": letter_pdf(2),
        "degrees": 180,
        "direction": "right",
    });
    let command: Command = serde_json::from_value(json).unwrap();
    let output = execute(command).unwrap();

    assert_eq!(output.metrics.page_count, 2);
    assert_eq!(rotations(&output.artifacts[0].bytes), vec![180, 180]);
}
