// Unit tests for domain models

use super::*;
use crate::domain::rules::MIN_CLIP_LENGTH;

fn clip(duration: f64) -> Clip {
    Clip::create(ImportedMedia::new("/media/shot.mp4", duration)).unwrap()
}

#[test]
fn test_clip_create_spans_source() {
    let clip = clip(30.0);
    assert_eq!(clip.start(), 0.0);
    assert_eq!(clip.end(), 30.0);
    assert_eq!(clip.duration(), 30.0);
    assert_eq!(clip.source_duration(), 30.0);
    assert_eq!(clip.name(), "shot.mp4");
    assert!(clip.has_audio());
}

#[test]
fn test_clip_create_rejects_bad_duration() {
    assert!(matches!(
        Clip::create(ImportedMedia::new("a.mp4", 0.0)),
        Err(DomainError::InvalidDuration(_))
    ));
    assert!(Clip::create(ImportedMedia::new("a.mp4", -3.0)).is_err());
    assert!(Clip::create(ImportedMedia::new("a.mp4", f64::NAN)).is_err());
}

#[test]
fn test_clip_create_uses_explicit_name() {
    let clip = Clip::create(ImportedMedia::new("a.mp4", 5.0).with_name("Intro")).unwrap();
    assert_eq!(clip.name(), "Intro");
}

#[test]
fn test_clip_ids_unique() {
    assert_ne!(clip(5.0).id(), clip(5.0).id());
}

#[test]
fn test_set_bounds_recomputes_duration() {
    let mut clip = clip(10.0);
    clip.set_bounds(BoundsUpdate::start(5.0));
    assert_eq!((clip.start(), clip.end(), clip.duration()), (5.0, 10.0, 5.0));

    clip.set_bounds(BoundsUpdate::end(8.0));
    assert_eq!((clip.start(), clip.end(), clip.duration()), (5.0, 8.0, 3.0));
}

#[test]
fn test_set_bounds_clamps_collapse() {
    let mut clip = clip(10.0);
    clip.set_bounds(BoundsUpdate::start(50.0));
    assert!(clip.start() < clip.end());
    assert!(clip.duration() >= MIN_CLIP_LENGTH - 1e-9);
    assert_eq!(clip.duration(), clip.end() - clip.start());
}

#[test]
fn test_set_bounds_on_huge_source_never_empties_clip() {
    let mut clip = clip(1e17);
    clip.set_bounds(BoundsUpdate::start(1e17));
    assert_eq!((clip.start(), clip.end()), (0.0, 1e17));
    assert!(clip.duration() > 0.0);
}

#[test]
fn test_split_off_keeps_identity_on_first_part() {
    let mut first = clip(30.0);
    let original_id = first.id();
    let second = first.split_off(10.0);

    assert_eq!(first.id(), original_id);
    assert_ne!(second.id(), original_id);
    assert_eq!((first.start(), first.end(), first.duration()), (0.0, 10.0, 10.0));
    assert_eq!((second.start(), second.end(), second.duration()), (10.0, 30.0, 20.0));
    assert_eq!(second.name(), "shot.mp4 (Part 2)");
    assert_eq!(second.path(), first.path());
    assert_eq!(second.source_duration(), 30.0);
}

#[test]
fn test_split_off_shares_previews() {
    let media = ImportedMedia::new("a.mp4", 20.0)
        .with_thumbnail(PreviewImage::png(vec![1, 2, 3]))
        .with_waveform(PreviewImage::png(vec![4, 5]));
    let mut first = Clip::create(media).unwrap();
    let second = first.split_off(5.0);
    assert_eq!(first.thumbnail(), second.thumbnail());
    assert_eq!(first.waveform().map(PreviewImage::len), Some(2));
    assert_eq!(second.waveform().map(PreviewImage::len), Some(2));
}

#[test]
fn test_waveform_window() {
    let mut clip = clip(20.0);
    clip.set_bounds(BoundsUpdate::both(5.0, 15.0));
    let window = clip.waveform_window();
    assert_eq!(window.offset, 0.25);
    assert_eq!(window.width, 0.5);
}

#[test]
fn test_contains_is_half_open() {
    let mut clip = clip(20.0);
    clip.set_bounds(BoundsUpdate::both(5.0, 15.0));
    assert!(clip.contains(5.0));
    assert!(clip.contains(14.99));
    assert!(!clip.contains(15.0));
    assert!(!clip.contains(4.99));
}

#[test]
fn test_preview_image_rejects_empty() {
    assert!(PreviewImage::png(Vec::new()).is_none());
    let image = PreviewImage::png(vec![0x89, b'P', b'N', b'G']).unwrap();
    assert_eq!(image.format(), "png");
    assert_eq!(image.len(), 4);
}

#[test]
fn test_display_name_for() {
    assert_eq!(display_name_for(Path::new("/a/b/clip.mov")), "clip.mov");
    assert_eq!(display_name_for(Path::new("/")), "Unknown");
}

#[test]
fn test_notification_expiry() {
    let note = Notification::success("Export complete!");
    let ttl = chrono::Duration::seconds(3);
    assert!(!note.is_expired(note.raised_at, ttl));
    assert!(note.is_expired(note.raised_at + chrono::Duration::seconds(3), ttl));
}
