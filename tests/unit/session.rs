use std::{io::Cursor, path::PathBuf};

use super::*;
use crate::{assets::store::MaskEntry, config::CompositorConfig};

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn started() -> Session {
    let mut s = Session::new();
    s.handle(SessionEvent::Start).unwrap();
    s
}

#[test]
fn happy_path_walks_every_state() {
    let mut s = Session::new();
    assert_eq!(s.state(), &SessionState::Idle);

    let actions = s.handle(SessionEvent::Start).unwrap();
    assert_eq!(actions, vec![SessionAction::Reply(Prompt::SendPhoto)]);
    assert_eq!(s.state(), &SessionState::AwaitingImage);

    let actions = s.handle(SessionEvent::Photo(vec![1, 2, 3])).unwrap();
    assert_eq!(
        actions,
        vec![SessionAction::AskFormat(vec![
            FormatKind::Stories,
            FormatKind::Square
        ])]
    );
    assert!(matches!(s.state(), SessionState::AwaitingFormat { .. }));

    let actions = s
        .handle(SessionEvent::FormatChosen("format_stories".to_string()))
        .unwrap();
    assert_eq!(actions.len(), 3);
    assert_eq!(
        actions[0],
        SessionAction::AcknowledgeFormat(FormatKind::Stories)
    );
    let SessionAction::Process {
        image,
        format,
        mask_id,
    } = &actions[2]
    else {
        panic!("expected process action, got {:?}", actions[2]);
    };
    assert_eq!(image.as_slice(), &[1, 2, 3]);
    assert_eq!(*format, TargetFormat::stories());
    assert_eq!(mask_id, "stories");
    assert!(matches!(s.state(), SessionState::Processing { .. }));

    let actions = s.handle(SessionEvent::Completed(vec![9])).unwrap();
    assert_eq!(
        actions,
        vec![
            SessionAction::SendResult(vec![9]),
            SessionAction::Reply(Prompt::Finished)
        ]
    );
    assert_eq!(s.state(), &SessionState::Done);
}

#[test]
fn non_photo_while_awaiting_image_ends_conversation() {
    let mut s = started();
    let actions = s.handle(SessionEvent::Text("hello".to_string())).unwrap();
    assert_eq!(actions, vec![SessionAction::Reply(Prompt::NotAnImage)]);
    assert_eq!(s.state(), &SessionState::Done);

    let mut s = started();
    s.handle(SessionEvent::Photo(Vec::new())).unwrap();
    assert_eq!(s.state(), &SessionState::Done);
}

#[test]
fn photo_outside_conversation_asks_for_start() {
    let mut s = Session::new();
    let actions = s.handle(SessionEvent::Photo(vec![1])).unwrap();
    assert_eq!(actions, vec![SessionAction::Reply(Prompt::StartFirst)]);
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn awaiting_format_ignores_noise_and_unknown_choices() {
    let mut s = started();
    s.handle(SessionEvent::Photo(vec![7])).unwrap();

    assert!(s.handle(SessionEvent::Text("?".to_string())).unwrap().is_empty());
    assert!(
        s.handle(SessionEvent::FormatChosen("format_banner".to_string()))
            .unwrap()
            .is_empty()
    );
    assert!(matches!(s.state(), SessionState::AwaitingFormat { .. }));

    s.handle(SessionEvent::FormatChosen("format_square".to_string()))
        .unwrap();
    let SessionState::Processing { format, .. } = s.state() else {
        panic!("expected processing");
    };
    assert_eq!(*format, TargetFormat::square());
}

#[test]
fn failure_and_restart() {
    let mut s = started();
    s.handle(SessionEvent::Photo(vec![7])).unwrap();
    s.handle(SessionEvent::FormatChosen("square".to_string()))
        .unwrap();
    let actions = s.handle(SessionEvent::Failed("boom".to_string())).unwrap();
    assert_eq!(actions, vec![SessionAction::Reply(Prompt::ProcessingFailed)]);
    assert_eq!(s.state(), &SessionState::Done);

    s.handle(SessionEvent::Start).unwrap();
    assert_eq!(s.state(), &SessionState::AwaitingImage);
}

#[test]
fn help_keeps_state() {
    let mut s = started();
    let actions = s.handle(SessionEvent::Help).unwrap();
    assert_eq!(actions, vec![SessionAction::Reply(Prompt::Help)]);
    assert_eq!(s.state(), &SessionState::AwaitingImage);
    assert!(Prompt::Help.text().contains("/start"));
}

#[test]
fn outcome_without_processing_is_session_error() {
    let mut s = Session::new();
    let err = s.handle(SessionEvent::Completed(vec![])).unwrap_err();
    assert!(matches!(err, PhotomaskError::Session(_)));
    assert_eq!(s.state(), &SessionState::Idle);
}

#[test]
fn process_action_runs_compositor_with_fallback_mask() {
    let dir = PathBuf::from("target").join("unit_session");
    std::fs::create_dir_all(dir.join("masks")).unwrap();
    let mask = png_bytes(image::DynamicImage::ImageRgba8(
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 255, 255, 200])),
    ));
    std::fs::write(dir.join("masks").join("1.png"), mask).unwrap();
    let store = MaskStore::new(
        &dir,
        vec![MaskEntry {
            id: "1".to_string(),
            name: "1".to_string(),
            path: "masks/1.png".to_string(),
            scale: Some(1.0),
        }],
    )
    .unwrap();
    let compositor = Compositor::new(CompositorConfig::default()).unwrap();

    let photo = png_bytes(image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        12,
        12,
        image::Rgb([10, 10, 10]),
    )));
    let action = SessionAction::Process {
        image: Arc::new(photo),
        format: TargetFormat::custom(18, 32).unwrap(),
        mask_id: "stories".to_string(),
    };
    let Some(SessionEvent::Completed(bytes)) = run_process_action(&action, &compositor, &store)
    else {
        panic!("expected completed event");
    };
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (18, 32));

    let bad = SessionAction::Process {
        image: Arc::new(b"junk".to_vec()),
        format: TargetFormat::square(),
        mask_id: "1".to_string(),
    };
    assert!(matches!(
        run_process_action(&bad, &compositor, &store),
        Some(SessionEvent::Failed(_))
    ));
    assert!(run_process_action(&SessionAction::Reply(Prompt::Working), &compositor, &store).is_none());
}
